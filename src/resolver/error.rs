//! Error type for per-rule resolution failures.
//!
//! These errors never escape the resolver: the per-rule dispatch layer logs
//! them together with the rule and payload, then degrades the rule's result
//! to an empty mapping so the batch can continue.

use std::fmt;

/// A failure while evaluating a single rule against a payload.
///
/// A path or query that simply matches nothing is *not* an error; the
/// evaluators report that as an empty result. `ResolutionError` covers the
/// cases worth a log line: unparsable payloads, malformed expressions or
/// filter patterns, and results of an unusable shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    /// The payload could not be parsed in the format the evaluator expects.
    InvalidPayload {
        /// What the evaluator tried to parse the payload as ("JSON", "XML")
        format: &'static str,
        /// Parser diagnostic
        reason: String,
    },

    /// The rule's expression is malformed for its declared expression type.
    InvalidExpression {
        /// The offending expression text
        expression: String,
        /// Why it was rejected
        reason: String,
    },

    /// The rule's `regexp_filter` is not a valid regex.
    InvalidFilter {
        /// The offending pattern
        pattern: String,
        /// Regex compiler diagnostic
        reason: String,
    },

    /// The expression evaluated, but to a value the flattener cannot use
    /// (e.g., an XPath string result where a node-set was required).
    UnexpectedResult {
        /// Description of the unusable shape
        reason: String,
    },

    /// A StringPart rule selected a field position past the end of the
    /// separated content.
    FieldOutOfRange {
        /// 1-based field position requested by the rule
        index: usize,
        /// Number of fields actually present
        available: usize,
    },
}

impl fmt::Display for ResolutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolutionError::InvalidPayload { format, reason } => {
                write!(f, "Payload is not valid {}: {}", format, reason)
            }
            ResolutionError::InvalidExpression { expression, reason } => {
                write!(f, "Invalid expression '{}': {}", expression, reason)
            }
            ResolutionError::InvalidFilter { pattern, reason } => {
                write!(f, "Invalid regexp filter '{}': {}", pattern, reason)
            }
            ResolutionError::UnexpectedResult { reason } => {
                write!(f, "Unusable evaluation result: {}", reason)
            }
            ResolutionError::FieldOutOfRange { index, available } => {
                write!(
                    f,
                    "Field {} requested but only {} field(s) present",
                    index, available
                )
            }
        }
    }
}

impl std::error::Error for ResolutionError {}
