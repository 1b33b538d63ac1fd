//! Per-rule expression dispatch and the error-absorption boundary.
//!
//! This is the single place where evaluator failures are handled: every
//! [`ResolutionError`] is logged with enough context to diagnose the rule
//! (variable name, expression type, expression text, and the full payload)
//! and then converted into an empty result. Nothing propagates past here, so
//! one bad rule can never take down a batch.

use super::error::ResolutionError;
use super::{json, text, xml};
use crate::models::{ExpressionType, GenericVariable};
use std::collections::HashMap;

/// Resolves a single rule against a payload.
///
/// An empty payload or an empty expression means nothing is configured for
/// this rule; both return an empty map without logging. Evaluator failures
/// are logged at info severity and also yield an empty map, so the caller
/// always gets a usable (possibly empty) result.
pub fn resolve(
    payload: &str,
    rule: &GenericVariable,
    text_separator: &str,
    from_chat_source: bool,
) -> HashMap<String, String> {
    if payload.is_empty() || rule.expression.is_empty() {
        return HashMap::new();
    }

    match dispatch(payload, rule, text_separator, from_chat_source) {
        Ok(resolved) => resolved,
        Err(err) => {
            log::info!(
                "Unable to resolve {} with {} {} in\n{}: {}",
                rule.variable_name,
                rule.expression_type,
                rule.expression,
                payload,
                err
            );
            HashMap::new()
        }
    }
}

/// Selects the evaluator for the rule's expression type.
///
/// The match is exhaustive over [`ExpressionType`]; unknown types cannot
/// reach this point because configuration with an unrecognized type fails to
/// deserialize.
fn dispatch(
    payload: &str,
    rule: &GenericVariable,
    text_separator: &str,
    from_chat_source: bool,
) -> Result<HashMap<String, String>, ResolutionError> {
    match rule.expression_type {
        ExpressionType::JsonPath => json::evaluate_json(payload, rule),
        ExpressionType::XPath => xml::evaluate_xml(payload, rule),
        ExpressionType::StringPart => {
            text::evaluate_string_part(payload, rule, text_separator, from_chat_source)
        }
    }
}
