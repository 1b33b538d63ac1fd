//! Configuration model for variable extraction rules.
//!
//! A webhook trigger is configured with a list of [`GenericVariable`] rules.
//! Each rule names an output variable, selects an expression language, and
//! carries the expression to evaluate against the incoming payload. Rules are
//! typically deserialized from the trigger's JSON configuration:
//!
//! ```json
//! {
//!     "variableName": "commit",
//!     "expressionType": "JSONPath",
//!     "expression": "$.head_commit.id",
//!     "defaultValue": "unknown"
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Expression language used by a rule to query the payload.
///
/// The set is closed: configuration carrying any other string fails to
/// deserialize, so an unrecognized type is rejected when the rule list is
/// loaded rather than at evaluation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExpressionType {
    /// JSONPath query against a JSON payload (e.g., `$.repository.name`).
    #[serde(rename = "JSONPath")]
    JsonPath,

    /// XPath query against an XML payload (e.g., `/build/branch`).
    #[serde(rename = "XPath")]
    XPath,

    /// 1-based positional field extraction from the `text` field of a
    /// chat-style JSON payload (e.g., `$.2` selects the second field).
    #[serde(rename = "StringPart")]
    StringPart,
}

impl fmt::Display for ExpressionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpressionType::JsonPath => write!(f, "JSONPath"),
            ExpressionType::XPath => write!(f, "XPath"),
            ExpressionType::StringPart => write!(f, "StringPart"),
        }
    }
}

/// A single configured variable-extraction rule.
///
/// Rules are immutable once constructed and evaluated independently of each
/// other; on duplicate `variable_name`s the later rule in the configured list
/// wins during the final merge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenericVariable {
    /// Name of the output variable. Also the base key for derived entries
    /// when the resolved value is a sequence or mapping.
    pub variable_name: String,

    /// Expression language to evaluate `expression` with.
    pub expression_type: ExpressionType,

    /// The query/path/index expression; syntax depends on `expression_type`.
    pub expression: String,

    /// Optional regex applied by the JSON evaluator to the fully-qualified
    /// path of each flattened entry; only matching entries are retained.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regexp_filter: Option<String>,

    /// Optional fallback injected as `{variable_name: default_value}` when
    /// resolution produces nothing (or an empty string) for this rule.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

impl GenericVariable {
    /// Creates a rule with no filter and no default.
    pub fn new(
        variable_name: impl Into<String>,
        expression_type: ExpressionType,
        expression: impl Into<String>,
    ) -> Self {
        Self {
            variable_name: variable_name.into(),
            expression_type,
            expression: expression.into(),
            regexp_filter: None,
            default_value: None,
        }
    }

    /// Sets the regex filter applied to flattened JSON paths.
    pub fn with_filter(mut self, pattern: impl Into<String>) -> Self {
        self.regexp_filter = Some(pattern.into());
        self
    }

    /// Sets the default value used when resolution yields nothing.
    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expression_type_display() {
        assert_eq!(ExpressionType::JsonPath.to_string(), "JSONPath");
        assert_eq!(ExpressionType::XPath.to_string(), "XPath");
        assert_eq!(ExpressionType::StringPart.to_string(), "StringPart");
    }

    #[test]
    fn test_deserialize_rule() {
        let json = r#"{
            "variableName": "commit",
            "expressionType": "JSONPath",
            "expression": "$.head_commit.id",
            "defaultValue": "unknown"
        }"#;

        let rule: GenericVariable = serde_json::from_str(json).unwrap();
        assert_eq!(rule.variable_name, "commit");
        assert_eq!(rule.expression_type, ExpressionType::JsonPath);
        assert_eq!(rule.expression, "$.head_commit.id");
        assert_eq!(rule.regexp_filter, None);
        assert_eq!(rule.default_value, Some("unknown".to_string()));
    }

    #[test]
    fn test_deserialize_rejects_unknown_expression_type() {
        let json = r#"{
            "variableName": "commit",
            "expressionType": "CssSelector",
            "expression": ".commit"
        }"#;

        let result: Result<GenericVariable, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_serialize_round_trip() {
        let rule = GenericVariable::new("branch", ExpressionType::XPath, "/push/branch")
            .with_default("main");

        let json = serde_json::to_string(&rule).unwrap();
        assert!(json.contains(r#""expressionType":"XPath""#));

        let back: GenericVariable = serde_json::from_str(&json).unwrap();
        assert_eq!(back, rule);
    }

    #[test]
    fn test_builder_helpers() {
        let rule = GenericVariable::new("tags", ExpressionType::JsonPath, "$.tags")
            .with_filter(r"\[0\]")
            .with_default("none");

        assert_eq!(rule.regexp_filter, Some(r"\[0\]".to_string()));
        assert_eq!(rule.default_value, Some("none".to_string()));
    }
}
