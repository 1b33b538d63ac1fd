//! Batch resolution of a configured rule list.
//!
//! Resolves every rule independently and merges the per-rule results into
//! one mapping. The batch is total: whatever the payload looks like, the
//! caller gets back a best-effort map and never an error.

use super::expression;
use crate::models::GenericVariable;
use std::collections::HashMap;

/// Resolves all configured rules against a payload and merges the results.
///
/// # Arguments
///
/// * `rules` - The configured extraction rules, in configuration order
/// * `payload` - Raw webhook body (JSON, XML, or chat-message JSON envelope)
/// * `text_separator` - Field separator for StringPart rules
/// * `from_chat_source` - Whether the payload arrived from a chat integration
///
/// # Merge semantics
///
/// Rules are merged in list order with last-write-wins on key collision. A
/// rule whose resolution is empty, or whose own variable name resolved to
/// an empty string, falls back to its `default_value` when one is
/// configured. A default never overrides a non-empty resolved value for the
/// same rule, but a later rule does override an earlier one.
///
/// # Examples
///
/// ```
/// use webhook_variables::{resolve_all, ExpressionType, GenericVariable};
///
/// let rules = vec![
///     GenericVariable::new("commit", ExpressionType::JsonPath, "$.head_commit.id"),
///     GenericVariable::new("branch", ExpressionType::JsonPath, "$.ref")
///         .with_default("main"),
/// ];
///
/// let resolved = resolve_all(&rules, r#"{"head_commit": {"id": "abc123"}}"#, "|", false);
/// assert_eq!(resolved["commit"], "abc123");
/// assert_eq!(resolved["branch"], "main");
/// ```
pub fn resolve_all(
    rules: &[GenericVariable],
    payload: &str,
    text_separator: &str,
    from_chat_source: bool,
) -> HashMap<String, String> {
    let mut resolved_variables = HashMap::new();

    for rule in rules {
        let mut resolved = expression::resolve(payload, rule, text_separator, from_chat_source);

        let not_resolved = resolved.is_empty()
            || resolved
                .get(&rule.variable_name)
                .is_some_and(|value| value.is_empty());
        if not_resolved {
            if let Some(default_value) = &rule.default_value {
                resolved.insert(rule.variable_name.clone(), default_value.clone());
            }
        }

        resolved_variables.extend(resolved);
    }

    resolved_variables
}
