//! JSONPath evaluation and JSON flattening.
//!
//! Evaluates a rule's JSONPath expression against a JSON payload and reduces
//! the resolved value into flat string entries. Scalars map straight to the
//! rule's variable name; sequences and mappings expand into derived keys so a
//! single rule can surface every leaf of a nested result.
//!
//! # Key convention
//!
//! - Sequence elements append their zero-based index directly to the base
//!   key: `name0`, `name1`, ...
//! - Mapping fields append the field name with a `_` separator: `name_field`.
//! - Nesting composes both: `$.users[1].id` under base key `user` flattens
//!   to `user1_id`.
//!
//! During the same walk a fully-qualified JSONPath is built for every leaf
//! (`$[1].id`, `$.head_commit.message`, ...); when the rule carries a
//! `regexp_filter`, only leaves whose path matches the pattern are kept.

use super::error::ResolutionError;
use crate::models::GenericVariable;
use regex::Regex;
use serde_json::Value as JsonValue;
use std::collections::HashMap;

/// Evaluates a JSONPath rule against a JSON payload.
///
/// # Returns
///
/// The flattened entries for the resolved value. A query that matches
/// nothing yields an empty map; "not present" is an expected outcome, not
/// an error. Malformed JSON and malformed expressions are errors.
///
/// # Root special case
///
/// When the trimmed expression is exactly `$`, the output additionally
/// contains the raw, unparsed payload string under the rule's variable name,
/// so a root-selecting rule always retrieves the full body verbatim.
pub fn evaluate_json(
    payload: &str,
    rule: &GenericVariable,
) -> Result<HashMap<String, String>, ResolutionError> {
    let json: JsonValue =
        serde_json::from_str(payload).map_err(|e| ResolutionError::InvalidPayload {
            format: "JSON",
            reason: e.to_string(),
        })?;

    let expression = rule.expression.trim();
    let hits =
        jsonpath_lib::select(&json, expression).map_err(|e| ResolutionError::InvalidExpression {
            expression: rule.expression.clone(),
            reason: e.to_string(),
        })?;

    // A definite path yields one hit, flattened as-is. An indefinite path
    // (wildcard, filter, recursive descent, slice/union) always yields a
    // list, so its hits flatten as a sequence regardless of how many
    // matched. No hits is the silent not-found outcome.
    let mut flattened = match hits.as_slice() {
        [] => HashMap::new(),
        [single] if !is_indefinite_expression(expression) => {
            flatten_json(&rule.variable_name, rule.regexp_filter.as_deref(), single)?
        }
        many => {
            let sequence = JsonValue::Array(many.iter().map(|v| (*v).clone()).collect());
            flatten_json(
                &rule.variable_name,
                rule.regexp_filter.as_deref(),
                &sequence,
            )?
        }
    };

    if expression == "$" {
        flattened.insert(rule.variable_name.clone(), payload.to_string());
    }

    Ok(flattened)
}

/// Flattens an arbitrary JSON value into string entries under a base key.
///
/// # Arguments
///
/// * `variable_name` - Base key for all produced entries
/// * `regexp_filter` - Optional pattern matched (unanchored) against each
///   leaf's fully-qualified path; non-matching leaves are dropped
/// * `resolved` - The value to flatten
pub fn flatten_json(
    variable_name: &str,
    regexp_filter: Option<&str>,
    resolved: &JsonValue,
) -> Result<HashMap<String, String>, ResolutionError> {
    let filter = match regexp_filter {
        Some(pattern) if !pattern.is_empty() => {
            Some(
                Regex::new(pattern).map_err(|e| ResolutionError::InvalidFilter {
                    pattern: pattern.to_string(),
                    reason: e.to_string(),
                })?,
            )
        }
        _ => None,
    };

    let mut entries = HashMap::new();
    flatten_value(variable_name, "$", resolved, filter.as_ref(), &mut entries);
    Ok(entries)
}

/// Classifies an expression as indefinite, meaning its result is always a
/// list: wildcards, recursive descent, filters, and slice/union brackets.
/// A definite path addresses at most one value.
fn is_indefinite_expression(expression: &str) -> bool {
    if expression.contains('*') || expression.contains("..") || expression.contains("?(") {
        return true;
    }

    // Slice (`[0:2]`) and union (`[0,1]`) selectors.
    let mut in_bracket = false;
    for c in expression.chars() {
        match c {
            '[' => in_bracket = true,
            ']' => in_bracket = false,
            ':' | ',' if in_bracket => return true,
            _ => {}
        }
    }
    false
}

/// Recursive walk producing one entry per scalar leaf.
fn flatten_value(
    key: &str,
    path: &str,
    value: &JsonValue,
    filter: Option<&Regex>,
    out: &mut HashMap<String, String>,
) {
    match value {
        JsonValue::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                let child_key = format!("{}{}", key, index);
                let child_path = format!("{}[{}]", path, index);
                flatten_value(&child_key, &child_path, item, filter, out);
            }
        }
        JsonValue::Object(fields) => {
            for (field, item) in fields {
                let child_key = format!("{}_{}", key, field);
                let child_path = format!("{}.{}", path, field);
                flatten_value(&child_key, &child_path, item, filter, out);
            }
        }
        scalar => {
            if filter.map_or(true, |re| re.is_match(path)) {
                out.insert(key.to_string(), scalar_to_string(scalar));
            }
        }
    }
}

/// Converts a scalar JSON value to its string form.
///
/// Strings are returned without quotes; numbers and booleans use their
/// canonical text form; null becomes the literal `null`.
fn scalar_to_string(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        JsonValue::Number(n) => n.to_string(),
        JsonValue::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}
