//! Positional field extraction from chat-style payloads.
//!
//! Chat integrations deliver the human-readable message in the JSON `text`
//! field of the webhook body. A StringPart rule picks one delimiter-separated
//! field out of that message: the expression `$.N` selects the N-th field
//! (1-based) after the leading label has been stripped at the first comma.
//!
//! For example, with payload `{"text": "build, main|42|release"}` and
//! separator `|`, the expression `$.2` resolves to `42`.
//!
//! Some chat integrations wrap the typed command in bot/channel framing; the
//! usable content then follows a `param:` marker on its own line, possibly
//! with a trailing `</at>` mention tag. When the marker is present the
//! content between the last `param:` and the following newline is used
//! instead of the full message.

use super::error::ResolutionError;
use crate::models::GenericVariable;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value as JsonValue;
use std::collections::HashMap;

/// Marker some chat integrations prepend to the user-supplied parameters.
const PARAM_MARKER: &str = "param:";

/// Mention-closing tag injected by chat clients when the bot is @-mentioned.
const MENTION_CLOSE_TAG: &str = "</at>";

/// Required shape of a StringPart expression: `$.` followed by digits.
static STRING_PART_EXPRESSION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\$\.(\d+)$").expect("Failed to compile StringPart expression regex")
});

/// Evaluates a StringPart rule against a chat-style JSON payload.
///
/// `from_chat_source` indicates whether the payload arrived from a chat
/// integration. It is accepted for interface compatibility with the other
/// evaluators and does not currently alter the extraction.
pub fn evaluate_string_part(
    payload: &str,
    rule: &GenericVariable,
    text_separator: &str,
    _from_chat_source: bool,
) -> Result<HashMap<String, String>, ResolutionError> {
    let text = match extract_text_field(payload)? {
        Some(text) => text,
        // No `text` field is the silent not-found outcome.
        None => return Ok(HashMap::new()),
    };

    let index = parse_field_index(&rule.expression)?;

    let content = strip_chat_framing(&text)?;
    let value = extract_field(&content, text_separator, index)?;

    let mut entries = HashMap::new();
    entries.insert(rule.variable_name.clone(), value);
    Ok(entries)
}

/// Parses the `$.N` expression into a 1-based field index.
fn parse_field_index(expression: &str) -> Result<usize, ResolutionError> {
    let captures = STRING_PART_EXPRESSION.captures(expression.trim()).ok_or_else(|| {
        ResolutionError::InvalidExpression {
            expression: expression.to_string(),
            reason: "StringPart expressions must have the form $.N with N a positive integer"
                .to_string(),
        }
    })?;

    let index: usize =
        captures[1]
            .parse()
            .map_err(|_| ResolutionError::InvalidExpression {
                expression: expression.to_string(),
                reason: "field index does not fit in a machine integer".to_string(),
            })?;

    if index == 0 {
        return Err(ResolutionError::InvalidExpression {
            expression: expression.to_string(),
            reason: "field index is 1-based; $.0 selects nothing".to_string(),
        });
    }

    Ok(index)
}

/// Pulls the scalar `text` field out of the JSON payload.
///
/// Returns `Ok(None)` when the field is absent. Scalar values stringify the
/// same way the JSON flattener stringifies them (numbers and booleans in
/// canonical form, null as the literal `null`); a sequence or mapping is an
/// error, since there is no single message to split.
fn extract_text_field(payload: &str) -> Result<Option<String>, ResolutionError> {
    let json: JsonValue =
        serde_json::from_str(payload).map_err(|e| ResolutionError::InvalidPayload {
            format: "JSON",
            reason: e.to_string(),
        })?;

    match json.get("text") {
        None => Ok(None),
        Some(JsonValue::String(s)) => Ok(Some(s.clone())),
        Some(JsonValue::Number(n)) => Ok(Some(n.to_string())),
        Some(JsonValue::Bool(b)) => Ok(Some(b.to_string())),
        Some(JsonValue::Null) => Ok(Some("null".to_string())),
        Some(other) => Err(ResolutionError::UnexpectedResult {
            reason: format!("the 'text' field is not a scalar: {}", other),
        }),
    }
}

/// Reduces chat-bot framing down to the user-supplied parameter content.
///
/// Without a `param:` marker the full text is returned unchanged. With the
/// marker, the content strictly between the last `param:` and the following
/// newline is used, minus any `</at>` mention tags; a marker with no
/// following newline is malformed framing.
fn strip_chat_framing(text: &str) -> Result<String, ResolutionError> {
    let start = match text.rfind(PARAM_MARKER) {
        Some(position) => position + PARAM_MARKER.len(),
        None => return Ok(text.to_string()),
    };

    let rest = &text[start..];
    let line = rest
        .find('\n')
        .map(|end| &rest[..end])
        .ok_or_else(|| ResolutionError::UnexpectedResult {
            reason: format!("no newline after the last '{}' marker", PARAM_MARKER),
        })?;

    Ok(line.replace(MENTION_CLOSE_TAG, ""))
}

/// Selects the `index`-th (1-based) separator-delimited field of `content`.
///
/// Text up to and including the first comma is discarded as a presumed
/// prefix/label; content without a comma is used whole.
fn extract_field(
    content: &str,
    separator: &str,
    index: usize,
) -> Result<String, ResolutionError> {
    let body = match content.find(',') {
        Some(comma) => &content[comma + 1..],
        None => content,
    };

    let fields: Vec<&str> = body.split(separator).collect();
    fields
        .get(index - 1)
        .map(|field| field.to_string())
        .ok_or(ResolutionError::FieldOutOfRange {
            index,
            available: fields.len(),
        })
}
