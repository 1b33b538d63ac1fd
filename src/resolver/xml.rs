//! XPath evaluation and XML node-set flattening.
//!
//! Evaluates a rule's XPath expression against an XML payload and flattens
//! the resulting node-set into string entries. A single matched node maps to
//! the rule's variable name; multiple matches append the zero-based position
//! of each node in document order (`name0`, `name1`, ...). Element nodes
//! contribute their text content; attribute and text nodes contribute their
//! raw textual value.
//!
//! # DOCTYPE hardening
//!
//! Payloads containing a DOCTYPE declaration are rejected before parsing.
//! Webhook bodies come from untrusted sources, and DOCTYPE is the vehicle
//! for external-entity (XXE) injection; the resolver fails closed rather
//! than risk entity expansion leaking data into a resolved variable.

use super::error::ResolutionError;
use crate::models::GenericVariable;
use std::collections::HashMap;
use sxd_document::parser;
use sxd_xpath::{Context, Factory, Value};

/// Evaluates an XPath rule against an XML payload.
///
/// # Returns
///
/// Flat entries for the matched node-set, in document order. An empty
/// node-set yields an empty map. Malformed XML, a DOCTYPE declaration, a
/// malformed expression, or a non-node-set result are errors.
pub fn evaluate_xml(
    payload: &str,
    rule: &GenericVariable,
) -> Result<HashMap<String, String>, ResolutionError> {
    reject_doctype(payload)?;

    let package = parser::parse(payload).map_err(|e| ResolutionError::InvalidPayload {
        format: "XML",
        reason: e.to_string(),
    })?;
    let document = package.as_document();

    let factory = Factory::new();
    let xpath = factory
        .build(&rule.expression)
        .map_err(|e| ResolutionError::InvalidExpression {
            expression: rule.expression.clone(),
            reason: e.to_string(),
        })?
        .ok_or_else(|| ResolutionError::InvalidExpression {
            expression: rule.expression.clone(),
            reason: "empty XPath expression".to_string(),
        })?;

    let context = Context::new();
    let value = xpath
        .evaluate(&context, document.root())
        .map_err(|e| ResolutionError::InvalidExpression {
            expression: rule.expression.clone(),
            reason: e.to_string(),
        })?;

    match value {
        Value::Nodeset(nodeset) => Ok(flatten_nodeset(&rule.variable_name, &nodeset)),
        other => Err(ResolutionError::UnexpectedResult {
            reason: format!(
                "XPath '{}' produced a {} result, expected a node-set",
                rule.expression,
                value_kind(&other)
            ),
        }),
    }
}

/// Fails closed on any payload carrying a DOCTYPE declaration.
fn reject_doctype(payload: &str) -> Result<(), ResolutionError> {
    let lowered = payload.to_lowercase();
    if lowered.contains("<!doctype") {
        return Err(ResolutionError::InvalidPayload {
            format: "XML",
            reason: "DOCTYPE declarations are not allowed in webhook payloads".to_string(),
        });
    }
    Ok(())
}

/// Flattens a node-set into entries keyed by the variable name, with the
/// zero-based node position appended when more than one node matched.
fn flatten_nodeset(
    variable_name: &str,
    nodeset: &sxd_xpath::nodeset::Nodeset<'_>,
) -> HashMap<String, String> {
    let nodes = nodeset.document_order();
    let mut entries = HashMap::new();

    if nodes.len() == 1 {
        entries.insert(variable_name.to_string(), nodes[0].string_value());
    } else {
        for (index, node) in nodes.iter().enumerate() {
            entries.insert(format!("{}{}", variable_name, index), node.string_value());
        }
    }

    entries
}

fn value_kind(value: &Value<'_>) -> &'static str {
    match value {
        Value::Nodeset(_) => "node-set",
        Value::Boolean(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExpressionType;

    fn rule(expression: &str) -> GenericVariable {
        GenericVariable::new("x", ExpressionType::XPath, expression)
    }

    #[test]
    fn test_single_node() {
        let payload = "<build><branch>main</branch></build>";
        let result = evaluate_xml(payload, &rule("/build/branch")).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result["x"], "main");
    }

    #[test]
    fn test_multiple_nodes_indexed_in_document_order() {
        let payload = "<build><tag>alpha</tag><tag>beta</tag><tag>gamma</tag></build>";
        let result = evaluate_xml(payload, &rule("/build/tag")).unwrap();
        assert_eq!(result.len(), 3);
        assert_eq!(result["x0"], "alpha");
        assert_eq!(result["x1"], "beta");
        assert_eq!(result["x2"], "gamma");
    }

    #[test]
    fn test_attribute_value() {
        let payload = r#"<build id="42"><branch>main</branch></build>"#;
        let result = evaluate_xml(payload, &rule("/build/@id")).unwrap();
        assert_eq!(result["x"], "42");
    }

    #[test]
    fn test_element_text_content_includes_descendants() {
        let payload = "<r><msg>fix <b>the</b> bug</msg></r>";
        let result = evaluate_xml(payload, &rule("/r/msg")).unwrap();
        assert_eq!(result["x"], "fix the bug");
    }

    #[test]
    fn test_empty_nodeset_is_empty_not_error() {
        let payload = "<build><branch>main</branch></build>";
        let result = evaluate_xml(payload, &rule("/build/missing")).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_doctype_rejected() {
        let payload = r#"<?xml version="1.0"?>
<!DOCTYPE foo [<!ENTITY xxe SYSTEM "file:///etc/passwd">]>
<foo>&xxe;</foo>"#;
        let err = evaluate_xml(payload, &rule("/foo")).unwrap_err();
        assert!(matches!(
            err,
            ResolutionError::InvalidPayload { format: "XML", .. }
        ));
    }

    #[test]
    fn test_doctype_rejected_case_insensitive() {
        let payload = "<!doctype html><html></html>";
        assert!(evaluate_xml(payload, &rule("/html")).is_err());
    }

    #[test]
    fn test_malformed_xml_is_error() {
        let err = evaluate_xml("<unclosed>", &rule("/unclosed")).unwrap_err();
        assert!(matches!(
            err,
            ResolutionError::InvalidPayload { format: "XML", .. }
        ));
    }

    #[test]
    fn test_malformed_expression_is_error() {
        let payload = "<build/>";
        let err = evaluate_xml(payload, &rule("///")).unwrap_err();
        assert!(matches!(err, ResolutionError::InvalidExpression { .. }));
    }

    #[test]
    fn test_non_nodeset_result_is_error() {
        let payload = "<build><tag>a</tag><tag>b</tag></build>";
        let err = evaluate_xml(payload, &rule("count(/build/tag)")).unwrap_err();
        match err {
            ResolutionError::UnexpectedResult { reason } => {
                assert!(reason.contains("number"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
