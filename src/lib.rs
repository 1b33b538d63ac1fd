//! Webhook variable resolution for build triggers.
//!
//! This crate extracts named variables from an incoming webhook payload
//! (JSON, XML, or chat-style plain text) according to a list of configured
//! extraction rules, producing a flat map of variable name to string value
//! for use as build/trigger parameters.
//!
//! # Architecture
//!
//! - **models**: The configuration data model: [`GenericVariable`] rules
//!   and the [`ExpressionType`] selector.
//! - **resolver**: The resolution engine: batch iteration, per-rule
//!   dispatch, the three expression evaluators, and the flatteners that
//!   reduce nested results to flat string entries.
//!
//! # Expression languages
//!
//! Each rule declares one of three expression languages:
//!
//! - **JSONPath** queries a JSON payload; nested or multi-valued results
//!   are flattened into derived keys (`name0`, `name_field`, ...).
//! - **XPath** queries an XML payload; matched nodes flatten in document
//!   order. DOCTYPE-carrying payloads are rejected outright (XXE hardening).
//! - **StringPart** is positional field extraction from the `text` field of
//!   a chat-message envelope, split on a configured separator.
//!
//! # Failure tolerance
//!
//! Resolution is best-effort by design. A rule whose expression does not
//! match contributes nothing (or its configured default); a rule that fails
//! outright (malformed payload, bad expression, out-of-range index) is
//! logged and degrades to the same "no value, apply default" outcome. No
//! failure ever aborts the batch, and [`resolve_all`] never returns an
//! error.
//!
//! # Usage
//!
//! ```
//! use webhook_variables::{resolve_all, ExpressionType, GenericVariable};
//!
//! let payload = r#"{"ref": "refs/heads/main", "commits": [{"id": "abc"}]}"#;
//!
//! let rules = vec![
//!     GenericVariable::new("branch", ExpressionType::JsonPath, "$.ref"),
//!     GenericVariable::new("commit", ExpressionType::JsonPath, "$.commits[0].id"),
//!     GenericVariable::new("tag", ExpressionType::JsonPath, "$.tag").with_default("none"),
//! ];
//!
//! let resolved = resolve_all(&rules, payload, "|", false);
//! assert_eq!(resolved["branch"], "refs/heads/main");
//! assert_eq!(resolved["commit"], "abc");
//! assert_eq!(resolved["tag"], "none");
//! ```

pub mod models;
pub mod resolver;

pub use models::{ExpressionType, GenericVariable};
pub use resolver::{resolve, resolve_all, ResolutionError};
