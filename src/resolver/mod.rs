//! The expression resolution and flattening engine.
//!
//! Resolution runs in two layers. [`resolve_all`] iterates the configured
//! rule list, resolving each rule independently and merging the per-rule
//! results with last-write-wins semantics. [`resolve`] handles one rule:
//! it dispatches on the rule's expression type to the JSONPath, XPath, or
//! StringPart evaluator, and absorbs every evaluator failure into an empty
//! result after logging it.
//!
//! The engine is synchronous and stateless: one call processes one payload
//! against one rule list entirely in memory, with no I/O and no shared
//! state between invocations.

pub mod batch;
pub mod error;
pub mod expression;
pub mod json;
pub mod text;
pub mod xml;

pub use batch::resolve_all;
pub use error::ResolutionError;
pub use expression::resolve;
pub use json::flatten_json;
