//! Data models for webhook variable extraction.
//!
//! This module defines the configuration entities supplied per resolution
//! call: the extraction rules and the expression language selector.

pub mod rule;

pub use rule::{ExpressionType, GenericVariable};
