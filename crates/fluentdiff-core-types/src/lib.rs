//! Core types shared across fluentdiff facilities
//!
//! This crate provides foundational types used by both the comparison
//! engine and its logging facility:
//!
//! - **Correlation types**: ComparisonId, ComparisonContext
//! - **Schema constants**: Canonical field keys and event names

pub mod correlation;
pub mod schema;

pub use correlation::{ComparisonContext, ComparisonId};
