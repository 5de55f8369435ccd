//! fluentdiff core: structural comparison engine for fluent assertions.
//!
//! Given two values (scalars, maps, sequences, grids or composite objects)
//! the engine decides whether they are equal or equivalent and, when they
//! are not, explains every discrepancy in a bounded, readable report.
//!
//! - Value graph (`model`) and the [`model::Describe`] trait that builds it
//! - Type classification and numeric promotion (`classify`)
//! - Member enumeration, labeling and pairing (`traversal`)
//! - Difference finding and rendering (`diff`)
//! - Custom comparers (`registry`), member selection (`policy`), `config`
//! - Error and logging facilities

pub mod classify;
pub mod config;
pub mod diff;
pub mod errors;
pub mod format;
pub mod logging_facility;
pub mod model;
pub mod policy;
pub mod registry;
pub mod traversal;

#[doc(hidden)]
pub use fluentdiff_core_types;

// Re-export commonly used types
pub use config::{CompareConfig, EqualityMode};
pub use diff::{compare, render, Comparison, DifferenceKind, DifferenceNode};
pub use errors::{DiffError, ExError, ExErrorKind, Result};
pub use model::{Describe, ObjectBuilder, TypeDescriptor, Value};
pub use policy::SelectionPolicy;
pub use registry::{Comparer, ComparerRegistry, Operator};
