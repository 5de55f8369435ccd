//! Structural difference finding and reporting.
//!
//! ## Entry point
//!
//! ```
//! use fluentdiff_core::diff::{engine::Comparison, human_summary::render};
//!
//! let diff = Comparison::new().check(&vec![1, 2, 4], &vec![1, 2, 3]).unwrap();
//! assert_eq!(
//!     render(&diff, false, 5),
//!     "The checked value is different from the expected one.\nactual[2] = 4 instead of 3."
//! );
//! ```
//!
//! ## Guarantees
//!
//! - **Total**: any two values compare without error; every mismatch becomes a node.
//! - **Termination**: self-referential graphs are cut when a pair of handles repeats on
//!   the current path, and descent stops once `max_depth` is exhausted.
//! - **Key-order independence**: associative containers are matched by key.

pub mod engine;
pub mod human_summary;
pub mod model;

pub use engine::{compare, Comparison};
pub use human_summary::{flatten, render, render_with, RenderOptions};
pub use model::{DifferenceKind, DifferenceNode, NumericHint};
