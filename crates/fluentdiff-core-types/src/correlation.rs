//! Correlation types for comparison tracking
//!
//! Every comparison context gets its own identifier so that the events
//! emitted while walking its value graphs can be grouped together. Calls
//! made through one context share its identifier; a fresh context is needed
//! to tell calls apart.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for one comparison context
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ComparisonId(String);

impl ComparisonId {
    /// Generate a new random ComparisonId using UUIDv7
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Get the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Create from an existing string (for deserialization)
    pub fn from_string(s: String) -> Self {
        Self(s)
    }
}

impl Default for ComparisonId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ComparisonId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Context carried through one comparison for correlation
#[derive(Debug, Clone)]
pub struct ComparisonContext {
    pub comparison_id: ComparisonId,
    /// Optional label of the enclosing check (e.g. a test name)
    pub origin: Option<String>,
}

impl ComparisonContext {
    /// Create a new context with a fresh ComparisonId
    pub fn new() -> Self {
        Self {
            comparison_id: ComparisonId::new(),
            origin: None,
        }
    }

    /// Create a context with an existing ComparisonId
    pub fn with_comparison_id(comparison_id: ComparisonId) -> Self {
        Self {
            comparison_id,
            origin: None,
        }
    }

    /// Attach the label of the enclosing check
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }
}

impl Default for ComparisonContext {
    fn default() -> Self {
        Self::new()
    }
}
