use fluentdiff_core_types::ComparisonId;
use thiserror::Error;

/// Result type alias using DiffError
pub type Result<T> = std::result::Result<T, DiffError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Comparisons themselves never fail on data content: every shape mismatch
/// becomes a difference node. The kinds below cover configuration defects
/// and the few integration surfaces around the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Configuration
    /// An equality mode name that the engine does not know
    UnsupportedMode,
    /// A configuration document is structurally invalid
    InvalidConfig,
    /// An excluded-member pattern is not a valid regular expression
    InvalidPattern,

    // Value construction
    /// Grid item count does not match its shape
    InvalidShape,

    // Integration/IO
    Serialization,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::UnsupportedMode => "ERR_UNSUPPORTED_MODE",
            ExErrorKind::InvalidConfig => "ERR_INVALID_CONFIG",
            ExErrorKind::InvalidPattern => "ERR_INVALID_PATTERN",
            ExErrorKind::InvalidShape => "ERR_INVALID_SHAPE",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// This error type provides a structured representation of errors with
/// classification fields for programmatic handling and rich context for debugging.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    comparison_id: Option<ComparisonId>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            comparison_id: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add comparison correlation context
    pub fn with_comparison_id(mut self, comparison_id: ComparisonId) -> Self {
        self.comparison_id = Some(comparison_id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the comparison id, if any
    pub fn comparison_id(&self) -> Option<&ComparisonId> {
        self.comparison_id.as_ref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(id) = &self.comparison_id {
            write!(f, " (comparison_id: {})", id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        None
    }
}

// ========== End Error Facility ==========

/// Domain error taxonomy for fluentdiff configuration and setup
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DiffError {
    /// Equality mode name is not one the engine supports
    #[error("Unsupported equality mode: {mode}")]
    UnsupportedMode { mode: String },

    /// Excluded-member pattern failed to compile
    #[error("Invalid member name pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// Grid item count does not match the product of its extents
    #[error("Invalid grid shape {shape:?} for {item_count} items")]
    InvalidShape { shape: Vec<usize>, item_count: usize },

    /// Configuration document is invalid
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    /// Serialization error
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// Internal error (should not happen)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Conversion from DiffError to ExError
impl From<DiffError> for ExError {
    fn from(err: DiffError) -> Self {
        let message = err.to_string();
        match err {
            DiffError::UnsupportedMode { .. } => {
                ExError::new(ExErrorKind::UnsupportedMode).with_message(message)
            }
            DiffError::InvalidPattern { .. } => {
                ExError::new(ExErrorKind::InvalidPattern).with_message(message)
            }
            DiffError::InvalidShape { .. } => {
                ExError::new(ExErrorKind::InvalidShape).with_message(message)
            }
            DiffError::InvalidConfig { .. } => {
                ExError::new(ExErrorKind::InvalidConfig).with_message(message)
            }
            DiffError::Serialization { .. } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }
            DiffError::Internal { .. } => ExError::new(ExErrorKind::Internal).with_message(message),
        }
    }
}

/// Conversion from serde_json::Error to DiffError
impl From<serde_json::Error> for DiffError {
    fn from(err: serde_json::Error) -> Self {
        DiffError::Serialization {
            message: err.to_string(),
        }
    }
}

/// Conversion from toml::de::Error to DiffError
impl From<toml::de::Error> for DiffError {
    fn from(err: toml::de::Error) -> Self {
        DiffError::InvalidConfig {
            reason: err.message().to_string(),
        }
    }
}
