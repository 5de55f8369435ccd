//! Comparison configuration
//!
//! `CompareConfig` gathers everything a comparison call needs apart from the
//! two values. It can be built in code or loaded from TOML:
//!
//! ```
//! use fluentdiff_core::config::{CompareConfig, EqualityMode};
//!
//! let config = CompareConfig::from_toml_str(r#"
//!     mode = "equivalent"
//!     max_lines = 10
//!
//!     [policy]
//!     excluded_name_patterns = ["_.*"]
//! "#).unwrap();
//! assert_eq!(config.mode, EqualityMode::Equivalent);
//! ```

use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::errors::{DiffError, Result};
use crate::policy::{NamePattern, SelectionPolicy};
use crate::registry::Operator;
use crate::{log_op_end, log_op_error, log_op_start};

pub const DEFAULT_MAX_DEPTH: i64 = 256;
pub const DEFAULT_MAX_LINES: usize = 5;
pub const DEFAULT_SUBJECT: &str = "checked value";
pub const DEFAULT_REFERENCE: &str = "expected one";

/// How two values are judged equal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum EqualityMode {
    /// Structural equality; sequence order matters
    #[default]
    Strict,
    /// Structural equality; sequences compared as multisets
    Equivalent,
    /// The values' own `==` / `!=` comparator
    OperatorBased(Operator),
    /// The values' own equality, without structural descent
    DelegatedEquals,
}

impl EqualityMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            EqualityMode::Strict => "strict",
            EqualityMode::Equivalent => "equivalent",
            EqualityMode::OperatorBased(Operator::Eq) => "operator_eq",
            EqualityMode::OperatorBased(Operator::Neq) => "operator_neq",
            EqualityMode::DelegatedEquals => "delegated_equals",
        }
    }

    pub fn is_equivalence(&self) -> bool {
        *self == EqualityMode::Equivalent
    }
}

impl FromStr for EqualityMode {
    type Err = DiffError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "strict" => Ok(EqualityMode::Strict),
            "equivalent" => Ok(EqualityMode::Equivalent),
            "operator_eq" => Ok(EqualityMode::OperatorBased(Operator::Eq)),
            "operator_neq" => Ok(EqualityMode::OperatorBased(Operator::Neq)),
            "delegated_equals" => Ok(EqualityMode::DelegatedEquals),
            other => Err(DiffError::UnsupportedMode {
                mode: other.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for EqualityMode {
    type Error = DiffError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<EqualityMode> for String {
    fn from(mode: EqualityMode) -> Self {
        mode.as_str().to_string()
    }
}

impl fmt::Display for EqualityMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompareConfig {
    pub mode: EqualityMode,
    pub policy: SelectionPolicy,
    /// Nesting levels compared structurally; at 0 or below values are
    /// compared by their own equality only
    pub max_depth: i64,
    /// Detail lines shown before the omitted-count trailer
    pub max_lines: usize,
    /// Name of the actual value in report headers
    pub subject: String,
    /// Name of the expected value in report headers
    pub reference: String,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            mode: EqualityMode::default(),
            policy: SelectionPolicy::default(),
            max_depth: DEFAULT_MAX_DEPTH,
            max_lines: DEFAULT_MAX_LINES,
            subject: DEFAULT_SUBJECT.to_string(),
            reference: DEFAULT_REFERENCE.to_string(),
        }
    }
}

impl CompareConfig {
    /// Parse a TOML document; missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// - [`DiffError::UnsupportedMode`] for an unknown `mode`
    /// - [`DiffError::InvalidPattern`] for an excluded-name pattern that does not compile
    /// - [`DiffError::InvalidConfig`] for malformed TOML, unknown keys or out-of-range values
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let start = Instant::now();
        log_op_start!("load_config");
        let result = Self::parse_toml(text);
        let duration_ms = start.elapsed().as_millis() as u64;
        match &result {
            Ok(config) => {
                log_op_end!("load_config", duration_ms = duration_ms, mode = config.mode.as_str());
            }
            Err(err) => {
                log_op_error!("load_config", err.clone(), duration_ms = duration_ms);
            }
        }
        result
    }

    fn parse_toml(text: &str) -> Result<Self> {
        let table: toml::Table = text.parse()?;

        // Checked up front so these surface as their own error kinds rather
        // than as a generic deserialization failure.
        if let Some(mode) = table.get("mode") {
            let name = mode.as_str().ok_or_else(|| DiffError::InvalidConfig {
                reason: "mode must be a string".to_string(),
            })?;
            name.parse::<EqualityMode>()?;
        }
        let patterns = table
            .get("policy")
            .and_then(|p| p.get("excluded_name_patterns"))
            .and_then(toml::Value::as_array);
        for pattern in patterns.into_iter().flatten() {
            if let Some(p) = pattern.as_str() {
                NamePattern::new(p)?;
            }
        }

        let config: CompareConfig = toml::Value::Table(table).try_into()?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns [`DiffError::Serialization`] if the configuration cannot be encoded.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| DiffError::Serialization {
            message: e.to_string(),
        })
    }

    /// # Errors
    ///
    /// Returns [`DiffError::InvalidConfig`] when `max_lines` is zero.
    pub fn validate(&self) -> Result<()> {
        if self.max_lines == 0 {
            return Err(DiffError::InvalidConfig {
                reason: "max_lines must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
