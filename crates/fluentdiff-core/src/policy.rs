//! Member selection policy
//!
//! A `SelectionPolicy` decides which members of a composite value take part
//! in a comparison. It is supplied per comparison call and never mutated
//! while a walk is in progress.

use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::{DiffError, Result};
use crate::model::{Member, MemberKind, Visibility};

/// Which member visibilities are enumerated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisibilityScope {
    Public,
    #[default]
    PublicAndNonPublic,
}

impl VisibilityScope {
    pub fn admits(self, visibility: Visibility) -> bool {
        match self {
            VisibilityScope::Public => visibility == Visibility::Public,
            VisibilityScope::PublicAndNonPublic => true,
        }
    }
}

/// Regular expression matched against a whole member name
#[derive(Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NamePattern {
    source: String,
    regex: Regex,
}

impl NamePattern {
    /// # Errors
    ///
    /// Returns [`DiffError::InvalidPattern`] if `pattern` does not compile.
    pub fn new(pattern: &str) -> Result<Self> {
        let anchored = format!("^(?:{})$", pattern);
        let regex = Regex::new(&anchored).map_err(|e| DiffError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_match(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }
}

impl TryFrom<String> for NamePattern {
    type Error = DiffError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(&value)
    }
}

impl From<NamePattern> for String {
    fn from(pattern: NamePattern) -> Self {
        pattern.source
    }
}

impl PartialEq for NamePattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl fmt::Debug for NamePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NamePattern({:?})", self.source)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionPolicy {
    /// Enumerate members inherited from base types
    pub include_derived_members: bool,
    pub visibility: VisibilityScope,
    /// Members whose short or long name matches any of these are skipped
    pub excluded_name_patterns: Vec<NamePattern>,
    /// Do not report members or keys present only on the actual side
    pub ignore_unmatched_expected_members: bool,
    /// Enumerate properties; auto-property backing fields are then skipped
    pub include_properties: bool,
}

impl Default for SelectionPolicy {
    fn default() -> Self {
        Self {
            include_derived_members: true,
            visibility: VisibilityScope::default(),
            excluded_name_patterns: Vec::new(),
            ignore_unmatched_expected_members: false,
            include_properties: true,
        }
    }
}

impl SelectionPolicy {
    /// # Errors
    ///
    /// Returns [`DiffError::InvalidPattern`] if `pattern` does not compile.
    pub fn exclude(mut self, pattern: &str) -> Result<Self> {
        self.excluded_name_patterns.push(NamePattern::new(pattern)?);
        Ok(self)
    }

    pub fn public_only(mut self) -> Self {
        self.visibility = VisibilityScope::Public;
        self
    }

    pub fn without_derived_members(mut self) -> Self {
        self.include_derived_members = false;
        self
    }

    pub fn ignoring_unmatched(mut self) -> Self {
        self.ignore_unmatched_expected_members = true;
        self
    }

    pub fn without_properties(mut self) -> Self {
        self.include_properties = false;
        self
    }

    pub fn is_name_excluded(&self, short_name: &str, long_name: &str) -> bool {
        self.excluded_name_patterns
            .iter()
            .any(|p| p.is_match(short_name) || p.is_match(long_name))
    }

    /// Visibility, inheritance and property filters for one member
    pub fn admits(&self, member: &Member) -> bool {
        if member.depth > 0 && !self.include_derived_members {
            return false;
        }
        if member.kind == MemberKind::Property && !self.include_properties {
            return false;
        }
        self.visibility.admits(member.visibility)
    }
}
