//! Difference tree types.
//!
//! A comparison yields either nothing (the values agree) or a tree of
//! `DifferenceNode`s. Leaves are the reportable discrepancies; internal nodes
//! group the leaves found beneath one label.

use serde::{Deserialize, Serialize};

use crate::model::Value;

/// What a node reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DifferenceKind {
    /// Values differ at a root or positional slot
    ValueMismatch,
    /// Present on the expected side only
    Missing,
    /// Present on the actual side only
    Extra,
    /// Same item, different position
    Moved,
    /// Values differ for a named member or key
    AttributeMismatch,
    /// Unordered comparison: this item was found where another was expected
    FoundInsteadOf,
    /// Internal node whose descendants are all reorderings
    EquivalentGroup,
}

impl DifferenceKind {
    /// Kinds that do not break equivalence on their own
    pub fn is_equivalence_only(self) -> bool {
        matches!(self, DifferenceKind::Moved | DifferenceKind::EquivalentGroup)
    }
}

/// Extra context for a floating-point mismatch
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumericHint {
    /// Absolute difference between the two values
    pub magnitude: f64,
    /// The values are close enough that a tolerance check is likely intended
    pub suggest_tolerance: bool,
}

#[derive(Debug, Clone)]
pub struct DifferenceNode {
    pub kind: DifferenceKind,
    pub label: String,
    pub actual: Option<Value>,
    pub expected: Option<Value>,
    pub actual_index: Option<usize>,
    pub expected_index: Option<usize>,
    pub numeric_hint: Option<NumericHint>,
    pub children: Vec<DifferenceNode>,
}

impl DifferenceNode {
    fn leaf(kind: DifferenceKind, label: impl Into<String>) -> Self {
        Self {
            kind,
            label: label.into(),
            actual: None,
            expected: None,
            actual_index: None,
            expected_index: None,
            numeric_hint: None,
            children: Vec::new(),
        }
    }

    pub fn value_mismatch(label: impl Into<String>, actual: Value, expected: Value) -> Self {
        Self {
            actual: Some(actual),
            expected: Some(expected),
            ..Self::leaf(DifferenceKind::ValueMismatch, label)
        }
    }

    pub fn attribute_mismatch(label: impl Into<String>, actual: Value, expected: Value) -> Self {
        Self {
            kind: DifferenceKind::AttributeMismatch,
            ..Self::value_mismatch(label, actual, expected)
        }
    }

    pub fn missing(label: impl Into<String>, expected: Value, expected_index: Option<usize>) -> Self {
        Self {
            expected: Some(expected),
            expected_index,
            ..Self::leaf(DifferenceKind::Missing, label)
        }
    }

    pub fn extra(label: impl Into<String>, actual: Value, actual_index: Option<usize>) -> Self {
        Self {
            actual: Some(actual),
            actual_index,
            ..Self::leaf(DifferenceKind::Extra, label)
        }
    }

    pub fn moved(
        label: impl Into<String>,
        value: Value,
        actual_index: usize,
        expected_index: usize,
    ) -> Self {
        Self {
            actual: Some(value),
            actual_index: Some(actual_index),
            expected_index: Some(expected_index),
            ..Self::leaf(DifferenceKind::Moved, label)
        }
    }

    pub fn found_instead_of(
        label: impl Into<String>,
        actual: Value,
        expected: Value,
        actual_index: usize,
        expected_index: usize,
    ) -> Self {
        Self {
            kind: DifferenceKind::FoundInsteadOf,
            actual_index: Some(actual_index),
            expected_index: Some(expected_index),
            ..Self::value_mismatch(label, actual, expected)
        }
    }

    pub fn with_numeric_hint(mut self, hint: Option<NumericHint>) -> Self {
        self.numeric_hint = hint;
        self
    }

    pub fn with_indexes(mut self, actual_index: Option<usize>, expected_index: Option<usize>) -> Self {
        self.actual_index = actual_index;
        self.expected_index = expected_index;
        self
    }

    /// Group `children` under `label`; `None` when there is nothing to group.
    ///
    /// The group is an [`DifferenceKind::EquivalentGroup`] when every child is
    /// a reordering, so nested reorderings still read as equivalent.
    pub fn group(
        label: impl Into<String>,
        actual: Value,
        expected: Value,
        children: Vec<DifferenceNode>,
    ) -> Option<Self> {
        if children.is_empty() {
            return None;
        }
        let kind = if children.iter().all(|c| c.kind.is_equivalence_only()) {
            DifferenceKind::EquivalentGroup
        } else {
            DifferenceKind::ValueMismatch
        };
        Some(Self {
            kind,
            children,
            ..Self::value_mismatch(label, actual, expected)
        })
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// True when the only differences are reorderings
    pub fn is_equivalent(&self) -> bool {
        self.kind == DifferenceKind::EquivalentGroup
    }

    /// Descendant leaves in depth-first order (the node itself if it is a leaf)
    pub fn leaves(&self) -> Vec<&DifferenceNode> {
        let mut out = Vec::new();
        collect_leaves(self, &mut out);
        out
    }

    pub fn leaf_count(&self) -> usize {
        if self.is_leaf() {
            1
        } else {
            self.children.iter().map(DifferenceNode::leaf_count).sum()
        }
    }

    /// Indexes of the first reported difference: this node's own when it is a
    /// leaf, otherwise those of its first child.
    pub fn first_difference_indexes(&self) -> (Option<usize>, Option<usize>) {
        match self.children.first() {
            Some(first) => (first.actual_index, first.expected_index),
            None => (self.actual_index, self.expected_index),
        }
    }
}

fn collect_leaves<'a>(node: &'a DifferenceNode, out: &mut Vec<&'a DifferenceNode>) {
    if node.is_leaf() {
        out.push(node);
    } else {
        node.children.iter().for_each(|c| collect_leaves(c, out));
    }
}
