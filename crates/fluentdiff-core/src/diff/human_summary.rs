//! Human-readable rendering of difference trees.

use crate::config::{
    CompareConfig, DEFAULT_MAX_LINES, DEFAULT_REFERENCE, DEFAULT_SUBJECT,
};
use crate::diff::model::{DifferenceKind, DifferenceNode};
use crate::format::{format_magnitude, format_raw, format_value};
use crate::model::Value;

/// Wording and size limits for a rendered report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub subject: String,
    pub reference: String,
    pub max_lines: usize,
    pub for_equivalence: bool,
    /// Word extra and missing entries as equivalence findings
    pub equivalence_wording: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            subject: DEFAULT_SUBJECT.to_string(),
            reference: DEFAULT_REFERENCE.to_string(),
            max_lines: DEFAULT_MAX_LINES,
            for_equivalence: false,
            equivalence_wording: false,
        }
    }
}

impl RenderOptions {
    pub fn from_config(config: &CompareConfig) -> Self {
        Self {
            subject: config.subject.clone(),
            reference: config.reference.clone(),
            max_lines: config.max_lines,
            for_equivalence: config.mode.is_equivalence(),
            equivalence_wording: false,
        }
    }
}

/// Leaves that still matter for the active check.
///
/// Equivalence drops reorderings and a bare mismatch at the root; strict
/// equality drops unordered found-instead-of pairings.
pub fn flatten(node: &DifferenceNode, for_equivalence: bool) -> Vec<&DifferenceNode> {
    if node.is_leaf() && for_equivalence && node.kind == DifferenceKind::ValueMismatch {
        return Vec::new();
    }
    node.leaves()
        .into_iter()
        .filter(|leaf| still_needed(leaf.kind, for_equivalence))
        .collect()
}

fn still_needed(kind: DifferenceKind, for_equivalence: bool) -> bool {
    if for_equivalence {
        kind != DifferenceKind::Moved
    } else {
        kind != DifferenceKind::FoundInsteadOf
    }
}

/// Render with the default subject and reference wording
pub fn render(node: &DifferenceNode, for_equivalence: bool, max_lines: usize) -> String {
    render_with(
        node,
        &RenderOptions {
            for_equivalence,
            max_lines,
            ..RenderOptions::default()
        },
    )
}

/// Header line followed by one line per difference, truncated to
/// `max_lines` unless only a single line would be hidden.
pub fn render_with(node: &DifferenceNode, options: &RenderOptions) -> String {
    let details = flatten(node, options.for_equivalence);
    let mut out = String::new();

    // Header
    let relation = if options.for_equivalence {
        "not equivalent to"
    } else {
        "different from"
    };
    out.push_str(&format!(
        "The {} is {} the {}",
        options.subject, relation, options.reference
    ));
    let hint = node.numeric_hint.filter(|_| node.is_leaf());
    if let Some(hint) = hint {
        out.push_str(&format!(
            ", with a difference of {}",
            format_magnitude(hint.magnitude)
        ));
    }
    out.push('.');
    if hint.is_some_and(|h| h.suggest_tolerance) {
        out.push_str(" You may consider using is_close_to() for comparison.");
    }
    if details.len() > 1 {
        out.push_str(&format!(" {} differences found!", details.len()));
    }
    if node.is_equivalent() {
        out.push_str(" But they are equivalent.");
    }

    // Details
    let mut shown = options.max_lines.min(details.len());
    if details.len() - shown == 1 {
        shown += 1;
    }
    let equivalence_wording = options.equivalence_wording && options.for_equivalence;
    for leaf in &details[..shown] {
        out.push('\n');
        match leaf.kind {
            DifferenceKind::Extra if equivalence_wording => out.push_str(&format!(
                "{} value should not exist (value {}).",
                leaf.label,
                value_text(leaf.actual.as_ref())
            )),
            DifferenceKind::Missing if equivalence_wording => out.push_str(&format!(
                "{} should be present but was not found.",
                value_text(leaf.expected.as_ref())
            )),
            _ => out.push_str(&render_line(leaf)),
        }
    }
    if shown != details.len() {
        out.push_str(&format!(
            "\n... ({} differences omitted)",
            details.len() - shown
        ));
    }

    out
}

/// One report line for a leaf
pub fn render_line(leaf: &DifferenceNode) -> String {
    let actual = value_text(leaf.actual.as_ref());
    let expected = value_text(leaf.expected.as_ref());
    match leaf.kind {
        DifferenceKind::Extra => format!("{} should not exist (value {}).", leaf.label, actual),
        DifferenceKind::Missing => {
            format!("{} does not exist. Expected {}.", leaf.label, expected)
        }
        DifferenceKind::Moved => format!(
            "{} value ('{}') was found at index {} instead of {}.",
            leaf.label,
            leaf.actual.as_ref().map_or_else(|| "null".to_string(), format_raw),
            index_text(leaf.actual_index),
            index_text(leaf.expected_index),
        ),
        DifferenceKind::FoundInsteadOf => format!(
            "{} should not exist (found in {}); {} should be found instead.",
            actual, leaf.label, expected
        ),
        DifferenceKind::AttributeMismatch
        | DifferenceKind::ValueMismatch
        | DifferenceKind::EquivalentGroup => {
            format!("{} = {} instead of {}.", leaf.label, actual, expected)
        }
    }
}

fn value_text(value: Option<&Value>) -> String {
    value.map_or_else(|| "null".to_string(), format_value)
}

fn index_text(index: Option<usize>) -> String {
    index.map_or_else(|| "?".to_string(), |i| i.to_string())
}
