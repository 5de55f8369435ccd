//! Shared helpers for fluentdiff-core integration tests
#![allow(dead_code)]

use fluentdiff_core::{
    Comparison, ComparerRegistry, DifferenceKind, DifferenceNode, EqualityMode, Value,
};

/// Strict comparison over an empty, test-local registry
pub fn strict(actual: &Value, expected: &Value) -> Option<DifferenceNode> {
    let registry = ComparerRegistry::new();
    Comparison::new().registry(&registry).run(actual, expected)
}

/// Equivalence comparison over an empty, test-local registry
pub fn equivalent(actual: &Value, expected: &Value) -> Option<DifferenceNode> {
    let registry = ComparerRegistry::new();
    Comparison::new()
        .registry(&registry)
        .mode(EqualityMode::Equivalent)
        .run(actual, expected)
}

/// Rendered report for a strict comparison; `None` when equal
pub fn explain_strict(actual: &Value, expected: &Value) -> Option<String> {
    let registry = ComparerRegistry::new();
    Comparison::new().registry(&registry).explain(actual, expected)
}

/// Rendered report for an equivalence comparison; `None` when equivalent
pub fn explain_equivalent(actual: &Value, expected: &Value) -> Option<String> {
    let registry = ComparerRegistry::new();
    Comparison::new()
        .registry(&registry)
        .mode(EqualityMode::Equivalent)
        .explain(actual, expected)
}

pub fn leaf_kinds(node: &DifferenceNode) -> Vec<DifferenceKind> {
    node.leaves().iter().map(|l| l.kind).collect()
}

pub fn leaf_labels(node: &DifferenceNode) -> Vec<String> {
    node.leaves().iter().map(|l| l.label.clone()).collect()
}
