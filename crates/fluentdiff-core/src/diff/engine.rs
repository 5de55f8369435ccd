//! Difference finder.
//!
//! The entry points are [`compare`] and the [`Comparison`] builder. Both walk
//! two value graphs side by side and return `None` when they agree, or the
//! root of a [`DifferenceNode`] tree describing every discrepancy.

use std::time::Instant;

use fluentdiff_core_types::{ComparisonContext, ComparisonId};

use crate::classify::{classify, common_kind};
use crate::config::{CompareConfig, EqualityMode};
use crate::diff::human_summary::{render_with, RenderOptions};
use crate::diff::model::{DifferenceNode, NumericHint};
use crate::model::{Describe, GridValue, MapValue, Number, NumericKind, Value};
use crate::policy::SelectionPolicy;
use crate::registry::{Comparer, ComparerRegistry, Operator};
use crate::traversal::matcher::Settled;
use crate::traversal::{match_members, IntrospectedValue, MemberMatch, VisitedPairs, ROOT_LABEL};
use crate::{log_op_end, log_op_start};

/// Relative difference under which the magnitude is reported
const MAGNITUDE_RATIO: f64 = 1.0 / 10240.0;
/// Relative difference under which a tolerance check is suggested (f64)
const F64_CLOSE_TO_RATIO: f64 = 1e-8;
/// Relative difference under which a tolerance check is suggested (f32)
const F32_CLOSE_TO_RATIO: f64 = 1e-5;

/// Compare two values with the process-wide comparer registry.
///
/// `comparer`, when given, replaces every other rule for the top-level pair.
///
/// ```
/// use fluentdiff_core::config::EqualityMode;
/// use fluentdiff_core::diff::engine::compare;
/// use fluentdiff_core::model::Describe;
/// use fluentdiff_core::policy::SelectionPolicy;
///
/// let policy = SelectionPolicy::default();
/// let diff = compare(&vec![1, 2].describe(), &vec![2, 1].describe(),
///                    EqualityMode::Equivalent, &policy, 256, None);
/// assert!(diff.is_none());
/// ```
pub fn compare(
    actual: &Value,
    expected: &Value,
    mode: EqualityMode,
    policy: &SelectionPolicy,
    max_depth: i64,
    comparer: Option<&Comparer>,
) -> Option<DifferenceNode> {
    let mut comparison = Comparison::new()
        .mode(mode)
        .policy(policy.clone())
        .max_depth(max_depth);
    if let Some(c) = comparer {
        comparison = comparison.comparer(c.clone());
    }
    comparison.run(actual, expected)
}

/// Configured comparison, reusable across value pairs
pub struct Comparison<'r> {
    config: CompareConfig,
    registry: &'r ComparerRegistry,
    comparer: Option<Comparer>,
    context: ComparisonContext,
    root_label: String,
}

impl Default for Comparison<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl Comparison<'static> {
    /// Default configuration over the shared registry
    pub fn new() -> Self {
        Self {
            config: CompareConfig::default(),
            registry: ComparerRegistry::shared(),
            comparer: None,
            context: ComparisonContext::new(),
            root_label: ROOT_LABEL.to_string(),
        }
    }
}

impl<'r> Comparison<'r> {
    pub fn with_config(mut self, config: CompareConfig) -> Self {
        self.config = config;
        self
    }

    pub fn mode(mut self, mode: EqualityMode) -> Self {
        self.config.mode = mode;
        self
    }

    pub fn policy(mut self, policy: SelectionPolicy) -> Self {
        self.config.policy = policy;
        self
    }

    pub fn max_depth(mut self, max_depth: i64) -> Self {
        self.config.max_depth = max_depth;
        self
    }

    pub fn max_lines(mut self, max_lines: usize) -> Self {
        self.config.max_lines = max_lines;
        self
    }

    /// Use `registry` instead of the shared one
    pub fn registry<'s>(self, registry: &'s ComparerRegistry) -> Comparison<'s> {
        Comparison {
            config: self.config,
            registry,
            comparer: self.comparer,
            context: self.context,
            root_label: self.root_label,
        }
    }

    pub fn comparer(mut self, comparer: Comparer) -> Self {
        self.comparer = Some(comparer);
        self
    }

    pub fn context(mut self, context: ComparisonContext) -> Self {
        self.context = context;
        self
    }

    pub fn root_label(mut self, label: impl Into<String>) -> Self {
        self.root_label = label.into();
        self
    }

    pub fn config(&self) -> &CompareConfig {
        &self.config
    }

    pub fn comparison_id(&self) -> &ComparisonId {
        &self.context.comparison_id
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions::from_config(&self.config)
    }

    /// Compare two values; `None` when they agree under the configured mode.
    ///
    /// Every run of one `Comparison` logs under its context's identifier.
    pub fn run(&self, actual: &Value, expected: &Value) -> Option<DifferenceNode> {
        let start = Instant::now();
        let comparison_id = self.context.comparison_id.as_str();
        log_op_start!(
            "compare",
            comparison_id = comparison_id,
            origin = self.context.origin.as_deref().unwrap_or(""),
            mode = self.config.mode.as_str(),
            max_depth = self.config.max_depth
        );

        let policy = &self.config.policy;
        let actual = IntrospectedValue::root(self.root_label.as_str(), actual.clone(), policy);
        let expected = IntrospectedValue::root(self.root_label.as_str(), expected.clone(), policy);

        let result = match (&self.comparer, self.config.mode) {
            (Some(comparer), _) => delegate(comparer, &actual, &expected),
            (None, EqualityMode::Strict | EqualityMode::Equivalent) => {
                let mut finder = Finder {
                    mode: self.config.mode,
                    registry: self.registry,
                    comparison_id: &self.context.comparison_id,
                    visited: VisitedPairs::default(),
                    trials: 0,
                    suppressed: 0,
                };
                finder.find(&actual, &expected, self.config.max_depth, Slot::Root)
            }
            (None, EqualityMode::DelegatedEquals) => own_equality(&actual, &expected),
            (None, EqualityMode::OperatorBased(operator)) => {
                self.operator_equality(operator, &actual, &expected)
            }
        };

        let leaf_count = result.as_ref().map_or(0, DifferenceNode::leaf_count);
        log_op_end!(
            "compare",
            duration_ms = start.elapsed().as_millis() as u64,
            comparison_id = comparison_id,
            leaf_count = leaf_count as u64
        );
        result
    }

    /// [`Self::run`] over any describable values
    pub fn check<A, E>(&self, actual: &A, expected: &E) -> Option<DifferenceNode>
    where
        A: Describe + ?Sized,
        E: Describe + ?Sized,
    {
        self.run(&actual.describe(), &expected.describe())
    }

    /// Compare and render; `None` when the values agree
    pub fn explain(&self, actual: &Value, expected: &Value) -> Option<String> {
        self.run(actual, expected)
            .map(|node| render_with(&node, &self.render_options()))
    }

    fn operator_equality(
        &self,
        operator: Operator,
        actual: &IntrospectedValue<'_>,
        expected: &IntrospectedValue<'_>,
    ) -> Option<DifferenceNode> {
        let (a, e) = (actual.value(), expected.value());
        let found = self
            .registry
            .find_operator(&a.type_descriptor(), operator)
            .or_else(|| self.registry.find_operator(&e.type_descriptor(), operator));
        let equal = match (found, operator) {
            (Some(op), Operator::Eq) => op(a, e),
            (Some(op), Operator::Neq) => !op(a, e),
            (None, _) => {
                tracing::debug!(
                    component = module_path!(),
                    op = "compare",
                    event = "operator_fallback",
                    comparison_id = self.context.comparison_id.as_str(),
                    operator = ?operator,
                );
                a.own_equals(e)
            }
        };
        (!equal).then(|| terminal_mismatch(actual, expected, Slot::Root))
    }
}

fn delegate(
    comparer: &Comparer,
    actual: &IntrospectedValue<'_>,
    expected: &IntrospectedValue<'_>,
) -> Option<DifferenceNode> {
    (!comparer(actual.value(), expected.value()))
        .then(|| terminal_mismatch(actual, expected, Slot::Root))
}

fn own_equality(
    actual: &IntrospectedValue<'_>,
    expected: &IntrospectedValue<'_>,
) -> Option<DifferenceNode> {
    (!actual.value().own_equals(expected.value()))
        .then(|| terminal_mismatch(actual, expected, Slot::Root))
}

/// Where a pair sits in its parent; decides the kind of a terminal mismatch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Root,
    Index(usize),
    Member,
}

impl Slot {
    fn index(self) -> Option<usize> {
        match self {
            Slot::Index(i) => Some(i),
            _ => None,
        }
    }
}

fn terminal_mismatch(
    actual: &IntrospectedValue<'_>,
    expected: &IntrospectedValue<'_>,
    slot: Slot,
) -> DifferenceNode {
    let (a, e) = (actual.value().clone(), expected.value().clone());
    match slot {
        Slot::Member => DifferenceNode::attribute_mismatch(actual.label(), a, e),
        Slot::Root => DifferenceNode::value_mismatch(actual.label(), a, e),
        Slot::Index(i) => {
            DifferenceNode::value_mismatch(actual.label(), a, e).with_indexes(Some(i), Some(i))
        }
    }
}

fn floats_equal(a: f64, e: f64) -> bool {
    (a - e).abs() == 0.0 || a == e || (a.is_nan() && e.is_nan())
}

/// Magnitude and tolerance hint for two unequal floats
pub fn float_hint(actual: f64, expected: f64, close_to_ratio: f64) -> Option<NumericHint> {
    let diff = (actual - expected).abs();
    let ratio = if expected == 0.0 {
        1.0
    } else {
        (diff / expected).abs()
    };
    (ratio < MAGNITUDE_RATIO).then_some(NumericHint {
        magnitude: diff,
        suggest_tolerance: ratio < close_to_ratio,
    })
}

/// `None` when equal after widening, otherwise the hint to attach (if any).
fn numeric_difference(a: &Number, e: &Number) -> Option<Option<NumericHint>> {
    let common = common_kind(a.kind(), e.kind());
    if !a.kind().is_float() && !e.kind().is_float() {
        return (a.as_i128() != e.as_i128()).then_some(None);
    }
    let (x, y, close_to) = if common == NumericKind::F32 {
        (
            f64::from(a.as_f32()),
            f64::from(e.as_f32()),
            F32_CLOSE_TO_RATIO,
        )
    } else {
        (a.as_f64(), e.as_f64(), F64_CLOSE_TO_RATIO)
    };
    (!floats_equal(x, y)).then(|| float_hint(x, y, close_to))
}

struct Finder<'a> {
    mode: EqualityMode,
    registry: &'a ComparerRegistry,
    comparison_id: &'a ComparisonId,
    visited: VisitedPairs,
    /// Nesting of trial comparisons; nothing found under a trial is reported
    trials: usize,
    /// Differing pairs left out because another route already reported them
    suppressed: usize,
}

impl<'a> Finder<'a> {
    fn find<'p>(
        &mut self,
        actual: &IntrospectedValue<'p>,
        expected: &IntrospectedValue<'p>,
        depth: i64,
        slot: Slot,
    ) -> Option<DifferenceNode> {
        let (a, e) = (actual.value(), expected.value());

        // 1. Registered comparers win
        if let Some(comparer) = self.registered_comparer(a, e) {
            tracing::debug!(
                component = module_path!(),
                op = "compare",
                event = "registry_delegation",
                comparison_id = self.comparison_id.as_str(),
                label = %actual.label(),
            );
            return (!comparer(a, e)).then(|| terminal_mismatch(actual, expected, slot));
        }

        // 2. Absent values
        match (a.is_null(), e.is_null()) {
            (true, true) => return None,
            (true, false) => {
                return Some(DifferenceNode::missing(
                    expected.label(),
                    e.clone(),
                    slot.index(),
                ))
            }
            (false, true) => {
                return Some(DifferenceNode::extra(actual.label(), a.clone(), slot.index()))
            }
            (false, false) => {}
        }

        // 3. Same handle
        if let (Some(x), Some(y)) = (a.identity(), e.identity()) {
            if x == y {
                return None;
            }
        }

        // 4. Numbers, widened to a common kind
        if let (Value::Number(x), Value::Number(y)) = (a, e) {
            return numeric_difference(x, y)
                .map(|hint| terminal_mismatch(actual, expected, slot).with_numeric_hint(hint));
        }

        // 5. Terminal, self-equatable, depth-exhausted or mismatched shapes
        let (ca, ce) = (classify(a), classify(e));
        if ca.is_terminal() || ce.is_terminal() || ca != ce || depth <= 0 {
            if depth <= 0 && !ca.is_terminal() {
                tracing::debug!(
                    component = module_path!(),
                    op = "compare",
                    event = "depth_cutoff",
                    comparison_id = self.comparison_id.as_str(),
                    label = %actual.label(),
                );
            }
            return (!a.own_equals(e)).then(|| terminal_mismatch(actual, expected, slot));
        }

        // 6. Pairs already walked through another route
        match self.visited.settled(a, e, depth) {
            Some(Settled { equal: true, .. }) => return None,
            Some(Settled { reported, .. }) if reported || self.trials > 0 => {
                tracing::debug!(
                    component = module_path!(),
                    op = "compare",
                    event = "settled_pair_reused",
                    comparison_id = self.comparison_id.as_str(),
                    label = %actual.label(),
                );
                if self.trials > 0 {
                    return Some(terminal_mismatch(actual, expected, slot));
                }
                self.suppressed += 1;
                return None;
            }
            _ => {}
        }

        // 7. Structural descent, guarded against cycles
        if !self.visited.enter(a, e) {
            tracing::debug!(
                component = module_path!(),
                op = "compare",
                event = "cycle_short_circuit",
                comparison_id = self.comparison_id.as_str(),
                label = %actual.label(),
            );
            return None;
        }
        let suppressed_before = self.suppressed;
        let node = match (a, e) {
            (Value::Map(am), Value::Map(em)) => self.compare_maps(actual, expected, am, em, depth),
            (Value::Seq(aseq), Value::Seq(eseq)) => {
                let unordered = aseq.is_unordered() || eseq.is_unordered();
                let (ai, ei) = (aseq.items(), eseq.items());
                self.compare_sequences(actual, expected, &ai, &ei, unordered, depth)
            }
            (Value::Grid(ag), Value::Grid(eg)) => {
                self.compare_grids(actual, expected, ag, eg, depth, slot)
            }
            (Value::Object(_), Value::Object(_)) => self.compare_objects(actual, expected, depth),
            _ => (!a.own_equals(e)).then(|| terminal_mismatch(actual, expected, slot)),
        };
        self.visited.leave(a, e);
        let equal = node.is_none() && self.suppressed == suppressed_before;
        self.visited.settle(
            a,
            e,
            depth,
            Settled {
                equal,
                reported: !equal && self.trials == 0,
            },
        );
        node
    }

    fn registered_comparer(&self, a: &Value, e: &Value) -> Option<Comparer> {
        self.registry
            .find_comparer(&a.type_descriptor())
            .or_else(|| self.registry.find_comparer(&e.type_descriptor()))
    }

    /// Trial comparison of two items under a parent; reports nothing
    fn items_equal<'p>(
        &mut self,
        parent: &IntrospectedValue<'p>,
        a: &Value,
        e: &Value,
        depth: i64,
    ) -> bool {
        let a = parent.indexed(0, a.clone());
        let e = parent.indexed(0, e.clone());
        self.trials += 1;
        let equal = self.find(&a, &e, depth, Slot::Index(0)).is_none();
        self.trials -= 1;
        equal
    }

    fn compare_maps<'p>(
        &mut self,
        actual: &IntrospectedValue<'p>,
        expected: &IntrospectedValue<'p>,
        am: &MapValue,
        em: &MapValue,
        depth: i64,
    ) -> Option<DifferenceNode> {
        let mut unmatched: Vec<Option<(Value, Value)>> =
            am.entries().into_iter().map(Some).collect();
        let mut children = Vec::new();

        for (ek, ev) in em.entries() {
            let position = unmatched.iter().position(|slot| {
                slot.as_ref()
                    .is_some_and(|(ak, _)| self.items_equal(actual, ak, &ek, depth - 1))
            });
            match position.and_then(|i| unmatched[i].take()) {
                Some((ak, av)) => {
                    let a = actual.keyed(&ak, av);
                    let e = expected.keyed(&ek, ev);
                    children.extend(self.find(&a, &e, depth - 1, Slot::Member));
                }
                None => {
                    let label = expected.keyed(&ek, ev.clone()).label();
                    children.push(DifferenceNode::missing(label, ev, None));
                }
            }
        }

        if !actual.policy().ignore_unmatched_expected_members {
            for (ak, av) in unmatched.into_iter().flatten() {
                let label = actual.keyed(&ak, av.clone()).label();
                children.push(DifferenceNode::extra(label, av, None));
            }
        }

        DifferenceNode::group(
            actual.label(),
            actual.value().clone(),
            expected.value().clone(),
            children,
        )
    }

    fn compare_sequences<'p>(
        &mut self,
        actual: &IntrospectedValue<'p>,
        expected: &IntrospectedValue<'p>,
        a: &[Value],
        e: &[Value],
        unordered: bool,
        depth: i64,
    ) -> Option<DifferenceNode> {
        let children = if unordered || self.mode.is_equivalence() {
            self.unordered_items(actual, expected, a, e, depth)
        } else {
            self.ordered_items(actual, expected, a, e, depth)
        };
        DifferenceNode::group(
            actual.label(),
            actual.value().clone(),
            expected.value().clone(),
            children,
        )
    }

    /// Positional comparison with move detection
    fn ordered_items<'p>(
        &mut self,
        actual: &IntrospectedValue<'p>,
        expected: &IntrospectedValue<'p>,
        a: &[Value],
        e: &[Value],
        depth: i64,
    ) -> Vec<DifferenceNode> {
        let common = a.len().min(e.len());
        let positional_equal: Vec<bool> = (0..common)
            .map(|i| self.items_equal(actual, &a[i], &e[i], depth - 1))
            .collect();

        let actual_open: Vec<bool> = (0..a.len())
            .map(|i| i >= common || !positional_equal[i])
            .collect();
        let mut expected_open: Vec<bool> = (0..e.len())
            .map(|j| j >= common || !positional_equal[j])
            .collect();
        let mut moved = vec![false; a.len()];
        let mut out: Vec<(usize, DifferenceNode)> = Vec::new();

        for i in (0..a.len()).filter(|&i| actual_open[i]) {
            let target = (0..e.len()).find(|&j| {
                j != i && expected_open[j] && self.items_equal(actual, &a[i], &e[j], depth - 1)
            });
            if let Some(j) = target {
                expected_open[j] = false;
                moved[i] = true;
                let label = actual.indexed(i, a[i].clone()).label();
                out.push((i, DifferenceNode::moved(label, a[i].clone(), i, j)));
            }
        }

        for i in (0..a.len()).filter(|&i| actual_open[i] && !moved[i]) {
            if i < e.len() && expected_open[i] {
                expected_open[i] = false;
                let ai = actual.indexed(i, a[i].clone());
                let ei = expected.indexed(i, e[i].clone());
                if let Some(node) = self.find(&ai, &ei, depth - 1, Slot::Index(i)) {
                    out.push((i, node));
                }
            } else {
                let label = actual.indexed(i, a[i].clone()).label();
                out.push((i, DifferenceNode::extra(label, a[i].clone(), Some(i))));
            }
        }

        for j in (0..e.len()).filter(|&j| expected_open[j]) {
            let label = expected.indexed(j, e[j].clone()).label();
            out.push((j, DifferenceNode::missing(label, e[j].clone(), Some(j))));
        }

        out.sort_by_key(|(position, _)| *position);
        out.into_iter().map(|(_, node)| node).collect()
    }

    /// Multiset comparison: order is irrelevant, leftovers are paired up
    fn unordered_items<'p>(
        &mut self,
        actual: &IntrospectedValue<'p>,
        expected: &IntrospectedValue<'p>,
        a: &[Value],
        e: &[Value],
        depth: i64,
    ) -> Vec<DifferenceNode> {
        let mut expected_open = vec![true; e.len()];
        let mut leftover_actual = Vec::new();

        for i in 0..a.len() {
            let same_slot = i < e.len()
                && expected_open[i]
                && self.items_equal(actual, &a[i], &e[i], depth - 1);
            let candidate = if same_slot {
                Some(i)
            } else {
                (0..e.len()).find(|&j| {
                    j != i && expected_open[j] && self.items_equal(actual, &a[i], &e[j], depth - 1)
                })
            };
            match candidate {
                Some(j) => expected_open[j] = false,
                None => leftover_actual.push(i),
            }
        }
        let leftover_expected: Vec<usize> = (0..e.len()).filter(|&j| expected_open[j]).collect();
        // Strict checks of sets report leftovers on their own side
        let paired = if self.mode.is_equivalence() {
            leftover_actual.len().min(leftover_expected.len())
        } else {
            0
        };

        let mut out = Vec::new();
        for (&i, &j) in leftover_actual.iter().zip(&leftover_expected).take(paired) {
            let ai = actual.indexed(i, a[i].clone());
            if classify(&a[i]).is_terminal() && classify(&e[j]).is_terminal() {
                out.push(DifferenceNode::found_instead_of(
                    ai.label(),
                    a[i].clone(),
                    e[j].clone(),
                    i,
                    j,
                ));
            } else {
                let ej = expected.indexed(j, e[j].clone());
                out.extend(
                    self.find(&ai, &ej, depth - 1, Slot::Index(i))
                        .map(|node| node.with_indexes(Some(i), Some(j))),
                );
            }
        }
        for &i in leftover_actual.iter().skip(paired) {
            let label = actual.indexed(i, a[i].clone()).label();
            out.push(DifferenceNode::extra(label, a[i].clone(), Some(i)));
        }
        for &j in leftover_expected.iter().skip(paired) {
            let label = expected.indexed(j, e[j].clone()).label();
            out.push(DifferenceNode::missing(label, e[j].clone(), Some(j)));
        }
        out
    }

    fn compare_grids<'p>(
        &mut self,
        actual: &IntrospectedValue<'p>,
        expected: &IntrospectedValue<'p>,
        ag: &GridValue,
        eg: &GridValue,
        depth: i64,
        slot: Slot,
    ) -> Option<DifferenceNode> {
        if ag.rank() == 1 && eg.rank() == 1 {
            return self.compare_sequences(actual, expected, ag.items(), eg.items(), false, depth);
        }
        if ag.shape() != eg.shape() {
            return Some(terminal_mismatch(actual, expected, slot));
        }
        let children = actual
            .grid_cells(ag)
            .iter()
            .zip(expected.grid_cells(eg).iter())
            .enumerate()
            .filter_map(|(offset, (a, e))| self.find(a, e, depth - 1, Slot::Index(offset)))
            .collect();
        DifferenceNode::group(
            actual.label(),
            actual.value().clone(),
            expected.value().clone(),
            children,
        )
    }

    fn compare_objects<'p>(
        &mut self,
        actual: &IntrospectedValue<'p>,
        expected: &IntrospectedValue<'p>,
        depth: i64,
    ) -> Option<DifferenceNode> {
        let ignore_unmatched = actual.policy().ignore_unmatched_expected_members;
        let mut children = Vec::new();
        for member in match_members(actual, expected) {
            match member {
                MemberMatch::Both { actual, expected } => {
                    children.extend(self.find(&actual, &expected, depth - 1, Slot::Member));
                }
                MemberMatch::ExpectedOnly(expected) => {
                    children.push(DifferenceNode::missing(
                        expected.label(),
                        expected.value().clone(),
                        None,
                    ));
                }
                MemberMatch::ActualOnly(actual) if !ignore_unmatched => {
                    children.push(DifferenceNode::extra(
                        actual.label(),
                        actual.value().clone(),
                        None,
                    ));
                }
                MemberMatch::ActualOnly(_) => {}
            }
        }
        DifferenceNode::group(
            actual.label(),
            actual.value().clone(),
            expected.value().clone(),
            children,
        )
    }
}
