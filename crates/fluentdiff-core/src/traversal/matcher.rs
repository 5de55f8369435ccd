//! Pairing of members across two value graphs, and the cycle guard

use std::collections::{HashMap, HashSet};

use crate::model::Value;
use crate::traversal::introspect::IntrospectedValue;

/// Outcome of looking up one member on both sides
#[derive(Debug, Clone)]
pub enum MemberMatch<'p> {
    Both {
        actual: IntrospectedValue<'p>,
        expected: IntrospectedValue<'p>,
    },
    ExpectedOnly(IntrospectedValue<'p>),
    ActualOnly(IntrospectedValue<'p>),
}

/// Pair the members of two composites by name.
///
/// Expected members come first, in their declaration order; members found
/// only on the actual side follow in theirs.
pub fn match_members<'p>(
    actual: &IntrospectedValue<'p>,
    expected: &IntrospectedValue<'p>,
) -> Vec<MemberMatch<'p>> {
    let mut actual_members: Vec<Option<IntrospectedValue<'p>>> =
        actual.enumerate_children().into_iter().map(Some).collect();

    let mut matches = Vec::new();
    for exp in expected.enumerate_children() {
        let found = actual_members
            .iter_mut()
            .find(|slot| slot.as_ref().is_some_and(|a| a.name() == exp.name()))
            .and_then(Option::take);
        matches.push(match found {
            Some(act) => MemberMatch::Both {
                actual: act,
                expected: exp,
            },
            None => MemberMatch::ExpectedOnly(exp),
        });
    }
    matches.extend(
        actual_members
            .into_iter()
            .flatten()
            .map(MemberMatch::ActualOnly),
    );
    matches
}

/// What is already known about a pair walked earlier in the same call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settled {
    pub equal: bool,
    /// Its differences are already part of the report
    pub reported: bool,
}

/// Identity pairs seen during one comparison call.
///
/// A pair is entered when the walk descends into it and left when the walk
/// returns, so reaching a pair already on the path means the graphs loop.
/// Once left, the pair's outcome is settled for the rest of the call, so a
/// subgraph reachable by several routes is walked once per remaining depth.
#[derive(Debug, Default)]
pub struct VisitedPairs {
    active: HashSet<(usize, usize)>,
    settled: HashMap<(usize, usize, i64), Settled>,
}

impl VisitedPairs {
    /// Record the pair; `false` when it is already on the current path.
    /// Values without identity are never tracked.
    pub fn enter(&mut self, actual: &Value, expected: &Value) -> bool {
        match (actual.identity(), expected.identity()) {
            (Some(a), Some(e)) => self.active.insert((a, e)),
            _ => true,
        }
    }

    pub fn leave(&mut self, actual: &Value, expected: &Value) {
        if let (Some(a), Some(e)) = (actual.identity(), expected.identity()) {
            self.active.remove(&(a, e));
        }
    }

    pub fn depth(&self) -> usize {
        self.active.len()
    }

    /// Outcome of an earlier walk of the pair at the same remaining depth
    pub fn settled(&self, actual: &Value, expected: &Value, depth: i64) -> Option<Settled> {
        let (a, e) = (actual.identity()?, expected.identity()?);
        self.settled.get(&(a, e, depth)).copied()
    }

    /// Remember the outcome of a finished walk. A pair stays reported once
    /// any walk has reported it.
    pub fn settle(&mut self, actual: &Value, expected: &Value, depth: i64, outcome: Settled) {
        if let (Some(a), Some(e)) = (actual.identity(), expected.identity()) {
            self.settled
                .entry((a, e, depth))
                .and_modify(|known| known.reported |= outcome.reported)
                .or_insert(outcome);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ObjectBuilder, TypeDescriptor};
    use crate::policy::SelectionPolicy;
    use crate::traversal::introspect::ROOT_LABEL;

    #[test]
    fn test_match_members_orders_expected_then_extra() {
        let actual = ObjectBuilder::new(TypeDescriptor::named("T"))
            .field("extra", 1)
            .field("shared", 2)
            .build();
        let expected = ObjectBuilder::new(TypeDescriptor::named("T"))
            .field("shared", 2)
            .field("missing", 3)
            .build();
        let policy = SelectionPolicy::default();
        let a = IntrospectedValue::root(ROOT_LABEL, actual, &policy);
        let e = IntrospectedValue::root(ROOT_LABEL, expected, &policy);

        let kinds: Vec<_> = match_members(&a, &e)
            .into_iter()
            .map(|m| match m {
                MemberMatch::Both { actual, .. } => format!("both:{}", actual.name()),
                MemberMatch::ExpectedOnly(e) => format!("missing:{}", e.name()),
                MemberMatch::ActualOnly(a) => format!("extra:{}", a.name()),
            })
            .collect();
        assert_eq!(kinds, vec!["both:shared", "missing:missing", "extra:extra"]);
    }

    #[test]
    fn test_visited_pairs_detects_reentry() {
        let node = ObjectBuilder::new(TypeDescriptor::named("N")).build();
        let mut visited = VisitedPairs::default();
        assert!(visited.enter(&node, &node));
        assert!(!visited.enter(&node, &node));
        visited.leave(&node, &node);
        assert!(visited.enter(&node, &node));
    }

    #[test]
    fn test_plain_values_not_tracked() {
        let mut visited = VisitedPairs::default();
        assert!(visited.enter(&Value::number(1), &Value::number(1)));
        assert!(visited.enter(&Value::number(1), &Value::number(1)));
        assert_eq!(visited.depth(), 0);
        visited.settle(
            &Value::number(1),
            &Value::number(1),
            3,
            Settled { equal: true, reported: false },
        );
        assert_eq!(visited.settled(&Value::number(1), &Value::number(1), 3), None);
    }

    #[test]
    fn test_settled_outcome_is_keyed_by_depth() {
        let a = ObjectBuilder::new(TypeDescriptor::named("N")).build();
        let e = ObjectBuilder::new(TypeDescriptor::named("N")).build();
        let mut visited = VisitedPairs::default();
        assert_eq!(visited.settled(&a, &e, 4), None);

        visited.settle(&a, &e, 4, Settled { equal: false, reported: false });
        visited.settle(&a, &e, 4, Settled { equal: false, reported: true });
        visited.settle(&a, &e, 4, Settled { equal: false, reported: false });
        assert_eq!(
            visited.settled(&a, &e, 4),
            Some(Settled { equal: false, reported: true })
        );
        assert_eq!(visited.settled(&a, &e, 3), None);
        assert_eq!(visited.settled(&e, &a, 4), None);
    }
}
