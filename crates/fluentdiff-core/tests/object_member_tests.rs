#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{explain_strict, leaf_kinds, leaf_labels, strict};
use fluentdiff_core::model::Member;
use fluentdiff_core::{
    Comparison, ComparerRegistry, Describe, DifferenceKind, DifferenceNode, ObjectBuilder,
    SelectionPolicy, TypeDescriptor, Value,
};

fn with_policy(policy: SelectionPolicy, actual: &Value, expected: &Value) -> Option<DifferenceNode> {
    let registry = ComparerRegistry::new();
    Comparison::new()
        .registry(&registry)
        .policy(policy)
        .run(actual, expected)
}

fn account(name: &str, secret: &str) -> Value {
    ObjectBuilder::new(TypeDescriptor::named("Account"))
        .field("name", name)
        .member(Member::field("secret", secret.describe()).non_public())
        .build()
}

#[test]
fn test_non_public_members_compared_by_default() {
    let diff = strict(&account("a", "x"), &account("a", "y")).unwrap();
    assert_eq!(leaf_labels(&diff), vec!["actual.secret"]);

    let text = explain_strict(&account("a", "x"), &account("a", "y")).unwrap();
    assert!(text.ends_with("actual.secret = \"x\" instead of \"y\"."));
}

#[test]
fn test_public_only_skips_non_public_members() {
    let policy = SelectionPolicy::default().public_only();
    assert!(with_policy(policy, &account("a", "x"), &account("a", "y")).is_none());
}

#[test]
fn test_excluded_names_are_skipped() {
    let policy = SelectionPolicy::default().exclude("sec.*").unwrap();
    assert!(with_policy(policy, &account("a", "x"), &account("a", "y")).is_none());
}

#[test]
fn test_exclusion_matches_long_names() {
    let outer = |inner_id: i32, id: i32| {
        ObjectBuilder::new(TypeDescriptor::named("Outer"))
            .field("id", id)
            .field(
                "inner",
                ObjectBuilder::new(TypeDescriptor::named("Inner"))
                    .field("id", inner_id)
                    .build(),
            )
            .build()
    };
    let policy = SelectionPolicy::default().exclude("inner\\.id").unwrap();

    assert!(with_policy(policy.clone(), &outer(1, 5), &outer(2, 5)).is_none());
    let diff = with_policy(policy, &outer(1, 5), &outer(1, 6)).unwrap();
    assert_eq!(leaf_labels(&diff), vec!["actual.id"]);
}

fn person(name: &str) -> Value {
    ObjectBuilder::new(TypeDescriptor::named("Person"))
        .member(Member::field("<Name>k__BackingField", name.describe()).non_public())
        .property("Name", name)
        .build()
}

#[test]
fn test_backing_fields_hidden_when_properties_enumerated() {
    let diff = strict(&person("a"), &person("b")).unwrap();
    assert_eq!(leaf_labels(&diff), vec!["actual.Name"]);
}

#[test]
fn test_backing_field_label_names_its_property() {
    let policy = SelectionPolicy::default().without_properties();
    let diff = with_policy(policy, &person("a"), &person("b")).unwrap();
    assert_eq!(
        leaf_labels(&diff),
        vec!["actual.Name (auto-generated field of property 'Name')"]
    );
}

#[test]
fn test_anonymous_fields_use_declared_name() {
    let anon = |x: i32| {
        ObjectBuilder::new(TypeDescriptor::named("<>f__AnonymousType0"))
            .member(Member::field("<x>i__Field", x.describe()))
            .build()
    };
    let diff = strict(&anon(1), &anon(2)).unwrap();
    assert_eq!(leaf_labels(&diff), vec!["actual.x"]);
}

fn derived(own_id: i32, base_id: i32, base_only: i32) -> Value {
    ObjectBuilder::new(TypeDescriptor::named("Derived").with_base(TypeDescriptor::named("Base")))
        .field("id", own_id)
        .member(Member::field("id", base_id.describe()).inherited(1))
        .member(Member::field("base_only", base_only.describe()).inherited(1))
        .build()
}

#[test]
fn test_own_members_shadow_inherited_ones() {
    assert!(strict(&derived(1, 10, 0), &derived(1, 20, 0)).is_none());
    let diff = strict(&derived(1, 10, 0), &derived(2, 10, 0)).unwrap();
    assert_eq!(leaf_labels(&diff), vec!["actual.id"]);
}

#[test]
fn test_inherited_members_can_be_excluded() {
    assert!(strict(&derived(1, 10, 0), &derived(1, 10, 7)).is_some());
    let policy = SelectionPolicy::default().without_derived_members();
    assert!(with_policy(policy, &derived(1, 10, 0), &derived(1, 10, 7)).is_none());
}

#[test]
fn test_unreadable_members_are_skipped() {
    let actual = ObjectBuilder::new(TypeDescriptor::named("Lazy"))
        .field("id", 1)
        .member(Member::unreadable("cache"))
        .build();
    let expected = ObjectBuilder::new(TypeDescriptor::named("Lazy"))
        .field("id", 1)
        .build();
    assert!(strict(&actual, &expected).is_none());
}

fn point(members: &[(&str, i32)]) -> Value {
    members
        .iter()
        .fold(ObjectBuilder::new(TypeDescriptor::named("Point")), |b, (n, v)| {
            b.field(*n, *v)
        })
        .build()
}

#[test]
fn test_missing_and_extra_members() {
    let actual = point(&[("x", 1), ("w", 4)]);
    let expected = point(&[("x", 1), ("z", 3)]);

    let diff = strict(&actual, &expected).unwrap();
    assert_eq!(
        leaf_kinds(&diff),
        vec![DifferenceKind::Missing, DifferenceKind::Extra]
    );

    let text = explain_strict(&actual, &expected).unwrap();
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(lines[1], "actual.z does not exist. Expected 3.");
    assert_eq!(lines[2], "actual.w should not exist (value 4).");
}

#[test]
fn test_ignore_unmatched_members() {
    let actual = point(&[("x", 1), ("w", 4)]);
    let expected = point(&[("x", 1)]);
    let policy = SelectionPolicy::default().ignoring_unmatched();
    assert!(with_policy(policy, &actual, &expected).is_none());
}

#[test]
fn test_member_differences_follow_expected_order() {
    let actual = point(&[("b", 1), ("a", 1)]);
    let expected = point(&[("a", 2), ("b", 2)]);
    let diff = strict(&actual, &expected).unwrap();
    assert_eq!(leaf_labels(&diff), vec!["actual.a", "actual.b"]);
}

#[test]
fn test_nested_object_labels() {
    let line = |x: i32| {
        ObjectBuilder::new(TypeDescriptor::named("Line"))
            .field("start", point(&[("x", 0)]))
            .field("end", point(&[("x", x)]))
            .build()
    };
    let text = explain_strict(&line(1), &line(2)).unwrap();
    assert!(text.ends_with("actual.end.x = 1 instead of 2."));
}
