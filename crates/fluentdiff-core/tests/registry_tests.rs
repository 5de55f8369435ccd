#![allow(clippy::unwrap_used, clippy::expect_used)]

use fluentdiff_core::model::TypeKey;
use fluentdiff_core::registry::comparer;
use fluentdiff_core::{
    compare, Comparison, ComparerRegistry, Describe, DifferenceKind, EqualityMode, ObjectBuilder,
    Operator, SelectionPolicy, TypeDescriptor, Value,
};

fn money(amount: i32, currency: &str) -> Value {
    ObjectBuilder::new(TypeDescriptor::named("Money"))
        .field("amount", amount)
        .field("currency", currency)
        .build()
}

fn amount_of(value: &Value) -> Option<String> {
    value
        .as_object()?
        .members()
        .into_iter()
        .find(|m| m.name == "amount")
        .and_then(|m| m.value)
        .map(|v| fluentdiff_core::format::format_value(&v))
}

fn same_amount() -> fluentdiff_core::Comparer {
    comparer(|a, e| amount_of(a) == amount_of(e))
}

#[test]
fn test_registered_comparer_replaces_structural_walk() {
    let registry = ComparerRegistry::new();
    registry.register_comparer(TypeKey::named("Money"), Some(same_amount()));
    let comparison = Comparison::new().registry(&registry);

    assert!(comparison.run(&money(5, "EUR"), &money(5, "USD")).is_none());

    let diff = comparison.run(&money(5, "EUR"), &money(6, "EUR")).unwrap();
    assert!(diff.is_leaf());
    assert_eq!(diff.kind, DifferenceKind::ValueMismatch);
}

#[test]
fn test_registered_comparer_applies_to_nested_members() {
    let registry = ComparerRegistry::new();
    registry.register_comparer(TypeKey::named("Money"), Some(same_amount()));

    let wallet = |m: Value| {
        ObjectBuilder::new(TypeDescriptor::named("Wallet"))
            .field("balance", m)
            .build()
    };
    let diff = Comparison::new()
        .registry(&registry)
        .run(&wallet(money(1, "EUR")), &wallet(money(2, "EUR")))
        .unwrap();
    assert_eq!(diff.children.len(), 1);
    assert_eq!(diff.children[0].kind, DifferenceKind::AttributeMismatch);
    assert_eq!(diff.children[0].label, "actual.balance");
}

#[test]
fn test_lookup_follows_base_types_and_capabilities() {
    let registry = ComparerRegistry::new();
    registry.register_comparer(TypeKey::named("Shape"), Some(comparer(|_, _| true)));
    registry.register_comparer(TypeKey::named("Approximate"), Some(comparer(|_, _| true)));

    let square = TypeDescriptor::named("Square").with_base(TypeDescriptor::named("Shape"));
    assert!(registry.find_comparer(&square).is_some());

    let reading = TypeDescriptor::named("Reading").with_capability("Approximate");
    assert!(registry.find_comparer(&reading).is_some());

    assert!(registry
        .find_comparer(&TypeDescriptor::named("Unrelated"))
        .is_none());
}

#[test]
fn test_expected_side_type_is_consulted() {
    let registry = ComparerRegistry::new();
    registry.register_comparer(TypeKey::named("Money"), Some(comparer(|_, _| true)));

    let diff = Comparison::new()
        .registry(&registry)
        .run(&1.describe(), &money(2, "EUR"));
    assert!(diff.is_none());
}

#[test]
fn test_unregister_returns_previous() {
    let registry = ComparerRegistry::new();
    assert!(registry
        .register_comparer(TypeKey::named("Money"), Some(same_amount()))
        .is_none());
    assert!(registry
        .register_comparer(TypeKey::named("Money"), None)
        .is_some());
    assert!(registry.is_empty());

    let diff = Comparison::new()
        .registry(&registry)
        .run(&money(5, "EUR"), &money(5, "USD"))
        .unwrap();
    assert_eq!(diff.children[0].label, "actual.currency");
}

#[test]
fn test_per_call_comparer_decides_top_level_pair() {
    let policy = SelectionPolicy::default();
    let always = comparer(|_, _| true);
    let diff = compare(
        &money(1, "EUR"),
        &money(2, "USD"),
        EqualityMode::Strict,
        &policy,
        256,
        Some(&always),
    );
    assert!(diff.is_none());

    let never = comparer(|_, _| false);
    let diff = compare(
        &1.describe(),
        &1.describe(),
        EqualityMode::Strict,
        &policy,
        256,
        Some(&never),
    )
    .unwrap();
    assert_eq!(diff.label, "actual");
}

#[test]
fn test_operator_mode_uses_registered_operator() {
    let registry = ComparerRegistry::new();
    registry.register_operator(TypeKey::named("Money"), Operator::Eq, Some(same_amount()));

    let comparison = Comparison::new()
        .registry(&registry)
        .mode(EqualityMode::OperatorBased(Operator::Eq));
    assert!(comparison.run(&money(5, "EUR"), &money(5, "USD")).is_none());
    assert!(comparison.run(&money(5, "EUR"), &money(6, "EUR")).is_some());
}

#[test]
fn test_operator_mode_falls_back_to_own_equality() {
    let registry = ComparerRegistry::new();
    let comparison = Comparison::new()
        .registry(&registry)
        .mode(EqualityMode::OperatorBased(Operator::Eq));

    // Without an operator, composites compare by identity
    let m = money(5, "EUR");
    assert!(comparison.run(&m, &m.clone()).is_none());
    assert!(comparison.run(&m, &money(5, "EUR")).is_some());
    assert!(comparison.run(&"x".describe(), &"x".describe()).is_none());
}

#[test]
fn test_delegated_equality_skips_structure() {
    let registry = ComparerRegistry::new();
    let comparison = Comparison::new()
        .registry(&registry)
        .mode(EqualityMode::DelegatedEquals);

    assert!(comparison.run(&Value::opaque(3u8), &Value::opaque(3u8)).is_none());
    let diff = comparison
        .run(&vec![1].describe(), &vec![1].describe())
        .unwrap();
    assert!(diff.is_leaf());
}

#[test]
fn test_concurrent_registration_and_lookup_stay_consistent() {
    let registry = std::sync::Arc::new(ComparerRegistry::new());
    let workers: Vec<_> = (0..8)
        .map(|worker| {
            let registry = std::sync::Arc::clone(&registry);
            std::thread::spawn(move || {
                let name = format!("Worker{}", worker);
                let accepts = worker % 2 == 0;
                registry.register_comparer(
                    TypeKey::named(name.as_str()),
                    Some(comparer(move |_, _| accepts)),
                );
                registry.register_operator(
                    TypeKey::named(name.as_str()),
                    Operator::Eq,
                    Some(comparer(move |_, _| !accepts)),
                );

                let ty = TypeDescriptor::named(name.as_str());
                let value = ObjectBuilder::new(ty.clone()).field("n", worker).build();
                for _ in 0..200 {
                    let found = registry.find_comparer(&ty).expect("own comparer");
                    assert_eq!(found(&value, &value), accepts);
                    let op = registry.find_operator(&ty, Operator::Eq).expect("own operator");
                    assert_eq!(op(&value, &value), !accepts);

                    let diff = Comparison::new().registry(&registry).run(&value, &value.clone());
                    assert_eq!(diff.is_none(), accepts);
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().expect("worker panicked");
    }

    for worker in 0..8 {
        let ty = TypeDescriptor::named(format!("Worker{}", worker).as_str());
        assert!(registry.find_comparer(&ty).is_some());
        assert!(registry.find_operator(&ty, Operator::Eq).is_some());
    }
    assert!(!registry.is_empty());
}
