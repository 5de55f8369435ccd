#![allow(clippy::unwrap_used, clippy::expect_used)]

use fluentdiff_core::errors::{DiffError, ExError, ExErrorKind};
use fluentdiff_core::policy::SelectionPolicy;
use fluentdiff_core::{TypeDescriptor, Value};
use fluentdiff_core_types::ComparisonId;

#[test]
fn test_unsupported_mode_verifiable_by_kind() {
    let err = DiffError::UnsupportedMode {
        mode: "fuzzy".to_string(),
    };

    let ex_err: ExError = err.into();

    assert_eq!(ex_err.kind(), ExErrorKind::UnsupportedMode);
    assert_eq!(ex_err.code(), "ERR_UNSUPPORTED_MODE");
    assert!(ex_err.message().contains("fuzzy"));
}

#[test]
fn test_invalid_pattern_from_policy_builder() {
    let err = SelectionPolicy::default().exclude("[unclosed").unwrap_err();

    let ex_err: ExError = err.clone().into();

    assert_eq!(ex_err.kind(), ExErrorKind::InvalidPattern);
    assert_eq!(ex_err.code(), "ERR_INVALID_PATTERN");
    assert!(matches!(err, DiffError::InvalidPattern { pattern, .. } if pattern == "[unclosed"));
}

#[test]
fn test_invalid_shape_distinct_from_invalid_config() {
    let err = Value::grid(TypeDescriptor::named("g"), vec![3, 3], Vec::new()).unwrap_err();

    let ex_err: ExError = err.into();

    assert_eq!(ex_err.kind(), ExErrorKind::InvalidShape);
    assert_eq!(ex_err.code(), "ERR_INVALID_SHAPE");
    assert_ne!(ex_err.kind(), ExErrorKind::InvalidConfig);
}

#[test]
fn test_empty_shape_rejected() {
    let err = Value::grid(TypeDescriptor::named("g"), Vec::new(), Vec::new()).unwrap_err();
    assert!(matches!(err, DiffError::InvalidShape { .. }));
}

#[test]
fn test_serialization_error_conversion() {
    let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();

    let err: DiffError = json_err.into();
    let ex_err: ExError = err.into();

    assert_eq!(ex_err.kind(), ExErrorKind::Serialization);
    assert_eq!(ex_err.code(), "ERR_SERIALIZATION");
}

#[test]
fn test_display_carries_operation_and_comparison() {
    let id = ComparisonId::from_string("cmp-123".to_string());
    let err = ExError::new(ExErrorKind::InvalidConfig)
        .with_op("load_config")
        .with_comparison_id(id)
        .with_message("max_lines must be at least 1");

    assert_eq!(
        err.to_string(),
        "[ERR_INVALID_CONFIG] in operation 'load_config': max_lines must be at least 1 (comparison_id: cmp-123)"
    );
    assert_eq!(err.op(), Some("load_config"));
    assert_eq!(err.comparison_id().map(ComparisonId::as_str), Some("cmp-123"));
}

#[test]
fn test_source_chain() {
    let inner = ExError::new(ExErrorKind::InvalidPattern).with_message("bad regex");
    let outer = ExError::new(ExErrorKind::InvalidConfig)
        .with_op("load_config")
        .with_source(inner);

    let source = outer.source_error().unwrap();
    assert_eq!(source.kind(), ExErrorKind::InvalidPattern);
    assert_eq!(source.message(), "bad regex");
}

#[test]
fn test_domain_error_messages() {
    let err = DiffError::InvalidShape {
        shape: vec![2, 2],
        item_count: 3,
    };
    assert_eq!(err.to_string(), "Invalid grid shape [2, 2] for 3 items");

    let err = DiffError::UnsupportedMode {
        mode: "loose".to_string(),
    };
    assert_eq!(err.to_string(), "Unsupported equality mode: loose");
}
