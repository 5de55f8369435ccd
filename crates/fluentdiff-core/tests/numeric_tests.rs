#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{explain_strict, strict};
use fluentdiff_core::{Describe, DifferenceKind};

#[test]
fn test_integers_of_different_widths_compare_by_value() {
    assert!(strict(&10i32.describe(), &10i64.describe()).is_none());
    assert!(strict(&5u64.describe(), &5i64.describe()).is_none());
    assert!(strict(&200u8.describe(), &200i16.describe()).is_none());
    assert!(strict(&(-1i64).describe(), &255u8.describe()).is_some());
}

#[test]
fn test_large_integers_stay_exact() {
    assert!(strict(&u64::MAX.describe(), &(u64::MAX - 1).describe()).is_some());
    assert!(strict(&i64::MIN.describe(), &i64::MIN.describe()).is_none());
}

#[test]
fn test_integer_against_float() {
    assert!(strict(&10i32.describe(), &10.0f64.describe()).is_none());
    assert!(strict(&10i32.describe(), &10.5f64.describe()).is_some());
}

#[test]
fn test_close_floats_report_difference_magnitude() {
    let diff = strict(&1.0f64.describe(), &1.00001f64.describe()).unwrap();
    assert_eq!(diff.kind, DifferenceKind::ValueMismatch);
    let hint = diff.numeric_hint.unwrap();
    assert!(!hint.suggest_tolerance);

    let text = explain_strict(&1.0f64.describe(), &1.00001f64.describe()).unwrap();
    let header = text.lines().next().unwrap();
    assert_eq!(
        header,
        "The checked value is different from the expected one, with a difference of 1E-05."
    );
}

#[test]
fn test_nearly_equal_floats_suggest_tolerance() {
    let text = explain_strict(&1.0f64.describe(), &(1.0f64 + 1e-12).describe()).unwrap();
    assert!(text.contains(", with a difference of "));
    assert!(text.contains("You may consider using is_close_to() for comparison."));
}

#[test]
fn test_distant_floats_have_no_hint() {
    let diff = strict(&1.0f64.describe(), &2.0f64.describe()).unwrap();
    assert!(diff.numeric_hint.is_none());

    // Expected zero makes the relative difference 1
    let diff = strict(&1e-9f64.describe(), &0.0f64.describe()).unwrap();
    assert!(diff.numeric_hint.is_none());
}

#[test]
fn test_nan_matches_nan() {
    assert!(strict(&f64::NAN.describe(), &f64::NAN.describe()).is_none());
    assert!(strict(&f32::NAN.describe(), &f32::NAN.describe()).is_none());
    assert!(strict(&f64::NAN.describe(), &1.0f64.describe()).is_some());
}

#[test]
fn test_hint_only_in_header_for_root_value() {
    let text = explain_strict(&vec![1.0f64].describe(), &vec![1.00001f64].describe()).unwrap();
    assert_eq!(
        text.lines().next().unwrap(),
        "The checked value is different from the expected one."
    );
}

#[test]
fn test_numbers_inside_sequences_widen() {
    let actual = vec![1i32, 2, 3].describe();
    let expected = vec![1i64, 2, 3].describe();
    assert!(strict(&actual, &expected).is_none());
}
