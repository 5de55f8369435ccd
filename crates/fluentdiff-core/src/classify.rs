//! Type classification and numeric promotion

use crate::model::{NumericKind, Value};

/// Comparison category of a value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueClass {
    Scalar,
    Numeric,
    SelfEquatable,
    Associative,
    Sequence,
    FixedMultiAxis,
    Composite,
}

impl ValueClass {
    /// Classes compared as a single leaf, never descended into
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            ValueClass::Scalar | ValueClass::Numeric | ValueClass::SelfEquatable
        )
    }
}

pub fn classify(value: &Value) -> ValueClass {
    match value {
        Value::Null | Value::Scalar(_) => ValueClass::Scalar,
        Value::Number(_) => ValueClass::Numeric,
        Value::Opaque(_) => ValueClass::SelfEquatable,
        Value::Map(_) => ValueClass::Associative,
        Value::Seq(_) => ValueClass::Sequence,
        Value::Grid(_) => ValueClass::FixedMultiAxis,
        Value::Object(_) => ValueClass::Composite,
    }
}

/// Smallest kind both operands widen to.
///
/// Mixing signed and unsigned moves the unsigned side one step up the
/// extended order so the result is a signed kind wide enough for both.
pub fn common_numeric_type(a: &Value, b: &Value) -> Option<NumericKind> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => Some(common_kind(x.kind(), y.kind())),
        _ => None,
    }
}

pub fn common_kind(a: NumericKind, b: NumericKind) -> NumericKind {
    let mut rank_a = a.extended_rank();
    let mut rank_b = b.extended_rank();
    match (a.is_signed(), b.is_signed()) {
        (true, false) => rank_b += 1,
        (false, true) => rank_a += 1,
        _ => {}
    }
    let rank = rank_a.max(rank_b).min(NumericKind::EXTENDED_ORDER.len() - 1);
    NumericKind::EXTENDED_ORDER[rank]
}
