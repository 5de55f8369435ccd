//! Numeric values and their kinds

use serde::{Deserialize, Serialize};
use std::fmt;

/// Primitive numeric kinds known to the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumericKind {
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    F32,
    F64,
}

impl NumericKind {
    /// Promotion order over signed kinds only
    pub const SIGNED_ORDER: [NumericKind; 6] = [
        NumericKind::I8,
        NumericKind::I16,
        NumericKind::I32,
        NumericKind::I64,
        NumericKind::F32,
        NumericKind::F64,
    ];

    /// Promotion order over every kind, unsigned ones interleaved
    pub const EXTENDED_ORDER: [NumericKind; 10] = [
        NumericKind::U8,
        NumericKind::I8,
        NumericKind::I16,
        NumericKind::U16,
        NumericKind::I32,
        NumericKind::U32,
        NumericKind::I64,
        NumericKind::U64,
        NumericKind::F32,
        NumericKind::F64,
    ];

    pub fn is_float(self) -> bool {
        matches!(self, NumericKind::F32 | NumericKind::F64)
    }

    pub fn is_signed(self) -> bool {
        Self::SIGNED_ORDER.contains(&self)
    }

    /// Position in [`Self::EXTENDED_ORDER`]
    pub fn extended_rank(self) -> usize {
        Self::EXTENDED_ORDER
            .iter()
            .position(|k| *k == self)
            .unwrap_or(Self::EXTENDED_ORDER.len() - 1)
    }

    pub fn name(self) -> &'static str {
        match self {
            NumericKind::I8 => "i8",
            NumericKind::U8 => "u8",
            NumericKind::I16 => "i16",
            NumericKind::U16 => "u16",
            NumericKind::I32 => "i32",
            NumericKind::U32 => "u32",
            NumericKind::I64 => "i64",
            NumericKind::U64 => "u64",
            NumericKind::F32 => "f32",
            NumericKind::F64 => "f64",
        }
    }
}

/// A primitive number tagged with its kind
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    I8(i8),
    U8(u8),
    I16(i16),
    U16(u16),
    I32(i32),
    U32(u32),
    I64(i64),
    U64(u64),
    F32(f32),
    F64(f64),
}

impl Number {
    pub fn kind(&self) -> NumericKind {
        match self {
            Number::I8(_) => NumericKind::I8,
            Number::U8(_) => NumericKind::U8,
            Number::I16(_) => NumericKind::I16,
            Number::U16(_) => NumericKind::U16,
            Number::I32(_) => NumericKind::I32,
            Number::U32(_) => NumericKind::U32,
            Number::I64(_) => NumericKind::I64,
            Number::U64(_) => NumericKind::U64,
            Number::F32(_) => NumericKind::F32,
            Number::F64(_) => NumericKind::F64,
        }
    }

    /// Exact integer value; `None` for floating kinds
    pub fn as_i128(&self) -> Option<i128> {
        Some(match *self {
            Number::I8(v) => v.into(),
            Number::U8(v) => v.into(),
            Number::I16(v) => v.into(),
            Number::U16(v) => v.into(),
            Number::I32(v) => v.into(),
            Number::U32(v) => v.into(),
            Number::I64(v) => v.into(),
            Number::U64(v) => v.into(),
            Number::F32(_) | Number::F64(_) => return None,
        })
    }

    pub fn as_f64(&self) -> f64 {
        match *self {
            Number::I8(v) => v.into(),
            Number::U8(v) => v.into(),
            Number::I16(v) => v.into(),
            Number::U16(v) => v.into(),
            Number::I32(v) => v.into(),
            Number::U32(v) => v.into(),
            Number::I64(v) => v as f64,
            Number::U64(v) => v as f64,
            Number::F32(v) => v.into(),
            Number::F64(v) => v,
        }
    }

    pub fn as_f32(&self) -> f32 {
        match *self {
            Number::F32(v) => v,
            other => other.as_f64() as f32,
        }
    }

    /// Same kind and same value; NaN equals NaN.
    pub fn same_as(&self, other: &Number) -> bool {
        match (*self, *other) {
            (Number::F32(a), Number::F32(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Number::F64(a), Number::F64(b)) => a == b || (a.is_nan() && b.is_nan()),
            (a, b) if a.kind() == b.kind() => a.as_i128() == b.as_i128(),
            _ => false,
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::I8(v) => write!(f, "{}", v),
            Number::U8(v) => write!(f, "{}", v),
            Number::I16(v) => write!(f, "{}", v),
            Number::U16(v) => write!(f, "{}", v),
            Number::I32(v) => write!(f, "{}", v),
            Number::U32(v) => write!(f, "{}", v),
            Number::I64(v) => write!(f, "{}", v),
            Number::U64(v) => write!(f, "{}", v),
            Number::F32(v) => write!(f, "{}", v),
            Number::F64(v) => write!(f, "{}", v),
        }
    }
}

macro_rules! number_from {
    ($($t:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$t> for Number {
                fn from(v: $t) -> Self {
                    Number::$variant(v)
                }
            }
        )*
    };
}

number_from!(
    i8 => I8, u8 => U8, i16 => I16, u16 => U16, i32 => I32,
    u32 => U32, i64 => I64, u64 => U64, f32 => F32, f64 => F64,
);
