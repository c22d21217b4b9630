//! Primitive field values
//!
//! This module defines:
//! - Primitive: the scalar value a value-object field holds
//! - PrimitiveKind: the declared kind of a scalar field
//!
//! ## Type Rules
//!
//! - Four kinds only: integer, float, text, boolean
//! - `Int(1) != Float(1.0)`: different kinds are never equal
//! - Float uses IEEE-754 equality: `NaN != NaN`, `-0.0 == 0.0`
//! - Ordering across `Int` and `Float` is numeric, matching how storage
//!   engines compare extracted JSON numbers

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Largest integer magnitude an `f64` represents exactly (2^53)
pub const MAX_EXACT_FLOAT_INT: i64 = 1 << 53;

/// Declared kind of a scalar field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveKind {
    /// 64-bit signed integer
    Integer,
    /// 64-bit IEEE-754 float, always finite
    Float,
    /// UTF-8 text
    Text,
    /// Boolean
    Boolean,
}

impl PrimitiveKind {
    /// Lower-case kind name as used in error messages and config
    pub fn name(&self) -> &'static str {
        match self {
            PrimitiveKind::Integer => "integer",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Text => "text",
            PrimitiveKind::Boolean => "boolean",
        }
    }

    /// True for integer and float
    pub fn is_numeric(&self) -> bool {
        matches!(self, PrimitiveKind::Integer | PrimitiveKind::Float)
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Scalar value held by a value-object field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Primitive {
    /// 64-bit signed integer
    Int(i64),
    /// 64-bit floating point (IEEE-754)
    Float(f64),
    /// UTF-8 string
    Text(String),
    /// Boolean value
    Bool(bool),
}

// Custom PartialEq implementation for IEEE-754 float semantics
impl PartialEq for Primitive {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Primitive::Int(a), Primitive::Int(b)) => a == b,
            (Primitive::Float(a), Primitive::Float(b)) => a == b,
            (Primitive::Text(a), Primitive::Text(b)) => a == b,
            (Primitive::Bool(a), Primitive::Bool(b)) => a == b,
            _ => false,
        }
    }
}

impl Primitive {
    /// The kind of this value
    pub fn kind(&self) -> PrimitiveKind {
        match self {
            Primitive::Int(_) => PrimitiveKind::Integer,
            Primitive::Float(_) => PrimitiveKind::Float,
            Primitive::Text(_) => PrimitiveKind::Text,
            Primitive::Bool(_) => PrimitiveKind::Boolean,
        }
    }

    /// Get as i64 if this is an Int value
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Primitive::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Get as f64 if this is a Float value
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Primitive::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Get as &str if this is a Text value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Primitive::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get as bool if this is a Bool value
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Primitive::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Convert this value to `kind` without losing information
    ///
    /// The only conversion is integer to float, and only when the integer is
    /// exactly representable. Returns `None` for every other kind change and
    /// for non-finite floats.
    pub fn coerce_to(&self, kind: PrimitiveKind) -> Option<Primitive> {
        match (self, kind) {
            (Primitive::Float(f), PrimitiveKind::Float) if f.is_finite() => {
                Some(Primitive::Float(*f))
            }
            (Primitive::Int(i), PrimitiveKind::Float) if i.unsigned_abs() <= MAX_EXACT_FLOAT_INT as u64 => {
                Some(Primitive::Float(*i as f64))
            }
            (Primitive::Int(_), PrimitiveKind::Integer)
            | (Primitive::Text(_), PrimitiveKind::Text)
            | (Primitive::Bool(_), PrimitiveKind::Boolean) => Some(self.clone()),
            _ => None,
        }
    }

    /// Order two values
    ///
    /// Numbers compare numerically across `Int` and `Float`, text by UTF-8
    /// byte order, booleans `false < true`. Returns `None` for mismatched
    /// kinds and for comparisons involving NaN.
    pub fn compare(&self, other: &Primitive) -> Option<Ordering> {
        match (self, other) {
            (Primitive::Int(a), Primitive::Int(b)) => Some(a.cmp(b)),
            (Primitive::Float(a), Primitive::Float(b)) => a.partial_cmp(b),
            (Primitive::Int(a), Primitive::Float(b)) => (*a as f64).partial_cmp(b),
            (Primitive::Float(a), Primitive::Int(b)) => a.partial_cmp(&(*b as f64)),
            (Primitive::Text(a), Primitive::Text(b)) => Some(a.as_bytes().cmp(b.as_bytes())),
            (Primitive::Bool(a), Primitive::Bool(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Primitive::Int(i) => write!(f, "{}", i),
            Primitive::Float(x) => write!(f, "{:?}", x),
            Primitive::Text(s) => write!(f, "{:?}", s),
            Primitive::Bool(b) => write!(f, "{}", b),
        }
    }
}

// ============================================================================
// From implementations for ergonomic API usage
// ============================================================================

impl From<&str> for Primitive {
    fn from(s: &str) -> Self {
        Primitive::Text(s.to_string())
    }
}

impl From<String> for Primitive {
    fn from(s: String) -> Self {
        Primitive::Text(s)
    }
}

impl From<bool> for Primitive {
    fn from(b: bool) -> Self {
        Primitive::Bool(b)
    }
}

impl From<i64> for Primitive {
    fn from(i: i64) -> Self {
        Primitive::Int(i)
    }
}

impl From<i32> for Primitive {
    fn from(i: i32) -> Self {
        Primitive::Int(i as i64)
    }
}

impl From<u32> for Primitive {
    fn from(i: u32) -> Self {
        Primitive::Int(i as i64)
    }
}

impl From<f64> for Primitive {
    fn from(f: f64) -> Self {
        Primitive::Float(f)
    }
}
