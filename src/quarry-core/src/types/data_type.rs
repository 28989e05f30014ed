//! Data type definitions for attributes.

use serde::{Deserialize, Serialize};

/// Static type of an attribute or expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    /// Null type (unknown or absent).
    Null,
    /// Boolean type.
    Bool,
    /// 64-bit signed integer.
    Int64,
    /// 64-bit floating point.
    Float64,
    /// UTF-8 string.
    String,
    /// Date (days since epoch).
    Date,
    /// Timestamp with nanosecond precision.
    Timestamp,
}

impl DataType {
    /// Check if this type is numeric.
    pub const fn is_numeric(&self) -> bool {
        matches!(self, Self::Int64 | Self::Float64)
    }

    /// Check if this type is a temporal type.
    pub const fn is_temporal(&self) -> bool {
        matches!(self, Self::Timestamp | Self::Date)
    }

    /// Get the display name for this type.
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Null => "Null",
            Self::Bool => "Bool",
            Self::Int64 => "Int64",
            Self::Float64 => "Float64",
            Self::String => "String",
            Self::Date => "Date",
            Self::Timestamp => "Timestamp",
        }
    }

    /// Check if values of this type can be compared with values of `other`.
    pub fn is_comparable_with(&self, other: &Self) -> bool {
        self == other
            || matches!(self, Self::Null)
            || matches!(other, Self::Null)
            || (self.is_numeric() && other.is_numeric())
    }

    /// Get the common supertype of two types (for type inference).
    pub fn common_supertype(&self, other: &Self) -> Option<Self> {
        if self == other {
            return Some(*self);
        }

        match (self, other) {
            (Self::Null, t) | (t, Self::Null) => Some(*t),
            (Self::Int64, Self::Float64) | (Self::Float64, Self::Int64) => Some(Self::Float64),
            _ => None,
        }
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}
