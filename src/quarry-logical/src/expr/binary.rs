//! Binary operators for logical expressions.

use quarry_core::DataType;
use serde::{Deserialize, Serialize};

/// Binary operators for logical expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    // Arithmetic operators
    /// Addition (+)
    Add,
    /// Subtraction (-)
    Subtract,
    /// Multiplication (*)
    Multiply,
    /// Division (/)
    Divide,

    // Comparison operators
    /// Equality (=)
    Eq,
    /// Inequality (<>)
    NotEq,
    /// Less than (<)
    Lt,
    /// Less than or equal (<=)
    LtEq,
    /// Greater than (>)
    Gt,
    /// Greater than or equal (>=)
    GtEq,

    // Logical operators (three-valued logic)
    /// Logical AND
    And,
    /// Logical OR
    Or,

    // Null-safe comparisons
    /// IS DISTINCT FROM (null-safe inequality)
    IsDistinctFrom,
    /// IS NOT DISTINCT FROM (null-safe equality, `<=>`)
    IsNotDistinctFrom,
}

impl BinaryOp {
    /// Check if this is an arithmetic operator.
    pub const fn is_arithmetic(&self) -> bool {
        matches!(
            self,
            Self::Add | Self::Subtract | Self::Multiply | Self::Divide
        )
    }

    /// Check if this is a comparison operator.
    pub const fn is_comparison(&self) -> bool {
        matches!(
            self,
            Self::Eq
                | Self::NotEq
                | Self::Lt
                | Self::LtEq
                | Self::Gt
                | Self::GtEq
                | Self::IsDistinctFrom
                | Self::IsNotDistinctFrom
        )
    }

    /// Check if this is a logical operator.
    pub const fn is_logical(&self) -> bool {
        matches!(self, Self::And | Self::Or)
    }

    /// Check if this operator never yields null.
    pub const fn is_null_safe(&self) -> bool {
        matches!(self, Self::IsDistinctFrom | Self::IsNotDistinctFrom)
    }

    /// Get the result type given the operand types.
    pub fn result_type(&self, left: DataType, right: DataType) -> Option<DataType> {
        if self.is_comparison() {
            return left.is_comparable_with(&right).then_some(DataType::Bool);
        }
        if self.is_logical() {
            let ok = |t: DataType| matches!(t, DataType::Bool | DataType::Null);
            return (ok(left) && ok(right)).then_some(DataType::Bool);
        }
        let common = left.common_supertype(&right)?;
        match (self, common) {
            (Self::Divide, DataType::Int64 | DataType::Float64) => Some(DataType::Float64),
            (_, DataType::Int64 | DataType::Float64 | DataType::Null) => Some(common),
            _ => None,
        }
    }

    /// The SQL symbol for this operator.
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Eq => "=",
            Self::NotEq => "<>",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::And => "AND",
            Self::Or => "OR",
            Self::IsDistinctFrom => "IS DISTINCT FROM",
            Self::IsNotDistinctFrom => "<=>",
        }
    }
}

impl std::fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}
