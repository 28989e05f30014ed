//! Aggregate functions for logical expressions.

use quarry_core::DataType;
use serde::{Deserialize, Serialize};

use super::Expr;

/// Aggregate function types.
///
/// Aggregate functions operate on groups of rows and produce a single result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AggFunc {
    /// Count non-null values
    Count,
    /// Sum of values
    Sum,
    /// Minimum value
    Min,
    /// Maximum value
    Max,
    /// Average value
    Avg,
    /// Value from some row of the group; which row is up to the executor
    First,
    /// Value from some row of the group; which row is up to the executor
    Last,
}

impl AggFunc {
    /// Get the result type of this aggregate function given the input type.
    ///
    /// Returns `None` if the operation is not valid for the given type.
    pub fn result_type(&self, input: DataType) -> Option<DataType> {
        match self {
            Self::Count => Some(DataType::Int64),
            Self::Sum => match input {
                DataType::Int64 | DataType::Float64 => Some(input),
                _ => None,
            },
            Self::Avg => input.is_numeric().then_some(DataType::Float64),
            Self::Min | Self::Max => match input {
                DataType::Bool | DataType::Null => None,
                _ => Some(input),
            },
            Self::First | Self::Last => Some(input),
        }
    }

    /// Get the function name for display.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Count => "COUNT",
            Self::Sum => "SUM",
            Self::Min => "MIN",
            Self::Max => "MAX",
            Self::Avg => "AVG",
            Self::First => "FIRST",
            Self::Last => "LAST",
        }
    }

    /// Check if this aggregate depends on the order rows are visited in.
    pub const fn is_order_dependent(&self) -> bool {
        matches!(self, Self::First | Self::Last)
    }
}

impl std::fmt::Display for AggFunc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// An aggregate function applied to one argument expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggExpr {
    /// The aggregate function.
    pub func: AggFunc,
    /// The argument expression.
    pub arg: Box<Expr>,
}

impl AggExpr {
    /// Create a new aggregate expression.
    pub fn new(func: AggFunc, arg: Expr) -> Self {
        Self {
            func,
            arg: Box::new(arg),
        }
    }

    /// `FIRST(arg)`.
    pub fn first(arg: Expr) -> Self {
        Self::new(AggFunc::First, arg)
    }

    /// `COUNT(arg)`.
    pub fn count(arg: Expr) -> Self {
        Self::new(AggFunc::Count, arg)
    }

    /// Result type, falling back to the argument type for invalid inputs.
    pub fn data_type(&self) -> DataType {
        let input = self.arg.data_type();
        self.func.result_type(input).unwrap_or(input)
    }

    /// Whether the aggregate can produce null.
    pub fn nullable(&self) -> bool {
        match self.func {
            AggFunc::Count => false,
            AggFunc::First | AggFunc::Last | AggFunc::Min | AggFunc::Max => self.arg.nullable(),
            AggFunc::Sum | AggFunc::Avg => true,
        }
    }
}

impl std::fmt::Display for AggExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.func, self.arg)
    }
}
