//! Aggregate operator for grouping and aggregation.

use serde::{Deserialize, Serialize};

use crate::expr::Expr;

use super::LogicalOp;

/// Aggregate operator - grouping and aggregation.
///
/// `results` are named expressions: grouping attributes passed through, or
/// aliased aggregate calls. They define the operator's output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateOp {
    /// Input operator.
    pub input: Box<LogicalOp>,
    /// Grouping key expressions.
    pub group_by: Vec<Expr>,
    /// Result expressions.
    pub results: Vec<Expr>,
}

impl AggregateOp {
    /// Create a new aggregate operation.
    pub fn new(input: LogicalOp, group_by: Vec<Expr>, results: Vec<Expr>) -> Self {
        Self {
            input: Box::new(input),
            group_by,
            results,
        }
    }
}
