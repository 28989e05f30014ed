//! Filter operator for predicate-based filtering.

use serde::{Deserialize, Serialize};

use crate::expr::Expr;

use super::LogicalOp;

/// Filter operator - keeps rows for which the predicate is true.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterOp {
    /// Input operator.
    pub input: Box<LogicalOp>,
    /// Filter predicate (must evaluate to bool).
    pub predicate: Expr,
}

impl FilterOp {
    /// Create a new filter operation.
    pub fn new(input: LogicalOp, predicate: Expr) -> Self {
        Self {
            input: Box::new(input),
            predicate,
        }
    }
}
