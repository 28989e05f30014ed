//! Project operator for column selection and computation.

use quarry_core::Attribute;
use serde::{Deserialize, Serialize};

use crate::expr::Expr;

use super::LogicalOp;

/// Project operator - column selection and computation.
///
/// Every expression must be named: a bare attribute passes the column
/// through with its identity, an alias introduces a new column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectOp {
    /// Input operator.
    pub input: Box<LogicalOp>,
    /// Named expressions to project.
    pub exprs: Vec<Expr>,
}

impl ProjectOp {
    /// Create a new projection.
    pub fn new(input: LogicalOp, exprs: Vec<Expr>) -> Self {
        Self {
            input: Box::new(input),
            exprs,
        }
    }

    /// Create a projection that passes the given attributes through.
    pub fn columns(input: LogicalOp, attrs: &[Attribute]) -> Self {
        Self::new(input, attrs.iter().map(Expr::from).collect())
    }
}
