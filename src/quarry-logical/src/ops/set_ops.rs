//! Binary set operators.
//!
//! All three take their output attributes from the left input; the right
//! input must have the same arity and compatible types, position by position.

use serde::{Deserialize, Serialize};

use super::LogicalOp;

/// Set difference with set semantics: distinct left rows absent from right.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExceptOp {
    /// Left input.
    pub left: Box<LogicalOp>,
    /// Right input.
    pub right: Box<LogicalOp>,
}

impl ExceptOp {
    /// Create a new except operation.
    pub fn new(left: LogicalOp, right: LogicalOp) -> Self {
        Self {
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

/// Set intersection with set semantics: distinct left rows present in right.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntersectOp {
    /// Left input.
    pub left: Box<LogicalOp>,
    /// Right input.
    pub right: Box<LogicalOp>,
}

impl IntersectOp {
    /// Create a new intersect operation.
    pub fn new(left: LogicalOp, right: LogicalOp) -> Self {
        Self {
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

/// Union operator - multiset union (UNION ALL).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnionOp {
    /// Left input.
    pub left: Box<LogicalOp>,
    /// Right input.
    pub right: Box<LogicalOp>,
}

impl UnionOp {
    /// Create a new union operation.
    pub fn new(left: LogicalOp, right: LogicalOp) -> Self {
        Self {
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}
