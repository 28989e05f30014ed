//! Join operator.

use serde::{Deserialize, Serialize};

use crate::expr::Expr;

use super::LogicalOp;

/// Join type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JoinType {
    /// Matching pairs only.
    Inner,
    /// All left rows, right side null-extended.
    LeftOuter,
    /// All right rows, left side null-extended.
    RightOuter,
    /// All rows of both sides.
    FullOuter,
    /// Left rows with at least one match; right columns are not output.
    LeftSemi,
    /// Left rows with no match; right columns are not output.
    LeftAnti,
}

impl JoinType {
    /// Whether only the left side's columns are output.
    pub const fn outputs_left_only(&self) -> bool {
        matches!(self, Self::LeftSemi | Self::LeftAnti)
    }
}

impl std::fmt::Display for JoinType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Inner => "Inner",
            Self::LeftOuter => "LeftOuter",
            Self::RightOuter => "RightOuter",
            Self::FullOuter => "FullOuter",
            Self::LeftSemi => "LeftSemi",
            Self::LeftAnti => "LeftAnti",
        };
        f.write_str(name)
    }
}

/// Join operator - binary join with an optional condition.
///
/// A missing condition is always true.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinOp {
    /// Left input.
    pub left: Box<LogicalOp>,
    /// Right input.
    pub right: Box<LogicalOp>,
    /// Join type.
    pub join_type: JoinType,
    /// Join condition over both sides' attributes.
    pub condition: Option<Expr>,
}

impl JoinOp {
    /// Create a new join.
    pub fn new(
        left: LogicalOp,
        right: LogicalOp,
        join_type: JoinType,
        condition: Option<Expr>,
    ) -> Self {
        Self {
            left: Box::new(left),
            right: Box::new(right),
            join_type,
            condition,
        }
    }
}
