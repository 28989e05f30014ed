//! Logical plan structure.
//!
//! A `LogicalPlan` wraps the root of an operator tree and offers the
//! whole-plan queries (explain, counting, traversal) used by the optimizer.

use common_display::DisplayTree;
use quarry_core::Attribute;
use serde::{Deserialize, Serialize};

use crate::expr::Expr;
use crate::ops::{JoinType, LogicalOp, RelationOp};

/// A logical plan representing a query.
///
/// Plans are immutable values: rewrites consume a plan and produce a new one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogicalPlan {
    /// The root operator of the plan.
    pub root: LogicalOp,
}

impl LogicalPlan {
    /// Create a new logical plan with the given root operator.
    pub fn new(root: LogicalOp) -> Self {
        Self { root }
    }

    /// Get a reference to the root operator.
    pub fn root(&self) -> &LogicalOp {
        &self.root
    }

    /// Consume the plan and return its root operator.
    pub fn into_root(self) -> LogicalOp {
        self.root
    }

    /// Output attributes of the plan.
    pub fn output(&self) -> Vec<Attribute> {
        self.root.output()
    }

    /// Generate a tree-formatted explanation of the plan.
    pub fn explain(&self) -> String {
        let mut output = String::from("Logical Plan:\n");
        output.push_str(&DisplayTree::new(&self.root).to_string());
        output
    }

    /// Count the number of operators in the plan.
    pub fn operator_count(&self) -> usize {
        fn count(op: &LogicalOp) -> usize {
            1 + op.children().into_iter().map(count).sum::<usize>()
        }
        count(&self.root)
    }

    /// Get the maximum depth of the plan tree.
    pub fn depth(&self) -> usize {
        fn max_depth(op: &LogicalOp) -> usize {
            1 + op.children().into_iter().map(max_depth).max().unwrap_or(0)
        }
        max_depth(&self.root)
    }

    /// Check if the plan contains an operator matching `predicate`.
    pub fn contains_op<F>(&self, predicate: F) -> bool
    where
        F: Fn(&LogicalOp) -> bool,
    {
        fn check<F>(op: &LogicalOp, predicate: &F) -> bool
        where
            F: Fn(&LogicalOp) -> bool,
        {
            predicate(op) || op.children().into_iter().any(|c| check(c, predicate))
        }
        check(&self.root, &predicate)
    }

    /// Transform the plan by applying a fallible function to each operator
    /// (bottom-up).
    pub fn try_transform_up<F, E>(self, mut f: F) -> Result<Self, E>
    where
        F: FnMut(LogicalOp) -> Result<LogicalOp, E>,
    {
        Ok(Self {
            root: self.root.transform_up(&mut f)?,
        })
    }
}

impl std::fmt::Display for LogicalPlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", DisplayTree::new(&self.root))
    }
}

impl From<LogicalOp> for LogicalPlan {
    fn from(op: LogicalOp) -> Self {
        Self::new(op)
    }
}

/// Builder for constructing logical plans fluently.
#[derive(Debug, Clone)]
pub struct PlanBuilder {
    op: LogicalOp,
}

impl PlanBuilder {
    /// Start building from a relation.
    pub fn relation(relation: RelationOp) -> Self {
        Self {
            op: LogicalOp::relation(relation),
        }
    }

    /// Start building from an existing operator.
    pub fn from_op(op: LogicalOp) -> Self {
        Self { op }
    }

    /// Add a filter.
    pub fn filter(self, predicate: Expr) -> Self {
        Self {
            op: LogicalOp::filter(self.op, predicate),
        }
    }

    /// Add a projection.
    pub fn project(self, exprs: Vec<Expr>) -> Self {
        Self {
            op: LogicalOp::project(self.op, exprs),
        }
    }

    /// Join with another plan.
    pub fn join(self, right: LogicalPlan, join_type: JoinType, condition: Option<Expr>) -> Self {
        Self {
            op: LogicalOp::join(self.op, right.root, join_type, condition),
        }
    }

    /// Add an aggregation.
    pub fn aggregate(self, group_by: Vec<Expr>, results: Vec<Expr>) -> Self {
        Self {
            op: LogicalOp::aggregate(self.op, group_by, results),
        }
    }

    /// Remove duplicate rows.
    pub fn distinct(self) -> Self {
        Self {
            op: LogicalOp::distinct(self.op),
        }
    }

    /// Remove rows with duplicate `keys`.
    pub fn deduplicate(self, keys: Vec<Attribute>) -> Self {
        Self {
            op: LogicalOp::deduplicate(self.op, keys),
        }
    }

    /// Rows of this plan not present in `right`.
    pub fn except(self, right: LogicalPlan) -> Self {
        Self {
            op: LogicalOp::except(self.op, right.root),
        }
    }

    /// Rows present both in this plan and in `right`.
    pub fn intersect(self, right: LogicalPlan) -> Self {
        Self {
            op: LogicalOp::intersect(self.op, right.root),
        }
    }

    /// Union with another plan, keeping duplicates.
    pub fn union(self, right: LogicalPlan) -> Self {
        Self {
            op: LogicalOp::union(self.op, right.root),
        }
    }

    /// Add a limit.
    pub fn limit(self, limit: usize) -> Self {
        Self {
            op: LogicalOp::limit(self.op, limit),
        }
    }

    /// Build the logical plan.
    pub fn build(self) -> LogicalPlan {
        LogicalPlan::new(self.op)
    }
}
