//! Logical operators for query plans.

mod aggregate;
mod distinct;
mod filter;
mod join;
mod limit;
mod project;
mod relation;
mod set_ops;

pub use aggregate::AggregateOp;
pub use distinct::{DeduplicateOp, DistinctOp};
pub use filter::FilterOp;
pub use join::{JoinOp, JoinType};
pub use limit::LimitOp;
pub use project::ProjectOp;
pub use relation::RelationOp;
pub use set_ops::{ExceptOp, IntersectOp, UnionOp};

use std::fmt::Display;

use common_display::TreeNode;
use quarry_core::Attribute;
use serde::{Deserialize, Serialize};

use crate::expr::Expr;

/// Logical operator in a query plan.
///
/// Each node exclusively owns its children, so a plan is always a tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LogicalOp {
    /// Read a base relation.
    Relation(RelationOp),
    /// Filter rows based on a predicate.
    Filter(FilterOp),
    /// Project columns.
    Project(ProjectOp),
    /// Join two inputs.
    Join(JoinOp),
    /// Group and aggregate rows.
    Aggregate(AggregateOp),
    /// Remove duplicate rows.
    Distinct(DistinctOp),
    /// Remove rows with duplicate keys.
    Deduplicate(DeduplicateOp),
    /// Set difference.
    Except(ExceptOp),
    /// Set intersection.
    Intersect(IntersectOp),
    /// Multiset union.
    Union(UnionOp),
    /// Limit number of rows.
    Limit(LimitOp),
}

impl LogicalOp {
    // Constructors

    /// Create a relation leaf.
    pub fn relation(relation: RelationOp) -> Self {
        Self::Relation(relation)
    }

    /// Create a filter over `input`.
    pub fn filter(input: LogicalOp, predicate: Expr) -> Self {
        Self::Filter(FilterOp::new(input, predicate))
    }

    /// Create a projection over `input`.
    pub fn project(input: LogicalOp, exprs: Vec<Expr>) -> Self {
        Self::Project(ProjectOp::new(input, exprs))
    }

    /// Create a join.
    pub fn join(
        left: LogicalOp,
        right: LogicalOp,
        join_type: JoinType,
        condition: Option<Expr>,
    ) -> Self {
        Self::Join(JoinOp::new(left, right, join_type, condition))
    }

    /// Create an aggregate over `input`.
    pub fn aggregate(input: LogicalOp, group_by: Vec<Expr>, results: Vec<Expr>) -> Self {
        Self::Aggregate(AggregateOp::new(input, group_by, results))
    }

    /// Create a distinct over `input`.
    pub fn distinct(input: LogicalOp) -> Self {
        Self::Distinct(DistinctOp::new(input))
    }

    /// Create a deduplicate over `input`.
    pub fn deduplicate(input: LogicalOp, keys: Vec<Attribute>) -> Self {
        Self::Deduplicate(DeduplicateOp::new(input, keys))
    }

    /// Create a set difference.
    pub fn except(left: LogicalOp, right: LogicalOp) -> Self {
        Self::Except(ExceptOp::new(left, right))
    }

    /// Create a set intersection.
    pub fn intersect(left: LogicalOp, right: LogicalOp) -> Self {
        Self::Intersect(IntersectOp::new(left, right))
    }

    /// Create a multiset union.
    pub fn union(left: LogicalOp, right: LogicalOp) -> Self {
        Self::Union(UnionOp::new(left, right))
    }

    /// Create a limit over `input`.
    pub fn limit(input: LogicalOp, limit: usize) -> Self {
        Self::Limit(LimitOp::new(input, limit))
    }

    // Structure

    /// Get the child operators, left to right.
    pub fn children(&self) -> Vec<&LogicalOp> {
        match self {
            Self::Relation(_) => vec![],
            Self::Filter(op) => vec![op.input.as_ref()],
            Self::Project(op) => vec![op.input.as_ref()],
            Self::Aggregate(op) => vec![op.input.as_ref()],
            Self::Distinct(op) => vec![op.input.as_ref()],
            Self::Deduplicate(op) => vec![op.input.as_ref()],
            Self::Limit(op) => vec![op.input.as_ref()],
            Self::Join(op) => vec![op.left.as_ref(), op.right.as_ref()],
            Self::Except(op) => vec![op.left.as_ref(), op.right.as_ref()],
            Self::Intersect(op) => vec![op.left.as_ref(), op.right.as_ref()],
            Self::Union(op) => vec![op.left.as_ref(), op.right.as_ref()],
        }
    }

    /// Number of direct children.
    pub fn input_count(&self) -> usize {
        self.children().len()
    }

    /// Rebuild this node with each child replaced by `f(child)`.
    pub fn try_map_children<F, E>(self, mut f: F) -> Result<Self, E>
    where
        F: FnMut(LogicalOp) -> Result<LogicalOp, E>,
    {
        Ok(match self {
            Self::Relation(_) => self,
            Self::Filter(op) => Self::Filter(FilterOp {
                input: Box::new(f(*op.input)?),
                ..op
            }),
            Self::Project(op) => Self::Project(ProjectOp {
                input: Box::new(f(*op.input)?),
                ..op
            }),
            Self::Aggregate(op) => Self::Aggregate(AggregateOp {
                input: Box::new(f(*op.input)?),
                ..op
            }),
            Self::Distinct(op) => Self::Distinct(DistinctOp {
                input: Box::new(f(*op.input)?),
            }),
            Self::Deduplicate(op) => Self::Deduplicate(DeduplicateOp {
                input: Box::new(f(*op.input)?),
                ..op
            }),
            Self::Limit(op) => Self::Limit(LimitOp {
                input: Box::new(f(*op.input)?),
                ..op
            }),
            Self::Join(op) => {
                let left = f(*op.left)?;
                let right = f(*op.right)?;
                Self::Join(JoinOp {
                    left: Box::new(left),
                    right: Box::new(right),
                    ..op
                })
            }
            Self::Except(op) => {
                let left = f(*op.left)?;
                let right = f(*op.right)?;
                Self::except(left, right)
            }
            Self::Intersect(op) => {
                let left = f(*op.left)?;
                let right = f(*op.right)?;
                Self::intersect(left, right)
            }
            Self::Union(op) => {
                let left = f(*op.left)?;
                let right = f(*op.right)?;
                Self::union(left, right)
            }
        })
    }

    /// Rewrite the tree bottom-up: children first, then `f` on this node.
    pub fn transform_up<F, E>(self, f: &mut F) -> Result<Self, E>
    where
        F: FnMut(LogicalOp) -> Result<LogicalOp, E>,
    {
        let op = self.try_map_children(|child| child.transform_up(&mut *f))?;
        f(op)
    }

    /// The attributes this operator outputs, in order.
    pub fn output(&self) -> Vec<Attribute> {
        match self {
            Self::Relation(op) => op.output.clone(),
            Self::Filter(op) => op.input.output(),
            Self::Distinct(op) => op.input.output(),
            Self::Deduplicate(op) => op.input.output(),
            Self::Limit(op) => op.input.output(),
            Self::Project(op) => op.exprs.iter().filter_map(Expr::to_attribute).collect(),
            Self::Aggregate(op) => op.results.iter().filter_map(Expr::to_attribute).collect(),
            Self::Join(op) => join_output(op),
            Self::Except(op) => op.left.output(),
            Self::Intersect(op) => op.left.output(),
            Self::Union(op) => op
                .left
                .output()
                .into_iter()
                .zip(op.right.output())
                .map(|(l, r)| {
                    let nullable = l.nullable || r.nullable;
                    l.with_nullability(nullable)
                })
                .collect(),
        }
    }

    /// Whether any relation below (or at) this node is unbounded.
    pub fn is_streaming(&self) -> bool {
        match self {
            Self::Relation(op) => op.streaming,
            _ => self.children().iter().any(|c| c.is_streaming()),
        }
    }

    /// Get the name of this operator.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Relation(_) => "Relation",
            Self::Filter(_) => "Filter",
            Self::Project(_) => "Project",
            Self::Join(_) => "Join",
            Self::Aggregate(_) => "Aggregate",
            Self::Distinct(_) => "Distinct",
            Self::Deduplicate(_) => "Deduplicate",
            Self::Except(_) => "Except",
            Self::Intersect(_) => "Intersect",
            Self::Union(_) => "Union",
            Self::Limit(_) => "Limit",
        }
    }

    /// One-line description of this node's parameters, for explain output.
    pub fn details(&self) -> Option<String> {
        match self {
            Self::Relation(op) => {
                let stream = if op.streaming { " (streaming)" } else { "" };
                Some(format!("{} {}{stream}", op.name, fmt_list(&op.output)))
            }
            Self::Filter(op) => Some(op.predicate.to_string()),
            Self::Project(op) => Some(fmt_list(&op.exprs)),
            Self::Join(op) => Some(match &op.condition {
                Some(cond) => format!("{}, {cond}", op.join_type),
                None => op.join_type.to_string(),
            }),
            Self::Aggregate(op) => Some(format!(
                "{} {}",
                fmt_list(&op.group_by),
                fmt_list(&op.results)
            )),
            Self::Deduplicate(op) => Some(fmt_list(&op.keys)),
            Self::Limit(op) => Some(op.limit.to_string()),
            Self::Distinct(_) | Self::Except(_) | Self::Intersect(_) | Self::Union(_) => None,
        }
    }
}

fn join_output(op: &JoinOp) -> Vec<Attribute> {
    let left = op.left.output();
    if op.join_type.outputs_left_only() {
        return left;
    }

    let (left_nullable, right_nullable) = match op.join_type {
        JoinType::LeftOuter => (false, true),
        JoinType::RightOuter => (true, false),
        JoinType::FullOuter => (true, true),
        _ => (false, false),
    };
    let widen = |attrs: Vec<Attribute>, force: bool| {
        attrs.into_iter().map(move |a| {
            let nullable = a.nullable || force;
            a.with_nullability(nullable)
        })
    };

    widen(left, left_nullable)
        .chain(widen(op.right.output(), right_nullable))
        .collect()
}

fn fmt_list<T: Display>(items: &[T]) -> String {
    let parts: Vec<String> = items.iter().map(ToString::to_string).collect();
    format!("[{}]", parts.join(", "))
}

impl TreeNode for LogicalOp {
    fn name(&self) -> &str {
        LogicalOp::name(self)
    }

    fn children(&self) -> Vec<&dyn TreeNode> {
        LogicalOp::children(self)
            .into_iter()
            .map(|c| c as &dyn TreeNode)
            .collect()
    }

    fn details(&self) -> Option<String> {
        LogicalOp::details(self)
    }
}
