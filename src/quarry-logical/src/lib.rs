//! Logical planning layer for Quarry.
//!
//! `quarry-logical` provides the relational operator tree the optimizer
//! rewrites, together with its expression algebra.
//!
//! # Overview
//!
//! - **Expressions**: attribute references, literals, comparisons (including
//!   null-safe equality `<=>`), boolean logic and aggregate calls
//! - **Logical Operators**: `Relation`, `Filter`, `Project`, `Join`,
//!   `Aggregate`, `Distinct`, `Deduplicate`, `Except`, `Intersect`, `Union`,
//!   `Limit`
//! - **Logical Plan**: an owned operator tree with explain and traversal
//! - **Validation**: reference resolution and well-formedness checks
//!
//! # Example
//!
//! ```rust
//! use quarry_core::{Attribute, DataType};
//! use quarry_logical::expr::{attr, lit};
//! use quarry_logical::{PlanBuilder, RelationOp};
//!
//! let age = Attribute::new("age", DataType::Int64);
//! let people = RelationOp::new("people", vec![age.clone()]);
//!
//! let plan = PlanBuilder::relation(people)
//!     .filter(attr(&age).gt_eq(lit(18i64)))
//!     .distinct()
//!     .build();
//!
//! println!("{}", plan.explain());
//! ```

pub mod expr;
pub mod ops;
mod plan;
pub mod validation;

pub use plan::{LogicalPlan, PlanBuilder};

pub use ops::{
    AggregateOp, DeduplicateOp, DistinctOp, ExceptOp, FilterOp, IntersectOp, JoinOp, JoinType,
    LimitOp, LogicalOp, ProjectOp, RelationOp, UnionOp,
};

pub use expr::{AggExpr, AggFunc, BinaryOp, Bindings, Expr, UnaryOp};

pub use expr::{attr, conjunction, first_as_self, lit, split_conjunction};
