//! Quarry - a rule-based rewrite stage for relational set operations
//!
//! Quarry rewrites `DISTINCT`, key-based deduplication, `EXCEPT` and
//! `INTERSECT` into aggregates, semi/anti joins and filters that a
//! downstream planner already knows how to execute. Rules run to a fixed
//! point inside an [`optimizer::Optimizer`].
//!
//! ```
//! use quarry::core::{Attribute, DataType};
//! use quarry::logical::{LogicalOp, PlanBuilder, RelationOp};
//!
//! let people = RelationOp::new(
//!     "people",
//!     vec![Attribute::new("name", DataType::String)],
//! );
//! let plan = PlanBuilder::relation(people).distinct().build();
//!
//! let optimized = quarry::optimize(plan).unwrap();
//! assert!(matches!(optimized.root(), LogicalOp::Aggregate(_)));
//! ```

#![forbid(unsafe_code)]
#![allow(clippy::module_name_repetitions)]

// Re-export core crates
pub use common_config as config;
pub use common_display as display;
pub use common_error as error;
pub use quarry_core as core;
pub use quarry_logical as logical;
pub use quarry_optimizer as optimizer;

pub use quarry_optimizer::optimize;

/// Quarry version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
