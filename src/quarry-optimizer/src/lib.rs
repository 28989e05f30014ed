//! Rule-based rewrite stage for Quarry logical plans.
//!
//! Eliminates `Distinct`, `Deduplicate`, `Except` and `Intersect` in favor of
//! `Aggregate`, `Join` and `Filter`, running an ordered rule batch to a fixed
//! point. Every rewrite keeps the output schema and SQL null semantics.

mod rules;

pub use common_config::{OptimizerConfig, RuleName};
pub use rules::{
    rule_for, OptimizedPlan, Optimizer, ReplaceDeduplicateWithAggregate,
    ReplaceDistinctWithAggregate, ReplaceExceptWithAntiJoin, ReplaceExceptWithFilter,
    ReplaceIntersectWithSemiJoin, RewriteRule, RuleTrace, Transformed,
};

use common_error::QuarryResult;
use quarry_logical::LogicalPlan;

/// Optimize a logical plan using the default rule batch.
pub fn optimize(plan: LogicalPlan) -> QuarryResult<LogicalPlan> {
    let optimizer = Optimizer::default();
    Ok(optimizer.optimize(plan)?.plan)
}
