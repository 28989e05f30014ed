//! Rewrite rules for set operations and deduplication.
//!
//! Each rule replaces one operator shape with an equivalent plan built from
//! `Aggregate`, `Join` and `Filter`. Every rewrite keeps the replaced node's
//! output attributes (order, names, ids, nullability) and keeps SQL null
//! semantics, so the rules can run in any order and to a fixed point.

mod deduplicate_to_aggregate;
mod distinct_to_aggregate;
mod except_to_anti_join;
mod except_to_filter;
mod intersect_to_semi_join;
mod optimizer;
mod rule;
mod util;

pub use deduplicate_to_aggregate::ReplaceDeduplicateWithAggregate;
pub use distinct_to_aggregate::ReplaceDistinctWithAggregate;
pub use except_to_anti_join::ReplaceExceptWithAntiJoin;
pub use except_to_filter::ReplaceExceptWithFilter;
pub use intersect_to_semi_join::ReplaceIntersectWithSemiJoin;
pub use optimizer::Optimizer;
pub use rule::{OptimizedPlan, RewriteRule, RuleTrace, Transformed};

use common_config::RuleName;

/// Instantiate the built-in rule with the given name.
pub fn rule_for(name: RuleName) -> Box<dyn RewriteRule> {
    match name {
        RuleName::ReplaceExceptWithFilter => Box::new(ReplaceExceptWithFilter),
        RuleName::ReplaceExceptWithAntiJoin => Box::new(ReplaceExceptWithAntiJoin),
        RuleName::ReplaceIntersectWithSemiJoin => Box::new(ReplaceIntersectWithSemiJoin),
        RuleName::ReplaceDistinctWithAggregate => Box::new(ReplaceDistinctWithAggregate),
        RuleName::ReplaceDeduplicateWithAggregate => Box::new(ReplaceDeduplicateWithAggregate),
    }
}
