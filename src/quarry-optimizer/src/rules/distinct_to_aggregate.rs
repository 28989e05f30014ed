//! Replace `Distinct` with a grouping `Aggregate`.

use common_error::QuarryResult;
use quarry_logical::{attr, Expr, LogicalOp};

use super::rule::RewriteRule;

/// Rewrites `Distinct(child)` as
/// `Aggregate(group_by = child.output, results = child.output, child)`.
///
/// Grouping treats nulls as equal to each other, which is exactly the
/// duplicate notion `Distinct` uses, so the rewrite needs no precondition.
pub struct ReplaceDistinctWithAggregate;

impl RewriteRule for ReplaceDistinctWithAggregate {
    fn name(&self) -> &'static str {
        "ReplaceDistinctWithAggregate"
    }

    fn description(&self) -> &'static str {
        "Replace Distinct with an Aggregate grouping on every output column"
    }

    fn rewrite(&self, op: &LogicalOp) -> QuarryResult<Option<LogicalOp>> {
        let LogicalOp::Distinct(distinct) = op else {
            return Ok(None);
        };

        let columns: Vec<Expr> = distinct.input.output().iter().map(attr).collect();
        Ok(Some(LogicalOp::aggregate(
            distinct.input.as_ref().clone(),
            columns.clone(),
            columns,
        )))
    }
}
