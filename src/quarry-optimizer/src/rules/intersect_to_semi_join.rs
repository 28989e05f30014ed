//! Replace `Intersect` with a left semi-join.

use common_error::QuarryResult;
use quarry_logical::{JoinType, LogicalOp};

use super::rule::RewriteRule;
use super::util::set_op_as_join;

/// Rewrites `Intersect(left, right)` as
/// `Aggregate(left.output, left.output, Join(left, right, LeftSemi, l1 <=> r1 AND ...))`.
pub struct ReplaceIntersectWithSemiJoin;

impl RewriteRule for ReplaceIntersectWithSemiJoin {
    fn name(&self) -> &'static str {
        "ReplaceIntersectWithSemiJoin"
    }

    fn description(&self) -> &'static str {
        "Replace Intersect with a null-safe left semi-join plus deduplicating Aggregate"
    }

    fn rewrite(&self, op: &LogicalOp) -> QuarryResult<Option<LogicalOp>> {
        let LogicalOp::Intersect(intersect) = op else {
            return Ok(None);
        };
        Ok(set_op_as_join(
            self.name(),
            &intersect.left,
            &intersect.right,
            JoinType::LeftSemi,
        ))
    }
}
