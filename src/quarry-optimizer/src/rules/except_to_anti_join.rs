//! Replace `Except` with a left anti-join.

use common_error::QuarryResult;
use quarry_logical::{JoinType, LogicalOp};

use super::rule::RewriteRule;
use super::util::set_op_as_join;

/// Rewrites `Except(left, right)` as
/// `Aggregate(left.output, left.output, Join(left, right, LeftAnti, l1 <=> r1 AND ...))`.
///
/// The join condition uses null-safe equality so a null in `left` is removed
/// by a null in the same position of `right`, matching set difference. The
/// aggregate on top removes duplicates left by the anti-join.
pub struct ReplaceExceptWithAntiJoin;

impl RewriteRule for ReplaceExceptWithAntiJoin {
    fn name(&self) -> &'static str {
        "ReplaceExceptWithAntiJoin"
    }

    fn description(&self) -> &'static str {
        "Replace Except with a null-safe left anti-join plus deduplicating Aggregate"
    }

    fn rewrite(&self, op: &LogicalOp) -> QuarryResult<Option<LogicalOp>> {
        let LogicalOp::Except(except) = op else {
            return Ok(None);
        };
        Ok(set_op_as_join(
            self.name(),
            &except.left,
            &except.right,
            JoinType::LeftAnti,
        ))
    }
}
