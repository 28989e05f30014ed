//! Replace key-based `Deduplicate` with an `Aggregate`.

use common_error::QuarryResult;
use log::trace;
use quarry_core::Attribute;
use quarry_logical::{attr, first_as_self, lit, Expr, LogicalOp};

use super::rule::RewriteRule;

/// Rewrites `Deduplicate(keys, child)` as an `Aggregate` grouping on the keys
/// and keeping `FIRST(col) AS col` for every other column.
///
/// Keys come first in the aggregate's results; if that moves any column, a
/// `Project` restores `child.output` order on top. With no keys the whole
/// input is one group, keyed on the literal `1`.
///
/// Streaming inputs are left alone: keeping one row per key there needs
/// state across micro-batches that a plain aggregate does not carry.
pub struct ReplaceDeduplicateWithAggregate;

impl RewriteRule for ReplaceDeduplicateWithAggregate {
    fn name(&self) -> &'static str {
        "ReplaceDeduplicateWithAggregate"
    }

    fn description(&self) -> &'static str {
        "Replace Deduplicate with an Aggregate over the key columns"
    }

    fn rewrite(&self, op: &LogicalOp) -> QuarryResult<Option<LogicalOp>> {
        let LogicalOp::Deduplicate(dedup) = op else {
            return Ok(None);
        };

        let child = dedup.input.as_ref();
        if child.is_streaming() {
            trace!("{}: skipping Deduplicate over a streaming input", self.name());
            return Ok(None);
        }

        let output = child.output();
        let is_key = |a: &Attribute| dedup.keys.iter().any(|k| k.id == a.id);
        let (keys, rest): (Vec<&Attribute>, Vec<&Attribute>) =
            output.iter().partition(|a| is_key(*a));

        let group_by = if keys.is_empty() {
            vec![lit(1i64)]
        } else {
            keys.iter().map(|a| attr(a)).collect()
        };
        let results: Vec<Expr> = keys
            .iter()
            .map(|a| attr(a))
            .chain(rest.iter().map(|a| first_as_self(a)))
            .collect();

        let aggregate = LogicalOp::aggregate(child.clone(), group_by, results);

        let reordered = keys
            .iter()
            .chain(&rest)
            .map(|a| a.id)
            .ne(output.iter().map(|a| a.id));
        if reordered {
            Ok(Some(LogicalOp::project(
                aggregate,
                output.iter().map(attr).collect(),
            )))
        } else {
            Ok(Some(aggregate))
        }
    }
}
