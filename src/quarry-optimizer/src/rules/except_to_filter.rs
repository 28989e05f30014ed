//! Replace `Except` between two filtered views of one input with a filter.

use common_error::QuarryResult;
use log::trace;
use quarry_logical::{attr, conjunction, Expr, LogicalOp, ProjectOp};

use super::rule::RewriteRule;
use super::util::{conjuncts_are_strict, contains_id, unwrap_filter_chain};

/// Rewrites `Except(left, right)` where both sides read the same input
/// through an optional `Project` over a run of `Filter`s:
///
/// ```text
/// Aggregate(left.output, left.output,
///   Filter(NOT(c1 IS NOT NULL AND ... AND cn IS NOT NULL AND right_filters), left))
/// ```
///
/// A row of `left` is in `right` exactly when the right filters hold for it,
/// so no join is needed. The not-null guard makes rows whose filter inputs
/// are null survive the negation. That is only equivalent when every right
/// filter conjunct is strict (null exactly when an input is null); other
/// shapes are left for `ReplaceExceptWithAntiJoin`.
pub struct ReplaceExceptWithFilter;

impl RewriteRule for ReplaceExceptWithFilter {
    fn name(&self) -> &'static str {
        "ReplaceExceptWithFilter"
    }

    fn description(&self) -> &'static str {
        "Replace Except over two filtered views of one input with a negated Filter"
    }

    fn rewrite(&self, op: &LogicalOp) -> QuarryResult<Option<LogicalOp>> {
        let LogicalOp::Except(except) = op else {
            return Ok(None);
        };

        let left_chain = unwrap_filter_chain(&except.left);
        let right_chain = unwrap_filter_chain(&except.right);
        if left_chain.base != right_chain.base {
            return Ok(None);
        }

        let left_output = except.left.output();
        if left_output != except.right.output() {
            return Ok(None);
        }
        if !projections_compatible(left_chain.projection, right_chain.projection) {
            return Ok(None);
        }

        let Some(right_filter) = conjunction(right_chain.predicates.into_iter().cloned()) else {
            return Ok(None);
        };
        if !conjuncts_are_strict(&right_filter) {
            trace!(
                "{}: right filter {right_filter} is not strict, leaving Except for the anti-join",
                self.name()
            );
            return Ok(None);
        }

        let referenced = right_filter.references();
        if !referenced.iter().all(|a| contains_id(&left_output, a.id)) {
            return Ok(None);
        }

        let passed = match conjunction(referenced.iter().map(|a| attr(a).is_not_null())) {
            Some(not_null) => not_null.and(right_filter),
            None => right_filter,
        };
        let filter = LogicalOp::filter(except.left.as_ref().clone(), passed.not());
        let columns: Vec<Expr> = left_output.iter().map(attr).collect();

        Ok(Some(LogicalOp::aggregate(filter, columns.clone(), columns)))
    }
}

/// Two top projections agree when they are identical, or when every one
/// present only passes attributes through (so equal outputs mean equal
/// columns).
fn projections_compatible(left: Option<&ProjectOp>, right: Option<&ProjectOp>) -> bool {
    let passthrough = |p: &ProjectOp| p.exprs.iter().all(|e| matches!(e, Expr::Attribute(_)));
    match (left, right) {
        (Some(l), Some(r)) if l.exprs == r.exprs => true,
        (l, r) => l.map_or(true, passthrough) && r.map_or(true, passthrough),
    }
}
