//! Helpers shared by the set-operation rewrites.

use log::trace;
use quarry_core::{Attribute, AttributeId, Value};
use quarry_logical::{
    attr, conjunction, split_conjunction, BinaryOp, Expr, JoinType, LogicalOp, ProjectOp,
    UnaryOp,
};

/// Left-folded conjunction of `l_i <=> r_i` over positional pairs.
///
/// `None` when there are no columns, which means every pair of rows matches.
pub(crate) fn null_safe_join_condition(left: &[Attribute], right: &[Attribute]) -> Option<Expr> {
    conjunction(
        left.iter()
            .zip(right)
            .map(|(l, r)| attr(l).null_safe_eq(attr(r))),
    )
}

/// Rewrite a set operation over `left` and `right` as
/// `Aggregate(left.output, left.output, Join(left, right, join_type, <=>...))`.
///
/// When the sides share attribute ids (both read the same relation), the
/// right side is first re-exposed under fresh ids so the join's inputs stay
/// disjoint. Returns `None` when the sides have different arity.
pub(crate) fn set_op_as_join(
    rule: &str,
    left: &LogicalOp,
    right: &LogicalOp,
    join_type: JoinType,
) -> Option<LogicalOp> {
    let left_output = left.output();
    let right_output = right.output();

    if left_output.len() != right_output.len() {
        trace!(
            "{rule}: skipping set operation with mismatched arity ({} vs {})",
            left_output.len(),
            right_output.len()
        );
        return None;
    }

    let (right, right_output) = if shares_attribute_ids(&left_output, &right_output) {
        trace!("{rule}: inputs share attribute ids, renaming the right side");
        let renamed = with_fresh_ids(right, &right_output);
        let output = renamed.output();
        (renamed, output)
    } else {
        (right.clone(), right_output)
    };

    let condition = null_safe_join_condition(&left_output, &right_output);
    let join = LogicalOp::join(left.clone(), right, join_type, condition);
    let columns: Vec<Expr> = left_output.iter().map(attr).collect();
    Some(LogicalOp::aggregate(join, columns.clone(), columns))
}

/// `Project(op)` exposing every column of `output` under a new id, keeping
/// names, types and nullability.
pub(crate) fn with_fresh_ids(op: &LogicalOp, output: &[Attribute]) -> LogicalOp {
    let exprs = output
        .iter()
        .map(|a| attr(a).alias_with_id(a.name.clone(), AttributeId::next()))
        .collect();
    LogicalOp::project(op.clone(), exprs)
}

/// Whether any attribute id appears on both sides.
pub(crate) fn shares_attribute_ids(left: &[Attribute], right: &[Attribute]) -> bool {
    left.iter().any(|l| right.iter().any(|r| r.id == l.id))
}

/// Whether `attrs` contains an attribute with the given id.
pub(crate) fn contains_id(attrs: &[Attribute], id: AttributeId) -> bool {
    attrs.iter().any(|a| a.id == id)
}

/// A side of a set operation split into an optional top projection, a run
/// of filters and the operator they all sit on.
#[derive(Debug)]
pub(crate) struct FilterChain<'a> {
    /// The first operator below the projection that is not a filter.
    pub base: &'a LogicalOp,
    /// Filter predicates, innermost (closest to `base`) first.
    pub predicates: Vec<&'a Expr>,
    /// The top projection, if the chain starts with one.
    pub projection: Option<&'a ProjectOp>,
}

/// Walk `op` down through an optional `Project` and any `Filter`s.
pub(crate) fn unwrap_filter_chain(op: &LogicalOp) -> FilterChain<'_> {
    fn collect_filters<'a>(op: &'a LogicalOp, predicates: &mut Vec<&'a Expr>) -> &'a LogicalOp {
        match op {
            LogicalOp::Filter(filter) => {
                let base = collect_filters(&filter.input, predicates);
                predicates.push(&filter.predicate);
                base
            }
            other => other,
        }
    }

    let (projection, below) = match op {
        LogicalOp::Project(project) => (Some(project), project.input.as_ref()),
        other => (None, other),
    };
    let mut predicates = Vec::new();
    let base = collect_filters(below, &mut predicates);

    FilterChain {
        base,
        predicates,
        projection,
    }
}

/// Whether an expression is null exactly when one of the attributes it reads
/// is null.
///
/// Such a predicate is never `TRUE` for a row with a null input and always
/// evaluates to a boolean otherwise, which is what makes a not-null guard
/// plus plain negation equivalent to "did not pass".
pub(crate) fn is_strict(expr: &Expr) -> bool {
    match expr {
        Expr::Attribute(_) => true,
        Expr::Literal(value) => !matches!(value, Value::Null),
        Expr::Binary { left, op, right } => match op {
            BinaryOp::And
            | BinaryOp::Or
            | BinaryOp::Divide
            | BinaryOp::IsDistinctFrom
            | BinaryOp::IsNotDistinctFrom => false,
            _ => is_strict(left) && is_strict(right),
        },
        Expr::Unary { op, expr } => match op {
            UnaryOp::Not | UnaryOp::Neg => is_strict(expr),
            UnaryOp::IsNull | UnaryOp::IsNotNull => false,
        },
        Expr::Alias { expr, .. } => is_strict(expr),
        Expr::Aggregate(_) => false,
    }
}

/// Whether every top-level conjunct of `predicate` is strict.
pub(crate) fn conjuncts_are_strict(predicate: &Expr) -> bool {
    split_conjunction(predicate).into_iter().all(is_strict)
}
