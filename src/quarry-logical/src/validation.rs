//! Structural and semantic validation for logical plans.
//!
//! Checks that every node is well-formed with respect to its children:
//! references resolve, named outputs are named, set operations line up and
//! predicates are boolean.

use std::collections::HashSet;

use common_error::{ensure, QuarryError, QuarryResult};
use quarry_core::{Attribute, AttributeId, DataType};

use crate::expr::Expr;
use crate::ops::LogicalOp;
use crate::LogicalPlan;

/// Validate a whole plan, stopping at the first problem found.
pub fn validate_plan(plan: &LogicalPlan) -> QuarryResult<()> {
    validate_op(plan.root())
}

/// Validate an operator subtree, children first.
pub fn validate_op(op: &LogicalOp) -> QuarryResult<()> {
    for child in op.children() {
        validate_op(child)?;
    }

    match op {
        LogicalOp::Relation(rel) => {
            ensure_unique_ids(&rel.output, "Relation")?;
        }
        LogicalOp::Filter(filter) => {
            let input = filter.input.output();
            check_predicate(&filter.predicate, &input, "Filter")?;
        }
        LogicalOp::Project(project) => {
            let input = project.input.output();
            for expr in &project.exprs {
                check_named(expr, "Project")?;
                check_scalar(expr, "Project")?;
                check_resolved(expr, &input, "Project")?;
            }
        }
        LogicalOp::Join(join) => {
            let left = join.left.output();
            let right = join.right.output();
            let left_ids: HashSet<AttributeId> = left.iter().map(|a| a.id).collect();
            ensure!(
                right.iter().all(|a| !left_ids.contains(&a.id)),
                SchemaError: "Join inputs share attribute ids; references would be ambiguous"
            );
            if let Some(cond) = &join.condition {
                let both: Vec<Attribute> = left.into_iter().chain(right).collect();
                check_predicate(cond, &both, "Join")?;
            }
        }
        LogicalOp::Aggregate(agg) => {
            let input = agg.input.output();
            for expr in &agg.group_by {
                check_scalar(expr, "Aggregate grouping")?;
                check_resolved(expr, &input, "Aggregate")?;
            }
            let grouped: HashSet<AttributeId> = agg
                .group_by
                .iter()
                .flat_map(|e| e.references())
                .map(|a| a.id)
                .collect();
            for expr in &agg.results {
                check_named(expr, "Aggregate")?;
                check_resolved(expr, &input, "Aggregate")?;
                if !expr.contains_aggregate() {
                    if let Some(missing) = expr.references().iter().find(|a| !grouped.contains(&a.id)) {
                        return Err(QuarryError::schema_error(format!(
                            "Aggregate result {expr} uses {missing}, which is neither grouped nor aggregated"
                        )));
                    }
                }
            }
        }
        LogicalOp::Deduplicate(dedup) => {
            let input = dedup.input.output();
            for key in &dedup.keys {
                ensure!(
                    input.iter().any(|a| a.id == key.id),
                    SchemaError: "Deduplicate key {key} is not an output of its input"
                );
            }
        }
        LogicalOp::Except(op) => check_set_op(&op.left, &op.right, "Except")?,
        LogicalOp::Intersect(op) => check_set_op(&op.left, &op.right, "Intersect")?,
        LogicalOp::Union(op) => check_set_op(&op.left, &op.right, "Union")?,
        LogicalOp::Distinct(_) | LogicalOp::Limit(_) => {}
    }

    Ok(())
}

fn ensure_unique_ids(attrs: &[Attribute], context: &str) -> QuarryResult<()> {
    let mut seen = HashSet::new();
    for attr in attrs {
        ensure!(
            seen.insert(attr.id),
            SchemaError: "{context} outputs attribute id {} more than once", attr.id
        );
    }
    Ok(())
}

fn check_named(expr: &Expr, context: &str) -> QuarryResult<()> {
    ensure!(
        expr.to_attribute().is_some(),
        SchemaError: "{context} expression {expr} must be an attribute or an alias"
    );
    Ok(())
}

fn check_scalar(expr: &Expr, context: &str) -> QuarryResult<()> {
    ensure!(
        !expr.contains_aggregate(),
        SchemaError: "{context} expression {expr} cannot contain an aggregate"
    );
    Ok(())
}

fn check_resolved(expr: &Expr, available: &[Attribute], context: &str) -> QuarryResult<()> {
    for reference in expr.references() {
        if !available.iter().any(|a| a.id == reference.id) {
            let names: Vec<String> = available.iter().map(ToString::to_string).collect();
            return Err(QuarryError::schema_error(format!(
                "{context} references unresolved attribute {reference}. Available: [{}]",
                names.join(", ")
            )));
        }
    }
    Ok(())
}

fn check_predicate(predicate: &Expr, available: &[Attribute], context: &str) -> QuarryResult<()> {
    check_scalar(predicate, context)?;
    check_resolved(predicate, available, context)?;
    match predicate.data_type() {
        DataType::Bool | DataType::Null => Ok(()),
        other => Err(QuarryError::type_error(format!(
            "{context} predicate {predicate} has type {other}, expected Bool"
        ))),
    }
}

fn check_set_op(left: &LogicalOp, right: &LogicalOp, context: &str) -> QuarryResult<()> {
    let (left, right) = (left.output(), right.output());
    ensure!(
        left.len() == right.len(),
        SchemaError: "{context} inputs have different arity: {} vs {}", left.len(), right.len()
    );
    for (l, r) in left.iter().zip(&right) {
        ensure!(
            l.data_type.is_comparable_with(&r.data_type),
            TypeError: "{context} cannot combine {l} ({}) with {r} ({})", l.data_type, r.data_type
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::{attr, first_as_self, lit};
    use crate::ops::{JoinType, RelationOp};
    use crate::PlanBuilder;

    fn relation(name: &str, cols: &[(&str, DataType)]) -> RelationOp {
        RelationOp::new(
            name,
            cols.iter().map(|(n, t)| Attribute::new(*n, *t)).collect(),
        )
    }

    #[test]
    fn test_valid_plan() {
        let r = relation("r", &[("a", DataType::Int64), ("b", DataType::String)]);
        let (a, b) = (r.output[0].clone(), r.output[1].clone());
        let plan = PlanBuilder::relation(r)
            .filter(attr(&a).gt(lit(1i64)))
            .aggregate(vec![attr(&a)], vec![attr(&a), first_as_self(&b)])
            .build();
        assert!(validate_plan(&plan).is_ok());
    }

    #[test]
    fn test_unresolved_reference() {
        let r = relation("r", &[("a", DataType::Int64)]);
        let stray = Attribute::new("z", DataType::Int64);
        let plan = PlanBuilder::relation(r)
            .filter(attr(&stray).gt(lit(1i64)))
            .build();
        let err = validate_plan(&plan).unwrap_err();
        assert!(matches!(err, QuarryError::SchemaError(_)));
        assert!(err.to_string().contains("z#"));
    }

    #[test]
    fn test_non_boolean_predicate() {
        let r = relation("r", &[("a", DataType::Int64)]);
        let a = r.output[0].clone();
        let plan = PlanBuilder::relation(r).filter(attr(&a)).build();
        assert!(matches!(
            validate_plan(&plan).unwrap_err(),
            QuarryError::TypeError(_)
        ));
    }

    #[test]
    fn test_set_op_arity_mismatch() {
        let r = relation("r", &[("a", DataType::Int64), ("b", DataType::Int64)]);
        let s = relation("s", &[("c", DataType::Int64)]);
        let plan = PlanBuilder::relation(r)
            .except(PlanBuilder::relation(s).build())
            .build();
        let err = validate_plan(&plan).unwrap_err();
        assert!(err.to_string().contains("different arity"));
    }

    #[test]
    fn test_ungrouped_aggregate_result() {
        let r = relation("r", &[("a", DataType::Int64), ("b", DataType::Int64)]);
        let (a, b) = (r.output[0].clone(), r.output[1].clone());
        let plan = PlanBuilder::relation(r)
            .aggregate(vec![attr(&a)], vec![attr(&a), attr(&b)])
            .build();
        assert!(validate_plan(&plan).is_err());
    }

    #[test]
    fn test_self_join_is_ambiguous() {
        let r = relation("r", &[("a", DataType::Int64)]);
        let plan = PlanBuilder::relation(r.clone())
            .join(PlanBuilder::relation(r).build(), JoinType::LeftSemi, None)
            .build();
        assert!(validate_plan(&plan).is_err());
    }

    #[test]
    fn test_deduplicate_key_must_come_from_input() {
        let r = relation("r", &[("a", DataType::Int64)]);
        let stray = Attribute::new("k", DataType::Int64);
        let plan = PlanBuilder::relation(r).deduplicate(vec![stray]).build();
        assert!(validate_plan(&plan).is_err());
    }
}
