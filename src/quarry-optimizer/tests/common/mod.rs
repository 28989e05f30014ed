//! Reference interpreter used to check that rewrites keep query results.
//!
//! Deliberately naive: nested-loop joins, hash-based grouping in first-seen
//! order, and `FIRST` taking the first row of each group.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};

use common_error::{QuarryError, QuarryResult};
use quarry_core::{Attribute, Value};
use quarry_logical::{AggFunc, Bindings, Expr, JoinType, LogicalOp};

pub type Row = Vec<Value>;

/// In-memory tables keyed by relation name.
#[derive(Debug, Default, Clone)]
pub struct Database {
    tables: HashMap<String, Vec<Row>>,
}

impl Database {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(mut self, name: &str, rows: Vec<Row>) -> Self {
        self.tables.insert(name.to_string(), rows);
        self
    }
}

/// Count rows, ignoring order.
pub fn bag(rows: Vec<Row>) -> HashMap<Row, usize> {
    let mut counts = HashMap::new();
    for row in rows {
        *counts.entry(row).or_insert(0) += 1;
    }
    counts
}

fn bind(attrs: &[Attribute], row: &[Value]) -> Bindings {
    attrs
        .iter()
        .zip(row)
        .map(|(a, v)| (a.id, v.clone()))
        .collect()
}

fn distinct_rows(rows: Vec<Row>) -> Vec<Row> {
    let mut seen = HashSet::new();
    rows.into_iter().filter(|r| seen.insert(r.clone())).collect()
}

/// Execute `op` against `db`, returning rows aligned with `op.output()`.
pub fn execute(op: &LogicalOp, db: &Database) -> QuarryResult<Vec<Row>> {
    match op {
        LogicalOp::Relation(rel) => db
            .tables
            .get(&rel.name)
            .cloned()
            .ok_or_else(|| QuarryError::schema_error(format!("no table named {}", rel.name))),
        LogicalOp::Filter(filter) => {
            let attrs = filter.input.output();
            let mut out = Vec::new();
            for row in execute(&filter.input, db)? {
                if filter.predicate.evaluate_predicate(&bind(&attrs, &row))? {
                    out.push(row);
                }
            }
            Ok(out)
        }
        LogicalOp::Project(project) => {
            let attrs = project.input.output();
            execute(&project.input, db)?
                .iter()
                .map(|row| {
                    let bindings = bind(&attrs, row);
                    project
                        .exprs
                        .iter()
                        .map(|e| e.evaluate(&bindings))
                        .collect::<QuarryResult<Row>>()
                })
                .collect()
        }
        LogicalOp::Join(join) => execute_join(
            join.join_type,
            join.condition.as_ref(),
            &join.left,
            &join.right,
            db,
        ),
        LogicalOp::Aggregate(agg) => {
            let attrs = agg.input.output();
            let rows: Vec<Bindings> = execute(&agg.input, db)?
                .iter()
                .map(|row| bind(&attrs, row))
                .collect();

            let mut order: Vec<Row> = Vec::new();
            let mut groups: HashMap<Row, Vec<Bindings>> = HashMap::new();
            for row in rows {
                let key = agg
                    .group_by
                    .iter()
                    .map(|e| e.evaluate(&row))
                    .collect::<QuarryResult<Row>>()?;
                if !groups.contains_key(&key) {
                    order.push(key.clone());
                }
                groups.entry(key).or_default().push(row);
            }
            if agg.group_by.is_empty() && order.is_empty() {
                order.push(Vec::new());
                groups.insert(Vec::new(), Vec::new());
            }

            order
                .iter()
                .map(|key| {
                    let group = &groups[key];
                    agg.results
                        .iter()
                        .map(|e| eval_in_group(e, group))
                        .collect::<QuarryResult<Row>>()
                })
                .collect()
        }
        LogicalOp::Distinct(distinct) => Ok(distinct_rows(execute(&distinct.input, db)?)),
        LogicalOp::Deduplicate(dedup) => {
            let attrs = dedup.input.output();
            let positions: Vec<usize> = attrs
                .iter()
                .enumerate()
                .filter(|(_, a)| dedup.keys.iter().any(|k| k.id == a.id))
                .map(|(i, _)| i)
                .collect();
            let mut seen = HashSet::new();
            Ok(execute(&dedup.input, db)?
                .into_iter()
                .filter(|row| {
                    let key: Row = positions.iter().map(|&i| row[i].clone()).collect();
                    seen.insert(key)
                })
                .collect())
        }
        LogicalOp::Except(except) => {
            let right: HashSet<Row> = execute(&except.right, db)?.into_iter().collect();
            let left = execute(&except.left, db)?;
            Ok(distinct_rows(left.into_iter().filter(|r| !right.contains(r)).collect()))
        }
        LogicalOp::Intersect(intersect) => {
            let right: HashSet<Row> = execute(&intersect.right, db)?.into_iter().collect();
            let left = execute(&intersect.left, db)?;
            Ok(distinct_rows(left.into_iter().filter(|r| right.contains(r)).collect()))
        }
        LogicalOp::Union(union) => {
            let mut rows = execute(&union.left, db)?;
            rows.extend(execute(&union.right, db)?);
            Ok(rows)
        }
        LogicalOp::Limit(limit) => Ok(execute(&limit.input, db)?
            .into_iter()
            .take(limit.limit)
            .collect()),
    }
}

fn execute_join(
    join_type: JoinType,
    condition: Option<&Expr>,
    left: &LogicalOp,
    right: &LogicalOp,
    db: &Database,
) -> QuarryResult<Vec<Row>> {
    let (left_attrs, right_attrs) = (left.output(), right.output());
    let left_rows = execute(left, db)?;
    let right_rows = execute(right, db)?;

    let matches = |l: &Row, r: &Row| -> QuarryResult<bool> {
        match condition {
            None => Ok(true),
            Some(cond) => {
                let mut bindings = bind(&left_attrs, l);
                bindings.extend(bind(&right_attrs, r));
                cond.evaluate_predicate(&bindings)
            }
        }
    };
    let nulls = |n: usize| vec![Value::Null; n];

    let mut out: Vec<Row> = Vec::new();
    let mut right_matched = vec![false; right_rows.len()];
    for l in &left_rows {
        let mut matched = false;
        for (j, r) in right_rows.iter().enumerate() {
            if !matches(l, r)? {
                continue;
            }
            matched = true;
            right_matched[j] = true;
            if !join_type.outputs_left_only() {
                out.push(l.iter().chain(r).cloned().collect());
            }
        }
        match join_type {
            JoinType::LeftSemi if matched => out.push(l.clone()),
            JoinType::LeftAnti if !matched => out.push(l.clone()),
            JoinType::LeftOuter | JoinType::FullOuter if !matched => {
                out.push(l.iter().cloned().chain(nulls(right_attrs.len())).collect());
            }
            _ => {}
        }
    }
    if matches!(join_type, JoinType::RightOuter | JoinType::FullOuter) {
        for (r, matched) in right_rows.iter().zip(right_matched) {
            if !matched {
                out.push(nulls(left_attrs.len()).into_iter().chain(r.iter().cloned()).collect());
            }
        }
    }
    Ok(out)
}

fn eval_in_group(expr: &Expr, group: &[Bindings]) -> QuarryResult<Value> {
    match expr {
        Expr::Alias { expr, .. } => eval_in_group(expr, group),
        Expr::Aggregate(agg) => {
            let values = group
                .iter()
                .map(|row| agg.arg.evaluate(row))
                .collect::<QuarryResult<Vec<Value>>>()?;
            let non_null = values.iter().filter(|v| !v.is_null());
            Ok(match agg.func {
                AggFunc::First => values.first().cloned().unwrap_or(Value::Null),
                AggFunc::Last => values.last().cloned().unwrap_or(Value::Null),
                AggFunc::Count => Value::Int64(non_null.count() as i64),
                AggFunc::Min => non_null
                    .min_by(|a, b| a.sql_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
                    .cloned()
                    .unwrap_or(Value::Null),
                AggFunc::Max => non_null
                    .max_by(|a, b| a.sql_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
                    .cloned()
                    .unwrap_or(Value::Null),
                AggFunc::Sum | AggFunc::Avg => {
                    return Err(QuarryError::not_implemented(format!(
                        "{} in the reference interpreter",
                        agg.func
                    )))
                }
            })
        }
        other if !other.contains_aggregate() => match group.first() {
            Some(row) => other.evaluate(row),
            None => Ok(Value::Null),
        },
        other => Err(QuarryError::not_implemented(format!(
            "aggregate nested in {other}"
        ))),
    }
}
