//! Row-at-a-time expression evaluation with SQL three-valued logic.
//!
//! The optimizer never evaluates expressions; this exists so the semantics
//! of the predicates it builds can be checked directly.

use std::cmp::Ordering;
use std::collections::HashMap;

use common_error::{QuarryError, QuarryResult};
use quarry_core::{AttributeId, Value};

use super::{BinaryOp, Expr, UnaryOp};

/// Values bound to attribute ids for one row.
pub type Bindings = HashMap<AttributeId, Value>;

impl Expr {
    /// Evaluate this expression against one row.
    pub fn evaluate(&self, row: &Bindings) -> QuarryResult<Value> {
        match self {
            Self::Attribute(attr) => row.get(&attr.id).cloned().ok_or_else(|| {
                QuarryError::schema_error(format!("attribute {attr} is not bound"))
            }),
            Self::Literal(value) => Ok(value.clone()),
            Self::Binary { left, op, right } => {
                let l = left.evaluate(row)?;
                let r = right.evaluate(row)?;
                eval_binary(&l, *op, &r)
            }
            Self::Unary { op, expr } => eval_unary(*op, &expr.evaluate(row)?),
            Self::Alias { expr, .. } => expr.evaluate(row),
            Self::Aggregate(agg) => Err(QuarryError::type_error(format!(
                "aggregate {agg} must be evaluated by an aggregate operator"
            ))),
        }
    }

    /// Evaluate as a filter predicate: only `true` keeps the row.
    pub fn evaluate_predicate(&self, row: &Bindings) -> QuarryResult<bool> {
        match self.evaluate(row)? {
            Value::Bool(b) => Ok(b),
            Value::Null => Ok(false),
            other => Err(QuarryError::type_error(format!(
                "predicate {self} evaluated to non-boolean {other}"
            ))),
        }
    }
}

fn as_tri_bool(value: &Value) -> QuarryResult<Option<bool>> {
    match value {
        Value::Bool(b) => Ok(Some(*b)),
        Value::Null => Ok(None),
        other => Err(QuarryError::type_error(format!(
            "expected Bool, got {}",
            other.data_type()
        ))),
    }
}

fn tri_bool(value: Option<bool>) -> Value {
    value.map_or(Value::Null, Value::Bool)
}

fn compare(l: &Value, r: &Value) -> QuarryResult<Ordering> {
    l.sql_cmp(r).ok_or_else(|| {
        QuarryError::type_error(format!(
            "cannot compare {} with {}",
            l.data_type(),
            r.data_type()
        ))
    })
}

fn eval_binary(l: &Value, op: BinaryOp, r: &Value) -> QuarryResult<Value> {
    match op {
        BinaryOp::And => {
            let (l, r) = (as_tri_bool(l)?, as_tri_bool(r)?);
            Ok(match (l, r) {
                (Some(false), _) | (_, Some(false)) => Value::Bool(false),
                (Some(true), Some(true)) => Value::Bool(true),
                _ => Value::Null,
            })
        }
        BinaryOp::Or => {
            let (l, r) = (as_tri_bool(l)?, as_tri_bool(r)?);
            Ok(match (l, r) {
                (Some(true), _) | (_, Some(true)) => Value::Bool(true),
                (Some(false), Some(false)) => Value::Bool(false),
                _ => Value::Null,
            })
        }
        BinaryOp::IsNotDistinctFrom | BinaryOp::IsDistinctFrom => {
            let same = match (l.is_null(), r.is_null()) {
                (true, true) => true,
                (true, false) | (false, true) => false,
                (false, false) => compare(l, r)? == Ordering::Equal,
            };
            Ok(Value::Bool(same == (op == BinaryOp::IsNotDistinctFrom)))
        }
        _ if l.is_null() || r.is_null() => Ok(Value::Null),
        BinaryOp::Eq => Ok(Value::Bool(compare(l, r)? == Ordering::Equal)),
        BinaryOp::NotEq => Ok(Value::Bool(compare(l, r)? != Ordering::Equal)),
        BinaryOp::Lt => Ok(Value::Bool(compare(l, r)? == Ordering::Less)),
        BinaryOp::LtEq => Ok(Value::Bool(compare(l, r)? != Ordering::Greater)),
        BinaryOp::Gt => Ok(Value::Bool(compare(l, r)? == Ordering::Greater)),
        BinaryOp::GtEq => Ok(Value::Bool(compare(l, r)? != Ordering::Less)),
        BinaryOp::Add | BinaryOp::Subtract | BinaryOp::Multiply | BinaryOp::Divide => {
            eval_arithmetic(l, op, r)
        }
    }
}

fn eval_arithmetic(l: &Value, op: BinaryOp, r: &Value) -> QuarryResult<Value> {
    match (l, r, op) {
        (Value::Int64(l), Value::Int64(r), BinaryOp::Add) => Ok(Value::Int64(l.wrapping_add(*r))),
        (Value::Int64(l), Value::Int64(r), BinaryOp::Subtract) => {
            Ok(Value::Int64(l.wrapping_sub(*r)))
        }
        (Value::Int64(l), Value::Int64(r), BinaryOp::Multiply) => {
            Ok(Value::Int64(l.wrapping_mul(*r)))
        }
        _ => {
            let (Some(lf), Some(rf)) = (l.as_float64(), r.as_float64()) else {
                return Err(QuarryError::type_error(format!(
                    "cannot apply {op} to {} and {}",
                    l.data_type(),
                    r.data_type()
                )));
            };
            Ok(match op {
                BinaryOp::Add => Value::Float64(lf + rf),
                BinaryOp::Subtract => Value::Float64(lf - rf),
                BinaryOp::Multiply => Value::Float64(lf * rf),
                // Division by zero yields null.
                _ if rf == 0.0 => Value::Null,
                _ => Value::Float64(lf / rf),
            })
        }
    }
}

fn eval_unary(op: UnaryOp, value: &Value) -> QuarryResult<Value> {
    match (op, value) {
        (UnaryOp::IsNull, v) => Ok(Value::Bool(v.is_null())),
        (UnaryOp::IsNotNull, v) => Ok(Value::Bool(!v.is_null())),
        (UnaryOp::Not, v) => Ok(tri_bool(as_tri_bool(v)?.map(|b| !b))),
        (UnaryOp::Neg, Value::Null) => Ok(Value::Null),
        (UnaryOp::Neg, Value::Int64(i)) => Ok(Value::Int64(i.wrapping_neg())),
        (UnaryOp::Neg, Value::Float64(f)) => Ok(Value::Float64(-f)),
        (UnaryOp::Neg, other) => Err(QuarryError::type_error(format!(
            "cannot negate {}",
            other.data_type()
        ))),
    }
}
