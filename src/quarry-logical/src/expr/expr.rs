//! Logical expression tree.

use quarry_core::{Attribute, AttributeId, DataType, Value};
use serde::{Deserialize, Serialize};

use super::{AggExpr, BinaryOp, UnaryOp};

/// Logical expression in a query plan.
///
/// Attribute references carry the full resolved [`Attribute`], so an
/// expression can report its type and nullability without a schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// Resolved column reference.
    Attribute(Attribute),
    /// Literal value.
    Literal(Value),
    /// Binary operation.
    Binary {
        left: Box<Expr>,
        op: BinaryOp,
        right: Box<Expr>,
    },
    /// Unary operation.
    Unary { op: UnaryOp, expr: Box<Expr> },
    /// Aggregate function call (only valid in `Aggregate` results).
    Aggregate(AggExpr),
    /// Named expression producing a column with identity `id`.
    Alias {
        expr: Box<Expr>,
        name: String,
        id: AttributeId,
    },
}

impl Expr {
    /// Create a literal expression.
    pub fn literal(value: impl Into<Value>) -> Self {
        Self::Literal(value.into())
    }

    /// Create a binary expression.
    pub fn binary(left: Expr, op: BinaryOp, right: Expr) -> Self {
        Self::Binary {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    /// Create a unary expression.
    pub fn unary(op: UnaryOp, expr: Expr) -> Self {
        Self::Unary {
            op,
            expr: Box::new(expr),
        }
    }

    // Comparison operators

    /// Equality comparison.
    pub fn eq(self, other: Expr) -> Self {
        Self::binary(self, BinaryOp::Eq, other)
    }

    /// Inequality comparison.
    pub fn not_eq(self, other: Expr) -> Self {
        Self::binary(self, BinaryOp::NotEq, other)
    }

    /// Greater than comparison.
    pub fn gt(self, other: Expr) -> Self {
        Self::binary(self, BinaryOp::Gt, other)
    }

    /// Greater than or equal comparison.
    pub fn gt_eq(self, other: Expr) -> Self {
        Self::binary(self, BinaryOp::GtEq, other)
    }

    /// Less than comparison.
    pub fn lt(self, other: Expr) -> Self {
        Self::binary(self, BinaryOp::Lt, other)
    }

    /// Less than or equal comparison.
    pub fn lt_eq(self, other: Expr) -> Self {
        Self::binary(self, BinaryOp::LtEq, other)
    }

    /// Null-safe equality (`<=>`).
    pub fn null_safe_eq(self, other: Expr) -> Self {
        Self::binary(self, BinaryOp::IsNotDistinctFrom, other)
    }

    // Logical operators

    /// Logical AND.
    pub fn and(self, other: Expr) -> Self {
        Self::binary(self, BinaryOp::And, other)
    }

    /// Logical OR.
    pub fn or(self, other: Expr) -> Self {
        Self::binary(self, BinaryOp::Or, other)
    }

    /// Logical NOT.
    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        Self::unary(UnaryOp::Not, self)
    }

    // Null checks

    /// Is null check.
    pub fn is_null(self) -> Self {
        Self::unary(UnaryOp::IsNull, self)
    }

    /// Is not null check.
    pub fn is_not_null(self) -> Self {
        Self::unary(UnaryOp::IsNotNull, self)
    }

    // Arithmetic operators

    /// Addition.
    #[allow(clippy::should_implement_trait)]
    pub fn add(self, other: Expr) -> Self {
        Self::binary(self, BinaryOp::Add, other)
    }

    /// Subtraction.
    #[allow(clippy::should_implement_trait)]
    pub fn sub(self, other: Expr) -> Self {
        Self::binary(self, BinaryOp::Subtract, other)
    }

    // Naming

    /// Name this expression, minting a fresh attribute id.
    pub fn alias(self, name: impl Into<String>) -> Self {
        self.alias_with_id(name, AttributeId::next())
    }

    /// Name this expression with an existing attribute id.
    pub fn alias_with_id(self, name: impl Into<String>, id: AttributeId) -> Self {
        Self::Alias {
            expr: Box::new(self),
            name: name.into(),
            id,
        }
    }

    /// The static type of this expression.
    pub fn data_type(&self) -> DataType {
        match self {
            Self::Attribute(attr) => attr.data_type,
            Self::Literal(value) => value.data_type(),
            Self::Binary { left, op, right } => {
                let (l, r) = (left.data_type(), right.data_type());
                op.result_type(l, r).unwrap_or(l)
            }
            Self::Unary { op, expr } => match op {
                UnaryOp::Neg => expr.data_type(),
                UnaryOp::Not | UnaryOp::IsNull | UnaryOp::IsNotNull => DataType::Bool,
            },
            Self::Aggregate(agg) => agg.data_type(),
            Self::Alias { expr, .. } => expr.data_type(),
        }
    }

    /// Whether this expression can evaluate to null.
    pub fn nullable(&self) -> bool {
        match self {
            Self::Attribute(attr) => attr.nullable,
            Self::Literal(value) => value.is_null(),
            Self::Binary { left, op, right } => match op {
                BinaryOp::IsDistinctFrom | BinaryOp::IsNotDistinctFrom => false,
                BinaryOp::Divide => true,
                _ => left.nullable() || right.nullable(),
            },
            Self::Unary { op, expr } => match op {
                UnaryOp::IsNull | UnaryOp::IsNotNull => false,
                UnaryOp::Not | UnaryOp::Neg => expr.nullable(),
            },
            Self::Aggregate(agg) => agg.nullable(),
            Self::Alias { expr, .. } => expr.nullable(),
        }
    }

    /// The output column this expression produces, if it is named.
    ///
    /// Bare attributes produce themselves; aliases produce a new attribute
    /// carrying the alias id. Anything else is unnamed.
    pub fn to_attribute(&self) -> Option<Attribute> {
        match self {
            Self::Attribute(attr) => Some(attr.clone()),
            Self::Alias { expr, name, id } => Some(Attribute {
                id: *id,
                name: name.clone(),
                data_type: expr.data_type(),
                nullable: expr.nullable(),
            }),
            _ => None,
        }
    }

    /// Direct children of this expression.
    pub fn children(&self) -> Vec<&Expr> {
        match self {
            Self::Attribute(_) | Self::Literal(_) => vec![],
            Self::Binary { left, right, .. } => vec![left.as_ref(), right.as_ref()],
            Self::Unary { expr, .. } | Self::Alias { expr, .. } => vec![expr.as_ref()],
            Self::Aggregate(agg) => vec![agg.arg.as_ref()],
        }
    }

    /// Every attribute referenced by this expression, without duplicates, in
    /// order of first appearance.
    pub fn references(&self) -> Vec<Attribute> {
        fn collect(expr: &Expr, out: &mut Vec<Attribute>) {
            if let Expr::Attribute(attr) = expr {
                if !out.iter().any(|a| a.id == attr.id) {
                    out.push(attr.clone());
                }
            }
            for child in expr.children() {
                collect(child, out);
            }
        }

        let mut out = Vec::new();
        collect(self, &mut out);
        out
    }

    /// Check if this expression contains an aggregate call.
    pub fn contains_aggregate(&self) -> bool {
        matches!(self, Self::Aggregate(_)) || self.children().iter().any(|c| c.contains_aggregate())
    }
}

impl From<Attribute> for Expr {
    fn from(attr: Attribute) -> Self {
        Self::Attribute(attr)
    }
}

impl From<&Attribute> for Expr {
    fn from(attr: &Attribute) -> Self {
        Self::Attribute(attr.clone())
    }
}

impl From<AggExpr> for Expr {
    fn from(agg: AggExpr) -> Self {
        Self::Aggregate(agg)
    }
}

impl std::fmt::Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Attribute(attr) => write!(f, "{attr}"),
            Self::Literal(val) => write!(f, "{val}"),
            Self::Binary { left, op, right } => write!(f, "({left} {op} {right})"),
            Self::Unary { op, expr } if op.is_postfix() => write!(f, "{expr} {op}"),
            Self::Unary { op: UnaryOp::Neg, expr } => write!(f, "-{expr}"),
            Self::Unary { op, expr } => write!(f, "{op} {expr}"),
            Self::Aggregate(agg) => write!(f, "{agg}"),
            Self::Alias { expr, name, id } => write!(f, "{expr} AS {name}{id}"),
        }
    }
}
