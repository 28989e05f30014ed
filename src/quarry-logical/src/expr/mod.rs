//! Expression trees for logical plans.

mod agg;
mod binary;
mod eval;
mod expr;
mod unary;

pub use agg::{AggExpr, AggFunc};
pub use binary::BinaryOp;
pub use eval::Bindings;
pub use expr::Expr;
pub use unary::UnaryOp;

use quarry_core::{Attribute, Value};

/// Create a literal expression.
pub fn lit(value: impl Into<Value>) -> Expr {
    Expr::literal(value)
}

/// Reference an attribute.
pub fn attr(attribute: &Attribute) -> Expr {
    Expr::from(attribute)
}

/// `FIRST(attribute) AS attribute`, reusing the attribute's identity.
pub fn first_as_self(attribute: &Attribute) -> Expr {
    Expr::from(AggExpr::first(attr(attribute))).alias_with_id(&attribute.name, attribute.id)
}

/// Left-fold predicates into one conjunction; `None` when there are none.
pub fn conjunction(predicates: impl IntoIterator<Item = Expr>) -> Option<Expr> {
    predicates.into_iter().reduce(Expr::and)
}

/// Split a predicate on its top-level `AND`s, left to right.
pub fn split_conjunction(predicate: &Expr) -> Vec<&Expr> {
    match predicate {
        Expr::Binary {
            left,
            op: BinaryOp::And,
            right,
        } => {
            let mut parts = split_conjunction(left);
            parts.extend(split_conjunction(right));
            parts
        }
        other => vec![other],
    }
}
