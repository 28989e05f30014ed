//! Relation operator: a leaf producing a fixed set of attributes.

use quarry_core::Attribute;
use serde::{Deserialize, Serialize};

/// Base relation (table, view or stream) read by the plan.
///
/// Two relation nodes are the same relation when they are structurally
/// equal; since attribute ids are minted per analyzed relation, this means
/// "the same resolved source" rather than "a table with the same name".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationOp {
    /// Relation name, for display.
    pub name: String,
    /// Output attributes.
    pub output: Vec<Attribute>,
    /// Whether the source is unbounded.
    pub streaming: bool,
}

impl RelationOp {
    /// Create a bounded relation.
    pub fn new(name: impl Into<String>, output: Vec<Attribute>) -> Self {
        Self {
            name: name.into(),
            output,
            streaming: false,
        }
    }

    /// Create an unbounded (streaming) relation.
    pub fn streaming(name: impl Into<String>, output: Vec<Attribute>) -> Self {
        Self {
            streaming: true,
            ..Self::new(name, output)
        }
    }
}
