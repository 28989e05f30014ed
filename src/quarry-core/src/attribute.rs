//! Attribute identity.
//!
//! An [`Attribute`] is one column of an operator's output. Its
//! [`AttributeId`] is what makes two references "the same column"; names are
//! for display only and may repeat (self-joins, `a.x` vs `b.x`).

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::types::DataType;

static NEXT_ATTRIBUTE_ID: AtomicU64 = AtomicU64::new(1);

/// Stable identity of a column within one analyzed plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AttributeId(pub u64);

impl AttributeId {
    /// Mint a fresh id, unique for the lifetime of the process.
    pub fn next() -> Self {
        Self(NEXT_ATTRIBUTE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for AttributeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A resolved column: identity, name, type and nullability.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Attribute {
    /// Column identity.
    pub id: AttributeId,
    /// Display name.
    pub name: String,
    /// Data type.
    pub data_type: DataType,
    /// Whether this column can contain nulls.
    pub nullable: bool,
}

impl Attribute {
    /// Create a nullable attribute with a freshly minted id.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            id: AttributeId::next(),
            name: name.into(),
            data_type,
            nullable: true,
        }
    }

    /// Create an attribute with an explicit id.
    pub fn with_id(id: AttributeId, name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            id,
            name: name.into(),
            data_type,
            nullable: true,
        }
    }

    /// Return a copy with the given nullability, keeping the id.
    #[must_use]
    pub fn with_nullability(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Return a copy marked non-nullable.
    #[must_use]
    pub fn not_null(self) -> Self {
        self.with_nullability(false)
    }

    /// Whether `other` refers to the same column (same id).
    pub fn same_column(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.name, self.id)
    }
}
