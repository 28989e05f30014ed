//! Distinct and Deduplicate operators.

use quarry_core::Attribute;
use serde::{Deserialize, Serialize};

use super::LogicalOp;

/// Distinct operator - removes duplicate rows, comparing every column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistinctOp {
    /// Input operator.
    pub input: Box<LogicalOp>,
}

impl DistinctOp {
    /// Create a new distinct operation.
    pub fn new(input: LogicalOp) -> Self {
        Self {
            input: Box::new(input),
        }
    }
}

/// Deduplicate operator - keeps one row per distinct combination of `keys`.
///
/// Non-key columns come from some row of each group. With no keys the whole
/// input collapses to a single representative row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeduplicateOp {
    /// Input operator.
    pub input: Box<LogicalOp>,
    /// Key attributes, a subset of the input's output.
    pub keys: Vec<Attribute>,
}

impl DeduplicateOp {
    /// Create a new deduplicate operation.
    pub fn new(input: LogicalOp, keys: Vec<Attribute>) -> Self {
        Self {
            input: Box::new(input),
            keys,
        }
    }
}
