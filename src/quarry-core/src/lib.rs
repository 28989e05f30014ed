//! Core data model for Quarry.
//!
//! This crate provides the types every plan and expression is built from:
//! - `AttributeId` and `Attribute` for column identity and nullability
//! - `Value` and `DataType` for the type system

pub mod attribute;
pub mod types;

#[cfg(test)]
mod proptest_utils;

// Re-export commonly used types
pub use attribute::{Attribute, AttributeId};
pub use types::{DataType, Value};
