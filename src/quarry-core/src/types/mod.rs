//! Type system for Quarry values.
//!
//! `Value` is the runtime representation used by literals and by the
//! expression evaluator; `DataType` is the static type carried by attributes.

mod data_type;
mod value;

pub use data_type::DataType;
pub use value::Value;
