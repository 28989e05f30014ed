//! Error types and result aliases for Quarry.
//!
//! Every crate in the workspace reports failures through [`QuarryError`].
//! Rewrite rules that simply do not match are not errors; this type covers
//! malformed plans, evaluation failures and internal invariant violations.

mod error;

pub use error::{QuarryError, QuarryResult};
