//! Display utilities for Quarry.
//!
//! Renders operator trees for plan explain output and rewrite traces.

mod tree;

pub use tree::{DisplayTree, TreeNode};
