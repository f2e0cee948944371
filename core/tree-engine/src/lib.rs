//! FILENAME: core/tree-engine/src/lib.rs
//! Tree data subsystem for the grid.
//!
//! Builds a display tree either from per-row path arrays or from nested child
//! arrays, then flattens it with the same tri-state expansion rules as row
//! grouping. Filtering produces a transient copy; sorting reorders in place.
//!
//! Layers:
//! - `definition`: Configuration (data path function or child field, row key, label field)
//! - `node`: Arena of tree nodes
//! - `engine`: Build, flatten, filter, sort, expand/collapse

pub mod definition;
pub mod node;
pub mod engine;

pub use definition::*;
pub use node::{TreeArena, TreeNode};
pub use engine::TreeDataEngine;
