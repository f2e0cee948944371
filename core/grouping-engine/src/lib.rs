//! FILENAME: core/grouping-engine/src/lib.rs
//! Row grouping subsystem for the grid.
//!
//! This crate buckets a flat row collection into a multi-level group tree,
//! rolls up aggregates per group, and flattens the tree into the display list
//! the host virtualizes. It depends on `grid-model` for shared types
//! (Row, Value, ColumnDef, ExpansionStore).
//!
//! Layers:
//! - `definition`: Configuration (group fields, default expansion, aggregations)
//! - `aggregation`: Built-in rollups and the custom function registry
//! - `node`: Arena of group and leaf nodes
//! - `engine`: Build, aggregate, flatten, expand/collapse

pub mod definition;
pub mod aggregation;
pub mod node;
pub mod engine;

pub use definition::*;
pub use aggregation::{apply_builtin, AggregationRegistry, ResolvedAgg};
pub use node::{GroupTree, RowNode, BLANK_KEY};
pub use engine::RowGroupingEngine;
