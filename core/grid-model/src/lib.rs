//! FILENAME: core/grid-model/src/lib.rs
//! PURPOSE: Shared data model for the grid data engines.
//! CONTEXT: Row records, column definitions, the tri-state expansion store,
//! numeric statistics and cell edit batches used by the grouping, tree and
//! selection engines.

pub mod column;
pub mod edits;
pub mod error;
pub mod expansion;
pub mod logging;
pub mod row;
pub mod stats;
pub mod value;

// Re-export commonly used types at the crate root
pub use column::{column_index, ColumnDef, ColumnType};
pub use edits::{CellChange, CellDeletion, EditBatch, EditHistory};
pub use error::{GridError, GridResult};
pub use expansion::{DefaultExpansion, ExpansionState, ExpansionStore};
pub use row::Row;
pub use stats::NumericAccumulator;
pub use value::Value;

/// Index of a node inside an engine's node arena.
pub type NodeId = usize;
