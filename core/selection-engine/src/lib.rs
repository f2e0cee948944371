//! FILENAME: core/selection-engine/src/lib.rs
//! Excel-style rectangular cell selection for the grid.
//!
//! Layers:
//! - `definition`: Options and programmatic range parameters
//! - `range`: The selected rectangle (row interval x ordered column list)
//! - `fill`: Fill-handle series detection and extrapolation
//! - `engine`: Drag / ctrl / shift selection state, aggregation, clipboard, delete

pub mod definition;
pub mod range;
pub mod fill;
pub mod engine;

pub use definition::*;
pub use range::CellRange;
pub use fill::{detect_step, FillDirection, FillResult, SEQUENCE_TOLERANCE};
pub use engine::{CellSelectionEngine, SelectionAggregation};
