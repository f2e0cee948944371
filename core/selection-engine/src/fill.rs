//! FILENAME: core/selection-engine/src/fill.rs
//! Fill Handle - series detection and per-column extrapolation.
//!
//! A column whose source cells form an arithmetic sequence is continued
//! linearly; anything else is repeated cyclically. Fill never writes to rows,
//! it only describes the cells it would change.

use std::ops::Range;

use grid_model::{CellChange, EditBatch, Value};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Largest deviation between consecutive steps still treated as one series.
pub const SEQUENCE_TOLERANCE: f64 = 1e-10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FillDirection {
    Down,
    Up,
}

impl FillDirection {
    /// Direction for dragging the handle of `top..=bottom` to `target_end_row`.
    /// `None` when the target lies inside the source rows.
    pub fn for_target(top: usize, bottom: usize, target_end_row: usize) -> Option<Self> {
        if target_end_row > bottom {
            Some(FillDirection::Down)
        } else if target_end_row < top {
            Some(FillDirection::Up)
        } else {
            None
        }
    }

    /// Rows the fill writes to, ascending.
    pub fn target_rows(&self, top: usize, bottom: usize, target_end_row: usize) -> Range<usize> {
        match self {
            FillDirection::Down => bottom.saturating_add(1)..target_end_row.saturating_add(1),
            FillDirection::Up => target_end_row..top,
        }
    }
}

/// Changes produced by one fill.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FillResult {
    pub changes: Vec<CellChange>,
    /// `None` when nothing was filled.
    pub direction: Option<FillDirection>,
}

impl FillResult {
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Wraps the changes as an undoable batch.
    pub fn into_batch(self) -> EditBatch {
        let description = format!("Fill {} cells", self.changes.len());
        EditBatch::from_changes(description, self.changes)
    }
}

/// Returns `(first, step)` when `values` holds at least two numbers whose
/// consecutive differences are all equal.
pub fn detect_step(values: &[Value]) -> Option<(f64, f64)> {
    if values.len() < 2 {
        return None;
    }
    let numbers: SmallVec<[f64; 8]> = values
        .iter()
        .map(Value::as_number)
        .collect::<Option<_>>()?;
    let step = numbers[1] - numbers[0];
    let constant = numbers
        .windows(2)
        .all(|pair| ((pair[1] - pair[0]) - step).abs() <= SEQUENCE_TOLERANCE);
    constant.then_some((numbers[0], step))
}

/// Values for one column, `(row, value)` in ascending row order.
///
/// `source` holds the column's values for rows `top..=bottom`.
pub fn fill_column(
    source: &[Value],
    top: usize,
    bottom: usize,
    direction: FillDirection,
    target_end_row: usize,
) -> Vec<(usize, Value)> {
    if source.is_empty() {
        return Vec::new();
    }
    let series = detect_step(source);
    direction
        .target_rows(top, bottom, target_end_row)
        .map(|row| {
            let value = match series {
                Some((first, step)) => Value::Number(first + step * (row as f64 - top as f64)),
                None => source[cyclic_index(source.len(), top, bottom, row, direction)].clone(),
            };
            (row, value)
        })
        .collect()
}

/// Downward fills repeat the source from its first value; upward fills walk it
/// backwards from its last value, so the pattern stays aligned either way.
fn cyclic_index(len: usize, top: usize, bottom: usize, row: usize, direction: FillDirection) -> usize {
    match direction {
        FillDirection::Down => (row - bottom - 1) % len,
        FillDirection::Up => len - 1 - (top - row - 1) % len,
    }
}
