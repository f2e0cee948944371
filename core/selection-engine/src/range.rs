//! FILENAME: core/selection-engine/src/range.rs
//! Cell Range - one selected rectangle.
//!
//! Rows are stored as the pair the user dragged (`start_row` is the anchor),
//! so the rectangle is `min..=max` of the two. Columns are an ordered list of
//! definitions captured at selection time; membership is tested by field, so
//! a later change to the engine's column list does not shift the selection.

use std::ops::RangeInclusive;

use grid_model::ColumnDef;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellRange {
    /// Anchor row.
    pub start_row: usize,
    pub end_row: usize,
    pub columns: Vec<ColumnDef>,
    /// Field of the anchor column.
    pub start_column: String,
}

impl CellRange {
    pub fn single(row: usize, column: ColumnDef) -> Self {
        CellRange {
            start_row: row,
            end_row: row,
            start_column: column.field.clone(),
            columns: vec![column],
        }
    }

    /// First row of the rectangle.
    pub fn top(&self) -> usize {
        self.start_row.min(self.end_row)
    }

    /// Last row of the rectangle (inclusive).
    pub fn bottom(&self) -> usize {
        self.start_row.max(self.end_row)
    }

    /// Rows in the rectangle, saturating at `usize::MAX`.
    pub fn row_count(&self) -> usize {
        (self.bottom() - self.top()).saturating_add(1)
    }

    /// The row interval cut down to the first `len` rows, `None` when the
    /// rectangle starts past them.
    pub fn rows_within(&self, len: usize) -> Option<RangeInclusive<usize>> {
        let last = len.checked_sub(1)?;
        let top = self.top();
        (top <= last).then(|| top..=self.bottom().min(last))
    }

    pub fn contains_row(&self, row: usize) -> bool {
        row >= self.top() && row <= self.bottom()
    }

    pub fn contains_field(&self, field: &str) -> bool {
        self.columns.iter().any(|c| c.field == field)
    }

    pub fn contains(&self, row: usize, field: &str) -> bool {
        self.contains_row(row) && self.contains_field(field)
    }

    pub fn cell_count(&self) -> usize {
        self.row_count().saturating_mul(self.columns.len())
    }

    /// Every cell inside the first `len` rows, row by row, columns in range
    /// order.
    pub fn cells_within(&self, len: usize) -> impl Iterator<Item = (usize, &ColumnDef)> + '_ {
        self.rows_within(len)
            .into_iter()
            .flatten()
            .flat_map(move |row| self.columns.iter().map(move |c| (row, c)))
    }
}
