//! FILENAME: core/grid-model/src/edits.rs
//! PURPOSE: Cell edit records and an undo/redo history for applying them.
//! CONTEXT: Fill and range deletion never touch the host's rows; they return
//! change lists. The host applies a batch here and keeps the inverse batch so
//! the edit can be undone.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::row::Row;
use crate::value::Value;

/// Maximum number of batches kept in history.
const MAX_HISTORY_SIZE: usize = 100;

/// A value to write into one cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellChange {
    pub row_index: usize,
    pub field: String,
    pub value: Value,
}

/// A cell that a range delete would clear, with the value it held.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellDeletion {
    pub row_index: usize,
    pub field: String,
    pub old_value: Value,
}

/// A group of cell changes applied as one undoable action.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditBatch {
    /// Human-readable description (e.g., "Fill 4 cells", "Clear range")
    pub description: String,
    /// Changes in the order they are applied.
    pub changes: Vec<CellChange>,
}

impl EditBatch {
    pub fn new(description: impl Into<String>) -> Self {
        EditBatch {
            description: description.into(),
            changes: Vec::new(),
        }
    }

    pub fn from_changes(description: impl Into<String>, changes: Vec<CellChange>) -> Self {
        EditBatch {
            description: description.into(),
            changes,
        }
    }

    /// A batch that clears every listed cell to `Null`.
    pub fn from_deletions(description: impl Into<String>, deletions: &[CellDeletion]) -> Self {
        EditBatch {
            description: description.into(),
            changes: deletions
                .iter()
                .map(|d| CellChange {
                    row_index: d.row_index,
                    field: d.field.clone(),
                    value: Value::Null,
                })
                .collect(),
        }
    }

    pub fn push(&mut self, change: CellChange) {
        self.changes.push(change);
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// Writes the changes into `rows` and returns the batch that restores the
    /// previous values. Changes pointing past the end of `rows` are skipped.
    pub fn apply(&self, rows: &mut [Row]) -> EditBatch {
        let mut inverse = EditBatch::new(self.description.clone());
        for change in &self.changes {
            let Some(row) = rows.get_mut(change.row_index) else {
                continue;
            };
            let previous = row
                .set(change.field.clone(), change.value.clone())
                .unwrap_or(Value::Null);
            inverse.push(CellChange {
                row_index: change.row_index,
                field: change.field.clone(),
                value: previous,
            });
        }
        // Undo replays in reverse so repeated writes to one cell unwind correctly
        inverse.changes.reverse();
        inverse
    }
}

/// Undo/redo stacks of applied edit batches.
#[derive(Debug)]
pub struct EditHistory {
    /// Inverse batches that undo applied edits (most recent at back)
    undo_stack: VecDeque<EditBatch>,
    /// Batches that redo undone edits (most recent at back)
    redo_stack: VecDeque<EditBatch>,
    max_size: usize,
}

impl EditHistory {
    pub fn new() -> Self {
        Self::with_max_size(MAX_HISTORY_SIZE)
    }

    pub fn with_max_size(max_size: usize) -> Self {
        EditHistory {
            undo_stack: VecDeque::with_capacity(max_size),
            redo_stack: VecDeque::with_capacity(max_size),
            max_size,
        }
    }

    /// Applies `batch` to `rows` and records it. Empty batches are ignored.
    pub fn apply(&mut self, batch: &EditBatch, rows: &mut [Row]) {
        if batch.is_empty() {
            return;
        }
        let inverse = batch.apply(rows);
        self.redo_stack.clear();
        Self::push_bounded(&mut self.undo_stack, inverse, self.max_size);
    }

    /// Reverts the most recent batch. Returns false if there is nothing to undo.
    pub fn undo(&mut self, rows: &mut [Row]) -> bool {
        let Some(inverse) = self.undo_stack.pop_back() else {
            return false;
        };
        let redo = inverse.apply(rows);
        Self::push_bounded(&mut self.redo_stack, redo, self.max_size);
        true
    }

    /// Re-applies the most recently undone batch.
    pub fn redo(&mut self, rows: &mut [Row]) -> bool {
        let Some(batch) = self.redo_stack.pop_back() else {
            return false;
        };
        let inverse = batch.apply(rows);
        Self::push_bounded(&mut self.undo_stack, inverse, self.max_size);
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack.back().map(|b| b.description.as_str())
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    fn push_bounded(stack: &mut VecDeque<EditBatch>, batch: EditBatch, max_size: usize) {
        while stack.len() >= max_size {
            stack.pop_front();
        }
        stack.push_back(batch);
    }
}

impl Default for EditHistory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row;

    fn rows() -> Vec<Row> {
        vec![row! { "n" => 1 }, row! { "n" => 2 }]
    }

    fn set(row_index: usize, value: i32) -> CellChange {
        CellChange {
            row_index,
            field: "n".to_string(),
            value: Value::from(value),
        }
    }

    #[test]
    fn test_apply_returns_inverse() {
        let mut data = rows();
        let batch = EditBatch::from_changes("Fill", vec![set(0, 10), set(1, 20)]);
        let inverse = batch.apply(&mut data);

        assert_eq!(data[0].get("n"), &Value::from(10));
        inverse.apply(&mut data);
        assert_eq!(data[0].get("n"), &Value::from(1));
        assert_eq!(data[1].get("n"), &Value::from(2));
    }

    #[test]
    fn test_out_of_range_change_skipped() {
        let mut data = rows();
        let inverse = EditBatch::from_changes("Fill", vec![set(5, 1)]).apply(&mut data);
        assert!(inverse.is_empty());
    }

    #[test]
    fn test_repeated_write_unwinds() {
        let mut data = rows();
        let inverse = EditBatch::from_changes("Twice", vec![set(0, 5), set(0, 6)]).apply(&mut data);
        inverse.apply(&mut data);
        assert_eq!(data[0].get("n"), &Value::from(1));
    }

    #[test]
    fn test_deletions_clear_and_undo() {
        let mut data = rows();
        let deletions = vec![CellDeletion {
            row_index: 1,
            field: "n".to_string(),
            old_value: Value::from(2),
        }];
        let mut history = EditHistory::new();
        history.apply(&EditBatch::from_deletions("Clear range", &deletions), &mut data);
        assert!(data[1].get("n").is_null());
        assert_eq!(history.undo_description(), Some("Clear range"));

        assert!(history.undo(&mut data));
        assert_eq!(data[1].get("n"), &Value::from(2));
        assert!(history.can_redo());

        assert!(history.redo(&mut data));
        assert!(data[1].get("n").is_null());
    }

    #[test]
    fn test_history_bounded() {
        let mut data = rows();
        let mut history = EditHistory::with_max_size(2);
        for i in 0..3 {
            history.apply(&EditBatch::from_changes("Edit", vec![set(0, i)]), &mut data);
        }
        assert!(history.undo(&mut data));
        assert!(history.undo(&mut data));
        assert!(!history.undo(&mut data));
    }
}
