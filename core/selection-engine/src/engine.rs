//! FILENAME: core/selection-engine/src/engine.rs
//! Cell Selection Engine - pointer and keyboard driven range selection.
//!
//! The last range in `ranges` is the active one: dragging and shift-extend
//! reshape it, ctrl-click starts another. Unknown fields, missing rows and a
//! disabled engine are all silent no-ops.

use grid_model::{
    column_index, log_debug, log_enter, log_exit, log_info, CellDeletion, CellChange, ColumnDef,
    NumericAccumulator, Row,
};
use rustc_hash::FxHashSet;
use serde::Serialize;

use crate::definition::{SelectRangeParams, SelectionOptions};
use crate::fill::{fill_column, FillDirection, FillResult};
use crate::range::CellRange;

const LOG_CAT: &str = "SELECT";

/// Quick statistics over every selected cell.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionAggregation {
    pub sum: f64,
    /// `sum / numeric_count`, 0 when nothing numeric was selected.
    pub avg: f64,
    /// 0 when nothing numeric was selected.
    pub min: f64,
    /// 0 when nothing numeric was selected.
    pub max: f64,
    /// Every visited cell.
    pub count: usize,
    /// Cells that held a number-coercible value.
    pub numeric_count: usize,
}

impl From<&NumericAccumulator> for SelectionAggregation {
    fn from(acc: &NumericAccumulator) -> Self {
        SelectionAggregation {
            sum: acc.sum,
            avg: acc.average().unwrap_or(0.0),
            min: acc.min.unwrap_or(0.0),
            max: acc.max.unwrap_or(0.0),
            count: acc.count as usize,
            numeric_count: acc.numeric_count as usize,
        }
    }
}

// ============================================================================
// ENGINE
// ============================================================================

#[derive(Debug, Clone)]
pub struct CellSelectionEngine {
    enabled: bool,
    fill_handle: bool,

    /// Current column order; drag spans are index slices of this list.
    columns: Vec<ColumnDef>,

    ranges: Vec<CellRange>,

    dragging: bool,
    /// `(row, column index)` where the current drag started.
    drag_anchor: Option<(usize, usize)>,
}

impl Default for CellSelectionEngine {
    fn default() -> Self {
        CellSelectionEngine {
            enabled: true,
            fill_handle: true,
            columns: Vec::new(),
            ranges: Vec::new(),
            dragging: false,
            drag_anchor: None,
        }
    }
}

impl CellSelectionEngine {
    pub fn new(columns: Vec<ColumnDef>) -> Self {
        CellSelectionEngine {
            columns,
            ..Self::default()
        }
    }

    pub fn with_options(columns: Vec<ColumnDef>, options: SelectionOptions) -> Self {
        let mut engine = Self::new(columns);
        engine.configure(options);
        engine
    }

    // ------------------------------------------------------------------------
    // Configuration
    // ------------------------------------------------------------------------

    /// Applies the flags present in `options`. Disabling clears every range.
    pub fn configure(&mut self, options: SelectionOptions) {
        if let Some(enabled) = options.enabled {
            self.set_enabled(enabled);
        }
        if let Some(fill_handle) = options.fill_handle {
            self.fill_handle = fill_handle;
        }
        log_info!(LOG_CAT, "configured enabled={} fill_handle={}", self.enabled, self.fill_handle);
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.clear_selections();
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_fill_handle(&mut self, fill_handle: bool) {
        self.fill_handle = fill_handle;
    }

    pub fn fill_handle(&self) -> bool {
        self.fill_handle
    }

    /// Replaces the column list. Existing ranges keep the columns they captured;
    /// an in-progress drag ends since its anchor is an index into the old list.
    pub fn set_columns(&mut self, columns: Vec<ColumnDef>) {
        self.columns = columns;
        self.dragging = false;
        self.drag_anchor = None;
    }

    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    // ------------------------------------------------------------------------
    // Pointer selection
    // ------------------------------------------------------------------------

    /// Mouse down on `(row, field)`. With `ctrl` the new cell is added as an
    /// extra range; otherwise it replaces the selection.
    pub fn start_selection(&mut self, row: usize, field: &str, ctrl: bool) {
        if !self.enabled {
            return;
        }
        let Some(col) = column_index(&self.columns, field) else {
            log_debug!(LOG_CAT, "start on unknown field {}", field);
            return;
        };

        let range = CellRange::single(row, self.columns[col].clone());
        if ctrl {
            self.ranges.push(range);
        } else {
            self.ranges = vec![range];
        }
        self.dragging = true;
        self.drag_anchor = Some((row, col));
    }

    /// Mouse move while dragging: reshapes the active range to span from the
    /// drag anchor to `(row, field)`.
    pub fn update_selection(&mut self, row: usize, field: &str) {
        if !self.enabled || !self.dragging {
            return;
        }
        let (Some((anchor_row, anchor_col)), Some(col)) =
            (self.drag_anchor, column_index(&self.columns, field))
        else {
            return;
        };
        let columns = self.column_span(anchor_col, col);
        let start_column = self.columns[anchor_col].field.clone();
        if let Some(active) = self.ranges.last_mut() {
            active.start_row = anchor_row;
            active.end_row = row;
            active.columns = columns;
            active.start_column = start_column;
        }
    }

    /// Mouse up. Ranges stay as they are.
    pub fn end_selection(&mut self) {
        self.dragging = false;
    }

    /// Shift-click: grows the active range from its own anchor to `(row, field)`.
    /// Without a selection, or when the anchor column is gone, selects the
    /// single cell instead.
    pub fn extend_selection(&mut self, row: usize, field: &str) {
        if !self.enabled {
            return;
        }
        let Some(col) = column_index(&self.columns, field) else {
            return;
        };

        let anchor = self.ranges.last().and_then(|active| {
            column_index(&self.columns, &active.start_column).map(|c| (active.start_row, c))
        });
        match anchor {
            Some((anchor_row, anchor_col)) => {
                let columns = self.column_span(anchor_col, col);
                if let Some(active) = self.ranges.last_mut() {
                    active.end_row = row;
                    active.start_row = anchor_row;
                    active.columns = columns;
                }
            }
            None => {
                self.ranges = vec![CellRange::single(row, self.columns[col].clone())];
            }
        }
    }

    /// Replaces the selection with the requested rectangle. Does nothing when
    /// none of the fields is known.
    pub fn select_range(&mut self, params: &SelectRangeParams) {
        if !self.enabled {
            return;
        }
        let columns: Vec<ColumnDef> = params
            .fields
            .iter()
            .filter_map(|field| self.columns.iter().find(|c| c.field == *field).cloned())
            .collect();
        let Some(first) = columns.first() else {
            log_debug!(LOG_CAT, "select_range with no known fields {:?}", params.fields);
            return;
        };
        let start_column = first.field.clone();
        self.ranges = vec![CellRange {
            start_row: params.start_row,
            end_row: params.end_row,
            columns,
            start_column,
        }];
        self.dragging = false;
        self.drag_anchor = None;
    }

    pub fn clear_selections(&mut self) {
        self.ranges.clear();
        self.dragging = false;
        self.drag_anchor = None;
    }

    /// Columns between two indices of the column list, inclusive, in list order.
    fn column_span(&self, a: usize, b: usize) -> Vec<ColumnDef> {
        self.columns[a.min(b)..=a.max(b)].to_vec()
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    pub fn is_cell_selected(&self, row: usize, field: &str) -> bool {
        self.ranges.iter().any(|range| range.contains(row, field))
    }

    pub fn ranges(&self) -> &[CellRange] {
        &self.ranges
    }

    pub fn range_count(&self) -> usize {
        self.ranges.len()
    }

    /// The range drag and shift-extend act on.
    pub fn active_range(&self) -> Option<&CellRange> {
        self.ranges.last()
    }

    pub fn has_selection(&self) -> bool {
        !self.ranges.is_empty()
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Sum of every range's cell count; overlapping cells count once per range.
    /// Saturates at `usize::MAX`.
    pub fn selected_cell_count(&self) -> usize {
        self.ranges
            .iter()
            .fold(0usize, |total, range| total.saturating_add(range.cell_count()))
    }

    // ------------------------------------------------------------------------
    // Aggregation
    // ------------------------------------------------------------------------

    /// Statistics over every cell of every range. Rows past the end of `rows`
    /// are not visited.
    pub fn get_aggregation(&self, rows: &[Row]) -> SelectionAggregation {
        let mut acc = NumericAccumulator::new();
        for range in &self.ranges {
            for (row_index, column) in range.cells_within(rows.len()) {
                acc.add(rows[row_index].get(&column.field));
            }
        }
        SelectionAggregation::from(&acc)
    }

    // ------------------------------------------------------------------------
    // Fill / delete
    // ------------------------------------------------------------------------

    /// Extends `source` down or up to `target_end_row`, column by column.
    /// Returns an empty result when the engine or fill handle is off, when the
    /// source starts past the data, or when the target lies inside the source
    /// rows. Source and target are cut down to the last row of `rows`.
    pub fn fill(&self, rows: &[Row], source: &CellRange, target_end_row: usize) -> FillResult {
        if !self.enabled || !self.fill_handle {
            return FillResult::default();
        }
        let Some(source_rows) = source.rows_within(rows.len()) else {
            log_debug!(LOG_CAT, "fill source starts past {} rows", rows.len());
            return FillResult::default();
        };
        let (top, bottom) = source_rows.into_inner();
        let target_end_row = target_end_row.min(rows.len() - 1);
        let Some(direction) = FillDirection::for_target(top, bottom, target_end_row) else {
            return FillResult::default();
        };
        log_enter!(
            LOG_CAT,
            "fill",
            "rows={}..={} target={} dir={:?}",
            top,
            bottom,
            target_end_row,
            direction
        );

        let mut changes = Vec::new();
        for column in &source.columns {
            let values: Vec<_> = rows[top..=bottom]
                .iter()
                .map(|row| row.get(&column.field).clone())
                .collect();
            changes.extend(
                fill_column(&values, top, bottom, direction, target_end_row)
                    .into_iter()
                    .map(|(row_index, value)| CellChange {
                        row_index,
                        field: column.field.clone(),
                        value,
                    }),
            );
        }

        log_exit!(LOG_CAT, "fill", "changes={}", changes.len());
        FillResult {
            changes,
            direction: Some(direction),
        }
    }

    /// Fills from the active range.
    pub fn fill_from_active(&self, rows: &[Row], target_end_row: usize) -> FillResult {
        match self.active_range() {
            Some(source) => self.fill(rows, source, target_end_row),
            None => FillResult::default(),
        }
    }

    /// Cells a delete would clear: every selected cell holding something other
    /// than null or `""`, each reported once.
    pub fn delete_range_values(&self, rows: &[Row]) -> Vec<CellDeletion> {
        let mut seen: FxHashSet<(usize, &str)> = FxHashSet::default();
        let mut deletions = Vec::new();
        for range in &self.ranges {
            for (row_index, column) in range.cells_within(rows.len()) {
                let value = rows[row_index].get(&column.field);
                if value.is_empty() || !seen.insert((row_index, column.field.as_str())) {
                    continue;
                }
                deletions.push(CellDeletion {
                    row_index,
                    field: column.field.clone(),
                    old_value: value.clone(),
                });
            }
        }
        deletions
    }

    // ------------------------------------------------------------------------
    // Clipboard
    // ------------------------------------------------------------------------

    /// Values of the first range as text, row by row. Null reads as `""`.
    /// Rows past the end of `rows` are left out.
    pub fn get_range_data(&self, rows: &[Row]) -> Vec<Vec<String>> {
        let Some(range) = self.ranges.first() else {
            return Vec::new();
        };
        let Some(interval) = range.rows_within(rows.len()) else {
            return Vec::new();
        };
        rows[interval]
            .iter()
            .map(|row| {
                range
                    .columns
                    .iter()
                    .map(|c| row.get(&c.field).to_key_string())
                    .collect()
            })
            .collect()
    }

    /// Headers of the first range's columns.
    pub fn get_range_headers(&self) -> Vec<String> {
        self.ranges
            .first()
            .map(|range| range.columns.iter().map(|c| c.header.clone()).collect())
            .unwrap_or_default()
    }
}
