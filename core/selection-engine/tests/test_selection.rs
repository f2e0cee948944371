//! FILENAME: core/selection-engine/tests/test_selection.rs
//! PURPOSE: Cell selection tests for drag, multi-range, extend, aggregation, fill and delete.

mod common;

use common::{student_columns, student_rows};
use grid_model::{EditBatch, EditHistory, Value};
use selection_engine::{
    CellSelectionEngine, FillDirection, SelectRangeParams, SelectionOptions,
};

fn engine() -> CellSelectionEngine {
    CellSelectionEngine::new(student_columns())
}

#[test]
fn test_single_click() {
    let mut engine = engine();
    engine.start_selection(0, "name", false);
    engine.end_selection();
    assert!(engine.is_cell_selected(0, "name"));
    assert_eq!(engine.selected_cell_count(), 1);
}

#[test]
fn test_drag_rectangle_exact() {
    let mut engine = engine();
    engine.start_selection(0, "name", false);
    engine.update_selection(2, "age");
    engine.end_selection();

    let columns = student_columns();
    for row in 0..6 {
        for column in &columns {
            let inside = row <= 2 && (column.field == "name" || column.field == "age");
            assert_eq!(engine.is_cell_selected(row, &column.field), inside, "{} {}", row, column.field);
        }
    }
}

#[test]
fn test_ctrl_click_adds_range() {
    let mut engine = engine();
    engine.start_selection(0, "name", false);
    engine.end_selection();
    engine.start_selection(4, "house", true);
    engine.end_selection();

    assert_eq!(engine.range_count(), 2);
    assert!(engine.is_cell_selected(0, "name"));
    assert!(engine.is_cell_selected(4, "house"));
    assert_eq!(engine.active_range().unwrap().start_row, 4);
}

#[test]
fn test_extend_grows_same_range() {
    let mut engine = engine();
    engine.start_selection(1, "age", false);
    engine.end_selection();
    engine.extend_selection(3, "grade");

    assert_eq!(engine.range_count(), 1);
    assert!(engine.is_cell_selected(1, "age"));
    assert!(engine.is_cell_selected(3, "grade"));
    assert!(!engine.is_cell_selected(3, "house"));
}

#[test]
fn test_membership_survives_column_reorder() {
    let mut engine = engine();
    engine.start_selection(0, "name", false);
    engine.update_selection(0, "age");
    engine.end_selection();

    let mut reordered = student_columns();
    reordered.reverse();
    engine.set_columns(reordered);
    assert!(engine.is_cell_selected(0, "name"));
    assert!(engine.is_cell_selected(0, "age"));
    assert!(!engine.is_cell_selected(0, "grade"));
}

#[test]
fn test_aggregation_of_grades() {
    let mut engine = engine();
    engine.start_selection(0, "grade", false);
    engine.update_selection(2, "grade");
    engine.end_selection();

    let agg = engine.get_aggregation(&student_rows());
    assert_eq!(agg.sum, 255.0);
    assert_eq!(agg.avg, 85.0);
    assert_eq!(agg.min, 72.0);
    assert_eq!(agg.max, 95.0);
    assert_eq!(agg.count, 3);
    assert_eq!(agg.numeric_count, 3);
}

#[test]
fn test_aggregation_spans_every_range() {
    let mut engine = engine();
    engine.select_range(&SelectRangeParams::new(0, 0, ["grade"]));
    engine.start_selection(3, "grade", true);
    engine.end_selection();

    // Row 3 has no grade: counted, not summed
    let agg = engine.get_aggregation(&student_rows());
    assert_eq!(agg.count, 2);
    assert_eq!(agg.numeric_count, 1);
    assert_eq!(agg.sum, 95.0);
}

#[test]
fn test_fill_numeric_series() {
    let mut engine = engine();
    let mut rows = student_rows();
    rows[0].set("grade", 10);
    rows[1].set("grade", 20);
    engine.select_range(&SelectRangeParams::new(0, 1, ["grade"]));

    let result = engine.fill_from_active(&rows, 3);
    assert_eq!(result.direction, Some(FillDirection::Down));
    let values: Vec<&Value> = result.changes.iter().map(|c| &c.value).collect();
    assert_eq!(values, vec![&Value::from(30.0), &Value::from(40.0)]);
    assert_eq!(result.changes[0].row_index, 2);
    // Rows are left untouched
    assert_eq!(rows[2].get("grade"), &Value::from(72));
}

#[test]
fn test_fill_text_cycles() {
    let mut engine = engine();
    let letters = student_rows();
    assert_eq!(letters[1].get("house"), &Value::from("B"));
    engine.select_range(&SelectRangeParams::new(0, 1, ["house"]));

    let result = engine.fill_from_active(&letters, 4);
    let values: Vec<&str> = result.changes.iter().filter_map(|c| c.value.as_str()).collect();
    assert_eq!(values, vec!["A", "B", "A"]);
}

#[test]
fn test_fill_upward() {
    let mut engine = engine();
    engine.select_range(&SelectRangeParams::new(4, 5, ["age", "name"]));
    let result = engine.fill_from_active(&student_rows(), 2);
    assert_eq!(result.direction, Some(FillDirection::Up));

    // age 15, 16 continues backwards; names cycle from the end
    let age: Vec<(usize, Value)> = result
        .changes
        .iter()
        .filter(|c| c.field == "age")
        .map(|c| (c.row_index, c.value.clone()))
        .collect();
    assert_eq!(age, vec![(2, Value::from(13.0)), (3, Value::from(14.0))]);

    let names: Vec<&str> = result
        .changes
        .iter()
        .filter(|c| c.field == "name")
        .filter_map(|c| c.value.as_str())
        .collect();
    assert_eq!(names, vec!["Emery", "Finley"]);
}

#[test]
fn test_fill_disabled_by_options() {
    let options = SelectionOptions::from_json(r#"{ "fillHandle": false }"#).unwrap();
    let mut engine = CellSelectionEngine::with_options(student_columns(), options);
    engine.select_range(&SelectRangeParams::new(0, 1, ["age"]));
    assert!(engine.fill_from_active(&student_rows(), 5).is_empty());
    assert!(engine.has_selection());

    engine.configure(SelectionOptions { enabled: Some(false), fill_handle: None });
    assert!(!engine.has_selection());
}

#[test]
fn test_fill_then_undo() {
    let mut engine = engine();
    let mut rows = student_rows();
    engine.select_range(&SelectRangeParams::new(0, 1, ["age"]));
    let batch = engine.fill_from_active(&rows, 3).into_batch();
    assert_eq!(batch.description, "Fill 2 cells");

    let mut history = EditHistory::new();
    history.apply(&batch, &mut rows);
    // 14, 15 -> 16, 17
    assert_eq!(rows[3].get("age"), &Value::from(17.0));

    assert!(history.undo(&mut rows));
    assert_eq!(rows[2].get("age"), &Value::from(14));
    assert_eq!(rows[3].get("age"), &Value::from(16));
}

#[test]
fn test_delete_then_restore() {
    let mut engine = engine();
    let mut rows = student_rows();
    engine.select_range(&SelectRangeParams::new(2, 4, ["grade", "house"]));

    let deletions = engine.delete_range_values(&rows);
    // Only row 2 has a grade and a house
    assert_eq!(deletions.len(), 2);

    let batch = EditBatch::from_deletions("Clear range", &deletions);
    let inverse = batch.apply(&mut rows);
    assert!(rows[2].get("grade").is_null());

    inverse.apply(&mut rows);
    assert_eq!(rows[2].get("grade"), &Value::from(72));
    assert_eq!(rows[2].get("house"), &Value::from("A"));
}

#[test]
fn test_clipboard_first_range() {
    let mut engine = engine();
    engine.select_range(&SelectRangeParams::new(2, 3, ["name", "grade"]));
    assert_eq!(engine.get_range_headers(), vec!["Name", "Grade"]);
    assert_eq!(
        engine.get_range_data(&student_rows()),
        vec![
            vec!["Casey".to_string(), "72".to_string()],
            vec!["Devon".to_string(), String::new()],
        ]
    );
}

#[test]
fn test_clear_twice() {
    let mut engine = engine();
    engine.select_range(&SelectRangeParams::new(0, 2, ["name"]));
    engine.clear_selections();
    engine.clear_selections();
    assert!(!engine.has_selection());
    assert!(engine.get_range_data(&student_rows()).is_empty());
}

// ============================================================================
// Out-of-range rows and stale columns
// ============================================================================

#[test]
fn test_oversized_range_reads_only_real_rows() {
    let mut engine = engine();
    let rows = student_rows();
    engine.select_range(&SelectRangeParams::new(0, usize::MAX, ["age"]));
    assert_eq!(engine.selected_cell_count(), usize::MAX);

    let agg = engine.get_aggregation(&rows);
    assert_eq!(agg.count, 6);
    assert_eq!(agg.numeric_count, 6);
    assert_eq!(agg.sum, 90.0);

    assert_eq!(engine.delete_range_values(&rows).len(), 6);
    assert_eq!(engine.get_range_data(&rows).len(), 6);
}

#[test]
fn test_range_past_data_yields_nothing() {
    let mut engine = engine();
    let rows = student_rows();
    engine.select_range(&SelectRangeParams::new(10, 12, ["grade", "house"]));
    assert!(engine.has_selection());

    let agg = engine.get_aggregation(&rows);
    assert_eq!((agg.count, agg.sum, agg.min, agg.max), (0, 0.0, 0.0, 0.0));
    assert!(engine.delete_range_values(&rows).is_empty());
    assert!(engine.get_range_data(&rows).is_empty());

    let result = engine.fill_from_active(&rows, 20);
    assert!(result.is_empty());
    assert_eq!(result.direction, None);
}

#[test]
fn test_fill_stops_at_last_row() {
    let mut engine = engine();
    let rows = student_rows();
    engine.select_range(&SelectRangeParams::new(0, 1, ["age"]));

    for target in [1_000_000, usize::MAX] {
        let result = engine.fill_from_active(&rows, target);
        let cells: Vec<(usize, Value)> =
            result.changes.iter().map(|c| (c.row_index, c.value.clone())).collect();
        assert_eq!(
            cells,
            vec![
                (2, Value::from(16.0)),
                (3, Value::from(17.0)),
                (4, Value::from(18.0)),
                (5, Value::from(19.0)),
            ]
        );
    }

    // Source already ends on the last row, nothing left below it
    engine.select_range(&SelectRangeParams::new(4, 5, ["age"]));
    assert!(engine.fill_from_active(&rows, usize::MAX).is_empty());
}

#[test]
fn test_fill_source_cut_to_data() {
    let mut engine = engine();
    engine.select_range(&SelectRangeParams::new(4, 9, ["age"]));
    let result = engine.fill_from_active(&student_rows(), 2);
    assert_eq!(result.direction, Some(FillDirection::Up));
    let cells: Vec<(usize, Value)> =
        result.changes.iter().map(|c| (c.row_index, c.value.clone())).collect();
    assert_eq!(cells, vec![(2, Value::from(13.0)), (3, Value::from(14.0))]);
}

#[test]
fn test_column_removed_mid_drag() {
    let mut engine = engine();
    engine.start_selection(0, "house", false);
    engine.set_columns(student_columns().into_iter().take(2).collect());
    assert!(!engine.is_dragging());

    engine.update_selection(3, "age");
    let range = engine.active_range().unwrap();
    assert_eq!((range.top(), range.bottom()), (0, 0));
    assert!(engine.is_cell_selected(0, "house"));
    assert!(!engine.is_cell_selected(0, "age"));

    // A fresh drag over the remaining columns works as usual
    engine.start_selection(0, "name", false);
    engine.update_selection(2, "age");
    assert_eq!(engine.selected_cell_count(), 6);
}
