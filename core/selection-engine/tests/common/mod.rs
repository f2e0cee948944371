//! FILENAME: core/selection-engine/tests/common/mod.rs
//! Fixtures for cell selection integration tests.

#![allow(dead_code)]

use grid_model::{row, ColumnDef, ColumnType, Row};

pub fn student_columns() -> Vec<ColumnDef> {
    vec![
        ColumnDef::new("name", "Name"),
        ColumnDef::new("age", "Age").with_type(ColumnType::Number),
        ColumnDef::new("grade", "Grade").with_type(ColumnType::Number),
        ColumnDef::new("house", "House"),
    ]
}

pub fn student_rows() -> Vec<Row> {
    vec![
        row! { "name" => "Avery", "age" => 14, "grade" => 95, "house" => "A" },
        row! { "name" => "Blake", "age" => 15, "grade" => 88, "house" => "B" },
        row! { "name" => "Casey", "age" => 14, "grade" => 72, "house" => "A" },
        row! { "name" => "Devon", "age" => 16 },
        row! { "name" => "Emery", "age" => 15 },
        row! { "name" => "Finley", "age" => 16 },
    ]
}
