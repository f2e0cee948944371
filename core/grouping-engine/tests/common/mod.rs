//! FILENAME: core/grouping-engine/tests/common/mod.rs
//! Fixtures for grouping engine integration tests.

#![allow(dead_code)]

use grid_model::{row, ColumnDef, ColumnType, Row};

/// Ten employees across three departments and two locations.
pub fn employee_rows() -> Vec<Row> {
    vec![
        row! { "name" => "Alice", "dept" => "Engineering", "location" => "Oslo", "salary" => 120 },
        row! { "name" => "Bob", "dept" => "Engineering", "location" => "Berlin", "salary" => 95 },
        row! { "name" => "Carol", "dept" => "Sales", "location" => "Oslo", "salary" => 70 },
        row! { "name" => "Dave", "dept" => "Engineering", "location" => "Oslo", "salary" => 110 },
        row! { "name" => "Erin", "dept" => "Sales", "location" => "Berlin", "salary" => 65 },
        row! { "name" => "Frank", "dept" => "Support", "location" => "Berlin", "salary" => 50 },
        row! { "name" => "Grace", "dept" => "Engineering", "location" => "Berlin", "salary" => 105 },
        row! { "name" => "Heidi", "dept" => "Sales", "location" => "Oslo", "salary" => 80 },
        row! { "name" => "Ivan", "dept" => "Support", "location" => "Oslo", "salary" => 55 },
        row! { "name" => "Judy", "dept" => "Engineering", "location" => "Oslo", "salary" => 130 },
    ]
}

pub fn employee_columns() -> Vec<ColumnDef> {
    vec![
        ColumnDef::new("name", "Name"),
        ColumnDef::new("dept", "Department"),
        ColumnDef::new("location", "Location"),
        ColumnDef::new("salary", "Salary")
            .with_type(ColumnType::Number)
            .with_agg_func("sum"),
    ]
}

/// Salaries of one department, in row order.
pub fn salaries_of(rows: &[Row], dept: &str) -> Vec<f64> {
    rows.iter()
        .filter(|r| r.get("dept").as_str() == Some(dept))
        .filter_map(|r| r.get("salary").as_number())
        .collect()
}
