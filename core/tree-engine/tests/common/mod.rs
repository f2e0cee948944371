//! FILENAME: core/tree-engine/tests/common/mod.rs
//! Fixtures for tree data integration tests.

#![allow(dead_code)]

use grid_model::{row, Row};
use tree_engine::TreeDataEngine;

/// Org chart as path rows: two departments, one nested team.
pub fn org_rows() -> Vec<Row> {
    vec![
        row! { "path" => "Acme", "title" => "CEO", "headcount" => 1 },
        row! { "path" => "Acme/Engineering", "title" => "CTO", "headcount" => 1 },
        row! { "path" => "Acme/Engineering/Platform/Ana", "title" => "Engineer", "headcount" => 1 },
        row! { "path" => "Acme/Engineering/Platform/Raj", "title" => "Engineer", "headcount" => 1 },
        row! { "path" => "Acme/Engineering/Lee", "title" => "Engineer", "headcount" => 1 },
        row! { "path" => "Acme/Sales/Mia", "title" => "Account Exec", "headcount" => 1 },
    ]
}

pub fn path_engine() -> TreeDataEngine {
    let mut engine = TreeDataEngine::new();
    engine.set_data_path(|row| {
        row.get("path")
            .as_str()
            .map(|p| p.split('/').map(str::to_string).collect())
            .unwrap_or_default()
    });
    engine
}

/// Nested folders in children mode.
pub fn folder_rows() -> Vec<Row> {
    vec![
        row! {
            "id" => "src",
            "name" => "src",
            "children" => vec![
                row! { "id" => "src/lib.rs", "name" => "lib.rs", "size" => 12 },
                row! {
                    "id" => "src/bin",
                    "name" => "bin",
                    "children" => vec![row! { "id" => "src/bin/main.rs", "name" => "main.rs", "size" => 3 }],
                },
            ],
        },
        row! { "id" => "Cargo.toml", "name" => "Cargo.toml", "size" => 1 },
    ]
}

pub fn ids(list: &[&tree_engine::TreeNode]) -> Vec<String> {
    list.iter().map(|n| n.id.clone()).collect()
}
