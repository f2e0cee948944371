//! FILENAME: core/grid-model/src/column.rs
//! PURPOSE: Column definitions supplied by the host grid controller.
//! CONTEXT: Read-only to the engines. Renderer metadata is left to the host;
//! only the field, header, type hint and aggregation name live here.

use serde::{Deserialize, Serialize};

/// Advisory type hint for a column. Only formatting uses it; the engines
/// work on values directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ColumnType {
    Number,
    Date,
    Boolean,
    Text,
}

/// A column of the grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDef {
    /// Row field this column reads.
    pub field: String,

    /// Display header.
    #[serde(default)]
    pub header: String,

    /// Optional type hint (`number`, `date`, `boolean`, `text`).
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub column_type: Option<ColumnType>,

    /// Aggregation to apply when rows are grouped (e.g. `"sum"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agg_func: Option<String>,
}

impl ColumnDef {
    pub fn new(field: impl Into<String>, header: impl Into<String>) -> Self {
        ColumnDef {
            field: field.into(),
            header: header.into(),
            column_type: None,
            agg_func: None,
        }
    }

    pub fn with_type(mut self, column_type: ColumnType) -> Self {
        self.column_type = Some(column_type);
        self
    }

    pub fn with_agg_func(mut self, agg_func: impl Into<String>) -> Self {
        self.agg_func = Some(agg_func.into());
        self
    }
}

/// Position of `field` within `columns`.
pub fn column_index(columns: &[ColumnDef], field: &str) -> Option<usize> {
    columns.iter().position(|c| c.field == field)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_camel_case() {
        let json = r#"{ "field": "salary", "header": "Salary", "type": "number", "aggFunc": "sum" }"#;
        let col: ColumnDef = serde_json::from_str(json).unwrap();
        assert_eq!(col.field, "salary");
        assert_eq!(col.column_type, Some(ColumnType::Number));
        assert_eq!(col.agg_func.as_deref(), Some("sum"));
    }

    #[test]
    fn test_column_index() {
        let cols = vec![ColumnDef::new("name", "Name"), ColumnDef::new("age", "Age")];
        assert_eq!(column_index(&cols, "age"), Some(1));
        assert_eq!(column_index(&cols, "missing"), None);
    }
}
