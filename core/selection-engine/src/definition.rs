//! FILENAME: core/selection-engine/src/definition.rs
//! Selection Definition - bulk options and programmatic selection requests.

use grid_model::GridResult;
use serde::{Deserialize, Serialize};

/// Bulk setter for the engine flags. Missing keys leave the flag unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SelectionOptions {
    /// `false` disables selection and clears every range.
    pub enabled: Option<bool>,

    /// Whether the fill handle may produce changes.
    pub fill_handle: Option<bool>,
}

impl SelectionOptions {
    pub fn from_json(json: &str) -> GridResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// A rectangle requested by the host rather than by the pointer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectRangeParams {
    pub start_row: usize,
    pub end_row: usize,
    /// Fields to select, in order. Unknown fields are dropped.
    pub fields: Vec<String>,
}

impl SelectRangeParams {
    pub fn new<I, S>(start_row: usize, end_row: usize, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        SelectRangeParams {
            start_row,
            end_row,
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_partial_json() {
        let options = SelectionOptions::from_json(r#"{ "fillHandle": false }"#).unwrap();
        assert_eq!(options.enabled, None);
        assert_eq!(options.fill_handle, Some(false));
    }

    #[test]
    fn test_select_range_params_json() {
        let params: SelectRangeParams =
            serde_json::from_str(r#"{ "startRow": 2, "endRow": 0, "fields": ["a", "b"] }"#).unwrap();
        assert_eq!(params, SelectRangeParams::new(2, 0, ["a", "b"]));
    }
}
