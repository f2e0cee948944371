//! FILENAME: core/tree-engine/src/definition.rs
//! Tree Definition - where the hierarchy comes from.
//!
//! A tree is either described by a path per row (`["Docs", "2024", "report.pdf"]`)
//! or by rows that carry their children in a field.

use std::fmt;
use std::sync::Arc;

use grid_model::{DefaultExpansion, GridResult, Row};
use serde::Deserialize;

/// Returns the path of a row, outermost segment first.
pub type DataPathFn = Arc<dyn Fn(&Row) -> Vec<String> + Send + Sync>;

/// Field used for node ids in children mode unless configured otherwise.
pub const DEFAULT_ROW_KEY: &str = "id";

/// Field that carries the path segment on synthetic intermediate nodes.
pub const DEFAULT_LABEL_FIELD: &str = "name";

/// How the hierarchy is read from the rows.
#[derive(Clone)]
pub enum TreeSource {
    /// One node per unique path prefix; the row sits at its full path.
    Path(DataPathFn),
    /// Rows nest their children as a list of records in this field.
    Children(String),
}

impl fmt::Debug for TreeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeSource::Path(_) => f.write_str("Path(..)"),
            TreeSource::Children(field) => f.debug_tuple("Children").field(field).finish(),
        }
    }
}

/// Bulk configuration for a tree data engine. The path function cannot be
/// expressed in JSON and is set through the engine API.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TreeDataOptions {
    /// Field holding nested child rows. Selects children mode when set.
    pub child_field: Option<String>,

    /// Field read for node ids in children mode.
    pub row_key: String,

    /// Field that exposes the path segment on synthetic path-mode nodes.
    pub label_field: String,

    /// `-1` expands everything, `0` starts collapsed, `N` expands levels `< N`.
    pub default_expanded: DefaultExpansion,
}

impl Default for TreeDataOptions {
    fn default() -> Self {
        TreeDataOptions {
            child_field: None,
            row_key: DEFAULT_ROW_KEY.to_string(),
            label_field: DEFAULT_LABEL_FIELD.to_string(),
            default_expanded: DefaultExpansion::default(),
        }
    }
}

impl TreeDataOptions {
    pub fn from_json(json: &str) -> GridResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
