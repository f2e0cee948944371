//! FILENAME: core/grouping-engine/src/definition.rs
//! Grouping Definition - The configuration of a grouped grid.
//!
//! This module contains the types needed to DESCRIBE a grouping:
//! - Which fields rows are bucketed by, and in what order
//! - How deep groups start out expanded
//! - Which fields get rolled up, and with which aggregation

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use grid_model::{DefaultExpansion, GridError, GridResult, Row, Value};
use serde::{Deserialize, Deserializer, Serialize};

/// Custom aggregation: receives the field values of every leaf under the
/// group, and the leaf rows themselves.
pub type CustomAggFn = Arc<dyn Fn(&[Value], &[&Row]) -> Value + Send + Sync>;

// ============================================================================
// AGGREGATION
// ============================================================================

/// Built-in aggregation functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggFunc {
    Sum,
    Avg,
    Min,
    Max,
    Count,
    First,
    Last,
}

impl AggFunc {
    pub const ALL: [AggFunc; 7] = [
        AggFunc::Sum,
        AggFunc::Avg,
        AggFunc::Min,
        AggFunc::Max,
        AggFunc::Count,
        AggFunc::First,
        AggFunc::Last,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            AggFunc::Sum => "sum",
            AggFunc::Avg => "avg",
            AggFunc::Min => "min",
            AggFunc::Max => "max",
            AggFunc::Count => "count",
            AggFunc::First => "first",
            AggFunc::Last => "last",
        }
    }
}

impl fmt::Display for AggFunc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AggFunc {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AggFunc::ALL
            .iter()
            .copied()
            .find(|func| func.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| GridError::UnknownAggregation(s.to_string()))
    }
}

/// How a column is aggregated: by name (custom registry first, then the
/// built-ins) or by an inline function.
#[derive(Clone)]
pub enum AggFuncSpec {
    Named(String),
    Inline(CustomAggFn),
}

impl AggFuncSpec {
    pub fn inline<F>(f: F) -> Self
    where
        F: Fn(&[Value], &[&Row]) -> Value + Send + Sync + 'static,
    {
        AggFuncSpec::Inline(Arc::new(f))
    }
}

impl fmt::Debug for AggFuncSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AggFuncSpec::Named(name) => f.debug_tuple("Named").field(name).finish(),
            AggFuncSpec::Inline(_) => f.write_str("Inline(..)"),
        }
    }
}

impl From<&str> for AggFuncSpec {
    fn from(name: &str) -> Self {
        AggFuncSpec::Named(name.to_string())
    }
}

impl From<String> for AggFuncSpec {
    fn from(name: String) -> Self {
        AggFuncSpec::Named(name)
    }
}

impl From<AggFunc> for AggFuncSpec {
    fn from(func: AggFunc) -> Self {
        AggFuncSpec::Named(func.name().to_string())
    }
}

impl<'de> Deserialize<'de> for AggFuncSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(AggFuncSpec::Named)
    }
}

/// A field rolled up on every group node.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggColumn {
    pub field: String,
    pub agg_func: AggFuncSpec,
}

impl AggColumn {
    pub fn new(field: impl Into<String>, agg_func: impl Into<AggFuncSpec>) -> Self {
        AggColumn {
            field: field.into(),
            agg_func: agg_func.into(),
        }
    }
}

// ============================================================================
// OPTIONS
// ============================================================================

/// Bulk configuration for a grouping engine.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GroupingOptions {
    /// Fields to group by, outermost first.
    pub group_columns: Vec<String>,

    /// `-1` expands everything, `0` starts collapsed, `N` expands levels `< N`.
    pub group_default_expanded: DefaultExpansion,

    /// Named aggregations. Inline functions are set through the engine API.
    pub agg_columns: Vec<AggColumn>,
}

impl GroupingOptions {
    pub fn from_json(json: &str) -> GridResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agg_func_parse() {
        assert_eq!("sum".parse::<AggFunc>().unwrap(), AggFunc::Sum);
        assert_eq!("AVG".parse::<AggFunc>().unwrap(), AggFunc::Avg);
        assert!(matches!(
            "median".parse::<AggFunc>(),
            Err(GridError::UnknownAggregation(name)) if name == "median"
        ));
    }

    #[test]
    fn test_options_from_json() {
        let json = r#"{
            "groupColumns": ["dept", "team"],
            "groupDefaultExpanded": -1,
            "aggColumns": [{ "field": "salary", "aggFunc": "sum" }]
        }"#;
        let options = GroupingOptions::from_json(json).unwrap();
        assert_eq!(options.group_columns, vec!["dept", "team"]);
        assert_eq!(options.group_default_expanded, DefaultExpansion::All);
        assert_eq!(options.agg_columns.len(), 1);
        assert!(matches!(&options.agg_columns[0].agg_func, AggFuncSpec::Named(n) if n == "sum"));
    }

    #[test]
    fn test_options_reject_bad_json() {
        assert!(matches!(
            GroupingOptions::from_json("{ not json"),
            Err(GridError::Json(_))
        ));
    }
}
