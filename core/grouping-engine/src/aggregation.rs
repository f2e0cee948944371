//! FILENAME: core/grouping-engine/src/aggregation.rs
//! Aggregation - built-in rollups and the custom function registry.
//!
//! Group aggregates are always computed from the raw leaf values under the
//! group, never by combining child group results.

use grid_model::{GridResult, NumericAccumulator, Row, Value};
use rustc_hash::FxHashMap;

use crate::definition::{AggFunc, AggFuncSpec, CustomAggFn};

/// A name resolved against the registry.
pub enum ResolvedAgg<'a> {
    BuiltIn(AggFunc),
    Custom(&'a CustomAggFn),
}

/// Named custom aggregations. Lookups check this registry before the built-ins,
/// so a custom `"sum"` shadows the built-in one.
#[derive(Clone, Default)]
pub struct AggregationRegistry {
    custom: FxHashMap<String, CustomAggFn>,
}

impl AggregationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: impl Into<String>, func: CustomAggFn) {
        self.custom.insert(name.into(), func);
    }

    /// Replaces all custom functions.
    pub fn set_all<I>(&mut self, funcs: I)
    where
        I: IntoIterator<Item = (String, CustomAggFn)>,
    {
        self.custom = funcs.into_iter().collect();
    }

    pub fn unregister(&mut self, name: &str) -> bool {
        self.custom.remove(name).is_some()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.custom.contains_key(name) || name.parse::<AggFunc>().is_ok()
    }

    pub fn custom_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.custom.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn resolve(&self, name: &str) -> GridResult<ResolvedAgg<'_>> {
        if let Some(func) = self.custom.get(name) {
            return Ok(ResolvedAgg::Custom(func));
        }
        name.parse::<AggFunc>().map(ResolvedAgg::BuiltIn)
    }

    /// Runs `spec` over the leaf `values` (one per row in `rows`).
    pub fn aggregate(&self, spec: &AggFuncSpec, values: &[Value], rows: &[&Row]) -> GridResult<Value> {
        match spec {
            AggFuncSpec::Inline(func) => Ok(func(values, rows)),
            AggFuncSpec::Named(name) => match self.resolve(name)? {
                ResolvedAgg::Custom(func) => Ok(func(values, rows)),
                ResolvedAgg::BuiltIn(func) => Ok(apply_builtin(func, values)),
            },
        }
    }
}

impl std::fmt::Debug for AggregationRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AggregationRegistry")
            .field("custom", &self.custom_names())
            .finish()
    }
}

/// Applies a built-in aggregation. Numeric functions skip values that do not
/// coerce to a number; `min`/`max`/`avg` are `Null` when nothing numeric was seen.
pub fn apply_builtin(func: AggFunc, values: &[Value]) -> Value {
    match func {
        AggFunc::Count => Value::from(values.len()),
        AggFunc::First => values.first().cloned().unwrap_or(Value::Null),
        AggFunc::Last => values.last().cloned().unwrap_or(Value::Null),
        AggFunc::Sum | AggFunc::Avg | AggFunc::Min | AggFunc::Max => {
            let mut acc = NumericAccumulator::new();
            for value in values {
                acc.add(value);
            }
            match func {
                AggFunc::Sum => Value::Number(acc.sum),
                AggFunc::Avg => acc.average().into(),
                AggFunc::Min => acc.min.into(),
                _ => acc.max.into(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn nums(values: &[f64]) -> Vec<Value> {
        values.iter().map(|v| Value::from(*v)).collect()
    }

    #[test]
    fn test_builtins() {
        let values = nums(&[5.0, 1.0, 9.0]);
        assert_eq!(apply_builtin(AggFunc::Sum, &values), Value::from(15.0));
        assert_eq!(apply_builtin(AggFunc::Avg, &values), Value::from(5.0));
        assert_eq!(apply_builtin(AggFunc::Min, &values), Value::from(1.0));
        assert_eq!(apply_builtin(AggFunc::Max, &values), Value::from(9.0));
        assert_eq!(apply_builtin(AggFunc::Count, &values), Value::from(3));
        assert_eq!(apply_builtin(AggFunc::First, &values), Value::from(5.0));
        assert_eq!(apply_builtin(AggFunc::Last, &values), Value::from(9.0));
    }

    #[test]
    fn test_non_numeric_values_ignored() {
        let values = vec![Value::from("n/a"), Value::from(4), Value::Null, Value::from("6")];
        assert_eq!(apply_builtin(AggFunc::Sum, &values), Value::from(10.0));
        assert_eq!(apply_builtin(AggFunc::Avg, &values), Value::from(5.0));
        assert_eq!(apply_builtin(AggFunc::Count, &values), Value::from(4));
    }

    #[test]
    fn test_min_max_null_without_numbers() {
        let values = vec![Value::from("a"), Value::Null];
        assert_eq!(apply_builtin(AggFunc::Min, &values), Value::Null);
        assert_eq!(apply_builtin(AggFunc::Max, &values), Value::Null);
        assert_eq!(apply_builtin(AggFunc::Sum, &values), Value::from(0.0));
        assert_eq!(apply_builtin(AggFunc::First, &[]), Value::Null);
    }

    #[test]
    fn test_custom_shadows_builtin() {
        let mut registry = AggregationRegistry::new();
        registry.register("sum", Arc::new(|_: &[Value], _: &[&Row]| Value::from("custom")));
        let result = registry
            .aggregate(&AggFuncSpec::from("sum"), &nums(&[1.0]), &[])
            .unwrap();
        assert_eq!(result, Value::from("custom"));
    }

    #[test]
    fn test_inline_receives_rows() {
        let registry = AggregationRegistry::new();
        let row = Row::new().with("x", 1);
        let spec = AggFuncSpec::inline(|_, rows| Value::from(rows.len()));
        let result = registry.aggregate(&spec, &[Value::from(1)], &[&row]).unwrap();
        assert_eq!(result, Value::from(1));
    }

    #[test]
    fn test_unknown_name_errors() {
        let registry = AggregationRegistry::new();
        assert!(registry.aggregate(&AggFuncSpec::from("median"), &[], &[]).is_err());
        assert!(!registry.contains("median"));
        assert!(registry.contains("max"));
    }
}
