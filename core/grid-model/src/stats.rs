//! FILENAME: core/grid-model/src/stats.rs
//! PURPOSE: Running numeric statistics over a stream of cell values.
//! CONTEXT: Shared by group aggregation (sum/avg/min/max) and the selection
//! status summary. Non-numeric values are counted but never summed.

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Accumulator for sum, count, min and max over values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NumericAccumulator {
    pub sum: f64,
    /// Every value seen, numeric or not.
    pub count: u64,
    /// Values that coerced to a number.
    pub numeric_count: u64,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl NumericAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts the value and, when it is non-null and number-coercible, folds
    /// it into the numeric statistics.
    pub fn add(&mut self, value: &Value) {
        self.count += 1;
        if let Some(n) = value.as_number() {
            self.fold_number(n);
        }
    }

    fn fold_number(&mut self, value: f64) {
        self.numeric_count += 1;
        self.sum += value;
        self.min = Some(self.min.map_or(value, |m| m.min(value)));
        self.max = Some(self.max.map_or(value, |m| m.max(value)));
    }

    /// Mean of the numeric values, `None` if there were none.
    pub fn average(&self) -> Option<f64> {
        if self.numeric_count == 0 {
            None
        } else {
            Some(self.sum / self.numeric_count as f64)
        }
    }
}
