//! FILENAME: core/grid-model/src/error.rs
//! PURPOSE: Error type shared by the grid engines.
//! CONTEXT: Only configuration can fail: an aggregation name nothing resolves
//! or option JSON that does not parse. Bad rows, fields and ids are no-ops.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GridError {
    #[error("Unknown aggregation function: {0}")]
    UnknownAggregation(String),

    #[error("Invalid configuration: {0}")]
    Json(#[from] serde_json::Error),
}

pub type GridResult<T> = Result<T, GridError>;
