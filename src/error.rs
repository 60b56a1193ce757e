//! Error type shared by every stage of the transform.
//!
//! Cell-level anomalies (unparseable numbers, zero denominators) never show up
//! here: they are folded into `Value::Missing` and the `Change` branch table.
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// No input file matched the discovery pattern
    #[error("no input file matching `{pattern}` found in {dir:?}; add a file to that directory")]
    Discovery { dir: PathBuf, pattern: String },

    /// Input has a header at most, so there is nothing to classify or compute
    #[error("input {path:?} contains no data rows")]
    EmptyInput { path: PathBuf },

    /// Output header and row keys disagree
    #[error("schema mismatch at output row {row}: {detail}")]
    SchemaMismatch { row: usize, detail: String },

    /// Year labels are not strictly increasing and the run asked for that
    #[error("year column `{current}` does not follow `{previous}` in ascending order")]
    UnorderedYears { previous: String, current: String },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
