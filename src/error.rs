//! Error types for the project store, CSV exchange and settings.

use std::path::PathBuf;

use thiserror::Error;

use crate::model::TaskId;

/// Errors raised while reading, writing or updating project data.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A file could not be written.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Project or settings JSON is not valid.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV reader or writer failure.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The CSV header row has no column usable as a task title.
    #[error("CSV is missing a task title column (found headers: {found:?})")]
    MissingColumns { found: Vec<String> },

    /// Every data row was rejected, or there were none.
    #[error("no valid tasks found in CSV ({skipped} rows skipped)")]
    NoRows { skipped: usize },

    /// A status change targeted a task the project does not hold.
    #[error("task {0} not found")]
    TaskNotFound(TaskId),
}

/// Error returned while parsing a task status from text.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseStatusError(pub String);
