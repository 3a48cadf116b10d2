//! Error types for the to-do core.

use std::io;
use std::path::Path;

use thiserror::Error;

use crate::task::TaskId;

#[derive(Error, Debug)]
pub enum TodoError {
    #[error("Invalid task: {reason}")]
    Validation { reason: String },

    #[error("Task '{id}' not found")]
    NotFound { id: TaskId },

    #[error("Task file '{path}' is corrupt: {reason}")]
    CorruptStore { path: String, reason: String },

    #[error("Failed to persist tasks to '{path}': {source}")]
    Persistence {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Export failed: {reason}")]
    Export { reason: String },
}

impl TodoError {
    pub(crate) fn persistence(path: &Path, source: io::Error) -> Self {
        Self::Persistence {
            path: path.display().to_string(),
            source,
        }
    }

    pub(crate) fn corrupt(path: &Path, reason: impl ToString) -> Self {
        Self::CorruptStore {
            path: path.display().to_string(),
            reason: reason.to_string(),
        }
    }
}

impl From<csv::Error> for TodoError {
    fn from(err: csv::Error) -> Self {
        Self::Export {
            reason: err.to_string(),
        }
    }
}

pub type TodoResult<T> = Result<T, TodoError>;
