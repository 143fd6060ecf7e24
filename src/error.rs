// src/error.rs

use crate::blame::MalformedRecord;
use crate::history::HistoryError;
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Every failure is fatal to the run.
#[derive(Debug, Error)]
pub enum Error {
    #[error("malformed blame output for {path}")]
    MalformedRecord {
        path: String,
        #[source]
        source: MalformedRecord,
    },

    #[error("cannot resolve history of {path}")]
    HistoryResolution {
        path: String,
        #[source]
        source: HistoryError,
    },

    #[error("cannot fetch {path}: {reason}")]
    Fetch { path: String, reason: String },

    #[error("{0}")]
    Configuration(String),

    #[error("repository access failed")]
    Repository(#[from] git2::Error),

    #[error("cannot start worker pool")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn fetch(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Fetch {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// The file the error is attached to, if any
    pub fn path(&self) -> Option<&str> {
        match self {
            Error::MalformedRecord { path, .. }
            | Error::HistoryResolution { path, .. }
            | Error::Fetch { path, .. } => Some(path),
            _ => None,
        }
    }
}
