//! Channel read errors

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading a numeric sysfs channel
///
/// Callers treat every variant the same way (the cycle is skipped); the
/// variants exist so the cause can be logged.
#[derive(Error, Debug)]
pub enum ReadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("channel {path} contains unparseable value {value:?}")]
    Malformed { path: PathBuf, value: String },
}

impl ReadError {
    /// The channel path the failed read was for
    pub fn path(&self) -> &PathBuf {
        match self {
            ReadError::Io { path, .. } => path,
            ReadError::Malformed { path, .. } => path,
        }
    }
}
