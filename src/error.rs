//! Errors raised while reading benchmark result files.

use std::io;
use std::num::ParseFloatError;
use std::path::PathBuf;
use thiserror::Error;

/// Failure to turn one result file into a throughput value.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot open result file {}: {source}", path.display())]
    Open { path: PathBuf, source: io::Error },

    #[error("cannot read result file {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("result file {} is empty", path.display())]
    Empty { path: PathBuf },

    #[error("result file {}: {line:?} is not a number: {source}", path.display())]
    Parse {
        path: PathBuf,
        line: String,
        source: ParseFloatError,
    },
}

impl LoadError {
    /// The file that caused the failure.
    pub fn path(&self) -> &PathBuf {
        match self {
            LoadError::Open { path, .. }
            | LoadError::Read { path, .. }
            | LoadError::Empty { path }
            | LoadError::Parse { path, .. } => path,
        }
    }
}
