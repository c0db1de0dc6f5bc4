use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::record::RecordError;

/// Which measurement series of a timer an operation refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Series {
    Total,
    Iteration,
}

impl fmt::Display for Series {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Series::Total => f.write_str("total"),
            Series::Iteration => f.write_str("iteration"),
        }
    }
}

/// Errors raised while measuring, persisting, or aggregating timings.
#[derive(Debug, Error)]
pub enum TimingError {
    #[error("timer '{name}' stopped its {series} series without a matching start")]
    InvalidState { name: String, series: Series },

    #[error("timer '{name}' rejected its intervals: {source}")]
    InvalidDurations {
        name: String,
        #[source]
        source: RecordError,
    },

    #[error("invalid timer record {}: {reason}", path.display())]
    RecordParse { path: PathBuf, reason: String },

    #[error("file name '{file_name}' does not end in a 1-6 digit worker id before '.json'")]
    FilenamePattern { file_name: String },

    #[error("timer array '{name}' has no members to aggregate")]
    EmptyAggregate { name: String },

    #[error("none of the {members} benchmark runs has exactly one worker")]
    MissingBaseline { members: usize },

    #[error("{count} benchmark runs have exactly one worker, expected one baseline")]
    AmbiguousBaseline { count: usize },

    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl TimingError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TimingError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn record(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        TimingError::RecordParse {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T, E = TimingError> = std::result::Result<T, E>;
