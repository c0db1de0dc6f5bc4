//! Persisted timer records
//!
//! One JSON object per timer. Writers always emit the `kind` discriminator;
//! readers also accept older untagged files, where the presence of
//! `iter_time` marks an iteration timing.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::error::Series;

/// Discriminator stored in the `kind` field of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerKind {
    PlainTiming,
    IterationTiming,
}

impl fmt::Display for TimerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimerKind::PlainTiming => f.write_str("plain_timing"),
            TimerKind::IterationTiming => f.write_str("iteration_timing"),
        }
    }
}

/// Serializable snapshot of one timer. Durations are in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "RecordFile", try_from = "RecordFile")]
pub enum TimeRecord {
    PlainTiming {
        name: String,
        description: String,
        total_times: Vec<f64>,
    },
    IterationTiming {
        name: String,
        description: String,
        total_times: Vec<f64>,
        iter_time: Vec<f64>,
    },
}

impl TimeRecord {
    pub fn kind(&self) -> TimerKind {
        match self {
            TimeRecord::PlainTiming { .. } => TimerKind::PlainTiming,
            TimeRecord::IterationTiming { .. } => TimerKind::IterationTiming,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            TimeRecord::PlainTiming { name, .. } | TimeRecord::IterationTiming { name, .. } => name,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            TimeRecord::PlainTiming { description, .. }
            | TimeRecord::IterationTiming { description, .. } => description,
        }
    }

    pub fn total_times(&self) -> &[f64] {
        match self {
            TimeRecord::PlainTiming { total_times, .. }
            | TimeRecord::IterationTiming { total_times, .. } => total_times,
        }
    }

    /// Iteration series, present only on iteration timings.
    pub fn iter_time(&self) -> Option<&[f64]> {
        match self {
            TimeRecord::PlainTiming { .. } => None,
            TimeRecord::IterationTiming { iter_time, .. } => Some(iter_time),
        }
    }
}

/// Reasons a decoded record is rejected.
#[derive(Debug, Error, PartialEq)]
pub enum RecordError {
    #[error("missing `total_times`")]
    MissingTotalTimes,

    #[error("kind `{kind}` contradicts the fields present (iter_time present: {has_iter_time})")]
    KindMismatch { kind: TimerKind, has_iter_time: bool },

    #[error("{series} duration #{index} is {value}, expected finite non-negative seconds")]
    InvalidDuration {
        series: Series,
        index: usize,
        value: f64,
    },
}

/// Wire shape of a record, before validation.
#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct RecordFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    kind: Option<TimerKind>,
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default, deserialize_with = "present")]
    total_times: Option<Vec<f64>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    iter_time: Option<Vec<f64>>,
}

/// A series may be absent, but an explicit `null` is not a series.
fn present<'de, D>(deserializer: D) -> Result<Option<Vec<f64>>, D::Error>
where
    D: Deserializer<'de>,
{
    Vec::<f64>::deserialize(deserializer).map(Some)
}

pub(crate) fn check_durations(series: Series, values: &[f64]) -> Result<(), RecordError> {
    match values
        .iter()
        .enumerate()
        .find(|(_, v)| !v.is_finite() || **v < 0.0)
    {
        Some((index, &value)) => Err(RecordError::InvalidDuration {
            series,
            index,
            value,
        }),
        None => Ok(()),
    }
}

impl TryFrom<RecordFile> for TimeRecord {
    type Error = RecordError;

    fn try_from(file: RecordFile) -> Result<Self, Self::Error> {
        let has_iter_time = file.iter_time.is_some();
        let kind = match file.kind {
            Some(kind) => {
                let consistent = match kind {
                    TimerKind::PlainTiming => !has_iter_time,
                    TimerKind::IterationTiming => has_iter_time,
                };
                if !consistent {
                    return Err(RecordError::KindMismatch {
                        kind,
                        has_iter_time,
                    });
                }
                kind
            }
            None if has_iter_time => TimerKind::IterationTiming,
            None => TimerKind::PlainTiming,
        };

        let total_times = file.total_times.ok_or(RecordError::MissingTotalTimes)?;
        check_durations(Series::Total, &total_times)?;

        Ok(match (kind, file.iter_time) {
            (TimerKind::IterationTiming, Some(iter_time)) => {
                check_durations(Series::Iteration, &iter_time)?;
                TimeRecord::IterationTiming {
                    name: file.name,
                    description: file.description,
                    total_times,
                    iter_time,
                }
            }
            _ => TimeRecord::PlainTiming {
                name: file.name,
                description: file.description,
                total_times,
            },
        })
    }
}

impl From<TimeRecord> for RecordFile {
    fn from(record: TimeRecord) -> Self {
        let kind = Some(record.kind());
        match record {
            TimeRecord::PlainTiming {
                name,
                description,
                total_times,
            } => RecordFile {
                kind,
                name,
                description,
                total_times: Some(total_times),
                iter_time: None,
            },
            TimeRecord::IterationTiming {
                name,
                description,
                total_times,
                iter_time,
            } => RecordFile {
                kind,
                name,
                description,
                total_times: Some(total_times),
                iter_time: Some(iter_time),
            },
        }
    }
}
