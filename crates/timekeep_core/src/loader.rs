//! Reading and writing timer records, and the runtime timer sum type

use std::fs;
use std::path::Path;

use crate::error::{Result, TimingError};
use crate::record::{TimeRecord, TimerKind};
use crate::timer::{IterationTimer, Timer};

/// Either kind of timer, as reconstructed from a record.
#[derive(Debug, Clone)]
pub enum AnyTimer {
    Plain(Timer),
    Iteration(IterationTimer),
}

impl AnyTimer {
    pub fn kind(&self) -> TimerKind {
        match self {
            AnyTimer::Plain(_) => TimerKind::PlainTiming,
            AnyTimer::Iteration(_) => TimerKind::IterationTiming,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            AnyTimer::Plain(t) => t.name(),
            AnyTimer::Iteration(t) => t.name(),
        }
    }

    pub fn description(&self) -> &str {
        match self {
            AnyTimer::Plain(t) => t.description(),
            AnyTimer::Iteration(t) => t.description(),
        }
    }

    pub fn total_times(&self) -> &[f64] {
        match self {
            AnyTimer::Plain(t) => t.total_times(),
            AnyTimer::Iteration(t) => t.total_times(),
        }
    }

    pub fn total_time(&self) -> f64 {
        match self {
            AnyTimer::Plain(t) => t.total_time(),
            AnyTimer::Iteration(t) => t.total_time(),
        }
    }

    /// Per-iteration durations, `None` for plain timers.
    pub fn iteration_times(&self) -> Option<&[f64]> {
        match self {
            AnyTimer::Plain(_) => None,
            AnyTimer::Iteration(t) => Some(t.get_iteration_times()),
        }
    }

    pub fn get_info(&self) -> TimeRecord {
        match self {
            AnyTimer::Plain(t) => t.get_info(),
            AnyTimer::Iteration(t) => t.get_info(),
        }
    }

    pub fn dump(&self, path: impl AsRef<Path>) -> Result<()> {
        write_record(path, &self.get_info())
    }
}

impl From<Timer> for AnyTimer {
    fn from(timer: Timer) -> Self {
        AnyTimer::Plain(timer)
    }
}

impl From<IterationTimer> for AnyTimer {
    fn from(timer: IterationTimer) -> Self {
        AnyTimer::Iteration(timer)
    }
}

impl From<TimeRecord> for AnyTimer {
    fn from(record: TimeRecord) -> Self {
        match record {
            TimeRecord::PlainTiming {
                name,
                description,
                total_times,
            } => AnyTimer::Plain(Timer::from_parts(name, description, total_times)),
            TimeRecord::IterationTiming {
                name,
                description,
                total_times,
                iter_time,
            } => AnyTimer::Iteration(IterationTimer::from_parts(
                name,
                description,
                total_times,
                iter_time,
            )),
        }
    }
}

/// Read and validate the record stored at `path`.
pub fn read_record(path: impl AsRef<Path>) -> Result<TimeRecord> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|e| TimingError::io(path, e))?;
    serde_json::from_str(&contents).map_err(|e| TimingError::record(path, e))
}

pub fn write_record(path: impl AsRef<Path>, record: &TimeRecord) -> Result<()> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(record).map_err(|e| TimingError::record(path, e))?;
    fs::write(path, json).map_err(|e| TimingError::io(path, e))?;
    tracing::debug!(path = %path.display(), kind = %record.kind(), "timer record written");
    Ok(())
}

/// Load the timer stored at `path`, picking the variant from the record.
pub fn load_timer(path: impl AsRef<Path>) -> Result<AnyTimer> {
    let path = path.as_ref();
    let record = read_record(path)?;
    tracing::debug!(path = %path.display(), kind = %record.kind(), "timer record loaded");
    Ok(AnyTimer::from(record))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn dump_then_load_reproduces_plain_timer() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plain.json");

        let mut timer = Timer::new("assemble", "global matrix");
        timer.record(Duration::from_millis(10));
        timer.record(Duration::from_millis(30));
        timer.dump(&path).unwrap();

        let loaded = load_timer(&path).unwrap();
        assert_eq!(loaded.kind(), TimerKind::PlainTiming);
        assert_eq!(loaded.get_info(), timer.get_info());
        assert!(loaded.iteration_times().is_none());
    }

    #[test]
    fn dump_then_load_reproduces_iteration_timer() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("iter.json");

        let mut timer = IterationTimer::new("cg", "");
        timer.start();
        for _ in 0..3 {
            timer.time_iter(|| std::hint::black_box(1 + 1));
        }
        timer.stop().unwrap();
        timer.dump(&path).unwrap();

        let loaded = load_timer(&path).unwrap();
        assert_eq!(loaded.kind(), TimerKind::IterationTiming);
        assert_eq!(loaded.get_info(), timer.get_info());
        assert_eq!(loaded.iteration_times().map(<[f64]>::len), Some(3));
    }

    #[test]
    fn legacy_untagged_files_load_by_shape() {
        let dir = tempfile::tempdir().unwrap();
        let plain = dir.path().join("plain.json");
        let iter = dir.path().join("iter.json");
        fs::write(&plain, r#"{"name": "p", "description": "", "total_times": [2.0]}"#).unwrap();
        fs::write(
            &iter,
            r#"{"iter_time": [0.25, 0.25], "name": "i", "description": "", "total_times": [1.0]}"#,
        )
        .unwrap();

        assert!(matches!(load_timer(&plain).unwrap(), AnyTimer::Plain(_)));
        match load_timer(&iter).unwrap() {
            AnyTimer::Iteration(t) => assert_eq!(t.get_iteration_times(), &[0.25, 0.25]),
            other => panic!("expected an iteration timer, got {other:?}"),
        }
    }

    #[test]
    fn malformed_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();

        let err = load_timer(&path).unwrap_err();
        assert!(matches!(err, TimingError::RecordParse { .. }));
        assert!(err.to_string().contains("broken.json"), "{err}");
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_timer(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, TimingError::Io { .. }));
    }
}
