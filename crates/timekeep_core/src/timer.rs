//! Wall-clock timers with resumable intervals

use std::path::Path;
use std::time::{Duration, Instant};

use crate::error::{Result, Series, TimingError};
use crate::loader;
use crate::record::{check_durations, TimeRecord, TimerKind};

/// Accumulates one or more non-overlapping start/stop intervals.
///
/// ```
/// use timekeep_core::Timer;
///
/// let mut timer = Timer::new("assemble", "matrix assembly");
/// timer.start();
/// // ... do work ...
/// timer.stop().unwrap();
/// assert_eq!(timer.total_times().len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Timer {
    name: String,
    description: String,
    total_times: Vec<f64>,
    start_time: Option<Instant>,
}

impl Timer {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            total_times: Vec::new(),
            start_time: None,
        }
    }

    /// Build a timer from intervals that were measured elsewhere.
    ///
    /// Every interval must be a finite, non-negative number of seconds.
    pub fn with_times(
        name: impl Into<String>,
        description: impl Into<String>,
        total_times: Vec<f64>,
    ) -> Result<Self> {
        let name = name.into();
        check_durations(Series::Total, &total_times).map_err(|source| {
            TimingError::InvalidDurations {
                name: name.clone(),
                source,
            }
        })?;
        Ok(Self::from_parts(name, description.into(), total_times))
    }

    /// Assemble a timer from an already validated record.
    pub(crate) fn from_parts(name: String, description: String, total_times: Vec<f64>) -> Self {
        Self {
            total_times,
            ..Self::new(name, description)
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn total_times(&self) -> &[f64] {
        &self.total_times
    }

    pub fn is_running(&self) -> bool {
        self.start_time.is_some()
    }

    /// Begin an interval. A pending start is replaced.
    pub fn start(&mut self) {
        if self.start_time.is_some() {
            tracing::debug!(timer = %self.name, "restarting timer with a pending start");
        }
        self.start_time = Some(Instant::now());
    }

    /// End the pending interval and return its length in seconds.
    pub fn stop(&mut self) -> Result<f64> {
        let start = self.start_time.take().ok_or_else(|| TimingError::InvalidState {
            name: self.name.clone(),
            series: Series::Total,
        })?;
        let elapsed = start.elapsed().as_secs_f64();
        self.total_times.push(elapsed);
        tracing::trace!(timer = %self.name, elapsed, "interval recorded");
        Ok(elapsed)
    }

    /// Append an interval measured by the caller.
    pub fn record(&mut self, elapsed: Duration) {
        self.total_times.push(elapsed.as_secs_f64());
    }

    /// Time one call of `f` as a single interval.
    pub fn time<F, R>(&mut self, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let start = Instant::now();
        let result = f();
        self.record(start.elapsed());
        result
    }

    /// Sum of all recorded intervals, in seconds.
    pub fn total_time(&self) -> f64 {
        self.total_times.iter().sum()
    }

    pub fn get_info(&self) -> TimeRecord {
        TimeRecord::PlainTiming {
            name: self.name.clone(),
            description: self.description.clone(),
            total_times: self.total_times.clone(),
        }
    }

    pub fn dump(&self, path: impl AsRef<Path>) -> Result<()> {
        loader::write_record(path, &self.get_info())
    }

    /// Replace the persisted state with the record stored at `path`.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        match loader::read_record(path)? {
            TimeRecord::PlainTiming {
                name,
                description,
                total_times,
            } => {
                *self = Self::from_parts(name, description, total_times);
                Ok(())
            }
            other => Err(mismatch(path, TimerKind::PlainTiming, other.kind())),
        }
    }
}

/// A [`Timer`] with a second, independent series of per-iteration durations.
///
/// The iteration series may be nested inside the total series or not; no
/// relation between the two is enforced.
#[derive(Debug, Clone, Default)]
pub struct IterationTimer {
    timer: Timer,
    iter_time: Vec<f64>,
    start_time_iter: Option<Instant>,
}

impl IterationTimer {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            timer: Timer::new(name, description),
            iter_time: Vec::new(),
            start_time_iter: None,
        }
    }

    pub fn with_times(
        name: impl Into<String>,
        description: impl Into<String>,
        total_times: Vec<f64>,
        iter_time: Vec<f64>,
    ) -> Result<Self> {
        let timer = Timer::with_times(name, description, total_times)?;
        check_durations(Series::Iteration, &iter_time).map_err(|source| {
            TimingError::InvalidDurations {
                name: timer.name.clone(),
                source,
            }
        })?;
        Ok(Self {
            timer,
            iter_time,
            start_time_iter: None,
        })
    }

    pub(crate) fn from_parts(
        name: String,
        description: String,
        total_times: Vec<f64>,
        iter_time: Vec<f64>,
    ) -> Self {
        Self {
            timer: Timer::from_parts(name, description, total_times),
            iter_time,
            start_time_iter: None,
        }
    }

    pub fn name(&self) -> &str {
        self.timer.name()
    }

    pub fn description(&self) -> &str {
        self.timer.description()
    }

    pub fn total_times(&self) -> &[f64] {
        self.timer.total_times()
    }

    pub fn total_time(&self) -> f64 {
        self.timer.total_time()
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_running()
    }

    pub fn is_iterating(&self) -> bool {
        self.start_time_iter.is_some()
    }

    pub fn start(&mut self) {
        self.timer.start();
    }

    pub fn stop(&mut self) -> Result<f64> {
        self.timer.stop()
    }

    pub fn record(&mut self, elapsed: Duration) {
        self.timer.record(elapsed);
    }

    pub fn time<F, R>(&mut self, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        self.timer.time(f)
    }

    pub fn start_iter(&mut self) {
        if self.start_time_iter.is_some() {
            tracing::debug!(timer = %self.timer.name, "restarting iteration with a pending start");
        }
        self.start_time_iter = Some(Instant::now());
    }

    pub fn stop_iter(&mut self) -> Result<f64> {
        let start = self
            .start_time_iter
            .take()
            .ok_or_else(|| TimingError::InvalidState {
                name: self.timer.name.clone(),
                series: Series::Iteration,
            })?;
        let elapsed = start.elapsed().as_secs_f64();
        self.iter_time.push(elapsed);
        tracing::trace!(timer = %self.timer.name, elapsed, "iteration recorded");
        Ok(elapsed)
    }

    pub fn record_iteration(&mut self, elapsed: Duration) {
        self.iter_time.push(elapsed.as_secs_f64());
    }

    pub fn time_iter<F, R>(&mut self, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let start = Instant::now();
        let result = f();
        self.record_iteration(start.elapsed());
        result
    }

    pub fn get_iteration_times(&self) -> &[f64] {
        &self.iter_time
    }

    pub fn get_info(&self) -> TimeRecord {
        TimeRecord::IterationTiming {
            name: self.timer.name.clone(),
            description: self.timer.description.clone(),
            total_times: self.timer.total_times.clone(),
            iter_time: self.iter_time.clone(),
        }
    }

    pub fn dump(&self, path: impl AsRef<Path>) -> Result<()> {
        loader::write_record(path, &self.get_info())
    }

    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        match loader::read_record(path)? {
            TimeRecord::IterationTiming {
                name,
                description,
                total_times,
                iter_time,
            } => {
                *self = Self::from_parts(name, description, total_times, iter_time);
                Ok(())
            }
            other => Err(mismatch(path, TimerKind::IterationTiming, other.kind())),
        }
    }
}

fn mismatch(path: &Path, expected: TimerKind, found: TimerKind) -> TimingError {
    TimingError::record(path, format!("expected {expected} record, found {found}"))
}
