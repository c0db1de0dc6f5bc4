//! Timekeep Core - wall-clock timing for benchmarks
//!
//! Measure operations with [`Timer`] and [`IterationTimer`], persist each
//! worker's timer as JSON, then aggregate the per-worker files of a parallel
//! run into a [`ParallelTimerArray`] and a sweep of runs into a
//! [`BenchmarkTimerArray`] for scaling analysis.
//!
//! # Usage
//!
//! ```no_run
//! use timekeep_core::{BenchmarkTimerArray, ParallelTimerArray, Timer};
//!
//! # fn main() -> timekeep_core::Result<()> {
//! // on each worker
//! let mut timer = Timer::new("solve", "");
//! timer.start();
//! // ... do work ...
//! timer.stop()?;
//! timer.dump("runs/4/rank_0.json")?;
//!
//! // afterwards, on one process
//! let sweep = BenchmarkTimerArray::new(vec![
//!     ParallelTimerArray::from_dir("runs/1")?,
//!     ParallelTimerArray::from_dir("runs/4")?,
//! ]);
//! println!("{:?}", sweep.compute_efficiencies()?);
//! # Ok(())
//! # }
//! ```

mod benchmark;
mod error;
mod loader;
mod parallel;
mod record;
mod stats;
mod timer;
mod worker_id;

pub use benchmark::BenchmarkTimerArray;
pub use error::{Result, Series, TimingError};
pub use loader::{load_timer, read_record, write_record, AnyTimer};
pub use parallel::ParallelTimerArray;
pub use record::{RecordError, TimeRecord, TimerKind};
pub use stats::SeriesSummary;
pub use timer::{IterationTimer, Timer};
pub use worker_id::{parse_worker_id, worker_file_name, WorkerId, RECORD_EXTENSION};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
