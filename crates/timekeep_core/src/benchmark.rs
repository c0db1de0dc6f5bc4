//! Scaling sweeps across worker counts

use crate::error::{Result, TimingError};
use crate::parallel::ParallelTimerArray;

/// Parallel runs of the same workload at different worker counts.
///
/// Exactly one run must use a single worker; it is the serial baseline that
/// speed-up and efficiency are measured against.
#[derive(Debug, Clone, Default)]
pub struct BenchmarkTimerArray {
    runs: Vec<ParallelTimerArray>,
}

impl BenchmarkTimerArray {
    pub fn new(runs: Vec<ParallelTimerArray>) -> Self {
        Self { runs }
    }

    pub fn push(&mut self, run: ParallelTimerArray) {
        self.runs.push(run);
    }

    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ParallelTimerArray> {
        self.runs.iter()
    }

    /// The single-worker run.
    pub fn baseline(&self) -> Result<&ParallelTimerArray> {
        let mut serial = self.runs.iter().filter(|run| run.n_cpus() == 1);
        let baseline = serial.next().ok_or(TimingError::MissingBaseline {
            members: self.runs.len(),
        })?;
        let extra = serial.count();
        if extra > 0 {
            return Err(TimingError::AmbiguousBaseline { count: extra + 1 });
        }
        Ok(baseline)
    }

    /// Strong-scaling efficiency of every run, in stored order:
    /// `baseline.total_time / run.total_cpu_time`.
    pub fn compute_efficiencies(&self) -> Result<Vec<f64>> {
        let serial_time = self.baseline()?.total_time()?;
        self.runs
            .iter()
            .map(|run| Ok(serial_time / run.total_cpu_time()?))
            .collect()
    }

    /// Speed-up of every run over the baseline: `baseline.total_time / run.total_time`.
    pub fn compute_speedups(&self) -> Result<Vec<f64>> {
        let serial_time = self.baseline()?.total_time()?;
        self.runs
            .iter()
            .map(|run| Ok(serial_time / run.total_time()?))
            .collect()
    }

    pub fn worker_counts(&self) -> Vec<usize> {
        self.runs.iter().map(ParallelTimerArray::n_cpus).collect()
    }

    /// Wall-clock time of every run.
    pub fn total_times(&self) -> Result<Vec<f64>> {
        self.runs.iter().map(ParallelTimerArray::total_time).collect()
    }
}

impl From<Vec<ParallelTimerArray>> for BenchmarkTimerArray {
    fn from(runs: Vec<ParallelTimerArray>) -> Self {
        Self::new(runs)
    }
}

impl<'a> IntoIterator for &'a BenchmarkTimerArray {
    type Item = &'a ParallelTimerArray;
    type IntoIter = std::slice::Iter<'a, ParallelTimerArray>;

    fn into_iter(self) -> Self::IntoIter {
        self.runs.iter()
    }
}

impl IntoIterator for BenchmarkTimerArray {
    type Item = ParallelTimerArray;
    type IntoIter = std::vec::IntoIter<ParallelTimerArray>;

    fn into_iter(self) -> Self::IntoIter {
        self.runs.into_iter()
    }
}
