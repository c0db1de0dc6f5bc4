//! Report construction and rendering

use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use timekeep_core::{
    load_timer, AnyTimer, BenchmarkTimerArray, ParallelTimerArray, SeriesSummary, TimerKind,
};
use timekeep_services::{ReportFormat, Settings};

/// Plain-text rendering of a report.
pub trait Table {
    fn to_table(&self, precision: usize) -> String;
}

pub fn render<R: Serialize + Table>(report: &R, settings: &Settings) -> Result<String> {
    match settings.report.format {
        ReportFormat::Table => Ok(report.to_table(settings.report.precision)),
        ReportFormat::Json => {
            serde_json::to_string_pretty(report).context("failed to serialize report")
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TimerReport {
    pub name: String,
    pub description: String,
    pub kind: TimerKind,
    pub total_time: f64,
    pub intervals: Option<SeriesSummary>,
    pub iterations: Option<SeriesSummary>,
}

impl TimerReport {
    pub fn from_timer(timer: &AnyTimer) -> Self {
        Self {
            name: timer.name().to_string(),
            description: timer.description().to_string(),
            kind: timer.kind(),
            total_time: timer.total_time(),
            intervals: SeriesSummary::from_samples(timer.total_times()),
            iterations: timer.iteration_times().and_then(SeriesSummary::from_samples),
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let timer = load_timer(path)
            .with_context(|| format!("failed to load timer {}", path.display()))?;
        Ok(Self::from_timer(&timer))
    }
}

fn summary_line(out: &mut String, label: &str, summary: &Option<SeriesSummary>, p: usize) {
    match summary {
        Some(s) => {
            let _ = writeln!(
                out,
                "{label:<12} n={} total={:.p$} mean={:.p$} min={:.p$} max={:.p$}",
                s.count, s.total, s.mean, s.min, s.max
            );
        }
        None => {
            let _ = writeln!(out, "{label:<12} none");
        }
    }
}

impl Table for TimerReport {
    fn to_table(&self, p: usize) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{:<12} {}", "name", self.name);
        if !self.description.is_empty() {
            let _ = writeln!(out, "{:<12} {}", "description", self.description);
        }
        let _ = writeln!(out, "{:<12} {}", "kind", self.kind);
        let _ = writeln!(out, "{:<12} {:.p$} s", "total time", self.total_time);
        summary_line(&mut out, "intervals", &self.intervals, p);
        if self.kind == TimerKind::IterationTiming {
            summary_line(&mut out, "iterations", &self.iterations, p);
        }
        out
    }
}

#[derive(Debug, Serialize)]
pub struct WorkerRow {
    pub worker: u32,
    pub name: String,
    pub total_time: f64,
    pub iterations: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct SummaryReport {
    pub name: String,
    pub n_cpus: usize,
    pub total_time: f64,
    pub total_cpu_time: f64,
    pub mean_time: f64,
    pub workers: Vec<WorkerRow>,
}

impl SummaryReport {
    pub fn from_run(run: &ParallelTimerArray) -> Result<Self> {
        let workers = run
            .iter()
            .map(|(id, timer)| WorkerRow {
                worker: id.0,
                name: timer.name().to_string(),
                total_time: timer.total_time(),
                iterations: timer.iteration_times().map(<[f64]>::len),
            })
            .collect();

        Ok(Self {
            name: run.name().to_string(),
            n_cpus: run.n_cpus(),
            total_time: run.total_time()?,
            total_cpu_time: run.total_cpu_time()?,
            mean_time: run.mean_time()?,
            workers,
        })
    }

    pub fn load(dir: &Path) -> Result<Self> {
        let run = ParallelTimerArray::from_dir(dir)
            .with_context(|| format!("failed to load worker timers from {}", dir.display()))?;
        Self::from_run(&run).with_context(|| format!("cannot summarize {}", dir.display()))
    }
}

impl Table for SummaryReport {
    fn to_table(&self, p: usize) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "run '{}' with {} workers", self.name, self.n_cpus);
        let _ = writeln!(out, "{:>8} {:>14} {:>10}  name", "worker", "time (s)", "iters");
        for row in &self.workers {
            let iterations = row
                .iterations
                .map(|n| n.to_string())
                .unwrap_or_else(|| "-".to_string());
            let _ = writeln!(
                out,
                "{:>8} {:>14.p$} {:>10}  {}",
                row.worker, row.total_time, iterations, row.name
            );
        }
        let _ = writeln!(out, "wall time   {:.p$} s", self.total_time);
        let _ = writeln!(out, "cpu time    {:.p$} s", self.total_cpu_time);
        let _ = writeln!(out, "mean time   {:.p$} s", self.mean_time);
        out
    }
}

#[derive(Debug, Serialize)]
pub struct ScalingRow {
    pub run: String,
    pub n_cpus: usize,
    pub total_time: f64,
    pub total_cpu_time: f64,
    pub speedup: f64,
    pub efficiency: f64,
}

#[derive(Debug, Serialize)]
pub struct ScalingReport {
    pub runs: Vec<ScalingRow>,
}

impl ScalingReport {
    pub fn from_sweep(sweep: &BenchmarkTimerArray) -> Result<Self> {
        let speedups = sweep.compute_speedups()?;
        let efficiencies = sweep.compute_efficiencies()?;

        let runs = sweep
            .iter()
            .zip(speedups)
            .zip(efficiencies)
            .map(|((run, speedup), efficiency)| {
                Ok(ScalingRow {
                    run: run.name().to_string(),
                    n_cpus: run.n_cpus(),
                    total_time: run.total_time()?,
                    total_cpu_time: run.total_cpu_time()?,
                    speedup,
                    efficiency,
                })
            })
            .collect::<timekeep_core::Result<Vec<_>>>()?;

        Ok(Self { runs })
    }

    pub fn load<P: AsRef<Path>>(dirs: &[P]) -> Result<Self> {
        let runs = dirs
            .iter()
            .map(|dir| {
                let dir = dir.as_ref();
                ParallelTimerArray::from_dir(dir)
                    .with_context(|| format!("failed to load worker timers from {}", dir.display()))
            })
            .collect::<Result<Vec<_>>>()?;
        let sweep = BenchmarkTimerArray::new(runs);
        Self::from_sweep(&sweep).context("cannot compute scaling")
    }
}

impl Table for ScalingReport {
    fn to_table(&self, p: usize) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{:<16} {:>8} {:>14} {:>14} {:>9} {:>10}",
            "run", "workers", "wall (s)", "cpu (s)", "speed-up", "efficiency"
        );
        for row in &self.runs {
            let _ = writeln!(
                out,
                "{:<16} {:>8} {:>14.p$} {:>14.p$} {:>9.p$} {:>10.p$}",
                row.run, row.n_cpus, row.total_time, row.total_cpu_time, row.speedup, row.efficiency
            );
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use timekeep_core::{worker_file_name, IterationTimer, Timer, TimingError, WorkerId};

    fn write_run(root: &Path, name: &str, times: &[f64]) -> PathBuf {
        let dir = root.join(name);
        std::fs::create_dir_all(&dir).unwrap();
        for (rank, &t) in times.iter().enumerate() {
            let file = worker_file_name("rank_", WorkerId(rank as u32)).unwrap();
            Timer::with_times(format!("rank {rank}"), "", vec![t])
                .unwrap()
                .dump(dir.join(file))
                .unwrap();
        }
        dir
    }

    #[test]
    fn scaling_report_from_directories() {
        let root = tempfile::tempdir().unwrap();
        let serial = write_run(root.path(), "1cpu", &[100.0]);
        let quad = write_run(root.path(), "4cpus", &[30.0, 30.0, 25.0, 35.0]);

        let report = ScalingReport::load(&[serial, quad]).unwrap();
        assert_eq!(report.runs.len(), 2);
        assert_eq!(report.runs[0].efficiency, 1.0);
        assert_eq!(report.runs[1].n_cpus, 4);
        assert_eq!(report.runs[1].total_time, 35.0);
        assert!((report.runs[1].efficiency - 100.0 / 120.0).abs() < 1e-12);

        let table = report.to_table(2);
        assert!(table.contains("4cpus"));
        assert!(table.contains("0.83"));
    }

    #[test]
    fn scaling_without_serial_run_fails() {
        let root = tempfile::tempdir().unwrap();
        let dual = write_run(root.path(), "2cpus", &[1.0, 1.0]);

        let err = ScalingReport::load(&[dual]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<TimingError>(),
            Some(TimingError::MissingBaseline { .. })
        ));
    }

    #[test]
    fn summary_report_lists_workers() {
        let root = tempfile::tempdir().unwrap();
        let dir = write_run(root.path(), "3cpus", &[10.0, 12.0, 9.0]);

        let report = SummaryReport::load(&dir).unwrap();
        assert_eq!(report.name, "3cpus");
        assert_eq!(report.n_cpus, 3);
        assert_eq!(report.total_cpu_time, 31.0);
        assert_eq!(report.total_time, 12.0);
        let ids: Vec<u32> = report.workers.iter().map(|w| w.worker).collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[test]
    fn empty_run_directory_is_an_error() {
        let root = tempfile::tempdir().unwrap();
        let err = SummaryReport::load(root.path()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<TimingError>(),
            Some(TimingError::EmptyAggregate { .. })
        ));
    }

    #[test]
    fn timer_report_includes_iterations() {
        let root = tempfile::tempdir().unwrap();
        let path = root.path().join("cg.json");
        IterationTimer::with_times("cg", "solver", vec![2.0], vec![0.5, 1.5])
            .unwrap()
            .dump(&path)
            .unwrap();

        let report = TimerReport::load(&path).unwrap();
        assert_eq!(report.kind, TimerKind::IterationTiming);
        let iterations = report.iterations.unwrap();
        assert_eq!(iterations.count, 2);
        assert_eq!(iterations.mean, 1.0);
        assert!(report.to_table(3).contains("iterations   n=2"));
    }

    #[test]
    fn json_rendering_follows_settings() {
        let timer = Timer::with_times("t", "", vec![1.0]).unwrap();
        let report = TimerReport::from_timer(&AnyTimer::from(timer));
        let mut settings = Settings::default();
        settings.report.format = ReportFormat::Json;

        let json = render(&report, &settings).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["kind"], "plain_timing");
        assert!(value["iterations"].is_null());
    }
}
