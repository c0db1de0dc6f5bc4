//! Timers of one parallel run, keyed by worker

use std::collections::btree_map::{self, BTreeMap};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, TimingError};
use crate::loader::{load_timer, AnyTimer};
use crate::stats::SeriesSummary;
use crate::worker_id::{parse_worker_id, WorkerId, RECORD_EXTENSION};

/// One timer per worker, all taken during the same parallel run.
///
/// Workers run concurrently, so the wall-clock length of the run is the
/// slowest worker's time while the CPU time is the sum over workers.
#[derive(Debug, Clone, Default)]
pub struct ParallelTimerArray {
    name: String,
    description: String,
    timers: BTreeMap<WorkerId, AnyTimer>,
}

impl ParallelTimerArray {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            timers: BTreeMap::new(),
        }
    }

    pub fn with_timers(
        name: impl Into<String>,
        description: impl Into<String>,
        timers: impl IntoIterator<Item = (WorkerId, AnyTimer)>,
    ) -> Self {
        Self {
            timers: timers.into_iter().collect(),
            ..Self::new(name, description)
        }
    }

    /// Load every worker file found in `dir`, naming the array after it.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let name = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mut array = Self::new(name, "");
        array.load(dir)?;
        Ok(array)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Store `timer` for worker `id`, returning any timer it replaces.
    pub fn insert(&mut self, id: WorkerId, timer: impl Into<AnyTimer>) -> Option<AnyTimer> {
        self.timers.insert(id, timer.into())
    }

    pub fn get(&self, id: WorkerId) -> Option<&AnyTimer> {
        self.timers.get(&id)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, WorkerId, AnyTimer> {
        self.timers.iter()
    }

    pub fn worker_ids(&self) -> impl Iterator<Item = WorkerId> + '_ {
        self.timers.keys().copied()
    }

    /// Discover and load the worker files in `dir`.
    ///
    /// Candidates are the non-hidden regular files with a `.json` extension.
    /// Every candidate must carry a worker id in its name.
    pub fn load(&mut self, dir: impl AsRef<Path>) -> Result<()> {
        let files = discover_worker_files(dir.as_ref())?;
        self.load_files(files)
    }

    /// Load an explicit list of worker files.
    ///
    /// All files are read before any entry changes, so a failed load leaves
    /// the array as it was.
    pub fn load_files<I, P>(&mut self, files: I) -> Result<()>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut keyed = files
            .into_iter()
            .map(|file| {
                let file = file.as_ref().to_path_buf();
                parse_worker_id(&file).map(|id| (id, file))
            })
            .collect::<Result<Vec<(WorkerId, PathBuf)>>>()?;
        keyed.sort_by_key(|(id, _)| *id);

        let loaded = keyed
            .into_iter()
            .map(|(id, file)| load_timer(&file).map(|timer| (id, file, timer)))
            .collect::<Result<Vec<_>>>()?;

        for (id, file, timer) in loaded {
            if self.timers.insert(id, timer).is_some() {
                tracing::warn!(
                    array = %self.name,
                    worker = %id,
                    path = %file.display(),
                    "worker timer replaced by a later file"
                );
            }
        }

        tracing::debug!(array = %self.name, workers = self.n_cpus(), "parallel timers loaded");
        Ok(())
    }

    fn summary(&self) -> Result<SeriesSummary> {
        let totals: Vec<f64> = self.timers.values().map(AnyTimer::total_time).collect();
        SeriesSummary::from_samples(&totals).ok_or_else(|| TimingError::EmptyAggregate {
            name: self.name.clone(),
        })
    }

    /// Sum of every worker's time: the core-seconds spent on the run.
    pub fn total_cpu_time(&self) -> Result<f64> {
        Ok(self.summary()?.total)
    }

    /// Time of the slowest worker: the wall-clock length of the run.
    pub fn total_time(&self) -> Result<f64> {
        Ok(self.summary()?.max)
    }

    pub fn mean_time(&self) -> Result<f64> {
        Ok(self.summary()?.mean)
    }

    pub fn n_cpus(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }
}

impl<'a> IntoIterator for &'a ParallelTimerArray {
    type Item = (&'a WorkerId, &'a AnyTimer);
    type IntoIter = btree_map::Iter<'a, WorkerId, AnyTimer>;

    fn into_iter(self) -> Self::IntoIter {
        self.timers.iter()
    }
}

fn discover_worker_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| TimingError::io(dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| TimingError::io(dir, e))?;
        let path = entry.path();
        let hidden = entry.file_name().to_string_lossy().starts_with('.');
        let is_record = path.extension().is_some_and(|ext| ext == RECORD_EXTENSION);
        if hidden || !is_record || !path.is_file() {
            continue;
        }
        files.push(path);
    }

    tracing::debug!(dir = %dir.display(), files = files.len(), "worker files discovered");
    Ok(files)
}
