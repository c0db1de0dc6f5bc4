//! Summary statistics over duration series

use serde::Serialize;

/// Count, sum, mean and range of a series of durations (seconds).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesSummary {
    pub count: usize,
    pub total: f64,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

impl SeriesSummary {
    /// Summarize `samples`, or `None` when there is nothing to summarize.
    pub fn from_samples(samples: &[f64]) -> Option<Self> {
        let (&first, rest) = samples.split_first()?;

        let (min, max) = rest
            .iter()
            .fold((first, first), |(lo, hi), &x| (lo.min(x), hi.max(x)));
        let total: f64 = samples.iter().sum();

        Some(Self {
            count: samples.len(),
            total,
            mean: total / samples.len() as f64,
            min,
            max,
        })
    }
}
