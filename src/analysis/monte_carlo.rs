// src/analysis/monte_carlo.rs

use serde::{Serialize, Deserialize};
use anyhow::Result;
use statrs::statistics::{Data, Median, Statistics};
use tracing::{debug, info};
use crate::config::{Demand, MethodRef};
use crate::error::ReportError;
use super::density::{linspace, GaussianKde};
use super::histogram::DensityHistogram;
use super::sampling::UncertaintySampler;

/// Points on the smoothed density curve.
pub const KDE_POINTS: usize = 500;

/// How many histogram bins to use for a given sample count.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BinPolicy {
    /// `max(100, min(20, floor(sqrt(n))))`, which is always 100.
    Literal,
    /// `min(100, max(20, floor(sqrt(n))))`: grows with the sample count
    /// between 20 and 100 bins.
    Scaled,
}

impl Default for BinPolicy {
    fn default() -> Self {
        BinPolicy::Literal
    }
}

impl BinPolicy {
    pub fn bin_count(self, iterations: usize) -> usize {
        let root = (iterations as f64).sqrt().floor() as usize;
        match self {
            BinPolicy::Literal => 100_usize.max(20_usize.min(root)),
            BinPolicy::Scaled => 100_usize.min(20_usize.max(root)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MonteCarloSettings {
    /// 0 disables the uncertainty analysis
    pub iterations: usize,
    /// Parallelism hint for the sampler
    pub cpus: Option<usize>,
    /// Fraction trimmed from each tail before smoothing and binning
    pub outliers: f64,
    /// Percentiles of the untrimmed samples reported as the interval
    pub interval: [f64; 2],
    pub bins: BinPolicy,
}

impl Default for MonteCarloSettings {
    fn default() -> Self {
        Self {
            iterations: 10000,
            cpus: None,
            outliers: 0.025,
            interval: [0.015, 0.985],
            bins: BinPolicy::Literal,
        }
    }
}

impl MonteCarloSettings {
    pub fn with_iterations(iterations: usize) -> Self {
        Self {
            iterations,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ReportError> {
        if !(0.0..0.5).contains(&self.outliers) {
            return Err(ReportError::invalid_settings(format!(
                "outliers must be in [0, 0.5), got {}",
                self.outliers
            )));
        }
        let [lower, upper] = self.interval;
        if !(0.0..1.0).contains(&lower) || !(0.0..1.0).contains(&upper) || lower > upper {
            return Err(ReportError::invalid_settings(format!(
                "interval percentiles must satisfy 0 <= lower <= upper < 1, got [{}, {}]",
                lower, upper
            )));
        }
        if self.cpus == Some(0) {
            return Err(ReportError::invalid_settings("cpus must be at least 1"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SummaryStatistics {
    pub median: f64,
    pub mean: f64,
    pub interval: [f64; 2],
}

/// The `monte carlo` block of a report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UncertaintySummary {
    /// `[x, density]` points of the KDE curve
    pub smoothed: Vec<(f64, f64)>,
    /// Step outline of the density histogram
    pub histogram: Vec<(f64, f64)>,
    pub statistics: SummaryStatistics,
}

/// Sorted raw samples and the summary derived from them. `summary` is
/// `None` when the samples show no uncertainty.
#[derive(Debug, Clone, PartialEq)]
pub struct MonteCarloRun {
    pub samples: Vec<f64>,
    pub summary: Option<UncertaintySummary>,
}

/// Index of percentile `p` in `n` sorted samples.
fn percentile_index(p: f64, n: usize) -> usize {
    ((p * n as f64).floor() as usize).min(n.saturating_sub(1))
}

/// Drops `floor(outliers * n)` values from each end of `sorted`.
pub fn trim_outliers(sorted: &[f64], outliers: f64) -> &[f64] {
    let n = sorted.len();
    let offset = (outliers * n as f64).floor() as usize;
    if offset * 2 >= n {
        return &sorted[0..0];
    }
    &sorted[offset..n - offset]
}

fn has_spread(sorted: &[f64]) -> bool {
    matches!((sorted.first(), sorted.last()), (Some(first), Some(last)) if first != last)
}

/// Whether `points` evenly spaced positions over the range of `sorted` are
/// all distinct. Ranges a few ulps wide collapse and would give zero-width
/// bins.
fn resolves(sorted: &[f64], points: usize) -> bool {
    match (sorted.first(), sorted.last()) {
        (Some(&first), Some(&last)) => linspace(first, last, points)
            .windows(2)
            .all(|pair| pair[0] < pair[1]),
        _ => false,
    }
}

/// Draws `settings.iterations` samples and summarizes them. Returns `None`
/// without calling the sampler when `iterations` is 0.
pub fn run_monte_carlo(
    sampler: &dyn UncertaintySampler,
    demand: &Demand,
    method: &MethodRef,
    settings: &MonteCarloSettings,
) -> Result<Option<MonteCarloRun>> {
    settings.validate()?;
    if settings.iterations == 0 {
        debug!("Monte Carlo not requested");
        return Ok(None);
    }

    info!(iterations = settings.iterations, cpus = ?settings.cpus, "running Monte Carlo analysis");
    let samples = sampler.sample(demand, method, settings.iterations, settings.cpus)?;
    summarize(samples, settings).map(Some)
}

/// Turns raw scores into the report summary.
///
/// The interval comes from the untrimmed samples at the configured
/// percentiles. The density curve, histogram, median and mean use the
/// samples left after trimming `outliers` from each tail.
pub fn summarize(mut samples: Vec<f64>, settings: &MonteCarloSettings) -> Result<MonteCarloRun> {
    settings.validate()?;
    if samples.len() != settings.iterations {
        return Err(ReportError::SampleCountMismatch {
            expected: settings.iterations,
            actual: samples.len(),
        }.into());
    }
    if let Some(index) = samples.iter().position(|s| !s.is_finite()) {
        return Err(ReportError::NonFiniteSample { index }.into());
    }

    samples.sort_by(|a, b| a.total_cmp(b));

    if !has_spread(&samples) {
        debug!(samples = samples.len(), "no uncertainty in samples, skipping summary");
        return Ok(MonteCarloRun { samples, summary: None });
    }

    let n = samples.len();
    let lower = samples[percentile_index(settings.interval[0], n)];
    let upper = samples[percentile_index(settings.interval[1], n)];

    let trimmed = trim_outliers(&samples, settings.outliers);
    debug!(samples = n, kept = trimmed.len(), "trimmed outliers");
    if !has_spread(trimmed) {
        debug!("no uncertainty left after trimming, skipping summary");
        return Ok(MonteCarloRun { samples, summary: None });
    }

    let bins = settings.bins.bin_count(n);
    if !resolves(trimmed, bins + 1) || !resolves(trimmed, KDE_POINTS) {
        debug!(
            lower = trimmed[0],
            upper = trimmed[trimmed.len() - 1],
            bins,
            "sample range too narrow to bin, skipping summary"
        );
        return Ok(MonteCarloRun { samples, summary: None });
    }

    let smoothed = GaussianKde::new(trimmed)?.curve(KDE_POINTS);

    debug!(bins, "binning trimmed samples");
    let histogram = DensityHistogram::new(trimmed, bins).step_polyline();

    let statistics = SummaryStatistics {
        median: Data::new(trimmed.to_vec()).median(),
        mean: trimmed.iter().mean(),
        interval: [lower, upper],
    };

    Ok(MonteCarloRun {
        samples,
        summary: Some(UncertaintySummary {
            smoothed,
            histogram,
            statistics,
        }),
    })
}
