// src/analysis/sampling.rs

use serde::{Serialize, Deserialize};
use anyhow::{Result, Context, anyhow};
use rand::prelude::*;
use rand_distr::{Distribution, LogNormal, Normal as RandNormal, Triangular, Uniform};
use tracing::debug;
use crate::config::{ActivityKey, Demand, MethodRef};

/// Draws stochastic LCA scores under input uncertainty.
pub trait UncertaintySampler {
    /// Returns exactly `iterations` scores, in no particular order. `cpus`
    /// is a parallelism hint the implementation may ignore.
    fn sample(
        &self,
        demand: &Demand,
        method: &MethodRef,
        iterations: usize,
        cpus: Option<usize>,
    ) -> Result<Vec<f64>>;
}

/// Uncertainty of a single impact term.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UncertaintyDistribution {
    /// No uncertainty
    Fixed { value: f64 },
    Normal { mean: f64, std_dev: f64 },
    Uniform { min: f64, max: f64 },
    Triangular { min: f64, mode: f64, max: f64 },
    /// Parameters of the underlying normal: `ln(geometric_mean)` and `sigma`
    LogNormal { geometric_mean: f64, sigma: f64 },
}

impl UncertaintyDistribution {
    fn prepare(&self) -> Result<PreparedDistribution> {
        let prepared = match *self {
            UncertaintyDistribution::Fixed { value } => PreparedDistribution::Fixed(value),
            UncertaintyDistribution::Normal { mean, std_dev } => PreparedDistribution::Normal(
                RandNormal::new(mean, std_dev)
                    .map_err(|e| anyhow!("Invalid normal distribution: {}", e))?
            ),
            UncertaintyDistribution::Uniform { min, max } => {
                if !(min < max) {
                    return Err(anyhow!("Uniform distribution needs min < max, got [{}, {}]", min, max));
                }
                PreparedDistribution::Uniform(Uniform::new(min, max))
            },
            UncertaintyDistribution::Triangular { min, mode, max } => PreparedDistribution::Triangular(
                Triangular::new(min, max, mode)
                    .map_err(|e| anyhow!("Invalid triangular distribution [{}, {}, {}]: {}", min, mode, max, e))?
            ),
            UncertaintyDistribution::LogNormal { geometric_mean, sigma } => {
                if geometric_mean <= 0.0 {
                    return Err(anyhow!("LogNormal distribution needs a positive geometric mean, got {}", geometric_mean));
                }
                PreparedDistribution::LogNormal(
                    LogNormal::new(geometric_mean.ln(), sigma)
                        .map_err(|e| anyhow!("Invalid lognormal distribution: {}", e))?
                )
            },
        };
        Ok(prepared)
    }
}

#[derive(Debug, Clone)]
enum PreparedDistribution {
    Fixed(f64),
    Normal(RandNormal<f64>),
    Uniform(Uniform<f64>),
    Triangular(Triangular<f64>),
    LogNormal(LogNormal<f64>),
}

impl PreparedDistribution {
    fn sample(&self, rng: &mut StdRng) -> f64 {
        match self {
            PreparedDistribution::Fixed(value) => *value,
            PreparedDistribution::Normal(normal) => normal.sample(rng),
            PreparedDistribution::Uniform(uniform) => uniform.sample(rng),
            PreparedDistribution::Triangular(triangular) => triangular.sample(rng),
            PreparedDistribution::LogNormal(lognormal) => lognormal.sample(rng),
        }
    }
}

/// An uncertain direct impact of one activity: the characterized amount per
/// unit of demand is `distribution × factor`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UncertainTerm {
    pub activity: ActivityKey,
    pub distribution: UncertaintyDistribution,
    pub factor: f64,
}

/// Self-contained sampler over independent uncertain terms, for a model
/// already characterized with a single method. One iteration scores
/// `Σ demand[activity] × sample × factor`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParametricSampler {
    pub terms: Vec<UncertainTerm>,
    /// With a seed, each worker stream is seeded with `seed + worker`, so
    /// results are reproducible for a fixed worker count (see
    /// [`worker_count`]).
    pub seed: Option<u64>,
}

impl ParametricSampler {
    pub fn new(seed: Option<u64>) -> Self {
        Self {
            terms: Vec::new(),
            seed,
        }
    }

    pub fn add_term(&mut self, activity: ActivityKey, distribution: UncertaintyDistribution, factor: f64) {
        self.terms.push(UncertainTerm {
            activity,
            distribution,
            factor,
        });
    }

    fn worker_rng(&self, worker: usize) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(worker as u64)),
            None => StdRng::from_entropy(),
        }
    }

    fn draw(terms: &[(PreparedDistribution, f64)], count: usize, mut rng: StdRng) -> Vec<f64> {
        (0..count)
            .map(|_| {
                terms.iter()
                    .map(|(distribution, scale)| distribution.sample(&mut rng) * scale)
                    .sum()
            })
            .collect()
    }
}

/// Worker threads used for a run: the `cpus` hint capped by the machine's
/// available parallelism and by the iteration count, at least 1.
pub fn worker_count(cpus: Option<usize>, iterations: usize) -> usize {
    let available = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    cpus.unwrap_or(1).min(available).clamp(1, iterations.max(1))
}

impl UncertaintySampler for ParametricSampler {
    fn sample(
        &self,
        demand: &Demand,
        _method: &MethodRef,
        iterations: usize,
        cpus: Option<usize>,
    ) -> Result<Vec<f64>> {
        let mut terms = Vec::with_capacity(self.terms.len());
        for term in &self.terms {
            let scale = demand.get(&term.activity).copied().unwrap_or(0.0) * term.factor;
            if scale != 0.0 {
                terms.push((term.distribution.prepare()?, scale));
            }
        }

        let workers = worker_count(cpus, iterations);
        let chunk = iterations / workers;
        let remainder = iterations % workers;
        debug!(iterations, workers, terms = terms.len(), "sampling parametric model");

        if workers == 1 {
            return Ok(Self::draw(&terms, iterations, self.worker_rng(0)));
        }

        let terms = &terms;
        std::thread::scope(|scope| -> Result<Vec<f64>> {
            let mut handles = Vec::with_capacity(workers);
            for worker in 0..workers {
                let count = chunk + usize::from(worker < remainder);
                let rng = self.worker_rng(worker);
                let handle = std::thread::Builder::new()
                    .name(format!("mc-sampler-{}", worker))
                    .spawn_scoped(scope, move || Self::draw(terms, count, rng))
                    .context("Failed to spawn Monte Carlo sampling worker")?;
                handles.push(handle);
            }

            let mut samples = Vec::with_capacity(iterations);
            for handle in handles {
                let part = handle.join()
                    .map_err(|_| anyhow!("Monte Carlo sampling worker panicked"))?;
                samples.extend(part);
            }
            Ok(samples)
        })
    }
}
