// src/analysis/density.rs
use anyhow::{Result, anyhow};
use statrs::distribution::{Continuous, Normal};
use statrs::statistics::Statistics;

/// Evenly spaced values over `[start, end]`, both ends included.
pub fn linspace(start: f64, end: f64, num: usize) -> Vec<f64> {
    match num {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (num - 1) as f64;
            let mut values: Vec<f64> = (0..num).map(|i| start + step * i as f64).collect();
            values[num - 1] = end;
            values
        }
    }
}

/// One-dimensional Gaussian kernel density estimate with Scott's rule
/// bandwidth: `n^(-1/5)` times the sample standard deviation.
#[derive(Debug, Clone)]
pub struct GaussianKde<'a> {
    samples: &'a [f64],
    kernel: Normal,
    bandwidth: f64,
}

impl<'a> GaussianKde<'a> {
    pub fn new(samples: &'a [f64]) -> Result<Self> {
        if samples.len() < 2 {
            return Err(anyhow!("KDE needs at least two samples, got {}", samples.len()));
        }

        let std_dev = samples.iter().std_dev();
        let factor = (samples.len() as f64).powf(-0.2);
        let bandwidth = std_dev * factor;
        if !(bandwidth > 0.0) || !bandwidth.is_finite() {
            return Err(anyhow!("KDE bandwidth is degenerate: {}", bandwidth));
        }

        let kernel = Normal::new(0.0, bandwidth)
            .map_err(|e| anyhow!("Invalid KDE kernel: {}", e))?;

        Ok(Self {
            samples,
            kernel,
            bandwidth,
        })
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    pub fn evaluate(&self, x: f64) -> f64 {
        self.samples.iter()
            .map(|xi| self.kernel.pdf(x - xi))
            .sum::<f64>() / self.samples.len() as f64
    }

    /// `(x, density)` pairs at `points` evenly spaced positions spanning the
    /// sample range.
    pub fn curve(&self, points: usize) -> Vec<(f64, f64)> {
        let min = self.samples.iter().copied().fold(f64::INFINITY, f64::min);
        let max = self.samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        linspace(min, max, points)
            .into_iter()
            .map(|x| (x, self.evaluate(x)))
            .collect()
    }
}
