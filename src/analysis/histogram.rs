// src/analysis/histogram.rs

/// Histogram normalized so that the bar areas sum to 1.
#[derive(Debug, Clone, PartialEq)]
pub struct DensityHistogram {
    /// `bins + 1` ascending edges
    pub edges: Vec<f64>,
    pub densities: Vec<f64>,
}

impl DensityHistogram {
    /// Bins `values` into `bins` equal-width bins over their range. Bins are
    /// half-open except the last, which includes the maximum.
    pub fn new(values: &[f64], bins: usize) -> Self {
        let bins = bins.max(1);
        let mut first = values.iter().copied().fold(f64::INFINITY, f64::min);
        let mut last = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if values.is_empty() {
            first = 0.0;
            last = 1.0;
        } else if first == last {
            first -= 0.5;
            last += 0.5;
        }

        let edges = super::density::linspace(first, last, bins + 1);
        let norm = bins as f64 / (last - first);
        let mut counts = vec![0usize; bins];

        for &value in values {
            let mut index = (((value - first) * norm) as usize).min(bins - 1);
            // Correct for rounding in the scaled position
            if index > 0 && value < edges[index] {
                index -= 1;
            }
            if index != bins - 1 && value >= edges[index + 1] {
                index += 1;
            }
            counts[index] += 1;
        }

        let total = values.len() as f64;
        let densities = counts.iter()
            .zip(edges.windows(2))
            .map(|(&count, edge)| {
                if total == 0.0 {
                    0.0
                } else {
                    count as f64 / (total * (edge[1] - edge[0]))
                }
            })
            .collect();

        Self { edges, densities }
    }

    pub fn bins(&self) -> usize {
        self.densities.len()
    }

    /// Outline of the bars as a polyline: every edge appears twice and the
    /// heights are wrapped in zeros, so the line drops to the axis at both
    /// ends and has vertical sides at each bin boundary.
    pub fn step_polyline(&self) -> Vec<(f64, f64)> {
        let xs = self.edges.iter().flat_map(|&x| [x, x]);
        let ys = std::iter::once(0.0)
            .chain(self.densities.iter().flat_map(|&y| [y, y]))
            .chain(std::iter::once(0.0));
        xs.zip(ys).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_and_density() {
        let values = [0.0, 0.5, 1.0, 1.5, 2.0, 2.5, 3.0, 4.0];
        let hist = DensityHistogram::new(&values, 4);
        assert_eq!(hist.edges, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
        // Last bin is closed on the right
        let expected = [2.0 / 8.0, 2.0 / 8.0, 2.0 / 8.0, 2.0 / 8.0];
        for (got, want) in hist.densities.iter().zip(expected) {
            assert!((got - want).abs() < 1e-12);
        }
    }

    #[test]
    fn test_area_is_one() {
        let values: Vec<f64> = (0..1000).map(|i| ((i * 7919) % 1000) as f64 / 37.0).collect();
        let hist = DensityHistogram::new(&values, 100);
        let area: f64 = hist.densities.iter()
            .zip(hist.edges.windows(2))
            .map(|(d, e)| d * (e[1] - e[0]))
            .sum();
        assert!((area - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_step_polyline_shape() {
        let hist = DensityHistogram::new(&[0.0, 1.0, 1.0, 2.0], 2);
        let line = hist.step_polyline();
        assert_eq!(line.len(), 2 * (hist.bins() + 1));
        assert_eq!(line[0], (0.0, 0.0));
        assert_eq!(line[1], (0.0, hist.densities[0]));
        assert_eq!(line[2], (1.0, hist.densities[0]));
        assert_eq!(line[3], (1.0, hist.densities[1]));
        assert_eq!(line[4], (2.0, hist.densities[1]));
        assert_eq!(line[5], (2.0, 0.0));
    }

    #[test]
    fn test_single_value_widens_range() {
        let hist = DensityHistogram::new(&[3.0, 3.0], 2);
        assert_eq!(hist.edges, vec![2.5, 3.0, 3.5]);
        assert_eq!(hist.densities, vec![0.0, 2.0]);
    }
}
