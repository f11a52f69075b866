//! Histogram binning.
//!
//! Bins are half open `[lo, hi)` except the last one, which also holds its
//! upper edge. Values outside the edges are not counted.

use core::cmp::Ordering;

#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// Bin edges, one more than the number of bins.
    pub edges: Vec<f64>,
    /// Number of values per bin.
    pub counts: Vec<u64>,
}

impl Histogram {
    /// Bins values into `bins` equal-width bins spanning their range.
    ///
    /// Non-finite values are ignored. When all values are equal the range is
    /// widened by half a unit on each side. An empty input yields a single
    /// empty bin over `[0, 1]`.
    pub fn equal_width(values: &[f64], bins: usize) -> Self {
        let bins = bins.max(1);
        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();

        let (mut lo, mut hi) = match value_range(&finite) {
            Some(range) => range,
            None => {
                return Self {
                    edges: vec![0.0, 1.0],
                    counts: vec![0],
                }
            }
        };
        if lo == hi {
            lo -= 0.5;
            hi += 0.5;
        }

        let width = (hi - lo) / bins as f64;
        let mut edges: Vec<f64> = (0..bins).map(|i| lo + width * i as f64).collect();
        edges.push(hi);

        let mut counts = vec![0u64; bins];
        for value in finite {
            let index = (((value - lo) / width) as usize).min(bins - 1);
            counts[index] += 1;
        }

        Self { edges, counts }
    }

    /// Bins values using explicit, strictly increasing edges.
    pub fn with_edges(values: &[f64], edges: Vec<f64>) -> Self {
        let bins = edges.len().saturating_sub(1);
        let mut counts = vec![0u64; bins];
        if bins == 0 {
            return Self { edges, counts };
        }

        let first = edges[0];
        let last = edges[bins];
        for &value in values {
            if !value.is_finite() || value < first || value > last {
                continue;
            }
            // Index of the first edge strictly greater than the value.
            let upper = edges.partition_point(|&edge| edge <= value);
            let index = upper.saturating_sub(1).min(bins - 1);
            counts[index] += 1;
        }

        Self { edges, counts }
    }

    /// Unit-width bins with edges `0, 1, .., limit - 1`.
    pub fn integer_bins(values: &[f64], limit: u32) -> Self {
        let edges = (0..limit).map(f64::from).collect();
        Self::with_edges(values, edges)
    }

    pub fn bins(&self) -> usize {
        self.counts.len()
    }

    /// Total number of binned values.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    pub fn max_count(&self) -> u64 {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    /// Iterates `(lo, hi, count)` for every bin.
    pub fn iter_bins(&self) -> impl Iterator<Item = (f64, f64, u64)> + '_ {
        self.edges
            .windows(2)
            .zip(self.counts.iter())
            .map(|(edge, &count)| (edge[0], edge[1], count))
    }
}

/// Minimum and maximum of a slice of finite values.
pub fn value_range(values: &[f64]) -> Option<(f64, f64)> {
    let min = values
        .iter()
        .copied()
        .min_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal))?;
    let max = values
        .iter()
        .copied()
        .max_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal))?;
    Some((min, max))
}
