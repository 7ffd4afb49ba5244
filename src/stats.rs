//! Distribution statistics.
//!
//! Box summaries use linearly interpolated quartiles and the 1.5 × IQR
//! whisker rule. Densities are Gaussian kernel density estimates with
//! Silverman's rule-of-thumb bandwidth.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Whiskers reach the most extreme values within this many IQRs of the
/// quartiles.
pub const WHISKER_IQR_MULTIPLIER: f64 = 1.5;

/// Default number of density samples.
pub const DEFAULT_DENSITY_POINTS: usize = 50;

/// `sqrt(2π)`.
const SQRT_TAU: f64 = 2.506_628_274_631_000_7;

/// Statistics computed for a box plot.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoxStats {
    /// Lowest value within the lower fence.
    pub lower_whisker: f64,
    /// First quartile (25th percentile).
    pub q1: f64,
    /// Median (50th percentile).
    pub median: f64,
    /// Third quartile (75th percentile).
    pub q3: f64,
    /// Highest value within the upper fence.
    pub upper_whisker: f64,
    /// Interquartile range (Q3 - Q1).
    pub iqr: f64,
    /// Values beyond the whiskers, ascending.
    pub outliers: Vec<f64>,
}

impl BoxStats {
    /// Compute box plot statistics from data, ignoring non-finite values.
    ///
    /// Returns `None` when no finite value remains.
    #[must_use]
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let sorted = sorted_finite(values);
        let (&first, &last) = (sorted.first()?, sorted.last()?);

        let q1 = percentile(&sorted, 25.0);
        let median = percentile(&sorted, 50.0);
        let q3 = percentile(&sorted, 75.0);
        let iqr = q3 - q1;

        let lower_fence = q1 - WHISKER_IQR_MULTIPLIER * iqr;
        let upper_fence = q3 + WHISKER_IQR_MULTIPLIER * iqr;

        // interpolated quartiles can fall between a value and the next one inside the fence
        let lower_whisker = sorted
            .iter()
            .copied()
            .find(|&x| x >= lower_fence)
            .unwrap_or(first)
            .min(q1);
        let upper_whisker = sorted
            .iter()
            .rev()
            .copied()
            .find(|&x| x <= upper_fence)
            .unwrap_or(last)
            .max(q3);

        let outliers = sorted
            .iter()
            .copied()
            .filter(|&x| x < lower_fence || x > upper_fence)
            .collect();

        Some(Self { lower_whisker, q1, median, q3, upper_whisker, iqr, outliers })
    }
}

fn sorted_finite(values: &[f64]) -> Vec<f64> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|x| x.is_finite()).collect();
    sorted.sort_by(f64::total_cmp);
    sorted
}

/// Calculate percentile using linear interpolation.
fn percentile(sorted: &[f64], p: f64) -> f64 {
    match sorted {
        [] => 0.0,
        [only] => *only,
        _ => {
            #[allow(clippy::cast_precision_loss)]
            let k = (p / 100.0) * (sorted.len() - 1) as f64;
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let (f, c) = (k.floor() as usize, k.ceil() as usize);
            let last = sorted.len() - 1;
            if f == c || c > last {
                sorted[f.min(last)]
            } else {
                #[allow(clippy::cast_precision_loss)]
                let d = k - f as f64;
                sorted[f] * (1.0 - d) + sorted[c] * d
            }
        }
    }
}

/// Silverman's rule of thumb, `1.06 σ n^(-1/5)`.
#[must_use]
pub fn silverman_bandwidth(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
    1.06 * variance.sqrt() * n.powf(-0.2)
}

/// Gaussian kernel density estimate sampled at `points` evenly spaced
/// positions over the data extent padded by 10 % on each side.
///
/// The bandwidth defaults to [`silverman_bandwidth`] and is floored at 1 % of
/// the data range. Constant data yields the single sample `(value, 1)`.
#[must_use]
pub fn density(values: &[f64], bandwidth: Option<f64>, points: usize) -> Vec<(f64, f64)> {
    let clean = sorted_finite(values);
    let (Some(&min_val), Some(&max_val)) = (clean.first(), clean.last()) else {
        return Vec::new();
    };
    let range = max_val - min_val;
    if range == 0.0 {
        return vec![(min_val, 1.0)];
    }
    let points = points.max(2);

    let h = bandwidth
        .unwrap_or_else(|| silverman_bandwidth(&clean))
        .max(range * 0.01);

    let padding = range * 0.1;
    let x_min = min_val - padding;
    let x_max = max_val + padding;
    #[allow(clippy::cast_precision_loss)]
    let step = (x_max - x_min) / (points - 1) as f64;
    #[allow(clippy::cast_precision_loss)]
    let n = clean.len() as f64;

    (0..points)
        .map(|i| {
            #[allow(clippy::cast_precision_loss)]
            let x = x_min + i as f64 * step;
            let sum: f64 = clean
                .iter()
                .map(|&xi| {
                    let u = (x - xi) / h;
                    (-0.5 * u * u).exp() / (SQRT_TAU * h)
                })
                .sum();
            (x, sum / n)
        })
        .collect()
}

/// Empirical CDF steps `(x_(i), (i + 1) / n)` over the sorted finite values.
#[must_use]
pub fn cumulative(values: &[f64]) -> Vec<(f64, f64)> {
    let sorted = sorted_finite(values);
    #[allow(clippy::cast_precision_loss)]
    let n = sorted.len() as f64;
    sorted
        .into_iter()
        .enumerate()
        .map(|(i, x)| {
            #[allow(clippy::cast_precision_loss)]
            let fraction = (i + 1) as f64 / n;
            (x, fraction)
        })
        .collect()
}
