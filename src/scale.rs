//! Scale functions for data-to-visual mappings.
//!
//! Two layers live here. [`ValueTransform`] moves data values into the
//! internal domain (identity or regularized `log10`), validating positivity
//! for log transforms. [`LinearScale`] then maps internal values onto a
//! visual range (pixels, marker sizes, color fractions).

use crate::error::{Error, Result};
use crate::validate::FieldPath;

/// Trait for scale functions that map domain values to range values.
pub trait Scale {
    /// Transform a domain value to a range value.
    fn scale(&self, value: f64) -> f64;
}

// ============================================================================
// Value transforms
// ============================================================================

/// Transform from data units into internal units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ValueTransform {
    /// Identity.
    #[default]
    Linear,
    /// `log10(value + regularization)`.
    Log {
        /// Additive offset applied before the logarithm.
        regularization: f64,
    },
}

impl ValueTransform {
    /// Linear when `log_regularization` is absent, log otherwise.
    #[must_use]
    pub fn from_regularization(log_regularization: Option<f64>) -> Self {
        match log_regularization {
            Some(regularization) => Self::Log { regularization },
            None => Self::Linear,
        }
    }

    /// Whether this is a log transform.
    #[must_use]
    pub const fn is_log(self) -> bool {
        matches!(self, Self::Log { .. })
    }

    /// Data units to internal units. Callers check the value first.
    #[must_use]
    pub fn forward(self, value: f64) -> f64 {
        match self {
            Self::Linear => value,
            Self::Log { regularization } => (value + regularization).log10(),
        }
    }

    /// Internal units back to data units.
    #[must_use]
    pub fn inverse(self, value: f64) -> f64 {
        match self {
            Self::Linear => value,
            Self::Log { regularization } => 10_f64.powf(value) - regularization,
        }
    }

    /// Fails when the value cannot pass through this transform.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LogOfNonPositive`] when `value + regularization <= 0`.
    pub fn check(self, path: &FieldPath, value: f64) -> Result<()> {
        if self.accepts(value) {
            Ok(())
        } else {
            Err(Error::LogOfNonPositive { path: path.into(), value })
        }
    }

    /// Whether `value` can pass through this transform.
    #[must_use]
    pub fn accepts(self, value: f64) -> bool {
        match self {
            Self::Linear => true,
            Self::Log { regularization } => value + regularization > 0.0,
        }
    }

    /// Checks and transforms a whole array, addressing elements as
    /// `path[i]`.
    ///
    /// # Errors
    ///
    /// Returns the first element failing [`ValueTransform::check`].
    pub fn normalize(self, path: &FieldPath, values: &[f64]) -> Result<Vec<f64>> {
        values
            .iter()
            .enumerate()
            .map(|(i, &value)| {
                self.check(&path.index(i), value)?;
                Ok(self.forward(value))
            })
            .collect()
    }
}

// ============================================================================
// Linear scale
// ============================================================================

/// Linear scale for continuous-to-continuous mapping.
///
/// A degenerate domain maps every value to the middle of the range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain_min: f64,
    domain_max: f64,
    range_min: f64,
    range_max: f64,
}

impl LinearScale {
    /// Create a new linear scale.
    #[must_use]
    pub const fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self {
            domain_min: domain.0,
            domain_max: domain.1,
            range_min: range.0,
            range_max: range.1,
        }
    }

    /// Position of `value` within the domain, as a fraction clamped to
    /// `[0, 1]`.
    #[must_use]
    pub fn fraction(&self, value: f64) -> f64 {
        let span = self.domain_max - self.domain_min;
        if span == 0.0 {
            0.5
        } else {
            ((value - self.domain_min) / span).clamp(0.0, 1.0)
        }
    }
}

impl Scale for LinearScale {
    fn scale(&self, value: f64) -> f64 {
        let span = self.domain_max - self.domain_min;
        let t = if span == 0.0 { 0.5 } else { (value - self.domain_min) / span };
        self.range_min + t * (self.range_max - self.range_min)
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Minimum and maximum of the finite values, if any.
#[must_use]
pub fn extent(values: impl IntoIterator<Item = f64>) -> Option<(f64, f64)> {
    values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// "Nice" tick positions covering `[min, max]` with roughly `count` steps of
/// 1, 2 or 5 times a power of ten. Only ticks inside the interval are kept.
#[must_use]
pub fn nice_ticks(min: f64, max: f64, count: usize) -> Vec<f64> {
    let (min, max) = if min <= max { (min, max) } else { (max, min) };
    if count == 0 || !min.is_finite() || !max.is_finite() {
        return Vec::new();
    }
    if min == max {
        return vec![min];
    }
    #[allow(clippy::cast_precision_loss)]
    let Some((nice, power)) = nice_step((max - min) / count as f64) else {
        return vec![min, max];
    };
    let step = scale_by_power(nice, power);

    let first = (min / step - 1e-9).ceil();
    let last = (max / step + 1e-9).floor();
    if last < first {
        return Vec::new();
    }
    let n = (last - first).min(10_000.0);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let n = n.round() as u64;
    (0..=n)
        .map(|i| {
            #[allow(clippy::cast_precision_loss)]
            let tick = scale_by_power((first + i as f64) * nice, power);
            if tick == 0.0 {
                0.0
            } else {
                tick
            }
        })
        .collect()
}

/// Splits a raw step into a nice mantissa (1, 2, 5 or 10) and a power of ten.
fn nice_step(step: f64) -> Option<(f64, i32)> {
    if !step.is_finite() || step <= 0.0 {
        return None;
    }
    #[allow(clippy::cast_possible_truncation)]
    let power = step.log10().floor() as i32;
    let error = step / 10_f64.powi(power);
    let nice = if error >= 7.5 {
        10.0
    } else if error >= 3.5 {
        5.0
    } else if error >= 1.5 {
        2.0
    } else {
        1.0
    };
    Some((nice, power))
}

/// `value * 10^power`, dividing for negative powers so decimal ticks land on
/// the nearest representable value.
fn scale_by_power(value: f64, power: i32) -> f64 {
    if power < 0 {
        value / 10_f64.powi(-power)
    } else {
        value * 10_f64.powi(power)
    }
}

/// Formats a number for tick and legend labels with at most six
/// significant digits.
#[must_use]
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    #[allow(clippy::cast_possible_truncation)]
    let magnitude = value.abs().log10().floor() as i32;
    let digits = 5 - magnitude;
    let rounded = scale_by_power(scale_by_power(value, digits).round(), -digits);
    if rounded.abs() >= 1e15 || rounded.abs() < 1e-6 {
        format!("{rounded:e}")
    } else {
        rounded.to_string()
    }
}
