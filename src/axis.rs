//! Axis configuration and domain resolution.
//!
//! An axis is linear unless `log_regularization` is set, in which case values
//! are plotted as `log10(value + log_regularization)`. Everything downstream
//! of [`AxisConfiguration::normalize`] works in these internal units.

use crate::error::Result;
use crate::figure::{AxisLayout, Tick};
use crate::scale::{extent, format_number, nice_ticks, ValueTransform};
use crate::validate::{check_finite, check_larger, check_non_negative, FieldPath, Validate};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Fraction of the data span added on each automatically bounded side.
pub const AUTO_PADDING: f64 = 0.05;

/// Default number of tick intervals requested from [`nice_ticks`].
pub const DEFAULT_TICK_COUNT: usize = 6;

/// Linear or logarithmic axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "snake_case"))]
pub enum AxisKind {
    /// Values plotted as is.
    Linear,
    /// Values plotted as `log10(value + regularization)`.
    Log,
}

/// Configuration of one numeric axis.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct AxisConfiguration {
    /// Lower bound in data units; automatic when unset.
    pub minimum: Option<f64>,
    /// Upper bound in data units; automatic when unset.
    pub maximum: Option<f64>,
    /// Makes the axis logarithmic with this additive offset.
    pub log_regularization: Option<f64>,
    /// Axis title.
    pub title: Option<String>,
}

impl AxisConfiguration {
    /// Creates a linear axis with automatic bounds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the lower bound.
    #[must_use]
    pub fn minimum(mut self, minimum: f64) -> Self {
        self.minimum = Some(minimum);
        self
    }

    /// Sets the upper bound.
    #[must_use]
    pub fn maximum(mut self, maximum: f64) -> Self {
        self.maximum = Some(maximum);
        self
    }

    /// Makes the axis logarithmic.
    #[must_use]
    pub fn log_regularization(mut self, regularization: f64) -> Self {
        self.log_regularization = Some(regularization);
        self
    }

    /// Sets the title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Linear or log.
    #[must_use]
    pub fn kind(&self) -> AxisKind {
        if self.log_regularization.is_some() {
            AxisKind::Log
        } else {
            AxisKind::Linear
        }
    }

    /// Transform from data to internal units.
    #[must_use]
    pub fn transform(&self) -> ValueTransform {
        ValueTransform::from_regularization(self.log_regularization)
    }

    /// Checks and transforms the values plotted along this axis.
    ///
    /// # Errors
    ///
    /// Returns `log of non-positive <path>[i]: <value>` for a log axis.
    pub fn normalize(&self, path: &FieldPath, values: &[f64]) -> Result<Vec<f64>> {
        self.transform().normalize(path, values)
    }

    /// Resolves the visible range from already-normalized values.
    #[must_use]
    pub fn resolve_domain(&self, internal_values: impl IntoIterator<Item = f64>) -> AxisDomain {
        let transform = self.transform();
        let explicit_min = self.minimum.map(|v| transform.forward(v));
        let explicit_max = self.maximum.map(|v| transform.forward(v));
        let (minimum, maximum) = match (explicit_min, explicit_max) {
            (Some(lo), Some(hi)) => (lo, hi),
            (lo, hi) => {
                let (data_lo, data_hi) = extent(internal_values).unwrap_or((0.0, 1.0));
                let mut lo_auto = lo.unwrap_or(data_lo);
                let mut hi_auto = hi.unwrap_or(data_hi);
                if lo_auto >= hi_auto {
                    // one explicit bound on the wrong side of the data, or constant data
                    match (lo, hi) {
                        (Some(l), None) => hi_auto = l + 1.0,
                        (None, Some(h)) => lo_auto = h - 1.0,
                        _ => {
                            lo_auto -= 0.5;
                            hi_auto += 0.5;
                        }
                    }
                } else {
                    let pad = (hi_auto - lo_auto) * AUTO_PADDING;
                    if lo.is_none() {
                        lo_auto -= pad;
                    }
                    if hi.is_none() {
                        hi_auto += pad;
                    }
                }
                (lo_auto, hi_auto)
            }
        };
        tracing::trace!(minimum, maximum, log = transform.is_log(), "resolved axis domain");
        AxisDomain { transform, minimum, maximum }
    }
}

impl Validate for AxisConfiguration {
    fn validate(&self, path: &FieldPath) -> Result<()> {
        let minimum_path = path.field("minimum");
        let maximum_path = path.field("maximum");
        if let Some(regularization) = self.log_regularization {
            check_non_negative(&path.field("log_regularization"), regularization)?;
        }
        if let Some(minimum) = self.minimum {
            check_finite(&minimum_path, minimum)?;
            self.transform().check(&minimum_path, minimum)?;
        }
        if let Some(maximum) = self.maximum {
            check_finite(&maximum_path, maximum)?;
            self.transform().check(&maximum_path, maximum)?;
        }
        if let (Some(minimum), Some(maximum)) = (self.minimum, self.maximum) {
            check_larger(&maximum_path, maximum, &minimum_path, minimum)?;
        }
        Ok(())
    }
}

/// Resolved visible range of an axis, in internal units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisDomain {
    /// Transform from data units.
    pub transform: ValueTransform,
    /// Lower edge.
    pub minimum: f64,
    /// Upper edge.
    pub maximum: f64,
}

impl AxisDomain {
    /// Domain over fixed internal bounds (category axes).
    #[must_use]
    pub const fn fixed(minimum: f64, maximum: f64) -> Self {
        Self { transform: ValueTransform::Linear, minimum, maximum }
    }

    /// `maximum - minimum`.
    #[must_use]
    pub fn span(&self) -> f64 {
        self.maximum - self.minimum
    }

    /// Nice ticks in internal units labelled in data units.
    #[must_use]
    pub fn ticks(&self, count: usize) -> Vec<Tick> {
        nice_ticks(self.minimum, self.maximum, count)
            .into_iter()
            .map(|position| Tick {
                position,
                label: format_number(self.transform.inverse(position)),
            })
            .collect()
    }

    /// Layout of a numeric axis.
    #[must_use]
    pub fn layout(&self, title: Option<String>) -> AxisLayout {
        AxisLayout {
            title,
            transform: self.transform,
            range: (self.minimum, self.maximum),
            ticks: self.ticks(DEFAULT_TICK_COUNT),
        }
    }
}

/// Layout of a categorical axis with `count` slots at `0..count`, labelled
/// with `names` when given and with the slot index otherwise.
#[must_use]
pub fn category_layout(
    count: usize,
    names: Option<&[String]>,
    title: Option<String>,
    flipped: bool,
) -> AxisLayout {
    #[allow(clippy::cast_precision_loss)]
    let last = count.max(1) as f64 - 0.5;
    let ticks = (0..count)
        .map(|i| {
            #[allow(clippy::cast_precision_loss)]
            let position = i as f64;
            Tick {
                position,
                label: names
                    .and_then(|names| names.get(i))
                    .cloned()
                    .unwrap_or_else(|| i.to_string()),
            }
        })
        .collect();
    AxisLayout {
        title,
        transform: ValueTransform::Linear,
        range: if flipped { (last, -0.5) } else { (-0.5, last) },
        ticks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn path() -> FieldPath {
        FieldPath::root("configuration").field("value_axis")
    }

    #[test]
    fn test_kind() {
        assert_eq!(AxisConfiguration::new().kind(), AxisKind::Linear);
        assert_eq!(AxisConfiguration::new().log_regularization(0.0).kind(), AxisKind::Log);
    }

    #[test]
    fn test_range_violation_message() {
        let axis = AxisConfiguration::new().minimum(1.0).maximum(0.0);
        assert_eq!(
            axis.validation_message(&path()).as_deref(),
            Some(
                "configuration.value_axis.maximum: 0\n\
                 is not larger than configuration.value_axis.minimum: 1"
            )
        );
    }

    #[test]
    fn test_equal_bounds_are_rejected() {
        let axis = AxisConfiguration::new().minimum(2.0).maximum(2.0);
        assert!(axis.validate(&path()).is_err());
    }

    #[test]
    fn test_log_bounds_must_be_positive() {
        let axis = AxisConfiguration::new().log_regularization(0.0).minimum(0.0);
        assert_eq!(
            axis.validation_message(&path()).as_deref(),
            Some("log of non-positive configuration.value_axis.minimum: 0")
        );
        let regularized = AxisConfiguration::new().log_regularization(1.0).minimum(0.0);
        assert!(regularized.validate(&path()).is_ok());
    }

    #[test]
    fn test_negative_regularization() {
        let axis = AxisConfiguration::new().log_regularization(-1.0);
        assert_eq!(
            axis.validation_message(&path()).as_deref(),
            Some("negative configuration.value_axis.log_regularization: -1")
        );
    }

    #[test]
    fn test_normalize_log_values() {
        let axis = AxisConfiguration::new().log_regularization(0.0);
        let data = FieldPath::root("data").field("values");
        let values = axis.normalize(&data, &[1.0, 10.0, 100.0]).unwrap();
        assert_relative_eq!(values[2], 2.0);
        let err = axis.normalize(&data, &[1.0, -1.0]).unwrap_err();
        assert_eq!(err.to_string(), "log of non-positive data.values[1]: -1");
    }

    #[test]
    fn test_auto_domain_is_padded() {
        let domain = AxisConfiguration::new().resolve_domain([0.0, 10.0]);
        assert_relative_eq!(domain.minimum, -0.5);
        assert_relative_eq!(domain.maximum, 10.5);
    }

    #[test]
    fn test_explicit_bounds_win() {
        let domain = AxisConfiguration::new().minimum(-1.0).maximum(3.0).resolve_domain([0.0, 10.0]);
        assert_relative_eq!(domain.minimum, -1.0);
        assert_relative_eq!(domain.maximum, 3.0);
    }

    #[test]
    fn test_one_sided_bound() {
        let domain = AxisConfiguration::new().minimum(0.0).resolve_domain([5.0, 15.0]);
        assert_relative_eq!(domain.minimum, 0.0);
        assert_relative_eq!(domain.maximum, 15.75);
    }

    #[test]
    fn test_degenerate_and_empty_domains() {
        let constant = AxisConfiguration::new().resolve_domain([3.0, 3.0]);
        assert_relative_eq!(constant.minimum, 2.5);
        assert_relative_eq!(constant.maximum, 3.5);
        let empty = AxisConfiguration::new().resolve_domain(std::iter::empty());
        assert!(empty.minimum < 0.0 && empty.maximum > 1.0);
    }

    #[test]
    fn test_log_ticks_are_labelled_in_data_units() {
        let axis = AxisConfiguration::new().log_regularization(0.0).minimum(1.0).maximum(1000.0);
        let ticks = axis.resolve_domain(std::iter::empty()).ticks(3);
        let labels: Vec<&str> = ticks.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, vec!["1", "10", "100", "1000"]);
    }

    #[test]
    fn test_category_layout() {
        let names = vec!["a".to_string(), "b".to_string()];
        let layout = category_layout(2, Some(&names), None, false);
        assert_eq!(layout.range, (-0.5, 1.5));
        assert_eq!(layout.ticks[1].label, "b");
        let flipped = category_layout(3, None, None, true);
        assert_eq!(flipped.range, (2.5, -0.5));
        assert_eq!(flipped.ticks[2].label, "2");
    }
}
