//! Marker size scales.
//!
//! Sizes are non-negative data values min-max normalized (optionally after a
//! regularized log) into the pixel range `[smallest, largest]`.

use crate::error::{Error, Result};
use crate::figure::SizeLegend;
use crate::scale::{extent, format_number, LinearScale, Scale, ValueTransform};
use crate::validate::{check_finite, check_larger, check_non_negative, check_positive, FieldPath, Validate};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Pixel diameters bounding the size scale.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct SizeRange {
    /// Diameter of the smallest value.
    pub smallest: f64,
    /// Diameter of the largest value.
    pub largest: f64,
}

impl Default for SizeRange {
    fn default() -> Self {
        Self { smallest: 4.0, largest: 16.0 }
    }
}

impl Validate for SizeRange {
    fn validate(&self, path: &FieldPath) -> Result<()> {
        let smallest = path.field("smallest");
        let largest = path.field("largest");
        check_positive(&smallest, self.smallest)?;
        check_positive(&largest, self.largest)?;
        check_larger(&largest, self.largest, &smallest, self.smallest)
    }
}

/// How per-element sizes are mapped.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct SizeScaleConfiguration {
    /// Lower end of the domain in data units.
    pub minimum: Option<f64>,
    /// Upper end of the domain in data units.
    pub maximum: Option<f64>,
    /// Log-scales the domain with this additive offset.
    pub log_regularization: Option<f64>,
    /// Maps large values to small markers.
    pub reverse_size_scale: bool,
    /// Requests a size legend.
    pub show_size_scale: bool,
    /// Legend title.
    pub title: Option<String>,
    /// Output diameters.
    pub size_range: SizeRange,
}

/// Concrete diameters for a field plus the legend, when requested.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSizes {
    /// One diameter per input value.
    pub sizes: Vec<f64>,
    /// Present when `show_size_scale` is set.
    pub legend: Option<SizeLegend>,
}

impl SizeScaleConfiguration {
    /// Transform of the domain.
    #[must_use]
    pub fn transform(&self) -> ValueTransform {
        ValueTransform::from_regularization(self.log_regularization)
    }

    /// Checks per-element sizes against this configuration.
    ///
    /// # Errors
    ///
    /// Fails on a requested legend without sizes, on negative sizes, and on
    /// sizes a log scale cannot take.
    pub fn check_values(
        &self,
        path: &FieldPath,
        field: &FieldPath,
        values: &[(FieldPath, f64)],
    ) -> Result<()> {
        if self.show_size_scale && values.is_empty() {
            return Err(Error::MissingScaleData {
                flag: (&path.field("show_size_scale")).into(),
                field: field.into(),
            });
        }
        let transform = self.transform();
        values.iter().try_for_each(|(value_path, value)| {
            check_non_negative(value_path, *value)?;
            transform.check(value_path, *value)
        })
    }

    /// Maps every value to a diameter and builds the legend.
    ///
    /// # Errors
    ///
    /// Fails exactly when [`SizeScaleConfiguration::check_values`] does.
    pub fn resolve(
        &self,
        path: &FieldPath,
        field: &FieldPath,
        values: &[(FieldPath, f64)],
    ) -> Result<ResolvedSizes> {
        self.check_values(path, field, values)?;
        let transform = self.transform();
        let internal: Vec<f64> = values.iter().map(|(_, v)| transform.forward(*v)).collect();
        let (data_lo, data_hi) = extent(internal.iter().copied()).unwrap_or((0.0, 1.0));
        let lo = self.minimum.map_or(data_lo, |v| transform.forward(v));
        let hi = self.maximum.map_or(data_hi, |v| transform.forward(v));
        let scale = self.pixel_scale(lo, hi);
        let sizes = internal.iter().map(|&v| scale.scale(v.clamp(lo.min(hi), hi.max(lo)))).collect();

        let legend = self.show_size_scale.then(|| SizeLegend {
            title: self.title.clone(),
            entries: [lo, (lo + hi) / 2.0, hi]
                .into_iter()
                .map(|v| (format_number(transform.inverse(v)), scale.scale(v)))
                .collect(),
        });
        tracing::trace!(count = internal.len(), lo, hi, "resolved sizes");
        Ok(ResolvedSizes { sizes, legend })
    }

    fn pixel_scale(&self, lo: f64, hi: f64) -> LinearScale {
        let SizeRange { smallest, largest } = self.size_range;
        let range = if self.reverse_size_scale { (largest, smallest) } else { (smallest, largest) };
        LinearScale::new((lo, hi), range)
    }
}

impl Validate for SizeScaleConfiguration {
    fn validate(&self, path: &FieldPath) -> Result<()> {
        let minimum_path = path.field("minimum");
        let maximum_path = path.field("maximum");
        if let Some(regularization) = self.log_regularization {
            check_non_negative(&path.field("log_regularization"), regularization)?;
        }
        let transform = self.transform();
        if let Some(minimum) = self.minimum {
            check_finite(&minimum_path, minimum)?;
            check_non_negative(&minimum_path, minimum)?;
            transform.check(&minimum_path, minimum)?;
        }
        if let Some(maximum) = self.maximum {
            check_finite(&maximum_path, maximum)?;
            check_non_negative(&maximum_path, maximum)?;
            transform.check(&maximum_path, maximum)?;
        }
        if let (Some(minimum), Some(maximum)) = (self.minimum, self.maximum) {
            check_larger(&maximum_path, maximum, &minimum_path, minimum)?;
        }
        self.size_range.validate(&path.field("size_range"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn config_path() -> FieldPath {
        FieldPath::root("configuration").field("size_scale")
    }

    fn field() -> FieldPath {
        FieldPath::root("data").field("points_sizes")
    }

    fn indexed(values: &[f64]) -> Vec<(FieldPath, f64)> {
        values.iter().enumerate().map(|(i, &v)| (field().index(i), v)).collect()
    }

    #[test]
    fn test_default_range() {
        let range = SizeRange::default();
        assert_relative_eq!(range.smallest, 4.0);
        assert_relative_eq!(range.largest, 16.0);
    }

    #[test]
    fn test_range_ordering() {
        let config = SizeScaleConfiguration {
            size_range: SizeRange { smallest: 10.0, largest: 5.0 },
            ..Default::default()
        };
        assert_eq!(
            config.validation_message(&config_path()).as_deref(),
            Some(
                "configuration.size_scale.size_range.largest: 5\n\
                 is not larger than configuration.size_scale.size_range.smallest: 10"
            )
        );
    }

    #[test]
    fn test_non_positive_smallest() {
        let config = SizeScaleConfiguration {
            size_range: SizeRange { smallest: 0.0, largest: 5.0 },
            ..Default::default()
        };
        assert_eq!(
            config.validation_message(&config_path()).as_deref(),
            Some("non-positive configuration.size_scale.size_range.smallest: 0")
        );
    }

    #[test]
    fn test_negative_size() {
        let config = SizeScaleConfiguration::default();
        let err = config.check_values(&config_path(), &field(), &indexed(&[1.0, -0.5])).unwrap_err();
        assert_eq!(err.to_string(), "negative data.points_sizes[1]: -0.5");
    }

    #[test]
    fn test_log_zero_size() {
        let config = SizeScaleConfiguration { log_regularization: Some(0.0), ..Default::default() };
        let err = config.check_values(&config_path(), &field(), &indexed(&[0.0])).unwrap_err();
        assert_eq!(err.to_string(), "log of non-positive data.points_sizes[0]: 0");
    }

    #[test]
    fn test_show_without_sizes() {
        let config = SizeScaleConfiguration { show_size_scale: true, ..Default::default() };
        let err = config.check_values(&config_path(), &field(), &[]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "configuration.size_scale.show_size_scale specified without data.points_sizes"
        );
    }

    #[test]
    fn test_linear_mapping() {
        let config = SizeScaleConfiguration::default();
        let resolved = config.resolve(&config_path(), &field(), &indexed(&[0.0, 5.0, 10.0])).unwrap();
        assert_eq!(resolved.sizes, vec![4.0, 10.0, 16.0]);
        assert!(resolved.legend.is_none());
    }

    #[test]
    fn test_reverse_mapping() {
        let config = SizeScaleConfiguration { reverse_size_scale: true, ..Default::default() };
        let resolved = config.resolve(&config_path(), &field(), &indexed(&[0.0, 10.0])).unwrap();
        assert_eq!(resolved.sizes, vec![16.0, 4.0]);
    }

    #[test]
    fn test_degenerate_maps_to_midpoint() {
        let config = SizeScaleConfiguration::default();
        let resolved = config.resolve(&config_path(), &field(), &indexed(&[3.0, 3.0])).unwrap();
        assert_eq!(resolved.sizes, vec![10.0, 10.0]);
    }

    #[test]
    fn test_bounds_clamp_values() {
        let config = SizeScaleConfiguration { maximum: Some(5.0), ..Default::default() };
        let resolved = config.resolve(&config_path(), &field(), &indexed(&[0.0, 10.0])).unwrap();
        assert_eq!(resolved.sizes, vec![4.0, 16.0]);
    }

    #[test]
    fn test_log_mapping_and_legend() {
        let config = SizeScaleConfiguration {
            log_regularization: Some(0.0),
            show_size_scale: true,
            ..Default::default()
        };
        let resolved = config.resolve(&config_path(), &field(), &indexed(&[1.0, 10.0, 100.0])).unwrap();
        assert_relative_eq!(resolved.sizes[1], 10.0);
        let legend = resolved.legend.unwrap();
        let labels: Vec<&str> = legend.entries.iter().map(|(label, _)| label.as_str()).collect();
        assert_eq!(labels, vec!["1", "10", "100"]);
    }
}
