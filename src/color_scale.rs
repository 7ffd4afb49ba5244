//! Color scales.
//!
//! Per-element colors arrive as [`ColorValue`]s: explicit tokens resolve
//! directly, numbers go through a continuous scale (a named preset or
//! explicit stops), and categorical keys are looked up in a categorical
//! palette. [`ColorScaleConfiguration::resolve`] turns a whole field of
//! values into concrete colors plus an optional legend descriptor.

use crate::color::Rgba;
use crate::error::{Error, Result};
use crate::figure::{ColorLegend, Tick};
use crate::scale::{extent, format_number, nice_ticks, LinearScale, ValueTransform};
use crate::validate::{check_finite, check_larger, check_non_negative, check_not_both, FieldPath, Validate};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of ticks requested for continuous color legends.
const LEGEND_TICK_COUNT: usize = 4;

// ============================================================================
// Presets
// ============================================================================

/// Built-in continuous palettes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorPreset {
    /// Perceptually uniform purple-green-yellow.
    Viridis,
    /// Perceptually uniform black-purple-orange-cream.
    Magma,
    /// Sequential white to dark blue.
    Blues,
    /// Diverging red-white-blue.
    RedBlue,
    /// Black to white.
    Greyscale,
    /// Black-red-yellow-white.
    Heat,
}

const VIRIDIS: &[Rgba] = &[
    Rgba::rgb(68, 1, 84),
    Rgba::rgb(59, 82, 139),
    Rgba::rgb(33, 145, 140),
    Rgba::rgb(94, 201, 98),
    Rgba::rgb(253, 231, 37),
];

const MAGMA: &[Rgba] = &[
    Rgba::rgb(0, 0, 4),
    Rgba::rgb(81, 18, 124),
    Rgba::rgb(183, 55, 121),
    Rgba::rgb(252, 137, 97),
    Rgba::rgb(252, 253, 191),
];

const BLUES: &[Rgba] = &[
    Rgba::rgb(247, 251, 255),
    Rgba::rgb(198, 219, 239),
    Rgba::rgb(107, 174, 214),
    Rgba::rgb(33, 113, 181),
    Rgba::rgb(8, 48, 107),
];

const RED_BLUE: &[Rgba] = &[
    Rgba::rgb(178, 24, 43),
    Rgba::rgb(239, 138, 98),
    Rgba::rgb(247, 247, 247),
    Rgba::rgb(103, 169, 207),
    Rgba::rgb(33, 102, 172),
];

const GREYSCALE: &[Rgba] = &[Rgba::BLACK, Rgba::WHITE];

const HEAT: &[Rgba] = &[
    Rgba::rgb(0, 0, 0),
    Rgba::rgb(128, 0, 0),
    Rgba::rgb(255, 0, 0),
    Rgba::rgb(255, 128, 0),
    Rgba::rgb(255, 255, 0),
    Rgba::rgb(255, 255, 255),
];

impl ColorPreset {
    /// All presets.
    pub const ALL: [Self; 6] =
        [Self::Viridis, Self::Magma, Self::Blues, Self::RedBlue, Self::Greyscale, Self::Heat];

    /// Looks a preset up by name, ignoring ASCII case.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|preset| preset.name().eq_ignore_ascii_case(name))
    }

    /// Canonical name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Viridis => "Viridis",
            Self::Magma => "Magma",
            Self::Blues => "Blues",
            Self::RedBlue => "RedBlue",
            Self::Greyscale => "Greyscale",
            Self::Heat => "Heat",
        }
    }

    /// Colors at evenly spaced fractions of the domain.
    #[must_use]
    pub const fn colors(self) -> &'static [Rgba] {
        match self {
            Self::Viridis => VIRIDIS,
            Self::Magma => MAGMA,
            Self::Blues => BLUES,
            Self::RedBlue => RED_BLUE,
            Self::Greyscale => GREYSCALE,
            Self::Heat => HEAT,
        }
    }
}

// ============================================================================
// Palette and color values
// ============================================================================

/// Where colors come from.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "snake_case"))]
pub enum Palette {
    /// A [`ColorPreset`] by name.
    NamedPreset(String),
    /// `(value, color)` stops; at least two distinct values.
    ContinuousStops(Vec<(f64, String)>),
    /// `(key, color)` pairs with unique keys.
    CategoricalPairs(Vec<(String, String)>),
}

impl Palette {
    /// Whether this palette maps keys rather than numbers.
    #[must_use]
    pub const fn is_categorical(&self) -> bool {
        matches!(self, Self::CategoricalPairs(_))
    }

    const fn kind_name(&self) -> &'static str {
        if self.is_categorical() {
            "categorical"
        } else {
            "continuous"
        }
    }
}

impl Validate for Palette {
    fn validate(&self, path: &FieldPath) -> Result<()> {
        match self {
            Self::NamedPreset(name) => {
                if ColorPreset::from_name(name).is_none() {
                    return Err(Error::InvalidToken { path: path.into(), token: name.clone() });
                }
            }
            Self::ContinuousStops(stops) => {
                for (i, (value, color)) in stops.iter().enumerate() {
                    check_finite(&path.index(i), *value)?;
                    Rgba::resolve(&path.index(i), color)?;
                }
                let mut values: Vec<f64> = stops.iter().map(|(value, _)| *value).collect();
                values.sort_by(f64::total_cmp);
                values.dedup();
                if values.len() < 2 {
                    return Err(Error::TooFewStops { path: path.into(), count: values.len() });
                }
            }
            Self::CategoricalPairs(pairs) => {
                for (i, (key, color)) in pairs.iter().enumerate() {
                    Rgba::resolve(&path.index(i), color)?;
                    if pairs[..i].iter().any(|(previous, _)| previous == key) {
                        return Err(Error::DuplicateKey { path: path.into(), key: key.clone() });
                    }
                }
            }
        }
        Ok(())
    }
}

/// Per-element color datum.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "snake_case"))]
pub enum ColorValue {
    /// A literal color token.
    Explicit(String),
    /// A number mapped through the continuous scale.
    Number(f64),
    /// A key looked up in the categorical palette.
    Key(String),
}

impl ColorValue {
    /// Categorical key value.
    #[must_use]
    pub fn key(key: impl Into<String>) -> Self {
        Self::Key(key.into())
    }
}

impl From<f64> for ColorValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for ColorValue {
    fn from(token: &str) -> Self {
        Self::Explicit(token.to_string())
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// How per-element colors are mapped.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct ColorScaleConfiguration {
    /// Palette; numbers default to Viridis.
    pub color_palette: Option<Palette>,
    /// Lower end of the continuous domain in data units.
    pub minimum: Option<f64>,
    /// Upper end of the continuous domain in data units.
    pub maximum: Option<f64>,
    /// Log-scales the continuous domain with this additive offset.
    pub log_regularization: Option<f64>,
    /// Flips the colors of a continuous scale.
    pub reverse_color_scale: bool,
    /// Requests a color legend.
    pub show_color_scale: bool,
    /// Legend title.
    pub title: Option<String>,
}

/// Concrete colors for a field plus the legend, when requested.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedColors {
    /// One color per input value.
    pub colors: Vec<Rgba>,
    /// Present when `show_color_scale` is set.
    pub legend: Option<ColorLegend>,
}

impl ColorScaleConfiguration {
    /// Transform of the continuous domain.
    #[must_use]
    pub fn transform(&self) -> ValueTransform {
        ValueTransform::from_regularization(self.log_regularization)
    }

    /// Checks per-element values against this configuration.
    ///
    /// `path` addresses this configuration and `field` the data field the
    /// values come from.
    ///
    /// # Errors
    ///
    /// Returns the first conflict between the values and the configuration.
    pub fn check_values(
        &self,
        path: &FieldPath,
        field: &FieldPath,
        values: &[(FieldPath, &ColorValue)],
    ) -> Result<()> {
        let flag = path.field("show_color_scale");
        let palette_path = path.field("color_palette");
        if self.show_color_scale && values.is_empty() {
            return Err(Error::MissingScaleData { flag: (&flag).into(), field: field.into() });
        }
        for (value_path, value) in values {
            match value {
                ColorValue::Explicit(token) => {
                    if self.show_color_scale {
                        return Err(Error::ExplicitColorsWithScale {
                            flag: (&flag).into(),
                            path: value_path.into(),
                        });
                    }
                    Rgba::resolve(value_path, token)?;
                }
                ColorValue::Number(number) => {
                    check_finite(value_path, *number)?;
                    if let Some(palette @ Palette::CategoricalPairs(_)) = &self.color_palette {
                        return Err(Error::PaletteMismatch {
                            palette: (&palette_path).into(),
                            palette_kind: palette.kind_name(),
                            path: value_path.into(),
                            value_kind: "numeric",
                        });
                    }
                    self.transform().check(value_path, *number)?;
                }
                ColorValue::Key(key) => match &self.color_palette {
                    None => {
                        return Err(Error::MissingPalette {
                            palette: (&palette_path).into(),
                            path: value_path.into(),
                        })
                    }
                    Some(Palette::CategoricalPairs(pairs)) => {
                        if !pairs.iter().any(|(candidate, _)| candidate == key) {
                            return Err(Error::InvalidToken {
                                path: value_path.into(),
                                token: key.clone(),
                            });
                        }
                    }
                    Some(palette) => {
                        return Err(Error::PaletteMismatch {
                            palette: (&palette_path).into(),
                            palette_kind: palette.kind_name(),
                            path: value_path.into(),
                            value_kind: "categorical",
                        })
                    }
                },
            }
        }
        Ok(())
    }

    /// Resolves every value to a color and builds the legend.
    ///
    /// # Errors
    ///
    /// Fails exactly when [`ColorScaleConfiguration::check_values`] does.
    pub fn resolve(
        &self,
        path: &FieldPath,
        field: &FieldPath,
        values: &[(FieldPath, &ColorValue)],
    ) -> Result<ResolvedColors> {
        self.check_values(path, field, values)?;
        let transform = self.transform();
        let numbers: Vec<f64> = values
            .iter()
            .filter_map(|(_, value)| match value {
                ColorValue::Number(number) => Some(transform.forward(*number)),
                _ => None,
            })
            .collect();
        let continuous = (!numbers.is_empty()).then(|| self.continuous_scale(&numbers));

        let colors = values
            .iter()
            .map(|(value_path, value)| match value {
                ColorValue::Explicit(token) => Rgba::resolve(value_path, token),
                ColorValue::Number(number) => Ok(continuous
                    .as_ref()
                    .map_or(Rgba::GRAY, |scale| scale.map(transform.forward(*number)))),
                ColorValue::Key(key) => Ok(self.categorical_color(key).unwrap_or(Rgba::GRAY)),
            })
            .collect::<Result<Vec<_>>>()?;

        let legend = if self.show_color_scale {
            match (&continuous, &self.color_palette) {
                (Some(scale), _) => Some(scale.legend(self.title.clone())),
                (None, Some(Palette::CategoricalPairs(pairs))) => Some(ColorLegend::Categorical {
                    title: self.title.clone(),
                    entries: pairs
                        .iter()
                        .filter_map(|(key, color)| Rgba::parse(color).map(|c| (key.clone(), c)))
                        .collect(),
                }),
                (None, _) => None,
            }
        } else {
            None
        };
        tracing::trace!(count = colors.len(), legend = legend.is_some(), "resolved colors");
        Ok(ResolvedColors { colors, legend })
    }

    /// Continuous scale over the given internal values.
    #[must_use]
    pub fn continuous_scale(&self, internal_values: &[f64]) -> ContinuousColorScale {
        let transform = self.transform();
        let stops = if let Some(Palette::ContinuousStops(stops)) = &self.color_palette {
            let mut stops: Vec<(f64, Rgba)> = stops
                .iter()
                .filter_map(|(value, color)| {
                    Rgba::parse(color).map(|color| (transform.forward(*value), color))
                })
                .collect();
            stops.sort_by(|a, b| a.0.total_cmp(&b.0));
            stops.dedup_by(|later, earlier| later.0 == earlier.0);
            stops
        } else {
            let preset = match &self.color_palette {
                Some(Palette::NamedPreset(name)) => {
                    ColorPreset::from_name(name).unwrap_or(ColorPreset::Viridis)
                }
                _ => ColorPreset::Viridis,
            };
            let (data_lo, data_hi) = extent(internal_values.iter().copied()).unwrap_or((0.0, 1.0));
            let mut lo = self.minimum.map_or(data_lo, |v| transform.forward(v));
            let mut hi = self.maximum.map_or(data_hi, |v| transform.forward(v));
            if lo >= hi {
                lo -= 0.5;
                hi += 0.5;
            }
            let colors = preset.colors();
            #[allow(clippy::cast_precision_loss)]
            let last = (colors.len() - 1) as f64;
            colors
                .iter()
                .enumerate()
                .map(|(i, &color)| {
                    #[allow(clippy::cast_precision_loss)]
                    let fraction = i as f64 / last;
                    (lo + (hi - lo) * fraction, color)
                })
                .collect()
        };
        let stops = if self.reverse_color_scale {
            let colors: Vec<Rgba> = stops.iter().rev().map(|&(_, color)| color).collect();
            stops.iter().zip(colors).map(|(&(value, _), color)| (value, color)).collect()
        } else {
            stops
        };
        ContinuousColorScale { transform, stops }
    }

    fn categorical_color(&self, key: &str) -> Option<Rgba> {
        match &self.color_palette {
            Some(Palette::CategoricalPairs(pairs)) => pairs
                .iter()
                .find(|(candidate, _)| candidate == key)
                .and_then(|(_, color)| Rgba::parse(color)),
            _ => None,
        }
    }
}

impl Validate for ColorScaleConfiguration {
    fn validate(&self, path: &FieldPath) -> Result<()> {
        let palette_path = path.field("color_palette");
        let minimum_path = path.field("minimum");
        let maximum_path = path.field("maximum");
        self.color_palette.validate(&palette_path)?;

        if self.reverse_color_scale
            && self.color_palette.as_ref().is_some_and(Palette::is_categorical)
        {
            return Err(Error::ReversedCategorical { path: (&palette_path).into() });
        }
        check_not_both(
            (&path.field("reverse_color_scale"), self.reverse_color_scale),
            (&path.field("log_regularization"), self.log_regularization.is_some()),
        )?;

        if let Some(regularization) = self.log_regularization {
            check_non_negative(&path.field("log_regularization"), regularization)?;
        }
        if let Some(minimum) = self.minimum {
            check_finite(&minimum_path, minimum)?;
        }
        if let Some(maximum) = self.maximum {
            check_finite(&maximum_path, maximum)?;
        }

        let transform = self.transform();
        if let Some(minimum) = self.minimum {
            transform.check(&minimum_path, minimum)?;
        }
        if let Some(maximum) = self.maximum {
            transform.check(&maximum_path, maximum)?;
        }
        if let Some(Palette::ContinuousStops(stops)) = &self.color_palette {
            for (i, (value, _)) in stops.iter().enumerate() {
                transform.check(&palette_path.index(i), *value)?;
            }
        }

        if let (Some(minimum), Some(maximum)) = (self.minimum, self.maximum) {
            check_larger(&maximum_path, maximum, &minimum_path, minimum)?;
        }
        Ok(())
    }
}

// ============================================================================
// Continuous scale
// ============================================================================

/// Piecewise-linear mapping from internal values to colors.
#[derive(Debug, Clone, PartialEq)]
pub struct ContinuousColorScale {
    transform: ValueTransform,
    stops: Vec<(f64, Rgba)>,
}

impl ContinuousColorScale {
    /// Stops in internal units, ascending.
    #[must_use]
    pub fn stops(&self) -> &[(f64, Rgba)] {
        &self.stops
    }

    /// Color of an internal value, clamped to the stop range.
    #[must_use]
    pub fn map(&self, value: f64) -> Rgba {
        let (Some(&(first_value, first_color)), Some(&(last_value, last_color))) =
            (self.stops.first(), self.stops.last())
        else {
            return Rgba::GRAY;
        };
        if value <= first_value {
            return first_color;
        }
        if value >= last_value {
            return last_color;
        }
        self.stops
            .windows(2)
            .find(|pair| value <= pair[1].0)
            .map_or(last_color, |pair| {
                let (lo, lo_color) = pair[0];
                let (hi, hi_color) = pair[1];
                lo_color.lerp(hi_color, LinearScale::new((lo, hi), (0.0, 1.0)).fraction(value))
            })
    }

    /// Gradient legend with ticks labelled in data units.
    #[must_use]
    pub fn legend(&self, title: Option<String>) -> ColorLegend {
        let (lo, hi) = extent(self.stops.iter().map(|&(value, _)| value)).unwrap_or((0.0, 1.0));
        let ticks = nice_ticks(lo, hi, LEGEND_TICK_COUNT)
            .into_iter()
            .map(|position| Tick {
                position,
                label: format_number(self.transform.inverse(position)),
            })
            .collect();
        ColorLegend::Continuous {
            title,
            transform: self.transform,
            stops: self.stops.clone(),
            ticks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_path() -> FieldPath {
        FieldPath::root("configuration").field("color_scale")
    }

    fn field() -> FieldPath {
        FieldPath::root("data").field("points_colors")
    }

    fn indexed(values: &[ColorValue]) -> Vec<(FieldPath, &ColorValue)> {
        values.iter().enumerate().map(|(i, v)| (field().index(i), v)).collect()
    }

    #[test]
    fn test_preset_lookup() {
        assert_eq!(ColorPreset::from_name("viridis"), Some(ColorPreset::Viridis));
        assert_eq!(ColorPreset::from_name("RedBlue"), Some(ColorPreset::RedBlue));
        assert_eq!(ColorPreset::from_name("Rainbow"), None);
    }

    #[test]
    fn test_preset_tables() {
        for preset in ColorPreset::ALL {
            assert!(preset.colors().len() >= 2, "{} has too few stops", preset.name());
        }
        assert_eq!(ColorPreset::Viridis.colors()[0], Rgba::rgb(68, 1, 84));
        assert_eq!(ColorPreset::Heat.colors().last(), Some(&Rgba::WHITE));
    }

    #[test]
    fn test_reversed_categorical() {
        let config = ColorScaleConfiguration {
            color_palette: Some(Palette::CategoricalPairs(vec![("a".into(), "red".into())])),
            reverse_color_scale: true,
            ..Default::default()
        };
        assert_eq!(
            config.validation_message(&config_path()).as_deref(),
            Some("reversed categorical configuration.color_scale.color_palette")
        );
    }

    #[test]
    fn test_reverse_with_log() {
        let config = ColorScaleConfiguration {
            log_regularization: Some(0.0),
            reverse_color_scale: true,
            ..Default::default()
        };
        assert_eq!(
            config.validation_message(&config_path()).as_deref(),
            Some(
                "must not specify both of: configuration.color_scale.reverse_color_scale, \
                 configuration.color_scale.log_regularization"
            )
        );
    }

    #[test]
    fn test_palette_validation() {
        let unknown = ColorScaleConfiguration {
            color_palette: Some(Palette::NamedPreset("Rainbow".into())),
            ..Default::default()
        };
        assert_eq!(
            unknown.validation_message(&config_path()).as_deref(),
            Some("invalid configuration.color_scale.color_palette: Rainbow")
        );

        let single = ColorScaleConfiguration {
            color_palette: Some(Palette::ContinuousStops(vec![
                (1.0, "red".into()),
                (1.0, "blue".into()),
            ])),
            ..Default::default()
        };
        assert_eq!(
            single.validation_message(&config_path()).as_deref(),
            Some("too few distinct stop values in configuration.color_scale.color_palette: 1")
        );

        let duplicate = ColorScaleConfiguration {
            color_palette: Some(Palette::CategoricalPairs(vec![
                ("a".into(), "red".into()),
                ("a".into(), "blue".into()),
            ])),
            ..Default::default()
        };
        assert_eq!(
            duplicate.validation_message(&config_path()).as_deref(),
            Some("duplicate key in configuration.color_scale.color_palette: a")
        );

        let bad_color = ColorScaleConfiguration {
            color_palette: Some(Palette::CategoricalPairs(vec![("a".into(), "nope".into())])),
            ..Default::default()
        };
        assert_eq!(
            bad_color.validation_message(&config_path()).as_deref(),
            Some("invalid configuration.color_scale.color_palette[0]: nope")
        );
    }

    #[test]
    fn test_log_stop_values_must_be_positive() {
        let config = ColorScaleConfiguration {
            color_palette: Some(Palette::ContinuousStops(vec![
                (0.0, "red".into()),
                (1.0, "blue".into()),
            ])),
            log_regularization: Some(0.0),
            ..Default::default()
        };
        assert_eq!(
            config.validation_message(&config_path()).as_deref(),
            Some("log of non-positive configuration.color_scale.color_palette[0]: 0")
        );
    }

    #[test]
    fn test_show_scale_without_values() {
        let config = ColorScaleConfiguration { show_color_scale: true, ..Default::default() };
        let err = config.check_values(&config_path(), &field(), &[]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "configuration.color_scale.show_color_scale specified without data.points_colors"
        );
    }

    #[test]
    fn test_show_scale_with_explicit_colors() {
        let config = ColorScaleConfiguration { show_color_scale: true, ..Default::default() };
        let values = [ColorValue::from(1.0), ColorValue::from("red")];
        let err = config.check_values(&config_path(), &field(), &indexed(&values)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "configuration.color_scale.show_color_scale specified for explicit colors in data.points_colors[1]"
        );
    }

    #[test]
    fn test_key_without_palette() {
        let config = ColorScaleConfiguration::default();
        let values = [ColorValue::key("a")];
        let err = config.check_values(&config_path(), &field(), &indexed(&values)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "missing configuration.color_scale.color_palette for categorical data.points_colors[0]"
        );
    }

    #[test]
    fn test_kind_mismatch() {
        let config = ColorScaleConfiguration {
            color_palette: Some(Palette::CategoricalPairs(vec![("a".into(), "red".into())])),
            ..Default::default()
        };
        let values = [ColorValue::from(2.0)];
        let err = config.check_values(&config_path(), &field(), &indexed(&values)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "configuration.color_scale.color_palette is categorical but data.points_colors[0] is numeric"
        );
    }

    #[test]
    fn test_unknown_key() {
        let config = ColorScaleConfiguration {
            color_palette: Some(Palette::CategoricalPairs(vec![("a".into(), "red".into())])),
            ..Default::default()
        };
        let values = [ColorValue::key("a"), ColorValue::key("b")];
        let err = config.check_values(&config_path(), &field(), &indexed(&values)).unwrap_err();
        assert_eq!(err.to_string(), "invalid data.points_colors[1]: b");
    }

    #[test]
    fn test_resolve_categorical() {
        let config = ColorScaleConfiguration {
            color_palette: Some(Palette::CategoricalPairs(vec![
                ("a".into(), "red".into()),
                ("b".into(), "#0000ff".into()),
            ])),
            show_color_scale: true,
            ..Default::default()
        };
        let values = [ColorValue::key("b"), ColorValue::key("a")];
        let resolved = config.resolve(&config_path(), &field(), &indexed(&values)).unwrap();
        assert_eq!(resolved.colors, vec![Rgba::rgb(0, 0, 255), Rgba::rgb(255, 0, 0)]);
        match resolved.legend {
            Some(ColorLegend::Categorical { entries, .. }) => assert_eq!(entries.len(), 2),
            other => panic!("unexpected legend {other:?}"),
        }
    }

    #[test]
    fn test_resolve_continuous_endpoints() {
        let config = ColorScaleConfiguration::default();
        let values = [ColorValue::from(0.0), ColorValue::from(10.0)];
        let resolved = config.resolve(&config_path(), &field(), &indexed(&values)).unwrap();
        let viridis = ColorPreset::Viridis.colors();
        assert_eq!(resolved.colors[0], viridis[0]);
        assert_eq!(resolved.colors[1], viridis[viridis.len() - 1]);
        assert!(resolved.legend.is_none());
    }

    #[test]
    fn test_reverse_flips_colors_not_domain() {
        let config = ColorScaleConfiguration { reverse_color_scale: true, ..Default::default() };
        let scale = config.continuous_scale(&[0.0, 10.0]);
        assert_eq!(scale.stops()[0].0, 0.0);
        assert_eq!(scale.map(0.0), Rgba::rgb(253, 231, 37));
        assert_eq!(scale.map(10.0), Rgba::rgb(68, 1, 84));
    }

    #[test]
    fn test_explicit_stops_sorted_and_clamped() {
        let config = ColorScaleConfiguration {
            color_palette: Some(Palette::ContinuousStops(vec![
                (10.0, "white".into()),
                (0.0, "black".into()),
            ])),
            ..Default::default()
        };
        let scale = config.continuous_scale(&[5.0]);
        assert_eq!(scale.map(-5.0), Rgba::BLACK);
        assert_eq!(scale.map(5.0), Rgba::rgb(128, 128, 128));
        assert_eq!(scale.map(50.0), Rgba::WHITE);
    }

    #[test]
    fn test_degenerate_domain_uses_middle_color() {
        let config = ColorScaleConfiguration {
            color_palette: Some(Palette::NamedPreset("Greyscale".into())),
            ..Default::default()
        };
        let scale = config.continuous_scale(&[3.0, 3.0]);
        assert_eq!(scale.map(3.0), Rgba::rgb(128, 128, 128));
    }

    #[test]
    fn test_continuous_legend_in_data_units() {
        let config = ColorScaleConfiguration {
            log_regularization: Some(0.0),
            show_color_scale: true,
            title: Some("count".into()),
            ..Default::default()
        };
        let values = [ColorValue::from(1.0), ColorValue::from(1000.0)];
        let resolved = config.resolve(&config_path(), &field(), &indexed(&values)).unwrap();
        match resolved.legend {
            Some(ColorLegend::Continuous { title, ticks, .. }) => {
                assert_eq!(title.as_deref(), Some("count"));
                assert_eq!(ticks.first().map(|t| t.label.as_str()), Some("1"));
                assert_eq!(ticks.last().map(|t| t.label.as_str()), Some("1000"));
            }
            other => panic!("unexpected legend {other:?}"),
        }
    }
}
