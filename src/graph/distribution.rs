//! Distribution graphs: box, violin and density curve of one or several
//! value series.
//!
//! Series `i` sits at category position `i`. Violins are mirrored densities
//! reaching at most [`VIOLIN_EXTENT`] to each side; curves are one-sided
//! densities starting [`VIOLIN_EXTENT`] before the position and reaching at
//! most [`CURVE_EXTENT`].

use crate::axis::{category_layout, AxisConfiguration, AxisDomain};
use crate::band::BandConfiguration;
use crate::color::Rgba;
use crate::color_scale::{ColorScaleConfiguration, ColorValue};
use crate::error::Result;
use crate::figure::{ColorLegend, Layout, LegendEntry, LegendSymbol, Orientation, Trace};
use crate::graph::{
    check_matrix_finite, check_parallel, configuration_path, data_path, indexed_colors, normalize_matrix,
    orient, value_band_orientation, Graph, GraphConfiguration, GraphKind,
};
use crate::stats::{density, BoxStats, DEFAULT_DENSITY_POINTS};
use crate::validate::{
    check_all_finite, check_at_least_one, check_non_empty, check_not_both, FieldPath, Validate,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Half-width of a violin at its widest, in category units.
pub const VIOLIN_EXTENT: f64 = 0.4;

/// Height of a density curve at its peak, in category units.
pub const CURVE_EXTENT: f64 = 0.8;

const BOX_THICKNESS: f64 = 0.5;
const BOX_THICKNESS_WITH_DENSITY: f64 = 0.2;

/// Which summaries are drawn, and in which direction.
///
/// Flattened into its parent configuration: validation paths read
/// `configuration.show_box`, not `configuration.style.show_box`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct DistributionStyle {
    /// Box and whiskers.
    pub show_box: bool,
    /// Mirrored density.
    pub show_violin: bool,
    /// One-sided density.
    pub show_curve: bool,
    /// Direction of the category axis.
    pub orientation: Orientation,
}

impl Default for DistributionStyle {
    fn default() -> Self {
        Self { show_box: true, show_violin: false, show_curve: false, orientation: Orientation::Vertical }
    }
}

impl DistributionStyle {
    /// Flags are addressed directly under `path`.
    fn check(&self, path: &FieldPath) -> Result<()> {
        let show_box = path.field("show_box");
        let show_violin = path.field("show_violin");
        let show_curve = path.field("show_curve");
        check_at_least_one(&[
            (show_box.clone(), self.show_box),
            (show_violin.clone(), self.show_violin),
            (show_curve.clone(), self.show_curve),
        ])?;
        check_not_both((&show_violin, self.show_violin), (&show_curve, self.show_curve))
    }

    const fn shows_density(&self) -> bool {
        self.show_violin || self.show_curve
    }

    const fn box_thickness(&self) -> f64 {
        if self.shows_density() {
            BOX_THICKNESS_WITH_DENSITY
        } else {
            BOX_THICKNESS
        }
    }
}

// ============================================================================
// Distribution
// ============================================================================

/// One value series.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct DistributionData {
    /// Samples.
    pub values: Vec<f64>,
    /// Series name, shown in the legend.
    pub name: Option<String>,
}

/// Options of a distribution graph.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct DistributionConfiguration {
    /// Canvas options.
    pub graph: GraphConfiguration,
    /// Axis the samples are plotted along.
    pub value_axis: AxisConfiguration,
    /// Bands along the value axis.
    pub value_bands: BandConfiguration,
    /// Summaries and orientation.
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub style: DistributionStyle,
    /// Color token; the first series color when unset.
    pub color: Option<String>,
}

impl Graph for DistributionData {
    type Configuration = DistributionConfiguration;
    type Prepared = PreparedDistributions;

    const KIND: GraphKind = GraphKind::Distribution;

    fn graph_configuration(configuration: &Self::Configuration) -> &GraphConfiguration {
        &configuration.graph
    }

    fn band_configurations(configuration: &Self::Configuration) -> Vec<&BandConfiguration> {
        vec![&configuration.value_bands]
    }

    fn validate(&self, configuration: &Self::Configuration) -> Result<()> {
        let config = configuration_path();
        let data = data_path();
        configuration.graph.validate(&config.field("graph"))?;
        configuration.style.check(&config)?;
        configuration.value_axis.validate(&config.field("value_axis"))?;

        let values = data.field("values");
        check_non_empty(&values, self.values.len())?;
        check_all_finite(&values, &self.values)?;
        configuration.value_axis.normalize(&values, &self.values)?;

        if let Some(color) = &configuration.color {
            Rgba::resolve(&config.field("color"), color)?;
        }
        let axis = &configuration.value_axis;
        configuration.value_bands.validate_on_axes(
            &config.field("value_bands"),
            value_band_orientation(configuration.style.orientation),
            axis,
            axis,
        )
    }

    fn prepare(&self, configuration: &Self::Configuration) -> Result<Self::Prepared> {
        let values = configuration.value_axis.normalize(&data_path().field("values"), &self.values)?;
        let color = configuration
            .color
            .as_deref()
            .and_then(Rgba::parse)
            .unwrap_or_else(|| Rgba::series(0));
        Ok(PreparedDistributions::new(
            &configuration.style,
            &configuration.value_axis,
            vec![(self.name.clone(), values, color)],
            None,
        ))
    }

    fn build_traces(&self, configuration: &Self::Configuration, prepared: &Self::Prepared) -> Vec<Trace> {
        prepared.traces(&configuration.style)
    }

    fn build_layout(&self, configuration: &Self::Configuration, prepared: &Self::Prepared) -> Layout {
        let names = self.name.clone().map(|name| vec![name]);
        prepared.layout(
            &configuration.graph,
            &configuration.value_axis,
            &configuration.value_bands,
            &configuration.style,
            names.as_deref(),
        )
    }

    fn legend_entries(&self, _configuration: &Self::Configuration, prepared: &Self::Prepared) -> Vec<LegendEntry> {
        prepared.legend_entries()
    }
}

// ============================================================================
// Distributions
// ============================================================================

/// Several value series side by side.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct DistributionsData {
    /// Samples per series.
    pub values: Vec<Vec<f64>>,
    /// Series names, parallel to `values`.
    pub names: Option<Vec<String>>,
    /// Series colors, parallel to `values`.
    pub colors: Option<Vec<ColorValue>>,
}

/// Options of a distributions graph.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct DistributionsConfiguration {
    /// Canvas options.
    pub graph: GraphConfiguration,
    /// Axis the samples are plotted along.
    pub value_axis: AxisConfiguration,
    /// Bands along the value axis.
    pub value_bands: BandConfiguration,
    /// Summaries and orientation.
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub style: DistributionStyle,
    /// Mapping of `data.colors`.
    pub color_scale: ColorScaleConfiguration,
}

impl Graph for DistributionsData {
    type Configuration = DistributionsConfiguration;
    type Prepared = PreparedDistributions;

    const KIND: GraphKind = GraphKind::Distributions;

    fn graph_configuration(configuration: &Self::Configuration) -> &GraphConfiguration {
        &configuration.graph
    }

    fn band_configurations(configuration: &Self::Configuration) -> Vec<&BandConfiguration> {
        vec![&configuration.value_bands]
    }

    fn validate(&self, configuration: &Self::Configuration) -> Result<()> {
        let config = configuration_path();
        let data = data_path();
        configuration.graph.validate(&config.field("graph"))?;
        configuration.style.check(&config)?;
        configuration.value_axis.validate(&config.field("value_axis"))?;

        let values = data.field("values");
        check_non_empty(&values, self.values.len())?;
        check_parallel(&data.field("names"), self.names.as_deref(), &values, self.values.len())?;
        check_parallel(&data.field("colors"), self.colors.as_deref(), &values, self.values.len())?;
        for (i, series) in self.values.iter().enumerate() {
            check_non_empty(&values.index(i), series.len())?;
        }
        check_matrix_finite(&values, &self.values)?;
        normalize_matrix(configuration.value_axis.transform(), &values, &self.values)?;

        let axis = &configuration.value_axis;
        configuration.value_bands.validate_on_axes(
            &config.field("value_bands"),
            value_band_orientation(configuration.style.orientation),
            axis,
            axis,
        )?;

        let color_path = config.field("color_scale");
        let colors = data.field("colors");
        configuration.color_scale.validate(&color_path)?;
        configuration.color_scale.check_values(
            &color_path,
            &colors,
            &indexed_colors(&colors, self.colors.as_deref().unwrap_or_default()),
        )
    }

    fn prepare(&self, configuration: &Self::Configuration) -> Result<Self::Prepared> {
        let config = configuration_path();
        let data = data_path();
        let colors = data.field("colors");
        let resolved = configuration.color_scale.resolve(
            &config.field("color_scale"),
            &colors,
            &indexed_colors(&colors, self.colors.as_deref().unwrap_or_default()),
        )?;
        let internal = normalize_matrix(configuration.value_axis.transform(), &data.field("values"), &self.values)?;
        let series = internal
            .into_iter()
            .enumerate()
            .map(|(i, internal)| {
                let name = self.names.as_ref().and_then(|names| names.get(i)).cloned();
                let color = resolved.colors.get(i).copied().unwrap_or_else(|| Rgba::series(i));
                (name, internal, color)
            })
            .collect();
        Ok(PreparedDistributions::new(
            &configuration.style,
            &configuration.value_axis,
            series,
            resolved.legend,
        ))
    }

    fn build_traces(&self, configuration: &Self::Configuration, prepared: &Self::Prepared) -> Vec<Trace> {
        prepared.traces(&configuration.style)
    }

    fn build_layout(&self, configuration: &Self::Configuration, prepared: &Self::Prepared) -> Layout {
        prepared.layout(
            &configuration.graph,
            &configuration.value_axis,
            &configuration.value_bands,
            &configuration.style,
            self.names.as_deref(),
        )
    }

    fn legend_entries(&self, _configuration: &Self::Configuration, prepared: &Self::Prepared) -> Vec<LegendEntry> {
        prepared.legend_entries()
    }
}

// ============================================================================
// Shared preparation
// ============================================================================

/// Statistics of one series, in internal units.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedSeries {
    /// Legend label.
    pub name: Option<String>,
    /// Fill color.
    pub color: Rgba,
    /// Box summary.
    pub stats: Option<BoxStats>,
    /// Density samples normalized so the peak is 1.
    pub density: Vec<(f64, f64)>,
}

/// Engine outputs of the distribution kinds.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedDistributions {
    /// One entry per series.
    pub series: Vec<PreparedSeries>,
    /// Resolved value axis.
    pub value_domain: AxisDomain,
    /// Color legend of `data.colors`, when requested.
    pub color_legend: Option<ColorLegend>,
}

impl PreparedDistributions {
    fn new(
        style: &DistributionStyle,
        value_axis: &AxisConfiguration,
        series: Vec<(Option<String>, Vec<f64>, Rgba)>,
        color_legend: Option<ColorLegend>,
    ) -> Self {
        let series: Vec<PreparedSeries> = series
            .into_iter()
            .map(|(name, values, color)| {
                let density = if style.shows_density() {
                    normalize_peak(density(&values, None, DEFAULT_DENSITY_POINTS))
                } else {
                    Vec::new()
                };
                PreparedSeries { name, color, stats: BoxStats::from_values(&values), density }
            })
            .collect();
        let extent = series.iter().flat_map(|s| {
            let stats = s.stats.iter().flat_map(|stats| {
                let mut values = vec![stats.lower_whisker, stats.upper_whisker];
                values.extend(&stats.outliers);
                values
            });
            stats.chain(s.density.iter().map(|&(value, _)| value)).collect::<Vec<_>>()
        });
        let value_domain = value_axis.resolve_domain(extent);
        tracing::trace!(series = series.len(), ?value_domain, "prepared distributions");
        Self { series, value_domain, color_legend }
    }

    fn traces(&self, style: &DistributionStyle) -> Vec<Trace> {
        let mut traces = Vec::new();
        for (i, series) in self.series.iter().enumerate() {
            #[allow(clippy::cast_precision_loss)]
            let position = i as f64;
            if style.show_violin {
                traces.push(Trace::Density {
                    name: series.name.clone(),
                    position,
                    samples: scale_extent(&series.density, VIOLIN_EXTENT),
                    mirrored: true,
                    color: series.color,
                    orientation: style.orientation,
                });
            } else if style.show_curve {
                traces.push(Trace::Density {
                    name: series.name.clone(),
                    position: position - VIOLIN_EXTENT,
                    samples: scale_extent(&series.density, CURVE_EXTENT),
                    mirrored: false,
                    color: series.color,
                    orientation: style.orientation,
                });
            }
            if style.show_box {
                if let Some(stats) = &series.stats {
                    traces.push(Trace::Box {
                        name: series.name.clone(),
                        position,
                        stats: stats.clone(),
                        thickness: style.box_thickness(),
                        color: series.color,
                        orientation: style.orientation,
                    });
                }
            }
        }
        traces
    }

    fn layout(
        &self,
        graph: &GraphConfiguration,
        value_axis: &AxisConfiguration,
        bands: &BandConfiguration,
        style: &DistributionStyle,
        names: Option<&[String]>,
    ) -> Layout {
        let count = self.series.len();
        let flipped = style.orientation == Orientation::Horizontal;
        #[allow(clippy::cast_precision_loss)]
        let category_domain = AxisDomain::fixed(-0.5, count as f64 - 0.5);
        let (x, y) = orient(style.orientation, category_domain, self.value_domain);
        let shapes = bands.shapes(value_band_orientation(style.orientation), &x, &y);
        let (x_axis, y_axis) = orient(
            style.orientation,
            category_layout(count, names, None, flipped),
            self.value_domain.layout(value_axis.title.clone()),
        );
        let mut layout = graph.layout(x_axis, y_axis, shapes);
        layout.color_legend.clone_from(&self.color_legend);
        layout
    }

    fn legend_entries(&self) -> Vec<LegendEntry> {
        self.series
            .iter()
            .filter_map(|series| {
                series.name.as_ref().map(|name| LegendEntry {
                    title: name.clone(),
                    symbol: LegendSymbol::Fill { color: series.color },
                })
            })
            .collect()
    }
}

fn normalize_peak(samples: Vec<(f64, f64)>) -> Vec<(f64, f64)> {
    let peak = samples.iter().map(|&(_, d)| d).fold(0.0, f64::max);
    if peak > 0.0 {
        samples.into_iter().map(|(x, d)| (x, d / peak)).collect()
    } else {
        samples
    }
}

fn scale_extent(samples: &[(f64, f64)], extent: f64) -> Vec<(f64, f64)> {
    samples.iter().map(|&(x, d)| (x, d * extent)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::band::Band;
    use approx::assert_relative_eq;

    fn data() -> DistributionData {
        DistributionData { values: vec![1.0, 2.0, 3.0, 4.0, 5.0], name: Some("a".into()) }
    }

    #[test]
    fn test_requires_a_summary() {
        let mut configuration = DistributionConfiguration::default();
        configuration.style.show_box = false;
        assert_eq!(
            data().validate(&configuration).unwrap_err().to_string(),
            "must specify at least one of: configuration.show_box, configuration.show_violin, configuration.show_curve"
        );
    }

    #[test]
    fn test_violin_and_curve_conflict() {
        let mut configuration = DistributionConfiguration::default();
        configuration.style.show_violin = true;
        configuration.style.show_curve = true;
        assert_eq!(
            data().validate(&configuration).unwrap_err().to_string(),
            "must not specify both of: configuration.show_violin, configuration.show_curve"
        );
    }

    #[test]
    fn test_empty_values() {
        let err = DistributionData::default().validate(&DistributionConfiguration::default()).unwrap_err();
        assert_eq!(err.to_string(), "empty data.values");
    }

    #[test]
    fn test_log_axis_rejects_zero() {
        let mut configuration = DistributionConfiguration::default();
        configuration.value_axis = AxisConfiguration::new().log_regularization(0.0);
        let data = DistributionData { values: vec![1.0, 0.0], name: None };
        assert_eq!(
            data.validate(&configuration).unwrap_err().to_string(),
            "log of non-positive data.values[1]: 0"
        );
    }

    #[test]
    fn test_value_bands_on_log_axis() {
        let mut configuration = DistributionConfiguration::default();
        configuration.value_axis = AxisConfiguration::new().log_regularization(0.0);
        configuration.value_bands.low = Some(Band::line(-1.0));
        assert_eq!(
            data().validate(&configuration).unwrap_err().to_string(),
            "log of non-positive configuration.value_bands.low.offset: -1"
        );
    }

    #[test]
    fn test_box_only_traces() {
        let configuration = DistributionConfiguration::default();
        let prepared = data().prepare(&configuration).unwrap();
        let traces = data().build_traces(&configuration, &prepared);
        assert_eq!(traces.len(), 1);
        match &traces[0] {
            Trace::Box { stats, thickness, .. } => {
                assert_relative_eq!(stats.median, 3.0);
                assert_relative_eq!(*thickness, BOX_THICKNESS);
            }
            other => panic!("unexpected trace {other:?}"),
        }
    }

    #[test]
    fn test_violin_peak_extent() {
        let mut configuration = DistributionConfiguration::default();
        configuration.style.show_violin = true;
        let prepared = data().prepare(&configuration).unwrap();
        let traces = data().build_traces(&configuration, &prepared);
        assert_eq!(traces.len(), 2);
        match &traces[0] {
            Trace::Density { samples, mirrored, .. } => {
                assert!(*mirrored);
                let peak = samples.iter().map(|&(_, d)| d).fold(0.0, f64::max);
                assert_relative_eq!(peak, VIOLIN_EXTENT);
            }
            other => panic!("unexpected trace {other:?}"),
        }
    }

    #[test]
    fn test_curve_starts_before_position() {
        let mut configuration = DistributionConfiguration::default();
        configuration.style.show_box = false;
        configuration.style.show_curve = true;
        let prepared = data().prepare(&configuration).unwrap();
        let traces = data().build_traces(&configuration, &prepared);
        match &traces[..] {
            [Trace::Density { position, mirrored, .. }] => {
                assert!(!mirrored);
                assert_relative_eq!(*position, -VIOLIN_EXTENT);
            }
            other => panic!("unexpected traces {other:?}"),
        }
    }

    #[test]
    fn test_horizontal_layout_swaps_axes() {
        let mut configuration = DistributionConfiguration::default();
        configuration.style.orientation = Orientation::Horizontal;
        let prepared = data().prepare(&configuration).unwrap();
        let layout = data().build_layout(&configuration, &prepared);
        assert_eq!(layout.y_axis.range, (0.5, -0.5));
        assert_eq!(layout.y_axis.ticks[0].label, "a");
        assert!(layout.x_axis.range.0 < 1.0 && layout.x_axis.range.1 > 5.0);
    }

    #[test]
    fn test_distributions_colors_parallel() {
        let data = DistributionsData {
            values: vec![vec![1.0], vec![2.0]],
            names: None,
            colors: Some(vec!["red".into()]),
        };
        assert_eq!(
            data.validate(&DistributionsConfiguration::default()).unwrap_err().to_string(),
            "inconsistent size of data.colors: 1\nexpected size (from data.values): 2"
        );
    }

    #[test]
    fn test_distributions_empty_series() {
        let data = DistributionsData { values: vec![vec![1.0], vec![]], ..Default::default() };
        assert_eq!(
            data.validate(&DistributionsConfiguration::default()).unwrap_err().to_string(),
            "empty data.values[1]"
        );
    }

    #[test]
    fn test_distributions_series_colors_and_legend() {
        let data = DistributionsData {
            values: vec![vec![1.0, 2.0], vec![3.0, 4.0]],
            names: Some(vec!["a".into(), "b".into()]),
            colors: Some(vec!["red".into(), "blue".into()]),
        };
        let configuration = DistributionsConfiguration::default();
        let prepared = data.prepare(&configuration).unwrap();
        let legend = data.legend_entries(&configuration, &prepared);
        assert_eq!(legend.len(), 2);
        assert_eq!(legend[0].symbol, LegendSymbol::Fill { color: Rgba::rgb(255, 0, 0) });
        assert_eq!(legend[1].title, "b");
    }
}
