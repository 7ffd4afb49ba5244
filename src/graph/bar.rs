//! Bar graphs.
//!
//! Bars rise from zero on a linear value axis and from the bottom of the
//! domain on a log one. Several series are grouped side by side within
//! [`GROUP_WIDTH`] of each category, or stacked.

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
use crate::scale::ValueTransform;
use crate::stack::{check_stackable, stack, StackingMode};
use crate::validate::{check_all_finite, check_non_empty, check_same_size, FieldPath, Validate};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Width of the bars of one category, in category units.
pub const GROUP_WIDTH: f64 = 0.8;

// ============================================================================
// Bar
// ============================================================================

/// One bar per value.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct BarData {
    /// Bar lengths.
    pub values: Vec<f64>,
    /// Category labels, parallel to `values`.
    pub names: Option<Vec<String>>,
    /// Per-bar colors, parallel to `values`.
    pub colors: Option<Vec<ColorValue>>,
}

/// Options of a bar graph.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct BarConfiguration {
    /// Canvas options.
    pub graph: GraphConfiguration,
    /// Axis of the bar lengths.
    pub value_axis: AxisConfiguration,
    /// Bands along the value axis.
    pub value_bands: BandConfiguration,
    /// Direction of the category axis.
    pub orientation: Orientation,
    /// Mapping of `data.colors`.
    pub color_scale: ColorScaleConfiguration,
    /// Color token of all bars when `data.colors` is absent.
    pub color: Option<String>,
}

/// One series of bars, in internal units.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedBarSeries {
    /// Legend label.
    pub name: Option<String>,
    /// Category centers.
    pub positions: Vec<f64>,
    /// Value-axis starts.
    pub lower: Vec<f64>,
    /// Value-axis ends.
    pub upper: Vec<f64>,
    /// Per-bar fill.
    pub colors: Vec<Rgba>,
}

/// Engine outputs of the bar kinds.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedBars {
    /// One entry per series.
    pub series: Vec<PreparedBarSeries>,
    /// Bar thickness in category units.
    pub thickness: f64,
    /// Number of categories.
    pub categories: usize,
    /// Resolved value axis.
    pub value_domain: AxisDomain,
    /// Color legend, when requested.
    pub color_legend: Option<ColorLegend>,
}

impl PreparedBars {
    fn traces(&self, orientation: Orientation) -> Vec<Trace> {
        self.series
            .iter()
            .map(|series| Trace::Bars {
                name: series.name.clone(),
                positions: series.positions.clone(),
                lower: series.lower.clone(),
                upper: series.upper.clone(),
                thickness: self.thickness,
                colors: series.colors.clone(),
                orientation,
            })
            .collect()
    }

    fn layout(
        &self,
        graph: &GraphConfiguration,
        value_axis: &AxisConfiguration,
        bands: &BandConfiguration,
        orientation: Orientation,
        names: Option<&[String]>,
    ) -> Layout {
        #[allow(clippy::cast_precision_loss)]
        let category_domain = AxisDomain::fixed(-0.5, self.categories as f64 - 0.5);
        let (x, y) = orient(orientation, category_domain, self.value_domain);
        let shapes = bands.shapes(value_band_orientation(orientation), &x, &y);
        let (x_axis, y_axis) = orient(
            orientation,
            category_layout(self.categories, names, None, orientation == Orientation::Horizontal),
            self.value_domain.layout(value_axis.title.clone()),
        );
        let mut layout = graph.layout(x_axis, y_axis, shapes);
        layout.color_legend.clone_from(&self.color_legend);
        layout
    }
}

/// Where bars start: zero when the axis can show it, else the domain floor.
fn bar_base(transform: ValueTransform, domain: &AxisDomain, value: f64) -> f64 {
    if transform.accepts(value) {
        transform.forward(value)
    } else {
        domain.minimum
    }
}

fn validate_value_bands(
    config: &FieldPath,
    bands: &BandConfiguration,
    orientation: Orientation,
    axis: &AxisConfiguration,
) -> Result<()> {
    bands.validate_on_axes(&config.field("value_bands"), value_band_orientation(orientation), axis, axis)
}

fn check_colors(
    config: &FieldPath,
    color_scale: &ColorScaleConfiguration,
    field: &FieldPath,
    colors: Option<&[ColorValue]>,
) -> Result<()> {
    let color_path = config.field("color_scale");
    color_scale.validate(&color_path)?;
    color_scale.check_values(&color_path, field, &indexed_colors(field, colors.unwrap_or_default()))
}

impl Graph for BarData {
    type Configuration = BarConfiguration;
    type Prepared = PreparedBars;

    const KIND: GraphKind = GraphKind::Bar;

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
        configuration.value_axis.validate(&config.field("value_axis"))?;

        let values = data.field("values");
        let count = self.values.len();
        check_non_empty(&values, count)?;
        check_parallel(&data.field("names"), self.names.as_deref(), &values, count)?;
        check_parallel(&data.field("colors"), self.colors.as_deref(), &values, count)?;

        check_all_finite(&values, &self.values)?;
        configuration.value_axis.normalize(&values, &self.values)?;

        if let Some(color) = &configuration.color {
            Rgba::resolve(&config.field("color"), color)?;
        }
        validate_value_bands(&config, &configuration.value_bands, configuration.orientation, &configuration.value_axis)?;
        check_colors(&config, &configuration.color_scale, &data.field("colors"), self.colors.as_deref())
    }

    fn prepare(&self, configuration: &Self::Configuration) -> Result<Self::Prepared> {
        let data = data_path();
        let transform = configuration.value_axis.transform();
        let upper = configuration.value_axis.normalize(&data.field("values"), &self.values)?;
        let anchor = transform.accepts(0.0).then(|| transform.forward(0.0));
        let value_domain = configuration.value_axis.resolve_domain(upper.iter().copied().chain(anchor));

        let colors_field = data.field("colors");
        let resolved = configuration.color_scale.resolve(
            &configuration_path().field("color_scale"),
            &colors_field,
            &indexed_colors(&colors_field, self.colors.as_deref().unwrap_or_default()),
        )?;
        let count = upper.len();
        let colors = if resolved.colors.is_empty() {
            let color = configuration.color.as_deref().and_then(Rgba::parse).unwrap_or_else(|| Rgba::series(0));
            vec![color; count]
        } else {
            resolved.colors
        };
        let base = bar_base(transform, &value_domain, 0.0);
        #[allow(clippy::cast_precision_loss)]
        let series = PreparedBarSeries {
            name: None,
            positions: (0..count).map(|i| i as f64).collect(),
            lower: vec![base; count],
            upper,
            colors,
        };
        Ok(PreparedBars {
            series: vec![series],
            thickness: GROUP_WIDTH,
            categories: count,
            value_domain,
            color_legend: resolved.legend,
        })
    }

    fn build_traces(&self, configuration: &Self::Configuration, prepared: &Self::Prepared) -> Vec<Trace> {
        prepared.traces(configuration.orientation)
    }

    fn build_layout(&self, configuration: &Self::Configuration, prepared: &Self::Prepared) -> Layout {
        prepared.layout(
            &configuration.graph,
            &configuration.value_axis,
            &configuration.value_bands,
            configuration.orientation,
            self.names.as_deref(),
        )
    }

    fn legend_entries(&self, _configuration: &Self::Configuration, _prepared: &Self::Prepared) -> Vec<LegendEntry> {
        Vec::new()
    }
}

// ============================================================================
// Bars
// ============================================================================

/// Several bar series over shared categories.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct BarsData {
    /// Bar lengths per series; every series has one value per category.
    pub values: Vec<Vec<f64>>,
    /// Category labels, parallel to each series.
    pub bars_names: Option<Vec<String>>,
    /// Series names, parallel to `values`.
    pub series_names: Option<Vec<String>>,
    /// Series colors, parallel to `values`.
    pub series_colors: Option<Vec<ColorValue>>,
}

/// Options of a bars graph.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct BarsConfiguration {
    /// Canvas options.
    pub graph: GraphConfiguration,
    /// Axis of the bar lengths.
    pub value_axis: AxisConfiguration,
    /// Bands along the value axis.
    pub value_bands: BandConfiguration,
    /// Direction of the category axis.
    pub orientation: Orientation,
    /// Mapping of `data.series_colors`.
    pub color_scale: ColorScaleConfiguration,
    /// Stacks the series per category instead of grouping them.
    pub stacking: Option<StackingMode>,
}

impl Graph for BarsData {
    type Configuration = BarsConfiguration;
    type Prepared = PreparedBars;

    const KIND: GraphKind = GraphKind::Bars;

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
        configuration.value_axis.validate(&config.field("value_axis"))?;

        let values = data.field("values");
        check_non_empty(&values, self.values.len())?;
        let first = values.index(0);
        let categories = self.values.first().map_or(0, Vec::len);
        for (i, series) in self.values.iter().enumerate().skip(1) {
            check_same_size(&values.index(i), series.len(), &first, categories)?;
        }
        check_parallel(&data.field("bars_names"), self.bars_names.as_deref(), &first, categories)?;
        check_parallel(&data.field("series_names"), self.series_names.as_deref(), &values, self.values.len())?;
        check_parallel(&data.field("series_colors"), self.series_colors.as_deref(), &values, self.values.len())?;

        check_matrix_finite(&values, &self.values)?;
        let transform = configuration.value_axis.transform();
        match configuration.stacking {
            None => {
                normalize_matrix(transform, &values, &self.values)?;
            }
            Some(mode) => {
                check_stackable(&values, mode, &self.values)?;
                normalize_matrix(transform, &values, &stack(mode, &self.values).upper)?;
            }
        }

        validate_value_bands(&config, &configuration.value_bands, configuration.orientation, &configuration.value_axis)?;
        check_colors(
            &config,
            &configuration.color_scale,
            &data.field("series_colors"),
            self.series_colors.as_deref(),
        )
    }

    fn prepare(&self, configuration: &Self::Configuration) -> Result<Self::Prepared> {
        let data = data_path();
        let values = data.field("values");
        let transform = configuration.value_axis.transform();
        let (tops, bottoms) = match configuration.stacking {
            None => (self.values.clone(), None),
            Some(mode) => {
                let stack = stack(mode, &self.values);
                (stack.upper, Some(stack.lower))
            }
        };
        let upper = normalize_matrix(transform, &values, &tops)?;
        let anchor = transform.accepts(0.0).then(|| transform.forward(0.0));
        let value_domain = configuration
            .value_axis
            .resolve_domain(upper.iter().flatten().copied().chain(anchor));

        let colors_field = data.field("series_colors");
        let resolved = configuration.color_scale.resolve(
            &configuration_path().field("color_scale"),
            &colors_field,
            &indexed_colors(&colors_field, self.series_colors.as_deref().unwrap_or_default()),
        )?;

        let series_count = self.values.len();
        let categories = self.values.first().map_or(0, Vec::len);
        #[allow(clippy::cast_precision_loss)]
        let thickness = match configuration.stacking {
            Some(_) => GROUP_WIDTH,
            None => GROUP_WIDTH / series_count.max(1) as f64,
        };
        let series = upper
            .into_iter()
            .enumerate()
            .map(|(s, upper)| {
                #[allow(clippy::cast_precision_loss)]
                let offset = match configuration.stacking {
                    Some(_) => 0.0,
                    None => -GROUP_WIDTH / 2.0 + (s as f64 + 0.5) * thickness,
                };
                let count = upper.len();
                let lower = match bottoms.as_ref().and_then(|bottoms| bottoms.get(s)) {
                    Some(row) => row.iter().map(|&v| bar_base(transform, &value_domain, v)).collect(),
                    None => vec![bar_base(transform, &value_domain, 0.0); count],
                };
                let color = resolved.colors.get(s).copied().unwrap_or_else(|| Rgba::series(s));
                #[allow(clippy::cast_precision_loss)]
                let positions = (0..count).map(|j| j as f64 + offset).collect();
                PreparedBarSeries {
                    name: self.series_names.as_ref().and_then(|names| names.get(s)).cloned(),
                    positions,
                    lower,
                    upper,
                    colors: vec![color; count],
                }
            })
            .collect();
        tracing::trace!(series_count, categories, stacking = ?configuration.stacking, "prepared bars");
        Ok(PreparedBars { series, thickness, categories, value_domain, color_legend: resolved.legend })
    }

    fn build_traces(&self, configuration: &Self::Configuration, prepared: &Self::Prepared) -> Vec<Trace> {
        prepared.traces(configuration.orientation)
    }

    fn build_layout(&self, configuration: &Self::Configuration, prepared: &Self::Prepared) -> Layout {
        prepared.layout(
            &configuration.graph,
            &configuration.value_axis,
            &configuration.value_bands,
            configuration.orientation,
            self.bars_names.as_deref(),
        )
    }

    fn legend_entries(&self, _configuration: &Self::Configuration, prepared: &Self::Prepared) -> Vec<LegendEntry> {
        prepared
            .series
            .iter()
            .filter_map(|series| {
                let color = series.colors.first().copied()?;
                series.name.as_ref().map(|name| LegendEntry {
                    title: name.clone(),
                    symbol: LegendSymbol::Fill { color },
                })
            })
            .collect()
    }
}
