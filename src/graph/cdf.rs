//! Empirical cumulative distribution graphs.
//!
//! Values run along x; the cumulative fraction along a fixed `[0, 1]` y axis.
//! Each series is drawn as a staircase that rises at every sample.

use crate::axis::{AxisConfiguration, AxisDomain};
use crate::band::{BandConfiguration, BandOrientation};
use crate::color::Rgba;
use crate::color_scale::{ColorScaleConfiguration, ColorValue};
use crate::error::Result;
use crate::figure::{ColorLegend, Layout, LegendEntry, LegendSymbol, Trace};
use crate::graph::{
    check_matrix_finite, check_parallel, configuration_path, data_path, indexed_colors, normalize_matrix,
    Graph, GraphConfiguration, GraphKind, LineStyle,
};
use crate::stats::cumulative;
use crate::validate::{check_all_finite, check_non_empty, FieldPath, Validate};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One sample series.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct CdfData {
    /// Samples.
    pub values: Vec<f64>,
    /// Series name.
    pub name: Option<String>,
}

/// Options of a CDF graph.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct CdfConfiguration {
    /// Canvas options.
    pub graph: GraphConfiguration,
    /// Axis of the samples.
    pub value_axis: AxisConfiguration,
    /// Vertical bands at sample values.
    pub value_bands: BandConfiguration,
    /// Stroke.
    pub line: LineStyle,
}

/// Several sample series.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct CdfsData {
    /// Samples per series.
    pub values: Vec<Vec<f64>>,
    /// Series names, parallel to `values`.
    pub names: Option<Vec<String>>,
    /// Series colors, parallel to `values`.
    pub colors: Option<Vec<ColorValue>>,
}

/// Options of a CDFs graph.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct CdfsConfiguration {
    /// Canvas options.
    pub graph: GraphConfiguration,
    /// Axis of the samples.
    pub value_axis: AxisConfiguration,
    /// Vertical bands at sample values.
    pub value_bands: BandConfiguration,
    /// Stroke.
    pub line: LineStyle,
    /// Mapping of `data.colors`.
    pub color_scale: ColorScaleConfiguration,
}

/// Engine outputs of the CDF kinds.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedCdfs {
    /// `(name, color, staircase)` per series, in internal units.
    pub series: Vec<(Option<String>, Rgba, Vec<(f64, f64)>)>,
    /// Resolved value axis.
    pub value_domain: AxisDomain,
    /// Color legend, when requested.
    pub color_legend: Option<ColorLegend>,
}

fn staircase(internal: &[f64]) -> Vec<(f64, f64)> {
    let mut points = Vec::with_capacity(internal.len() * 2);
    let mut previous = 0.0;
    for (x, fraction) in cumulative(internal) {
        points.push((x, previous));
        points.push((x, fraction));
        previous = fraction;
    }
    points
}

fn validate_series(path: &FieldPath, values: &[f64], axis: &AxisConfiguration) -> Result<()> {
    check_non_empty(path, values.len())?;
    check_all_finite(path, values)?;
    axis.normalize(path, values).map(drop)
}

impl PreparedCdfs {
    fn new(
        axis: &AxisConfiguration,
        series: Vec<(Option<String>, Rgba, Vec<f64>)>,
        color_legend: Option<ColorLegend>,
    ) -> Self {
        let value_domain = axis.resolve_domain(series.iter().flat_map(|(_, _, values)| values.iter().copied()));
        let series = series
            .into_iter()
            .map(|(name, color, values)| (name, color, staircase(&values)))
            .collect();
        Self { series, value_domain, color_legend }
    }

    fn traces(&self, line: &LineStyle) -> Vec<Trace> {
        self.series
            .iter()
            .map(|(name, color, points)| Trace::Line {
                name: name.clone(),
                xs: points.iter().map(|&(x, _)| x).collect(),
                ys: points.iter().map(|&(_, y)| y).collect(),
                color: *color,
                width: line.width,
                dashed: line.is_dashed,
                baseline: None,
            })
            .collect()
    }

    fn layout(&self, graph: &GraphConfiguration, axis: &AxisConfiguration, bands: &BandConfiguration) -> Layout {
        let fraction = AxisDomain::fixed(0.0, 1.0);
        let shapes = bands.shapes(BandOrientation::Vertical, &self.value_domain, &fraction);
        let mut layout = graph.layout(self.value_domain.layout(axis.title.clone()), fraction.layout(None), shapes);
        layout.color_legend.clone_from(&self.color_legend);
        layout
    }

    fn legend_entries(&self, line: &LineStyle) -> Vec<LegendEntry> {
        self.series
            .iter()
            .filter_map(|(name, color, _)| {
                name.as_ref().map(|name| LegendEntry {
                    title: name.clone(),
                    symbol: LegendSymbol::Line { color: *color, width: line.width, dashed: line.is_dashed },
                })
            })
            .collect()
    }
}

impl Graph for CdfData {
    type Configuration = CdfConfiguration;
    type Prepared = PreparedCdfs;

    const KIND: GraphKind = GraphKind::Cdf;

    fn graph_configuration(configuration: &Self::Configuration) -> &GraphConfiguration {
        &configuration.graph
    }

    fn band_configurations(configuration: &Self::Configuration) -> Vec<&BandConfiguration> {
        vec![&configuration.value_bands]
    }

    fn validate(&self, configuration: &Self::Configuration) -> Result<()> {
        let config = configuration_path();
        configuration.graph.validate(&config.field("graph"))?;
        configuration.value_axis.validate(&config.field("value_axis"))?;
        validate_series(&data_path().field("values"), &self.values, &configuration.value_axis)?;
        configuration.line.validate(&config.field("line"))?;
        let axis = &configuration.value_axis;
        configuration
            .value_bands
            .validate_on_axes(&config.field("value_bands"), BandOrientation::Vertical, axis, axis)
    }

    fn prepare(&self, configuration: &Self::Configuration) -> Result<Self::Prepared> {
        let values = configuration.value_axis.normalize(&data_path().field("values"), &self.values)?;
        let color = configuration.line.color_or(Rgba::series(0));
        Ok(PreparedCdfs::new(&configuration.value_axis, vec![(self.name.clone(), color, values)], None))
    }

    fn build_traces(&self, configuration: &Self::Configuration, prepared: &Self::Prepared) -> Vec<Trace> {
        prepared.traces(&configuration.line)
    }

    fn build_layout(&self, configuration: &Self::Configuration, prepared: &Self::Prepared) -> Layout {
        prepared.layout(&configuration.graph, &configuration.value_axis, &configuration.value_bands)
    }

    fn legend_entries(&self, configuration: &Self::Configuration, prepared: &Self::Prepared) -> Vec<LegendEntry> {
        prepared.legend_entries(&configuration.line)
    }
}

impl Graph for CdfsData {
    type Configuration = CdfsConfiguration;
    type Prepared = PreparedCdfs;

    const KIND: GraphKind = GraphKind::Cdfs;

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
        check_parallel(&data.field("names"), self.names.as_deref(), &values, self.values.len())?;
        check_parallel(&data.field("colors"), self.colors.as_deref(), &values, self.values.len())?;
        for (i, series) in self.values.iter().enumerate() {
            check_non_empty(&values.index(i), series.len())?;
        }
        check_matrix_finite(&values, &self.values)?;
        normalize_matrix(configuration.value_axis.transform(), &values, &self.values)?;

        configuration.line.validate(&config.field("line"))?;
        let axis = &configuration.value_axis;
        configuration
            .value_bands
            .validate_on_axes(&config.field("value_bands"), BandOrientation::Vertical, axis, axis)?;

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
        let data = data_path();
        let colors = data.field("colors");
        let resolved = configuration.color_scale.resolve(
            &configuration_path().field("color_scale"),
            &colors,
            &indexed_colors(&colors, self.colors.as_deref().unwrap_or_default()),
        )?;
        let internal = normalize_matrix(configuration.value_axis.transform(), &data.field("values"), &self.values)?;
        let series = internal
            .into_iter()
            .enumerate()
            .map(|(i, internal)| {
                let name = self.names.as_ref().and_then(|names| names.get(i)).cloned();
                let color = resolved
                    .colors
                    .get(i)
                    .copied()
                    .unwrap_or_else(|| configuration.line.color_or(Rgba::series(i)));
                (name, color, internal)
            })
            .collect();
        Ok(PreparedCdfs::new(&configuration.value_axis, series, resolved.legend))
    }

    fn build_traces(&self, configuration: &Self::Configuration, prepared: &Self::Prepared) -> Vec<Trace> {
        prepared.traces(&configuration.line)
    }

    fn build_layout(&self, configuration: &Self::Configuration, prepared: &Self::Prepared) -> Layout {
        prepared.layout(&configuration.graph, &configuration.value_axis, &configuration.value_bands)
    }

    fn legend_entries(&self, configuration: &Self::Configuration, prepared: &Self::Prepared) -> Vec<LegendEntry> {
        prepared.legend_entries(&configuration.line)
    }
}
