//! Scatter graph of individually colored and sized markers.

use crate::axis::AxisDomain;
use crate::band::BandConfiguration;
use crate::color::Rgba;
use crate::color_scale::{ColorScaleConfiguration, ColorValue};
use crate::error::Result;
use crate::figure::{Layout, LegendEntry, LegendSymbol, Trace};
use crate::graph::xy::{check_marker_scales, MarkerScales, XyConfiguration};
use crate::graph::{
    check_parallel, configuration_path, data_path, Graph, GraphConfiguration, GraphKind, MarkerStyle,
};
use crate::size::SizeScaleConfiguration;
use crate::validate::{check_all_finite, check_non_empty, check_same_size, Validate};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Scattered points.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct PointsData {
    /// X coordinates.
    pub points_xs: Vec<f64>,
    /// Y coordinates, parallel to `points_xs`.
    pub points_ys: Vec<f64>,
    /// Per-point colors.
    pub points_colors: Option<Vec<ColorValue>>,
    /// Per-point sizes.
    pub points_sizes: Option<Vec<f64>>,
    /// Per-point hover labels.
    pub points_names: Option<Vec<String>>,
    /// Series name.
    pub name: Option<String>,
}

/// Options of a points graph.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct PointsConfiguration {
    /// Canvas options.
    pub graph: GraphConfiguration,
    /// Axes and bands.
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub xy: XyConfiguration,
    /// Default marker appearance.
    pub marker: MarkerStyle,
    /// Mapping of `data.points_colors`.
    pub color_scale: ColorScaleConfiguration,
    /// Mapping of `data.points_sizes`.
    pub size_scale: SizeScaleConfiguration,
}

/// Engine outputs of a points graph.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedPoints {
    /// X coordinates in internal units.
    pub xs: Vec<f64>,
    /// Y coordinates in internal units.
    pub ys: Vec<f64>,
    /// Resolved x axis.
    pub x_domain: AxisDomain,
    /// Resolved y axis.
    pub y_domain: AxisDomain,
    /// Marker colors and sizes.
    pub markers: MarkerScales,
}

impl Graph for PointsData {
    type Configuration = PointsConfiguration;
    type Prepared = PreparedPoints;

    const KIND: GraphKind = GraphKind::Points;

    fn graph_configuration(configuration: &Self::Configuration) -> &GraphConfiguration {
        &configuration.graph
    }

    fn band_configurations(configuration: &Self::Configuration) -> Vec<&BandConfiguration> {
        configuration.xy.band_configurations()
    }

    fn validate(&self, configuration: &Self::Configuration) -> Result<()> {
        let config = configuration_path();
        let data = data_path();
        configuration.graph.validate(&config.field("graph"))?;
        configuration.xy.validate_axes(&config)?;

        let xs = data.field("points_xs");
        let ys = data.field("points_ys");
        let count = self.points_xs.len();
        check_non_empty(&xs, count)?;
        check_same_size(&ys, self.points_ys.len(), &xs, count)?;
        check_parallel(&data.field("points_colors"), self.points_colors.as_deref(), &xs, count)?;
        check_parallel(&data.field("points_sizes"), self.points_sizes.as_deref(), &xs, count)?;
        check_parallel(&data.field("points_names"), self.points_names.as_deref(), &xs, count)?;

        check_all_finite(&xs, &self.points_xs)?;
        check_all_finite(&ys, &self.points_ys)?;
        configuration.xy.x_axis.normalize(&xs, &self.points_xs)?;
        configuration.xy.y_axis.normalize(&ys, &self.points_ys)?;

        configuration.marker.validate(&config.field("marker"))?;
        configuration.xy.validate_bands(&config)?;
        check_marker_scales(
            &config,
            &data,
            (&configuration.color_scale, &configuration.size_scale),
            self.points_colors.as_deref(),
            self.points_sizes.as_deref(),
        )
    }

    fn prepare(&self, configuration: &Self::Configuration) -> Result<Self::Prepared> {
        let data = data_path();
        let xs = configuration.xy.x_axis.normalize(&data.field("points_xs"), &self.points_xs)?;
        let ys = configuration.xy.y_axis.normalize(&data.field("points_ys"), &self.points_ys)?;
        let markers = MarkerScales::resolve(
            &configuration_path(),
            &data,
            (&configuration.color_scale, &configuration.size_scale),
            self.points_colors.as_deref(),
            self.points_sizes.as_deref(),
        )?;
        let x_domain = configuration.xy.x_axis.resolve_domain(xs.iter().copied());
        let y_domain = configuration.xy.y_axis.resolve_domain(ys.iter().copied());
        Ok(PreparedPoints { xs, ys, x_domain, y_domain, markers })
    }

    fn build_traces(&self, configuration: &Self::Configuration, prepared: &Self::Prepared) -> Vec<Trace> {
        let count = prepared.xs.len();
        vec![Trace::Markers {
            name: self.name.clone(),
            xs: prepared.xs.clone(),
            ys: prepared.ys.clone(),
            colors: prepared.markers.colors_or(count, configuration.marker.color_or(Rgba::series(0))),
            sizes: prepared.markers.sizes_or(count, &configuration.marker),
            labels: self.points_names.clone().unwrap_or_default(),
            shape: configuration.marker.shape,
        }]
    }

    fn build_layout(&self, configuration: &Self::Configuration, prepared: &Self::Prepared) -> Layout {
        let mut layout = configuration.xy.layout(&configuration.graph, &prepared.x_domain, &prepared.y_domain);
        prepared.markers.attach_legends(&mut layout);
        layout
    }

    fn legend_entries(&self, configuration: &Self::Configuration, prepared: &Self::Prepared) -> Vec<LegendEntry> {
        let marker = &configuration.marker;
        // recolored points show their first color rather than the unused default
        let color = prepared
            .markers
            .colors
            .first()
            .copied()
            .unwrap_or_else(|| marker.color_or(Rgba::series(0)));
        self.name
            .iter()
            .map(|name| LegendEntry {
                title: name.clone(),
                symbol: LegendSymbol::Marker { color, size: marker.size },
            })
            .collect()
    }
}
