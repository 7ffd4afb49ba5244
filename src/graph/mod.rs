//! Graph kinds.
//!
//! Each kind is a typed (Data, Configuration) pair. The data type implements
//! [`Graph`], which the assembler drives in a fixed sequence: validate,
//! prepare the engine outputs, then build traces, layout and series legend.
//! [`GraphRef`] closes the set of kinds for callers that dispatch on a tag.

mod bar;
mod cdf;
mod distribution;
mod grid;
mod line;
mod points;
mod xy;

pub use bar::{BarConfiguration, GROUP_WIDTH, BarData, BarsConfiguration, BarsData, PreparedBarSeries, PreparedBars};
pub use cdf::{CdfConfiguration, CdfData, CdfsConfiguration, CdfsData, PreparedCdfs};
pub use distribution::{
    CURVE_EXTENT, VIOLIN_EXTENT, DistributionConfiguration, DistributionData, DistributionStyle, DistributionsConfiguration,
    DistributionsData, PreparedDistributions, PreparedSeries,
};
pub use grid::{GridConfiguration, GridData, HeatmapConfiguration, HeatmapData, PreparedGrid, PreparedHeatmap};
pub use line::{LineConfiguration, LineData, LinesConfiguration, LinesData, PreparedLine, PreparedLines, PreparedPolyline};
pub use points::{PointsConfiguration, PointsData, PreparedPoints};
pub use xy::{MarkerScales, XyConfiguration};

use std::fmt;

use crate::band::{BandConfiguration, BandOrientation};
use crate::color::Rgba;
use crate::color_scale::ColorValue;
use crate::error::Result;
use crate::figure::{AxisLayout, Figure, Layout, LegendEntry, MarkerShape, Orientation, Shape, Trace};
use crate::scale::ValueTransform;
use crate::validate::{check_finite, check_positive, check_same_size, FieldPath, Validate};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ============================================================================
// Shared configuration
// ============================================================================

/// Canvas options shared by every kind, at `configuration.graph`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct GraphConfiguration {
    /// Canvas width in pixels.
    pub width: f64,
    /// Canvas height in pixels.
    pub height: f64,
    /// Figure title.
    pub title: Option<String>,
    /// Draw grid lines.
    pub show_grid: bool,
    /// Draw tick labels.
    pub show_ticks: bool,
    /// Include the merged legend.
    pub show_legend: bool,
}

impl Default for GraphConfiguration {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            title: None,
            show_grid: true,
            show_ticks: true,
            show_legend: true,
        }
    }
}

impl Validate for GraphConfiguration {
    fn validate(&self, path: &FieldPath) -> Result<()> {
        check_positive(&path.field("width"), self.width)?;
        check_positive(&path.field("height"), self.height)
    }
}

impl GraphConfiguration {
    pub(crate) fn layout(&self, x_axis: AxisLayout, y_axis: AxisLayout, shapes: Vec<Shape>) -> Layout {
        Layout {
            width: self.width,
            height: self.height,
            title: self.title.clone(),
            show_grid: self.show_grid,
            show_ticks: self.show_ticks,
            x_axis,
            y_axis,
            shapes,
            color_legend: None,
            size_legend: None,
        }
    }
}

/// Stroke of line-like traces.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct LineStyle {
    /// Stroke width in pixels.
    pub width: f64,
    /// Color token; series colors when unset.
    pub color: Option<String>,
    /// Dashed stroke.
    pub is_dashed: bool,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self { width: 1.5, color: None, is_dashed: false }
    }
}

impl Validate for LineStyle {
    fn validate(&self, path: &FieldPath) -> Result<()> {
        check_positive(&path.field("width"), self.width)?;
        if let Some(color) = &self.color {
            Rgba::resolve(&path.field("color"), color)?;
        }
        Ok(())
    }
}

impl LineStyle {
    pub(crate) fn color_or(&self, fallback: Rgba) -> Rgba {
        self.color.as_deref().and_then(Rgba::parse).unwrap_or(fallback)
    }
}

/// Marker appearance of point-like traces.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct MarkerStyle {
    /// Diameter in pixels when no size data is given.
    pub size: f64,
    /// Color token when no color data is given.
    pub color: Option<String>,
    /// Glyph.
    pub shape: MarkerShape,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self { size: 8.0, color: None, shape: MarkerShape::Circle }
    }
}

impl Validate for MarkerStyle {
    fn validate(&self, path: &FieldPath) -> Result<()> {
        check_positive(&path.field("size"), self.size)?;
        if let Some(color) = &self.color {
            Rgba::resolve(&path.field("color"), color)?;
        }
        Ok(())
    }
}

impl MarkerStyle {
    pub(crate) fn color_or(&self, fallback: Rgba) -> Rgba {
        self.color.as_deref().and_then(Rgba::parse).unwrap_or(fallback)
    }
}

// ============================================================================
// Graph capability
// ============================================================================

/// The closed set of graph kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GraphKind {
    /// One distribution.
    Distribution,
    /// Several distributions side by side.
    Distributions,
    /// One polyline.
    Line,
    /// Several polylines, optionally stacked.
    Lines,
    /// One empirical CDF.
    Cdf,
    /// Several empirical CDFs.
    Cdfs,
    /// One bar per value.
    Bar,
    /// Several bar series, grouped or stacked.
    Bars,
    /// Scatter of points.
    Points,
    /// Matrix of sized and colored markers.
    Grid,
    /// Matrix of colored cells.
    Heatmap,
}

impl fmt::Display for GraphKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Distribution => "distribution",
            Self::Distributions => "distributions",
            Self::Line => "line",
            Self::Lines => "lines",
            Self::Cdf => "cdf",
            Self::Cdfs => "cdfs",
            Self::Bar => "bar",
            Self::Bars => "bars",
            Self::Points => "points",
            Self::Grid => "grid",
            Self::Heatmap => "heatmap",
        };
        f.write_str(name)
    }
}

/// Shared capability of every graph kind, implemented by its data type.
pub trait Graph {
    /// The kind's configuration.
    type Configuration;
    /// Engine outputs derived from validated inputs.
    type Prepared;

    /// Which kind this is.
    const KIND: GraphKind;

    /// Canvas options of a configuration.
    fn graph_configuration(configuration: &Self::Configuration) -> &GraphConfiguration;

    /// Band configurations in legend order (x, y, diagonal).
    fn band_configurations(configuration: &Self::Configuration) -> Vec<&BandConfiguration>;

    /// Validates data and configuration together, returning the first
    /// violation.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    fn validate(&self, configuration: &Self::Configuration) -> Result<()>;

    /// Computes scales, stacks, statistics and domains.
    ///
    /// # Errors
    ///
    /// Fails only on inputs [`Graph::validate`] rejects.
    fn prepare(&self, configuration: &Self::Configuration) -> Result<Self::Prepared>;

    /// Traces in draw order.
    fn build_traces(&self, configuration: &Self::Configuration, prepared: &Self::Prepared) -> Vec<Trace>;

    /// Layout including band shapes and scale legends.
    fn build_layout(&self, configuration: &Self::Configuration, prepared: &Self::Prepared) -> Layout;

    /// Legend entries of the series themselves.
    fn legend_entries(&self, configuration: &Self::Configuration, prepared: &Self::Prepared) -> Vec<LegendEntry>;
}

/// A borrowed (data, configuration) pair of any kind.
#[derive(Debug, Clone, Copy)]
pub enum GraphRef<'a> {
    /// Distribution graph.
    Distribution(&'a DistributionData, &'a DistributionConfiguration),
    /// Distributions graph.
    Distributions(&'a DistributionsData, &'a DistributionsConfiguration),
    /// Line graph.
    Line(&'a LineData, &'a LineConfiguration),
    /// Lines graph.
    Lines(&'a LinesData, &'a LinesConfiguration),
    /// CDF graph.
    Cdf(&'a CdfData, &'a CdfConfiguration),
    /// CDFs graph.
    Cdfs(&'a CdfsData, &'a CdfsConfiguration),
    /// Bar graph.
    Bar(&'a BarData, &'a BarConfiguration),
    /// Bars graph.
    Bars(&'a BarsData, &'a BarsConfiguration),
    /// Points graph.
    Points(&'a PointsData, &'a PointsConfiguration),
    /// Grid graph.
    Grid(&'a GridData, &'a GridConfiguration),
    /// Heatmap graph.
    Heatmap(&'a HeatmapData, &'a HeatmapConfiguration),
}

macro_rules! dispatch {
    ($graph:expr, |$data:ident, $configuration:ident| $body:expr) => {
        match $graph {
            GraphRef::Distribution($data, $configuration) => $body,
            GraphRef::Distributions($data, $configuration) => $body,
            GraphRef::Line($data, $configuration) => $body,
            GraphRef::Lines($data, $configuration) => $body,
            GraphRef::Cdf($data, $configuration) => $body,
            GraphRef::Cdfs($data, $configuration) => $body,
            GraphRef::Bar($data, $configuration) => $body,
            GraphRef::Bars($data, $configuration) => $body,
            GraphRef::Points($data, $configuration) => $body,
            GraphRef::Grid($data, $configuration) => $body,
            GraphRef::Heatmap($data, $configuration) => $body,
        }
    };
}

impl GraphRef<'_> {
    /// The kind tag.
    #[must_use]
    pub fn kind(&self) -> GraphKind {
        fn kind_of<G: Graph>(_: &G) -> GraphKind {
            G::KIND
        }
        dispatch!(*self, |data, _configuration| kind_of(data))
    }

    /// Validates the pair.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<()> {
        dispatch!(*self, |data, configuration| data.validate(configuration))
    }

    /// Assembles the figure.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn figure(&self) -> Result<Figure> {
        dispatch!(*self, |data, configuration| crate::assemble::figure(data, configuration))
    }
}

// ============================================================================
// Helpers shared by the kinds
// ============================================================================

pub(crate) fn data_path() -> FieldPath {
    FieldPath::root("data")
}

pub(crate) fn configuration_path() -> FieldPath {
    FieldPath::root("configuration")
}

/// Checks an optional parallel array against its reference length.
pub(crate) fn check_parallel<T>(
    path: &FieldPath,
    values: Option<&[T]>,
    reference: &FieldPath,
    expected: usize,
) -> Result<()> {
    match values {
        Some(values) => check_same_size(path, values.len(), reference, expected),
        None => Ok(()),
    }
}

/// Pairs each color value with its `path[i]`.
pub(crate) fn indexed_colors<'a>(path: &FieldPath, values: &'a [ColorValue]) -> Vec<(FieldPath, &'a ColorValue)> {
    values.iter().enumerate().map(|(i, value)| (path.index(i), value)).collect()
}

/// Pairs each matrix color value with its `path[i,j]`, row-major.
pub(crate) fn indexed_color_matrix<'a>(
    path: &FieldPath,
    rows: &'a [Vec<ColorValue>],
) -> Vec<(FieldPath, &'a ColorValue)> {
    rows.iter()
        .enumerate()
        .flat_map(|(i, row)| row.iter().enumerate().map(move |(j, value)| (path.index2(i, j), value)))
        .collect()
}

/// Pairs each number with its `path[i]`.
pub(crate) fn indexed_values(path: &FieldPath, values: &[f64]) -> Vec<(FieldPath, f64)> {
    values.iter().enumerate().map(|(i, &value)| (path.index(i), value)).collect()
}

/// Pairs each matrix number with its `path[i,j]`, row-major.
pub(crate) fn indexed_matrix(path: &FieldPath, rows: &[Vec<f64>]) -> Vec<(FieldPath, f64)> {
    rows.iter()
        .enumerate()
        .flat_map(|(i, row)| row.iter().enumerate().map(move |(j, &value)| (path.index2(i, j), value)))
        .collect()
}

/// Splits a flat row-major vector back into rows shaped like `shape`.
pub(crate) fn reshape<T: Clone, U>(flat: &[T], shape: &[Vec<U>]) -> Vec<Vec<T>> {
    let mut offset = 0;
    shape
        .iter()
        .map(|row| {
            let end = (offset + row.len()).min(flat.len());
            let chunk = flat[offset.min(end)..end].to_vec();
            offset = end;
            chunk
        })
        .collect()
}

/// Checks every matrix element is finite, addressing them as `path[i,j]`.
pub(crate) fn check_matrix_finite(path: &FieldPath, rows: &[Vec<f64>]) -> Result<()> {
    for (i, row) in rows.iter().enumerate() {
        for (j, &value) in row.iter().enumerate() {
            check_finite(&path.index2(i, j), value)?;
        }
    }
    Ok(())
}

/// Checks and transforms a matrix, addressing elements as `path[i,j]`.
pub(crate) fn normalize_matrix(
    transform: ValueTransform,
    path: &FieldPath,
    rows: &[Vec<f64>],
) -> Result<Vec<Vec<f64>>> {
    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            row.iter()
                .enumerate()
                .map(|(j, &value)| {
                    transform.check(&path.index2(i, j), value)?;
                    Ok(transform.forward(value))
                })
                .collect()
        })
        .collect()
}

/// Band orientation along the value axis of a categorical graph.
pub(crate) const fn value_band_orientation(orientation: Orientation) -> BandOrientation {
    match orientation {
        Orientation::Vertical => BandOrientation::Horizontal,
        Orientation::Horizontal => BandOrientation::Vertical,
    }
}

/// Places a category axis and a value axis according to `orientation`,
/// returning `(x, y)`.
pub(crate) fn orient<T>(orientation: Orientation, category: T, value: T) -> (T, T) {
    match orientation {
        Orientation::Vertical => (category, value),
        Orientation::Horizontal => (value, category),
    }
}
