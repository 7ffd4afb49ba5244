//! Matrix graphs: a grid of colored and sized markers, and a heatmap of
//! colored cells.
//!
//! Row `i`, column `j` sits at `(j, i)` with row 0 at the top.

use crate::axis::category_layout;
use crate::band::BandConfiguration;
use crate::color::Rgba;
use crate::color_scale::{ColorScaleConfiguration, ColorValue};
use crate::error::Result;
use crate::figure::{AxisLayout, ColorLegend, Layout, LegendEntry, SizeLegend, Trace};
use crate::graph::{
    check_matrix_finite, check_parallel, configuration_path, data_path, indexed_color_matrix, indexed_matrix,
    reshape, Graph, GraphConfiguration, GraphKind, MarkerStyle,
};
use crate::size::SizeScaleConfiguration;
use crate::validate::{check_at_least_one, check_non_empty, check_rectangular, check_same_shape, FieldPath, Validate};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Row and column names of a matrix graph.
fn check_names(
    data: &FieldPath,
    rows_names: Option<&[String]>,
    columns_names: Option<&[String]>,
    reference: &FieldPath,
    shape: (usize, usize),
) -> Result<()> {
    check_parallel(&data.field("rows_names"), rows_names, reference, shape.0)?;
    check_parallel(&data.field("columns_names"), columns_names, &reference.index(0), shape.1)
}

/// Column axis along x and row axis along y, row 0 on top.
fn matrix_axes(
    shape: (usize, usize),
    rows_names: Option<&[String]>,
    columns_names: Option<&[String]>,
) -> (AxisLayout, AxisLayout) {
    (category_layout(shape.1, columns_names, None, false), category_layout(shape.0, rows_names, None, true))
}

// ============================================================================
// Grid
// ============================================================================

/// Matrix of markers.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct GridData {
    /// Per-cell colors.
    pub points_colors: Option<Vec<Vec<ColorValue>>>,
    /// Per-cell sizes, shaped like `points_colors` when both are given.
    pub points_sizes: Option<Vec<Vec<f64>>>,
    /// Row labels.
    pub rows_names: Option<Vec<String>>,
    /// Column labels.
    pub columns_names: Option<Vec<String>>,
}

/// Options of a grid graph.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct GridConfiguration {
    /// Canvas options.
    pub graph: GraphConfiguration,
    /// Default marker appearance.
    pub marker: MarkerStyle,
    /// Mapping of `data.points_colors`.
    pub color_scale: ColorScaleConfiguration,
    /// Mapping of `data.points_sizes`.
    pub size_scale: SizeScaleConfiguration,
}

/// Engine outputs of a grid graph.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedGrid {
    /// `(rows, columns)`.
    pub shape: (usize, usize),
    /// Per-cell colors, empty without color data.
    pub colors: Vec<Vec<Rgba>>,
    /// Per-cell diameters, empty without size data.
    pub sizes: Vec<Vec<f64>>,
    /// Color legend, when requested.
    pub color_legend: Option<ColorLegend>,
    /// Size legend, when requested.
    pub size_legend: Option<SizeLegend>,
}

impl GridData {
    /// Field the shape is taken from, with its rows.
    fn reference(&self) -> (FieldPath, usize, usize) {
        let data = data_path();
        match (&self.points_colors, &self.points_sizes) {
            (Some(colors), _) => {
                (data.field("points_colors"), colors.len(), colors.first().map_or(0, Vec::len))
            }
            (None, Some(sizes)) => (data.field("points_sizes"), sizes.len(), sizes.first().map_or(0, Vec::len)),
            (None, None) => (data.field("points_colors"), 0, 0),
        }
    }
}

impl Graph for GridData {
    type Configuration = GridConfiguration;
    type Prepared = PreparedGrid;

    const KIND: GraphKind = GraphKind::Grid;

    fn graph_configuration(configuration: &Self::Configuration) -> &GraphConfiguration {
        &configuration.graph
    }

    fn band_configurations(_configuration: &Self::Configuration) -> Vec<&BandConfiguration> {
        Vec::new()
    }

    fn validate(&self, configuration: &Self::Configuration) -> Result<()> {
        let config = configuration_path();
        let data = data_path();
        let colors = data.field("points_colors");
        let sizes = data.field("points_sizes");
        configuration.graph.validate(&config.field("graph"))?;
        check_at_least_one(&[
            (colors.clone(), self.points_colors.is_some()),
            (sizes.clone(), self.points_sizes.is_some()),
        ])?;

        if let Some(points_colors) = &self.points_colors {
            check_non_empty(&colors, points_colors.len())?;
            check_rectangular(&colors, points_colors)?;
        }
        if let Some(points_sizes) = &self.points_sizes {
            check_non_empty(&sizes, points_sizes.len())?;
            check_rectangular(&sizes, points_sizes)?;
            if let Some(points_colors) = &self.points_colors {
                check_same_shape(&sizes, points_sizes, &colors, points_colors)?;
            }
        }
        let (reference, rows, columns) = self.reference();
        check_names(
            &data,
            self.rows_names.as_deref(),
            self.columns_names.as_deref(),
            &reference,
            (rows, columns),
        )?;

        configuration.marker.validate(&config.field("marker"))?;

        let color_path = config.field("color_scale");
        configuration.color_scale.validate(&color_path)?;
        configuration.color_scale.check_values(
            &color_path,
            &colors,
            &indexed_color_matrix(&colors, self.points_colors.as_deref().unwrap_or_default()),
        )?;
        let size_path = config.field("size_scale");
        configuration.size_scale.validate(&size_path)?;
        configuration.size_scale.check_values(
            &size_path,
            &sizes,
            &indexed_matrix(&sizes, self.points_sizes.as_deref().unwrap_or_default()),
        )
    }

    fn prepare(&self, configuration: &Self::Configuration) -> Result<Self::Prepared> {
        let config = configuration_path();
        let data = data_path();
        let colors_field = data.field("points_colors");
        let sizes_field = data.field("points_sizes");
        let color_rows = self.points_colors.as_deref().unwrap_or_default();
        let size_rows = self.points_sizes.as_deref().unwrap_or_default();
        let colors = configuration.color_scale.resolve(
            &config.field("color_scale"),
            &colors_field,
            &indexed_color_matrix(&colors_field, color_rows),
        )?;
        let sizes = configuration.size_scale.resolve(
            &config.field("size_scale"),
            &sizes_field,
            &indexed_matrix(&sizes_field, size_rows),
        )?;
        let (_, rows, columns) = self.reference();
        Ok(PreparedGrid {
            shape: (rows, columns),
            colors: reshape(&colors.colors, color_rows),
            sizes: reshape(&sizes.sizes, size_rows),
            color_legend: colors.legend,
            size_legend: sizes.legend,
        })
    }

    fn build_traces(&self, configuration: &Self::Configuration, prepared: &Self::Prepared) -> Vec<Trace> {
        let (rows, columns) = prepared.shape;
        let fallback = configuration.marker.color_or(Rgba::series(0));
        let mut xs = Vec::with_capacity(rows * columns);
        let mut ys = Vec::with_capacity(rows * columns);
        let mut colors = Vec::with_capacity(rows * columns);
        let mut sizes = Vec::with_capacity(rows * columns);
        for i in 0..rows {
            for j in 0..columns {
                #[allow(clippy::cast_precision_loss)]
                let (x, y) = (j as f64, i as f64);
                xs.push(x);
                ys.push(y);
                let cell_color = prepared.colors.get(i).and_then(|row| row.get(j)).copied();
                colors.push(cell_color.unwrap_or(fallback));
                let cell_size = prepared.sizes.get(i).and_then(|row| row.get(j)).copied();
                sizes.push(cell_size.unwrap_or(configuration.marker.size));
            }
        }
        let labels = match (&self.rows_names, &self.columns_names) {
            (Some(rows_names), Some(columns_names)) => rows_names
                .iter()
                .flat_map(|row| columns_names.iter().map(move |column| format!("{row}, {column}")))
                .collect(),
            _ => Vec::new(),
        };
        vec![Trace::Markers { name: None, xs, ys, colors, sizes, labels, shape: configuration.marker.shape }]
    }

    fn build_layout(&self, configuration: &Self::Configuration, prepared: &Self::Prepared) -> Layout {
        let (x_axis, y_axis) =
            matrix_axes(prepared.shape, self.rows_names.as_deref(), self.columns_names.as_deref());
        let mut layout = configuration.graph.layout(x_axis, y_axis, Vec::new());
        layout.color_legend.clone_from(&prepared.color_legend);
        layout.size_legend.clone_from(&prepared.size_legend);
        layout
    }

    fn legend_entries(&self, _configuration: &Self::Configuration, _prepared: &Self::Prepared) -> Vec<LegendEntry> {
        Vec::new()
    }
}

// ============================================================================
// Heatmap
// ============================================================================

/// Matrix of numbers mapped to cell colors.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct HeatmapData {
    /// Cell values, row-major.
    pub values: Vec<Vec<f64>>,
    /// Row labels.
    pub rows_names: Option<Vec<String>>,
    /// Column labels.
    pub columns_names: Option<Vec<String>>,
}

/// Options of a heatmap.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct HeatmapConfiguration {
    /// Canvas options.
    pub graph: GraphConfiguration,
    /// Mapping of `data.values`.
    pub color_scale: ColorScaleConfiguration,
}

/// Engine outputs of a heatmap.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedHeatmap {
    /// Cell colors, row-major.
    pub colors: Vec<Vec<Rgba>>,
    /// Color legend, when requested.
    pub color_legend: Option<ColorLegend>,
}

impl HeatmapData {
    fn color_values(&self) -> Vec<Vec<ColorValue>> {
        self.values
            .iter()
            .map(|row| row.iter().copied().map(ColorValue::Number).collect())
            .collect()
    }

    fn shape(&self) -> (usize, usize) {
        (self.values.len(), self.values.first().map_or(0, Vec::len))
    }
}

impl Graph for HeatmapData {
    type Configuration = HeatmapConfiguration;
    type Prepared = PreparedHeatmap;

    const KIND: GraphKind = GraphKind::Heatmap;

    fn graph_configuration(configuration: &Self::Configuration) -> &GraphConfiguration {
        &configuration.graph
    }

    fn band_configurations(_configuration: &Self::Configuration) -> Vec<&BandConfiguration> {
        Vec::new()
    }

    fn validate(&self, configuration: &Self::Configuration) -> Result<()> {
        let config = configuration_path();
        let data = data_path();
        configuration.graph.validate(&config.field("graph"))?;

        let values = data.field("values");
        check_non_empty(&values, self.values.len())?;
        let columns = check_rectangular(&values, &self.values)?;
        check_non_empty(&values.index(0), columns)?;
        check_names(&data, self.rows_names.as_deref(), self.columns_names.as_deref(), &values, self.shape())?;
        check_matrix_finite(&values, &self.values)?;

        let color_path = config.field("color_scale");
        configuration.color_scale.validate(&color_path)?;
        configuration.color_scale.check_values(
            &color_path,
            &values,
            &indexed_color_matrix(&values, &self.color_values()),
        )
    }

    fn prepare(&self, configuration: &Self::Configuration) -> Result<Self::Prepared> {
        let values = data_path().field("values");
        let color_values = self.color_values();
        let resolved = configuration.color_scale.resolve(
            &configuration_path().field("color_scale"),
            &values,
            &indexed_color_matrix(&values, &color_values),
        )?;
        Ok(PreparedHeatmap { colors: reshape(&resolved.colors, &self.values), color_legend: resolved.legend })
    }

    fn build_traces(&self, _configuration: &Self::Configuration, prepared: &Self::Prepared) -> Vec<Trace> {
        vec![Trace::Heatmap { colors: prepared.colors.clone() }]
    }

    fn build_layout(&self, configuration: &Self::Configuration, prepared: &Self::Prepared) -> Layout {
        let (x_axis, y_axis) = matrix_axes(self.shape(), self.rows_names.as_deref(), self.columns_names.as_deref());
        let mut layout = configuration.graph.layout(x_axis, y_axis, Vec::new());
        layout.color_legend.clone_from(&prepared.color_legend);
        layout
    }

    fn legend_entries(&self, _configuration: &Self::Configuration, _prepared: &Self::Prepared) -> Vec<LegendEntry> {
        Vec::new()
    }
}
