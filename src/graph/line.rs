//! Line graphs.
//!
//! A line graph draws one polyline, with optional per-point markers when
//! colors or sizes are given. A lines graph draws several polylines, either
//! overlaid or stacked; stacked lines fill down to the series below.

use crate::axis::AxisDomain;
use crate::band::BandConfiguration;
use crate::color::Rgba;
use crate::color_scale::{ColorScaleConfiguration, ColorValue};
use crate::error::Result;
use crate::figure::{ColorLegend, Layout, LegendEntry, LegendSymbol, SizeLegend, Trace};
use crate::graph::xy::{check_marker_scales, MarkerScales, XyConfiguration};
use crate::graph::{
    check_matrix_finite, check_parallel, configuration_path, data_path, indexed_colors, indexed_matrix,
    normalize_matrix, reshape, Graph, GraphConfiguration, GraphKind, LineStyle, MarkerStyle,
};
use crate::size::SizeScaleConfiguration;
use crate::stack::{check_stackable, stack, StackingMode};
use crate::validate::{check_all_finite, check_non_empty, check_same_size, Validate};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ============================================================================
// Line
// ============================================================================

/// One polyline.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct LineData {
    /// X coordinates.
    pub points_xs: Vec<f64>,
    /// Y coordinates, parallel to `points_xs`.
    pub points_ys: Vec<f64>,
    /// Per-point marker colors.
    pub points_colors: Option<Vec<ColorValue>>,
    /// Per-point marker sizes.
    pub points_sizes: Option<Vec<f64>>,
    /// Per-point hover labels.
    pub points_names: Option<Vec<String>>,
    /// Series name.
    pub name: Option<String>,
}

/// Options of a line graph.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct LineConfiguration {
    /// Canvas options.
    pub graph: GraphConfiguration,
    /// Axes and bands.
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub xy: XyConfiguration,
    /// Stroke.
    pub line: LineStyle,
    /// Markers drawn when colors or sizes are given.
    pub marker: MarkerStyle,
    /// Mapping of `data.points_colors`.
    pub color_scale: ColorScaleConfiguration,
    /// Mapping of `data.points_sizes`.
    pub size_scale: SizeScaleConfiguration,
}

/// Engine outputs of a line graph.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedLine {
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

impl Graph for LineData {
    type Configuration = LineConfiguration;
    type Prepared = PreparedLine;

    const KIND: GraphKind = GraphKind::Line;

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

        configuration.line.validate(&config.field("line"))?;
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
        Ok(PreparedLine { xs, ys, x_domain, y_domain, markers })
    }

    fn build_traces(&self, configuration: &Self::Configuration, prepared: &Self::Prepared) -> Vec<Trace> {
        let color = configuration.line.color_or(Rgba::series(0));
        let mut traces = vec![Trace::Line {
            name: self.name.clone(),
            xs: prepared.xs.clone(),
            ys: prepared.ys.clone(),
            color,
            width: configuration.line.width,
            dashed: configuration.line.is_dashed,
            baseline: None,
        }];
        if !prepared.markers.is_empty() {
            let count = prepared.xs.len();
            traces.push(Trace::Markers {
                name: self.name.clone(),
                xs: prepared.xs.clone(),
                ys: prepared.ys.clone(),
                colors: prepared.markers.colors_or(count, configuration.marker.color_or(color)),
                sizes: prepared.markers.sizes_or(count, &configuration.marker),
                labels: self.points_names.clone().unwrap_or_default(),
                shape: configuration.marker.shape,
            });
        }
        traces
    }

    fn build_layout(&self, configuration: &Self::Configuration, prepared: &Self::Prepared) -> Layout {
        let mut layout = configuration.xy.layout(&configuration.graph, &prepared.x_domain, &prepared.y_domain);
        prepared.markers.attach_legends(&mut layout);
        layout
    }

    fn legend_entries(&self, configuration: &Self::Configuration, _prepared: &Self::Prepared) -> Vec<LegendEntry> {
        self.name
            .iter()
            .map(|name| LegendEntry {
                title: name.clone(),
                symbol: line_symbol(&configuration.line, configuration.line.color_or(Rgba::series(0))),
            })
            .collect()
    }
}

fn line_symbol(line: &LineStyle, color: Rgba) -> LegendSymbol {
    LegendSymbol::Line { color, width: line.width, dashed: line.is_dashed }
}

// ============================================================================
// Lines
// ============================================================================

/// Several polylines.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct LinesData {
    /// X coordinates per line.
    pub points_xs: Vec<Vec<f64>>,
    /// Y coordinates per line, shaped like `points_xs`.
    pub points_ys: Vec<Vec<f64>>,
    /// Per-line colors.
    pub lines_colors: Option<Vec<ColorValue>>,
    /// Per-point marker sizes, shaped like `points_xs`.
    pub points_sizes: Option<Vec<Vec<f64>>>,
    /// Per-line names.
    pub lines_names: Option<Vec<String>>,
}

/// Options of a lines graph.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct LinesConfiguration {
    /// Canvas options.
    pub graph: GraphConfiguration,
    /// Axes and bands.
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub xy: XyConfiguration,
    /// Stroke.
    pub line: LineStyle,
    /// Markers drawn when sizes are given.
    pub marker: MarkerStyle,
    /// Mapping of `data.lines_colors`.
    pub color_scale: ColorScaleConfiguration,
    /// Mapping of `data.points_sizes`.
    pub size_scale: SizeScaleConfiguration,
    /// Stacks the y values per point index.
    pub stacking: Option<StackingMode>,
}

/// One line of a lines graph, in internal units.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedPolyline {
    /// Legend label.
    pub name: Option<String>,
    /// Stroke color.
    pub color: Rgba,
    /// X coordinates.
    pub xs: Vec<f64>,
    /// Y coordinates (stacked tops when stacking).
    pub ys: Vec<f64>,
    /// Lower edge of the filled area when stacking.
    pub baseline: Option<Vec<f64>>,
    /// Marker diameters, empty without size data.
    pub sizes: Vec<f64>,
}

/// Engine outputs of a lines graph.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedLines {
    /// One entry per line.
    pub lines: Vec<PreparedPolyline>,
    /// Resolved x axis.
    pub x_domain: AxisDomain,
    /// Resolved y axis.
    pub y_domain: AxisDomain,
    /// Color legend, when requested.
    pub color_legend: Option<ColorLegend>,
    /// Size legend, when requested.
    pub size_legend: Option<SizeLegend>,
}

impl LinesData {
    /// Y values as plotted: raw, or the stacked tops with their bottoms.
    fn stacked(&self, mode: Option<StackingMode>) -> (Vec<Vec<f64>>, Option<Vec<Vec<f64>>>) {
        match mode {
            None => (self.points_ys.clone(), None),
            Some(mode) => {
                let stack = stack(mode, &self.points_ys);
                (stack.upper, Some(stack.lower))
            }
        }
    }
}

impl Graph for LinesData {
    type Configuration = LinesConfiguration;
    type Prepared = PreparedLines;

    const KIND: GraphKind = GraphKind::Lines;

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
        let sizes = data.field("points_sizes");
        let count = self.points_xs.len();
        check_non_empty(&xs, count)?;
        check_same_size(&ys, self.points_ys.len(), &xs, count)?;
        check_parallel(&data.field("lines_colors"), self.lines_colors.as_deref(), &xs, count)?;
        check_parallel(&data.field("lines_names"), self.lines_names.as_deref(), &xs, count)?;
        if let Some(points_sizes) = &self.points_sizes {
            check_same_size(&sizes, points_sizes.len(), &xs, count)?;
        }
        for (i, line_xs) in self.points_xs.iter().enumerate() {
            check_non_empty(&xs.index(i), line_xs.len())?;
            let line_ys = self.points_ys.get(i).map_or(0, Vec::len);
            check_same_size(&ys.index(i), line_ys, &xs.index(i), line_xs.len())?;
            if let Some(line_sizes) = self.points_sizes.as_ref().and_then(|sizes| sizes.get(i)) {
                check_same_size(&sizes.index(i), line_sizes.len(), &xs.index(i), line_xs.len())?;
            }
        }

        check_matrix_finite(&xs, &self.points_xs)?;
        check_matrix_finite(&ys, &self.points_ys)?;
        normalize_matrix(configuration.xy.x_axis.transform(), &xs, &self.points_xs)?;
        match configuration.stacking {
            None => {
                normalize_matrix(configuration.xy.y_axis.transform(), &ys, &self.points_ys)?;
            }
            Some(mode) => {
                check_stackable(&ys, mode, &self.points_ys)?;
                let (tops, _) = self.stacked(Some(mode));
                normalize_matrix(configuration.xy.y_axis.transform(), &ys, &tops)?;
            }
        }

        configuration.line.validate(&config.field("line"))?;
        configuration.marker.validate(&config.field("marker"))?;
        configuration.xy.validate_bands(&config)?;

        let color_path = config.field("color_scale");
        let colors = data.field("lines_colors");
        configuration.color_scale.validate(&color_path)?;
        configuration.color_scale.check_values(
            &color_path,
            &colors,
            &indexed_colors(&colors, self.lines_colors.as_deref().unwrap_or_default()),
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
        let x_transform = configuration.xy.x_axis.transform();
        let y_transform = configuration.xy.y_axis.transform();
        let xs = normalize_matrix(x_transform, &data.field("points_xs"), &self.points_xs)?;
        let (tops, bottoms) = self.stacked(configuration.stacking);
        let ys = normalize_matrix(y_transform, &data.field("points_ys"), &tops)?;

        let colors_field = data.field("lines_colors");
        let colors = configuration.color_scale.resolve(
            &config.field("color_scale"),
            &colors_field,
            &indexed_colors(&colors_field, self.lines_colors.as_deref().unwrap_or_default()),
        )?;
        let sizes_field = data.field("points_sizes");
        let size_rows = self.points_sizes.as_deref().unwrap_or_default();
        let sizes = configuration.size_scale.resolve(
            &config.field("size_scale"),
            &sizes_field,
            &indexed_matrix(&sizes_field, size_rows),
        )?;
        let size_rows = reshape(&sizes.sizes, size_rows);

        let x_domain = configuration.xy.x_axis.resolve_domain(xs.iter().flatten().copied());
        // stacked areas are anchored at the zero line where the axis can show it
        let anchors: Vec<f64> = bottoms
            .iter()
            .flatten()
            .flatten()
            .filter(|&&bottom| y_transform.accepts(bottom))
            .map(|&bottom| y_transform.forward(bottom))
            .collect();
        let y_domain = configuration
            .xy
            .y_axis
            .resolve_domain(ys.iter().flatten().copied().chain(anchors));

        let lines = xs
            .into_iter()
            .zip(ys)
            .enumerate()
            .map(|(i, (xs, ys))| {
                let baseline = bottoms.as_ref().and_then(|bottoms| bottoms.get(i)).map(|row| {
                    row.iter()
                        .map(|&bottom| {
                            if y_transform.accepts(bottom) {
                                y_transform.forward(bottom)
                            } else {
                                y_domain.minimum
                            }
                        })
                        .collect()
                });
                PreparedPolyline {
                    name: self.lines_names.as_ref().and_then(|names| names.get(i)).cloned(),
                    color: colors
                        .colors
                        .get(i)
                        .copied()
                        .unwrap_or_else(|| configuration.line.color_or(Rgba::series(i))),
                    xs,
                    ys,
                    baseline,
                    sizes: size_rows.get(i).cloned().unwrap_or_default(),
                }
            })
            .collect();

        Ok(PreparedLines {
            lines,
            x_domain,
            y_domain,
            color_legend: colors.legend,
            size_legend: sizes.legend,
        })
    }

    fn build_traces(&self, configuration: &Self::Configuration, prepared: &Self::Prepared) -> Vec<Trace> {
        let mut traces = Vec::new();
        for line in &prepared.lines {
            traces.push(Trace::Line {
                name: line.name.clone(),
                xs: line.xs.clone(),
                ys: line.ys.clone(),
                color: line.color,
                width: configuration.line.width,
                dashed: configuration.line.is_dashed,
                baseline: line.baseline.clone(),
            });
            if !line.sizes.is_empty() {
                traces.push(Trace::Markers {
                    name: line.name.clone(),
                    xs: line.xs.clone(),
                    ys: line.ys.clone(),
                    colors: vec![configuration.marker.color_or(line.color); line.xs.len()],
                    sizes: line.sizes.clone(),
                    labels: Vec::new(),
                    shape: configuration.marker.shape,
                });
            }
        }
        traces
    }

    fn build_layout(&self, configuration: &Self::Configuration, prepared: &Self::Prepared) -> Layout {
        let mut layout = configuration.xy.layout(&configuration.graph, &prepared.x_domain, &prepared.y_domain);
        layout.color_legend.clone_from(&prepared.color_legend);
        layout.size_legend.clone_from(&prepared.size_legend);
        layout
    }

    fn legend_entries(&self, configuration: &Self::Configuration, prepared: &Self::Prepared) -> Vec<LegendEntry> {
        prepared
            .lines
            .iter()
            .filter_map(|line| {
                line.name.as_ref().map(|name| LegendEntry {
                    title: name.clone(),
                    symbol: line_symbol(&configuration.line, line.color),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axis::AxisConfiguration;
    use approx::assert_relative_eq;

    fn line() -> LineData {
        LineData {
            points_xs: vec![0.0, 1.0, 2.0],
            points_ys: vec![-0.2, 1.2, 1.8],
            ..Default::default()
        }
    }

    #[test]
    fn test_minimal_line() {
        let configuration = LineConfiguration::default();
        line().validate(&configuration).unwrap();
        let prepared = line().prepare(&configuration).unwrap();
        let traces = line().build_traces(&configuration, &prepared);
        assert_eq!(traces.len(), 1);
        assert_relative_eq!(prepared.y_domain.minimum, -0.3, epsilon = 1e-12);
        assert_relative_eq!(prepared.y_domain.maximum, 1.9, epsilon = 1e-12);
    }

    #[test]
    fn test_ys_parallel_to_xs() {
        let mut data = line();
        data.points_ys.pop();
        assert_eq!(
            data.validate(&LineConfiguration::default()).unwrap_err().to_string(),
            "inconsistent size of data.points_ys: 2\nexpected size (from data.points_xs): 3"
        );
    }

    #[test]
    fn test_log_y_axis() {
        let mut configuration = LineConfiguration::default();
        configuration.xy.y_axis = AxisConfiguration::new().log_regularization(0.1);
        assert_eq!(
            line().validate(&configuration).unwrap_err().to_string(),
            "log of non-positive data.points_ys[0]: -0.2"
        );
        configuration.xy.y_axis = AxisConfiguration::new().log_regularization(0.5);
        assert!(line().validate(&configuration).is_ok());
    }

    #[test]
    fn test_colored_points_add_markers() {
        let mut data = line();
        data.points_colors = Some(vec![ColorValue::Number(0.0), ColorValue::Number(1.0), ColorValue::Number(2.0)]);
        data.points_names = Some(vec!["a".into(), "b".into(), "c".into()]);
        let mut configuration = LineConfiguration::default();
        configuration.color_scale.show_color_scale = true;
        data.validate(&configuration).unwrap();
        let prepared = data.prepare(&configuration).unwrap();
        let traces = data.build_traces(&configuration, &prepared);
        match &traces[..] {
            [Trace::Line { .. }, Trace::Markers { colors, labels, .. }] => {
                assert_eq!(colors.len(), 3);
                assert_eq!(labels.len(), 3);
            }
            other => panic!("unexpected traces {other:?}"),
        }
        let layout = data.build_layout(&configuration, &prepared);
        assert!(matches!(layout.color_legend, Some(ColorLegend::Continuous { .. })));
    }

    #[test]
    fn test_explicit_colors_with_scale_conflict() {
        let mut data = line();
        data.points_colors = Some(vec!["red".into(), "green".into(), "blue".into()]);
        let mut configuration = LineConfiguration::default();
        configuration.color_scale.show_color_scale = true;
        assert_eq!(
            data.validate(&configuration).unwrap_err().to_string(),
            "configuration.color_scale.show_color_scale specified for explicit colors in data.points_colors[0]"
        );
    }

    fn lines() -> LinesData {
        LinesData {
            points_xs: vec![vec![0.0, 1.0], vec![0.0, 1.0]],
            points_ys: vec![vec![1.0, 2.0], vec![3.0, 4.0]],
            lines_names: Some(vec!["a".into(), "b".into()]),
            ..Default::default()
        }
    }

    #[test]
    fn test_lines_inner_size_mismatch() {
        let mut data = lines();
        data.points_ys[1].push(5.0);
        assert_eq!(
            data.validate(&LinesConfiguration::default()).unwrap_err().to_string(),
            "inconsistent size of data.points_ys[1]: 3\nexpected size (from data.points_xs[1]): 2"
        );
    }

    #[test]
    fn test_lines_stacked_baseline() {
        let configuration = LinesConfiguration { stacking: Some(StackingMode::Raw), ..Default::default() };
        let data = lines();
        data.validate(&configuration).unwrap();
        let prepared = data.prepare(&configuration).unwrap();
        assert_eq!(prepared.lines[1].ys, vec![4.0, 6.0]);
        assert_eq!(prepared.lines[1].baseline, Some(vec![1.0, 2.0]));
        assert_eq!(prepared.lines[0].baseline, Some(vec![0.0, 0.0]));
        assert!(prepared.y_domain.minimum < 0.0);
    }

    #[test]
    fn test_lines_percent_rejects_negative() {
        let configuration = LinesConfiguration { stacking: Some(StackingMode::Percent), ..Default::default() };
        let mut data = lines();
        data.points_ys[0][1] = -2.0;
        assert_eq!(
            data.validate(&configuration).unwrap_err().to_string(),
            "negative data.points_ys[0,1]: -2"
        );
    }

    #[test]
    fn test_lines_stacked_on_log_axis_uses_domain_floor() {
        let mut configuration = LinesConfiguration { stacking: Some(StackingMode::Raw), ..Default::default() };
        configuration.xy.y_axis = AxisConfiguration::new().log_regularization(0.0);
        let data = lines();
        data.validate(&configuration).unwrap();
        let prepared = data.prepare(&configuration).unwrap();
        let baseline = prepared.lines[0].baseline.clone().unwrap();
        assert_eq!(baseline, vec![prepared.y_domain.minimum; 2]);
    }

    #[test]
    fn test_lines_sizes_shape() {
        let mut data = lines();
        data.points_sizes = Some(vec![vec![1.0, 2.0], vec![3.0]]);
        assert_eq!(
            data.validate(&LinesConfiguration::default()).unwrap_err().to_string(),
            "inconsistent size of data.points_sizes[1]: 1\nexpected size (from data.points_xs[1]): 2"
        );
    }

    #[test]
    fn test_lines_legend_order() {
        let configuration = LinesConfiguration::default();
        let data = lines();
        let prepared = data.prepare(&configuration).unwrap();
        let titles: Vec<String> =
            data.legend_entries(&configuration, &prepared).into_iter().map(|e| e.title).collect();
        assert_eq!(titles, vec!["a", "b"]);
    }
}
