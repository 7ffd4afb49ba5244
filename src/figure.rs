//! Backend-neutral figure description.
//!
//! A [`Figure`] is what the assembler hands to a [`Renderer`](crate::output::Renderer):
//! ordered traces, a layout and a merged legend. All coordinates are in
//! internal units, i.e. after the log transform of log-scaled axes, so a
//! renderer only ever maps them linearly onto the canvas.

use crate::color::Rgba;
use crate::scale::ValueTransform;
use crate::stats::BoxStats;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Direction of categorical graphs (distributions, bars).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "snake_case"))]
pub enum Orientation {
    /// Categories along x, values along y.
    #[default]
    Vertical,
    /// Categories along y, values along x.
    Horizontal,
}

/// Marker glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "snake_case"))]
pub enum MarkerShape {
    /// Filled circle.
    #[default]
    Circle,
    /// Filled square.
    Square,
    /// Filled diamond.
    Diamond,
}

/// The assembled figure.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Figure {
    /// Traces in draw order.
    pub traces: Vec<Trace>,
    /// Canvas, axes, shapes and scale legends.
    pub layout: Layout,
    /// Merged legend: series entries, then band entries.
    pub legend: Vec<LegendEntry>,
}

// ============================================================================
// Traces
// ============================================================================

/// One renderable series.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(tag = "type", rename_all = "snake_case"))]
pub enum Trace {
    /// Polyline, optionally filled down to a baseline (stacked areas).
    Line {
        /// Series name.
        name: Option<String>,
        /// X coordinates.
        xs: Vec<f64>,
        /// Y coordinates.
        ys: Vec<f64>,
        /// Stroke color.
        color: Rgba,
        /// Stroke width in pixels.
        width: f64,
        /// Dashed stroke.
        dashed: bool,
        /// Lower edge of the filled area, parallel to `ys`.
        baseline: Option<Vec<f64>>,
    },
    /// Individually styled markers.
    Markers {
        /// Series name.
        name: Option<String>,
        /// X coordinates.
        xs: Vec<f64>,
        /// Y coordinates.
        ys: Vec<f64>,
        /// Per-marker fill.
        colors: Vec<Rgba>,
        /// Per-marker diameter in pixels.
        sizes: Vec<f64>,
        /// Per-marker hover labels (empty when none).
        labels: Vec<String>,
        /// Glyph.
        shape: MarkerShape,
    },
    /// Rectangles spanning `[lower, upper]` along the value axis.
    Bars {
        /// Series name.
        name: Option<String>,
        /// Category centers.
        positions: Vec<f64>,
        /// Value-axis start of each bar.
        lower: Vec<f64>,
        /// Value-axis end of each bar.
        upper: Vec<f64>,
        /// Bar thickness in category units.
        thickness: f64,
        /// Per-bar fill.
        colors: Vec<Rgba>,
        /// Direction.
        orientation: Orientation,
    },
    /// Box-and-whisker summary.
    Box {
        /// Series name.
        name: Option<String>,
        /// Category center.
        position: f64,
        /// Summary in value-axis units.
        stats: BoxStats,
        /// Thickness in category units.
        thickness: f64,
        /// Outline color.
        color: Rgba,
        /// Direction.
        orientation: Orientation,
    },
    /// Density outline, mirrored for violins and one-sided for curves.
    Density {
        /// Series name.
        name: Option<String>,
        /// Category center.
        position: f64,
        /// `(value, extent)` samples; extent is in category units.
        samples: Vec<(f64, f64)>,
        /// Draw on both sides of `position`.
        mirrored: bool,
        /// Fill color.
        color: Rgba,
        /// Direction.
        orientation: Orientation,
    },
    /// Matrix of colored cells; row `i`, column `j` is centered at `(j, i)`.
    Heatmap {
        /// Cell colors, row-major.
        colors: Vec<Vec<Rgba>>,
    },
}

impl Trace {
    /// Series name, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Line { name, .. }
            | Self::Markers { name, .. }
            | Self::Bars { name, .. }
            | Self::Box { name, .. }
            | Self::Density { name, .. } => name.as_deref(),
            Self::Heatmap { .. } => None,
        }
    }
}

// ============================================================================
// Layout
// ============================================================================

/// Canvas-level description.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Layout {
    /// Canvas width in pixels.
    pub width: f64,
    /// Canvas height in pixels.
    pub height: f64,
    /// Figure title.
    pub title: Option<String>,
    /// Draw grid lines at ticks.
    pub show_grid: bool,
    /// Draw tick labels.
    pub show_ticks: bool,
    /// Horizontal axis.
    pub x_axis: AxisLayout,
    /// Vertical axis.
    pub y_axis: AxisLayout,
    /// Band lines and fills, drawn beneath traces.
    pub shapes: Vec<Shape>,
    /// Color scale legend.
    pub color_legend: Option<ColorLegend>,
    /// Size scale legend.
    pub size_legend: Option<SizeLegend>,
}

/// One axis of the layout.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AxisLayout {
    /// Axis title.
    pub title: Option<String>,
    /// Transform applied to data on this axis.
    pub transform: ValueTransform,
    /// Visible `(start, end)` in internal units; `start > end` flips the axis.
    pub range: (f64, f64),
    /// Tick marks.
    pub ticks: Vec<Tick>,
}

/// A labelled tick.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Tick {
    /// Position in internal units.
    pub position: f64,
    /// Label in data units (or category name).
    pub label: String,
}

/// Geometric primitive in internal units.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(tag = "type", rename_all = "snake_case"))]
pub enum Shape {
    /// Straight segment.
    Line {
        /// Start x.
        x0: f64,
        /// Start y.
        y0: f64,
        /// End x.
        x1: f64,
        /// End y.
        y1: f64,
        /// Stroke color.
        color: Rgba,
        /// Stroke width in pixels.
        width: f64,
        /// Dashed stroke.
        dashed: bool,
    },
    /// Axis-aligned filled rectangle.
    Rect {
        /// Left.
        x0: f64,
        /// Bottom.
        y0: f64,
        /// Right.
        x1: f64,
        /// Top.
        y1: f64,
        /// Fill color.
        color: Rgba,
    },
    /// Filled polygon.
    Polygon {
        /// Vertices in order.
        points: Vec<(f64, f64)>,
        /// Fill color.
        color: Rgba,
    },
}

// ============================================================================
// Legends
// ============================================================================

/// One row of the merged legend.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LegendEntry {
    /// Label.
    pub title: String,
    /// Swatch.
    pub symbol: LegendSymbol,
}

/// Legend swatch.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(tag = "type", rename_all = "snake_case"))]
pub enum LegendSymbol {
    /// Line sample.
    Line {
        /// Stroke color.
        color: Rgba,
        /// Stroke width.
        width: f64,
        /// Dashed stroke.
        dashed: bool,
    },
    /// Filled square.
    Fill {
        /// Fill color.
        color: Rgba,
    },
    /// Marker sample.
    Marker {
        /// Fill color.
        color: Rgba,
        /// Diameter in pixels.
        size: f64,
    },
}

/// Color scale legend.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(tag = "type", rename_all = "snake_case"))]
pub enum ColorLegend {
    /// Gradient bar.
    Continuous {
        /// Legend title.
        title: Option<String>,
        /// Transform of the scaled values.
        transform: ValueTransform,
        /// Gradient stops in internal units, ascending.
        stops: Vec<(f64, Rgba)>,
        /// Labelled ticks along the bar.
        ticks: Vec<Tick>,
    },
    /// Key/color swatches in palette order.
    Categorical {
        /// Legend title.
        title: Option<String>,
        /// `(key, color)` pairs.
        entries: Vec<(String, Rgba)>,
    },
}

/// Size scale legend: representative sizes with their data values.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SizeLegend {
    /// Legend title.
    pub title: Option<String>,
    /// `(label, diameter)` for the minimum, middle and maximum of the domain.
    pub entries: Vec<(String, f64)>,
}
