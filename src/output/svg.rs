//! SVG output.
//!
//! [`SvgEncoder`] collects vector elements and serializes them;
//! [`SvgRenderer`] maps a [`Figure`] onto an encoder: grid, band shapes and
//! traces clipped to the plot area, then axes, ticks, titles and the legend
//! panel to the right of the plot.

use std::fmt::Write as FmtWrite;

use crate::color::Rgba;
use crate::error::{Error, Result};
use crate::figure::{
    AxisLayout, ColorLegend, Figure, LegendSymbol, MarkerShape, Orientation, Shape, SizeLegend, Trace,
};
use crate::graph::orient;
use crate::output::Renderer;
use crate::stats::BoxStats;

const CLIP_ID: &str = "plot-area";
const DASH_PATTERN: &str = "6,4";

// ============================================================================
// Encoder
// ============================================================================

/// SVG document builder.
#[derive(Debug, Clone)]
pub struct SvgEncoder {
    width: f64,
    height: f64,
    /// Background color (None for transparent)
    background: Option<Rgba>,
    /// `(x, y, width, height)` of the clip rectangle used by [`SvgElement::Clipped`].
    clip: Option<(f64, f64, f64, f64)>,
    elements: Vec<SvgElement>,
}

/// An SVG element.
///
/// Field names match SVG attribute names.
#[derive(Debug, Clone, PartialEq)]
#[allow(missing_docs)]
pub enum SvgElement {
    /// Rectangle
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        fill: Rgba,
        stroke: Option<Rgba>,
        stroke_width: f64,
    },
    /// Circle
    Circle { cx: f64, cy: f64, r: f64, fill: Rgba },
    /// Line
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        stroke: Rgba,
        stroke_width: f64,
        dashed: bool,
    },
    /// Open polyline
    Polyline {
        points: Vec<(f64, f64)>,
        stroke: Rgba,
        stroke_width: f64,
        dashed: bool,
    },
    /// Closed filled polygon
    Polygon {
        points: Vec<(f64, f64)>,
        fill: Rgba,
        stroke: Option<Rgba>,
    },
    /// Text
    Text {
        x: f64,
        y: f64,
        text: String,
        font_size: f64,
        fill: Rgba,
        anchor: TextAnchor,
        /// Rotated by -90 degrees around `(x, y)`.
        vertical: bool,
    },
    /// Children drawn inside the encoder's clip rectangle.
    Clipped(Vec<SvgElement>),
}

/// Text anchor position for SVG text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[allow(missing_docs)]
pub enum TextAnchor {
    #[default]
    Start,
    Middle,
    End,
}

impl Default for SvgEncoder {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

impl SvgEncoder {
    /// Create a new SVG encoder with given dimensions.
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height, background: Some(Rgba::WHITE), clip: None, elements: Vec::new() }
    }

    /// Set background color (None for transparent).
    #[must_use]
    pub fn background(mut self, color: Option<Rgba>) -> Self {
        self.background = color;
        self
    }

    /// Set the clip rectangle for [`SvgElement::Clipped`] groups.
    #[must_use]
    pub fn clip(mut self, x: f64, y: f64, width: f64, height: f64) -> Self {
        self.clip = Some((x, y, width, height));
        self
    }

    /// Add an element.
    pub fn add_element(&mut self, element: SvgElement) {
        self.elements.push(element);
    }

    /// Number of top-level elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether no element was added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Render to SVG string.
    #[must_use]
    pub fn render(&self) -> String {
        let mut svg = String::with_capacity(4096);
        let (width, height) = (num(self.width), num(self.height));
        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
        );
        if let Some((x, y, w, h)) = self.clip {
            let _ = writeln!(
                svg,
                r#"  <defs><clipPath id="{CLIP_ID}"><rect x="{}" y="{}" width="{}" height="{}"/></clipPath></defs>"#,
                num(x),
                num(y),
                num(w),
                num(h)
            );
        }
        if let Some(bg) = self.background {
            let _ = writeln!(svg, r#"  <rect width="100%" height="100%" fill="{}"/>"#, rgba_to_css(bg));
        }
        for element in &self.elements {
            write_element(&mut svg, element, 1);
        }
        svg.push_str("</svg>\n");
        svg
    }
}

/// Convert RGBA to CSS color string.
fn rgba_to_css(color: Rgba) -> String {
    if color.a == 255 {
        format!("rgb({},{},{})", color.r, color.g, color.b)
    } else {
        format!("rgba({},{},{},{:.3})", color.r, color.g, color.b, color.opacity())
    }
}

/// Pixel coordinate with at most two decimals and no trailing zeros.
fn num(value: f64) -> String {
    let text = format!("{value:.2}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}

fn points_attr(points: &[(f64, f64)]) -> String {
    points.iter().map(|&(x, y)| format!("{},{}", num(x), num(y))).collect::<Vec<_>>().join(" ")
}

fn dash_attr(dashed: bool) -> String {
    if dashed {
        format!(r#" stroke-dasharray="{DASH_PATTERN}""#)
    } else {
        String::new()
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;").replace('"', "&quot;")
}

fn write_element(svg: &mut String, element: &SvgElement, depth: usize) {
    let indent = "  ".repeat(depth);
    match element {
        SvgElement::Rect { x, y, width, height, fill, stroke, stroke_width } => {
            let stroke_attr = stroke
                .map(|s| format!(r#" stroke="{}" stroke-width="{}""#, rgba_to_css(s), num(*stroke_width)))
                .unwrap_or_default();
            let _ = writeln!(
                svg,
                r#"{indent}<rect x="{}" y="{}" width="{}" height="{}" fill="{}"{stroke_attr}/>"#,
                num(*x),
                num(*y),
                num(*width),
                num(*height),
                rgba_to_css(*fill)
            );
        }
        SvgElement::Circle { cx, cy, r, fill } => {
            let _ = writeln!(
                svg,
                r#"{indent}<circle cx="{}" cy="{}" r="{}" fill="{}"/>"#,
                num(*cx),
                num(*cy),
                num(*r),
                rgba_to_css(*fill)
            );
        }
        SvgElement::Line { x1, y1, x2, y2, stroke, stroke_width, dashed } => {
            let _ = writeln!(
                svg,
                r#"{indent}<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="{}"{}/>"#,
                num(*x1),
                num(*y1),
                num(*x2),
                num(*y2),
                rgba_to_css(*stroke),
                num(*stroke_width),
                dash_attr(*dashed)
            );
        }
        SvgElement::Polyline { points, stroke, stroke_width, dashed } => {
            let _ = writeln!(
                svg,
                r#"{indent}<polyline points="{}" fill="none" stroke="{}" stroke-width="{}"{}/>"#,
                points_attr(points),
                rgba_to_css(*stroke),
                num(*stroke_width),
                dash_attr(*dashed)
            );
        }
        SvgElement::Polygon { points, fill, stroke } => {
            let stroke_attr = stroke.map(|s| format!(r#" stroke="{}""#, rgba_to_css(s))).unwrap_or_default();
            let _ = writeln!(
                svg,
                r#"{indent}<polygon points="{}" fill="{}"{stroke_attr}/>"#,
                points_attr(points),
                rgba_to_css(*fill)
            );
        }
        SvgElement::Text { x, y, text, font_size, fill, anchor, vertical } => {
            let anchor_str = match anchor {
                TextAnchor::Start => "start",
                TextAnchor::Middle => "middle",
                TextAnchor::End => "end",
            };
            let (x, y) = (num(*x), num(*y));
            let rotate = if *vertical { format!(r#" transform="rotate(-90 {x} {y})""#) } else { String::new() };
            let _ = writeln!(
                svg,
                r#"{indent}<text x="{x}" y="{y}" font-size="{}" fill="{}" text-anchor="{anchor_str}" font-family="sans-serif"{rotate}>{}</text>"#,
                num(*font_size),
                rgba_to_css(*fill),
                escape(text)
            );
        }
        SvgElement::Clipped(children) => {
            let _ = writeln!(svg, r#"{indent}<g clip-path="url(#{CLIP_ID})">"#);
            for child in children {
                write_element(svg, child, depth + 1);
            }
            let _ = writeln!(svg, "{indent}</g>");
        }
    }
}

// ============================================================================
// Renderer
// ============================================================================

/// Space around the plot area in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margin {
    /// Left, holds y tick labels.
    pub left: f64,
    /// Right of the plot, before the legend panel.
    pub right: f64,
    /// Top, holds the title.
    pub top: f64,
    /// Bottom, holds x tick labels.
    pub bottom: f64,
}

impl Default for Margin {
    fn default() -> Self {
        Self { left: 64.0, right: 24.0, top: 48.0, bottom: 56.0 }
    }
}

/// Static SVG renderer.
#[derive(Debug, Clone)]
pub struct SvgRenderer {
    margin: Margin,
    legend_width: f64,
    font_size: f64,
    background: Option<Rgba>,
}

impl Default for SvgRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl SvgRenderer {
    /// Renderer with default margins on a white background.
    #[must_use]
    pub fn new() -> Self {
        Self { margin: Margin::default(), legend_width: 160.0, font_size: 12.0, background: Some(Rgba::WHITE) }
    }

    /// Set margins.
    #[must_use]
    pub fn margin(mut self, margin: Margin) -> Self {
        self.margin = margin;
        self
    }

    /// Width reserved for the legend panel when there is one.
    #[must_use]
    pub fn legend_width(mut self, width: f64) -> Self {
        self.legend_width = width;
        self
    }

    /// Base font size for labels.
    #[must_use]
    pub fn font_size(mut self, size: f64) -> Self {
        self.font_size = size;
        self
    }

    /// Set background color (None for transparent).
    #[must_use]
    pub fn background(mut self, color: Option<Rgba>) -> Self {
        self.background = color;
        self
    }

    fn frame(&self, figure: &Figure) -> Result<Frame> {
        let layout = &figure.layout;
        let has_panel =
            !figure.legend.is_empty() || layout.color_legend.is_some() || layout.size_legend.is_some();
        let right = self.margin.right + if has_panel { self.legend_width } else { 0.0 };
        let width = layout.width - self.margin.left - right;
        let height = layout.height - self.margin.top - self.margin.bottom;
        if width <= 0.0 || height <= 0.0 {
            return Err(Error::Rendering(format!(
                "canvas {}x{} leaves no room for the plot area",
                layout.width, layout.height
            )));
        }
        for (name, axis) in [("x", &layout.x_axis), ("y", &layout.y_axis)] {
            let (start, end) = axis.range;
            if !(start.is_finite() && end.is_finite()) || start == end {
                return Err(Error::Rendering(format!("degenerate {name} axis range: {start}..{end}")));
            }
        }
        Ok(Frame {
            left: self.margin.left,
            top: self.margin.top,
            width,
            height,
            x_range: layout.x_axis.range,
            y_range: layout.y_axis.range,
        })
    }
}

impl Renderer for SvgRenderer {
    type Output = String;

    fn render(&mut self, figure: &Figure) -> Result<String> {
        let frame = self.frame(figure)?;
        let layout = &figure.layout;
        let mut encoder = SvgEncoder::new(layout.width, layout.height)
            .background(self.background)
            .clip(frame.left, frame.top, frame.width, frame.height);

        if layout.show_grid {
            draw_grid(&mut encoder, &frame, &layout.x_axis, &layout.y_axis);
        }

        let mut plot = Vec::new();
        for shape in &layout.shapes {
            draw_shape(&mut plot, &frame, shape);
        }
        for trace in &figure.traces {
            draw_trace(&mut plot, &frame, trace);
        }
        encoder.add_element(SvgElement::Clipped(plot));

        encoder.add_element(SvgElement::Rect {
            x: frame.left,
            y: frame.top,
            width: frame.width,
            height: frame.height,
            fill: Rgba::TRANSPARENT,
            stroke: Some(AXIS_COLOR),
            stroke_width: 1.0,
        });
        if layout.show_ticks {
            self.draw_ticks(&mut encoder, &frame, &layout.x_axis, &layout.y_axis);
        }
        self.draw_titles(&mut encoder, &frame, figure);

        let mut panel = Panel { x: frame.left + frame.width + self.margin.right, y: frame.top, font_size: self.font_size };
        panel.legend(&mut encoder, figure);
        if let Some(legend) = &layout.color_legend {
            panel.color_legend(&mut encoder, legend);
        }
        if let Some(legend) = &layout.size_legend {
            panel.size_legend(&mut encoder, legend);
        }

        tracing::debug!(
            elements = encoder.len(),
            traces = figure.traces.len(),
            shapes = layout.shapes.len(),
            "rendered svg"
        );
        Ok(encoder.render())
    }
}

const AXIS_COLOR: Rgba = Rgba::rgb(64, 64, 64);
const GRID_COLOR: Rgba = Rgba::rgb(225, 225, 225);
const TEXT_COLOR: Rgba = Rgba::rgb(32, 32, 32);
const TICK_LENGTH: f64 = 5.0;

/// Plot area and the internal ranges mapped onto it.
#[derive(Debug, Clone, Copy)]
struct Frame {
    left: f64,
    top: f64,
    width: f64,
    height: f64,
    x_range: (f64, f64),
    y_range: (f64, f64),
}

impl Frame {
    fn x(&self, value: f64) -> f64 {
        let (start, end) = self.x_range;
        self.left + (value - start) / (end - start) * self.width
    }

    fn y(&self, value: f64) -> f64 {
        let (start, end) = self.y_range;
        self.top + self.height - (value - start) / (end - start) * self.height
    }

    fn point(&self, x: f64, y: f64) -> (f64, f64) {
        (self.x(x), self.y(y))
    }

    /// Rectangle between two corners given in internal units.
    fn rect(&self, (x0, y0): (f64, f64), (x1, y1): (f64, f64), fill: Rgba, stroke: Option<Rgba>) -> SvgElement {
        let (px0, py0) = self.point(x0, y0);
        let (px1, py1) = self.point(x1, y1);
        SvgElement::Rect {
            x: px0.min(px1),
            y: py0.min(py1),
            width: (px1 - px0).abs(),
            height: (py1 - py0).abs(),
            fill,
            stroke,
            stroke_width: 1.0,
        }
    }

    fn line(&self, from: (f64, f64), to: (f64, f64), stroke: Rgba, stroke_width: f64, dashed: bool) -> SvgElement {
        let (x1, y1) = self.point(from.0, from.1);
        let (x2, y2) = self.point(to.0, to.1);
        SvgElement::Line { x1, y1, x2, y2, stroke, stroke_width, dashed }
    }

    fn polygon(&self, points: impl IntoIterator<Item = (f64, f64)>, fill: Rgba, stroke: Option<Rgba>) -> SvgElement {
        SvgElement::Polygon { points: points.into_iter().map(|(x, y)| self.point(x, y)).collect(), fill, stroke }
    }
}

fn within(range: (f64, f64), value: f64) -> bool {
    value >= range.0.min(range.1) && value <= range.0.max(range.1)
}

fn draw_grid(encoder: &mut SvgEncoder, frame: &Frame, x_axis: &AxisLayout, y_axis: &AxisLayout) {
    for tick in x_axis.ticks.iter().filter(|tick| within(x_axis.range, tick.position)) {
        let x = frame.x(tick.position);
        encoder.add_element(SvgElement::Line {
            x1: x,
            y1: frame.top,
            x2: x,
            y2: frame.top + frame.height,
            stroke: GRID_COLOR,
            stroke_width: 1.0,
            dashed: false,
        });
    }
    for tick in y_axis.ticks.iter().filter(|tick| within(y_axis.range, tick.position)) {
        let y = frame.y(tick.position);
        encoder.add_element(SvgElement::Line {
            x1: frame.left,
            y1: y,
            x2: frame.left + frame.width,
            y2: y,
            stroke: GRID_COLOR,
            stroke_width: 1.0,
            dashed: false,
        });
    }
}

fn draw_shape(out: &mut Vec<SvgElement>, frame: &Frame, shape: &Shape) {
    match shape {
        Shape::Line { x0, y0, x1, y1, color, width, dashed } => {
            out.push(frame.line((*x0, *y0), (*x1, *y1), *color, *width, *dashed));
        }
        Shape::Rect { x0, y0, x1, y1, color } => out.push(frame.rect((*x0, *y0), (*x1, *y1), *color, None)),
        Shape::Polygon { points, color } => out.push(frame.polygon(points.iter().copied(), *color, None)),
    }
}

fn draw_trace(out: &mut Vec<SvgElement>, frame: &Frame, trace: &Trace) {
    match trace {
        Trace::Line { xs, ys, color, width, dashed, baseline, .. } => {
            let points: Vec<(f64, f64)> = xs.iter().zip(ys).map(|(&x, &y)| (x, y)).collect();
            if let Some(baseline) = baseline {
                let lower = xs.iter().zip(baseline).rev().map(|(&x, &y)| (x, y));
                out.push(frame.polygon(points.iter().copied().chain(lower), color.with_alpha(96), None));
            }
            out.push(SvgElement::Polyline {
                points: points.iter().map(|&(x, y)| frame.point(x, y)).collect(),
                stroke: *color,
                stroke_width: *width,
                dashed: *dashed,
            });
        }
        Trace::Markers { xs, ys, colors, sizes, shape, .. } => {
            for (i, (&x, &y)) in xs.iter().zip(ys).enumerate() {
                let fill = colors.get(i).copied().unwrap_or(Rgba::GRAY);
                let size = sizes.get(i).copied().unwrap_or(8.0);
                out.push(marker(frame.point(x, y), size, fill, *shape));
            }
        }
        Trace::Bars { positions, lower, upper, thickness, colors, orientation, .. } => {
            let half = thickness / 2.0;
            for (i, ((&position, &low), &high)) in positions.iter().zip(lower).zip(upper).enumerate() {
                let fill = colors.get(i).copied().unwrap_or(Rgba::GRAY);
                let from = orient(*orientation, position - half, low);
                let to = orient(*orientation, position + half, high);
                out.push(frame.rect(from, to, fill, None));
            }
        }
        Trace::Box { position, stats, thickness, color, orientation, .. } => {
            draw_box(out, frame, *position, stats, *thickness, *color, *orientation);
        }
        Trace::Density { position, samples, mirrored, color, orientation, .. } => {
            let outer = samples.iter().map(|&(value, extent)| orient(*orientation, position + extent, value));
            let points: Vec<(f64, f64)> = if *mirrored {
                let inner = samples.iter().rev().map(|&(value, extent)| orient(*orientation, position - extent, value));
                outer.chain(inner).collect()
            } else {
                let closing = [samples.last(), samples.first()]
                    .into_iter()
                    .flatten()
                    .map(|&(value, _)| orient(*orientation, *position, value));
                outer.chain(closing).collect()
            };
            out.push(frame.polygon(points, color.with_alpha(128), Some(*color)));
        }
        Trace::Heatmap { colors } => {
            for (i, row) in colors.iter().enumerate() {
                for (j, &fill) in row.iter().enumerate() {
                    #[allow(clippy::cast_precision_loss)]
                    let (x, y) = (j as f64, i as f64);
                    out.push(frame.rect((x - 0.5, y - 0.5), (x + 0.5, y + 0.5), fill, None));
                }
            }
        }
    }
}

fn marker((cx, cy): (f64, f64), size: f64, fill: Rgba, shape: MarkerShape) -> SvgElement {
    let r = size / 2.0;
    match shape {
        MarkerShape::Circle => SvgElement::Circle { cx, cy, r, fill },
        MarkerShape::Square => {
            SvgElement::Rect { x: cx - r, y: cy - r, width: size, height: size, fill, stroke: None, stroke_width: 0.0 }
        }
        MarkerShape::Diamond => SvgElement::Polygon {
            points: vec![(cx, cy - r), (cx + r, cy), (cx, cy + r), (cx - r, cy)],
            fill,
            stroke: None,
        },
    }
}

fn draw_box(
    out: &mut Vec<SvgElement>,
    frame: &Frame,
    position: f64,
    stats: &BoxStats,
    thickness: f64,
    color: Rgba,
    orientation: Orientation,
) {
    let half = thickness / 2.0;
    let at = |category: f64, value: f64| orient(orientation, category, value);
    out.push(frame.rect(at(position - half, stats.q1), at(position + half, stats.q3), color.with_alpha(64), Some(color)));
    out.push(frame.line(at(position - half, stats.median), at(position + half, stats.median), color, 2.0, false));
    for (from, to) in [(stats.lower_whisker, stats.q1), (stats.q3, stats.upper_whisker)] {
        out.push(frame.line(at(position, from), at(position, to), color, 1.0, false));
    }
    for whisker in [stats.lower_whisker, stats.upper_whisker] {
        out.push(frame.line(at(position - half / 2.0, whisker), at(position + half / 2.0, whisker), color, 1.0, false));
    }
    for &outlier in &stats.outliers {
        let (x, y) = at(position, outlier);
        out.push(SvgElement::Circle { cx: frame.x(x), cy: frame.y(y), r: 2.5, fill: color });
    }
}

impl SvgRenderer {
    fn draw_ticks(&self, encoder: &mut SvgEncoder, frame: &Frame, x_axis: &AxisLayout, y_axis: &AxisLayout) {
        let bottom = frame.top + frame.height;
        for tick in x_axis.ticks.iter().filter(|tick| within(x_axis.range, tick.position)) {
            let x = frame.x(tick.position);
            encoder.add_element(SvgElement::Line {
                x1: x,
                y1: bottom,
                x2: x,
                y2: bottom + TICK_LENGTH,
                stroke: AXIS_COLOR,
                stroke_width: 1.0,
                dashed: false,
            });
            encoder.add_element(self.text(x, bottom + TICK_LENGTH + self.font_size, &tick.label, TextAnchor::Middle));
        }
        for tick in y_axis.ticks.iter().filter(|tick| within(y_axis.range, tick.position)) {
            let y = frame.y(tick.position);
            encoder.add_element(SvgElement::Line {
                x1: frame.left - TICK_LENGTH,
                y1: y,
                x2: frame.left,
                y2: y,
                stroke: AXIS_COLOR,
                stroke_width: 1.0,
                dashed: false,
            });
            encoder.add_element(self.text(frame.left - TICK_LENGTH - 2.0, y + self.font_size / 3.0, &tick.label, TextAnchor::End));
        }
    }

    fn draw_titles(&self, encoder: &mut SvgEncoder, frame: &Frame, figure: &Figure) {
        let layout = &figure.layout;
        let center_x = frame.left + frame.width / 2.0;
        if let Some(title) = &layout.title {
            encoder.add_element(SvgElement::Text {
                x: center_x,
                y: frame.top / 2.0 + self.font_size / 2.0,
                text: title.clone(),
                font_size: self.font_size * 1.4,
                fill: TEXT_COLOR,
                anchor: TextAnchor::Middle,
                vertical: false,
            });
        }
        if let Some(title) = &layout.x_axis.title {
            let y = frame.top + frame.height + TICK_LENGTH + self.font_size * 2.8;
            encoder.add_element(self.text(center_x, y, title, TextAnchor::Middle));
        }
        if let Some(title) = &layout.y_axis.title {
            let y = frame.top + frame.height / 2.0;
            encoder.add_element(SvgElement::Text {
                x: self.font_size,
                y,
                text: title.clone(),
                font_size: self.font_size,
                fill: TEXT_COLOR,
                anchor: TextAnchor::Middle,
                vertical: true,
            });
        }
    }

    fn text(&self, x: f64, y: f64, text: &str, anchor: TextAnchor) -> SvgElement {
        SvgElement::Text {
            x,
            y,
            text: text.to_string(),
            font_size: self.font_size,
            fill: TEXT_COLOR,
            anchor,
            vertical: false,
        }
    }
}

// ============================================================================
// Legend panel
// ============================================================================

const SWATCH: f64 = 12.0;
const GRADIENT_HEIGHT: f64 = 120.0;
const GRADIENT_STEPS: u32 = 48;

/// Cursor over the legend panel, filled top to bottom.
struct Panel {
    x: f64,
    y: f64,
    font_size: f64,
}

impl Panel {
    fn row_height(&self) -> f64 {
        self.font_size * 1.6
    }

    fn label(&self, encoder: &mut SvgEncoder, x: f64, text: &str) {
        encoder.add_element(SvgElement::Text {
            x,
            y: self.y + self.font_size / 3.0,
            text: text.to_string(),
            font_size: self.font_size,
            fill: TEXT_COLOR,
            anchor: TextAnchor::Start,
            vertical: false,
        });
    }

    fn heading(&mut self, encoder: &mut SvgEncoder, title: Option<&String>) {
        if let Some(title) = title {
            self.label(encoder, self.x, title);
            self.y += self.row_height();
        }
    }

    fn legend(&mut self, encoder: &mut SvgEncoder, figure: &Figure) {
        let text_x = self.x + SWATCH * 2.0;
        for entry in &figure.legend {
            let element = match entry.symbol {
                LegendSymbol::Line { color, width, dashed } => SvgElement::Line {
                    x1: self.x,
                    y1: self.y,
                    x2: self.x + SWATCH * 1.5,
                    y2: self.y,
                    stroke: color,
                    stroke_width: width,
                    dashed,
                },
                LegendSymbol::Fill { color } => SvgElement::Rect {
                    x: self.x,
                    y: self.y - SWATCH / 2.0,
                    width: SWATCH,
                    height: SWATCH,
                    fill: color,
                    stroke: None,
                    stroke_width: 0.0,
                },
                LegendSymbol::Marker { color, size } => SvgElement::Circle {
                    cx: self.x + SWATCH / 2.0,
                    cy: self.y,
                    r: (size / 2.0).min(SWATCH / 2.0),
                    fill: color,
                },
            };
            encoder.add_element(element);
            self.label(encoder, text_x, &entry.title);
            self.y += self.row_height();
        }
        if !figure.legend.is_empty() {
            self.y += self.row_height() / 2.0;
        }
    }

    fn color_legend(&mut self, encoder: &mut SvgEncoder, legend: &ColorLegend) {
        match legend {
            ColorLegend::Continuous { title, stops, ticks, .. } => {
                self.heading(encoder, title.as_ref());
                let (Some(&(low, _)), Some(&(high, _))) = (stops.first(), stops.last()) else {
                    return;
                };
                let top = self.y;
                let step = GRADIENT_HEIGHT / f64::from(GRADIENT_STEPS);
                for k in 0..GRADIENT_STEPS {
                    let t = 1.0 - (f64::from(k) + 0.5) / f64::from(GRADIENT_STEPS);
                    let y = top + f64::from(k) * step;
                    encoder.add_element(SvgElement::Rect {
                        x: self.x,
                        y,
                        width: SWATCH,
                        height: step + 0.5,
                        fill: gradient_color(stops, low + t * (high - low)),
                        stroke: None,
                        stroke_width: 0.0,
                    });
                }
                let span = high - low;
                for tick in ticks.iter().filter(|tick| within((low, high), tick.position)) {
                    let fraction = if span == 0.0 { 0.5 } else { (tick.position - low) / span };
                    let y = top + (1.0 - fraction) * GRADIENT_HEIGHT;
                    encoder.add_element(SvgElement::Text {
                        x: self.x + SWATCH * 1.5,
                        y: y + self.font_size / 3.0,
                        text: tick.label.clone(),
                        font_size: self.font_size * 0.9,
                        fill: TEXT_COLOR,
                        anchor: TextAnchor::Start,
                        vertical: false,
                    });
                }
                self.y = top + GRADIENT_HEIGHT + self.row_height();
            }
            ColorLegend::Categorical { title, entries } => {
                self.heading(encoder, title.as_ref());
                for (key, color) in entries {
                    encoder.add_element(SvgElement::Rect {
                        x: self.x,
                        y: self.y - SWATCH / 2.0,
                        width: SWATCH,
                        height: SWATCH,
                        fill: *color,
                        stroke: None,
                        stroke_width: 0.0,
                    });
                    self.label(encoder, self.x + SWATCH * 2.0, key);
                    self.y += self.row_height();
                }
                self.y += self.row_height() / 2.0;
            }
        }
    }

    fn size_legend(&mut self, encoder: &mut SvgEncoder, legend: &SizeLegend) {
        self.heading(encoder, legend.title.as_ref());
        let column = legend.entries.iter().map(|(_, size)| *size).fold(SWATCH, f64::max);
        for (label, size) in &legend.entries {
            let radius = size / 2.0;
            self.y += radius;
            encoder.add_element(SvgElement::Circle { cx: self.x + column / 2.0, cy: self.y, r: radius, fill: Rgba::GRAY });
            self.label(encoder, self.x + column + SWATCH, label);
            self.y += radius.max(self.row_height() / 2.0) + 4.0;
        }
    }
}

/// Color at internal value `value` on ascending gradient stops.
fn gradient_color(stops: &[(f64, Rgba)], value: f64) -> Rgba {
    let Some(&(first_value, first_color)) = stops.first() else {
        return Rgba::GRAY;
    };
    if value <= first_value {
        return first_color;
    }
    for pair in stops.windows(2) {
        let ((from, from_color), (to, to_color)) = (pair[0], pair[1]);
        if value <= to {
            let t = if to > from { (value - from) / (to - from) } else { 1.0 };
            return from_color.lerp(to_color, t);
        }
    }
    stops.last().map_or(first_color, |&(_, color)| color)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assemble::figure;
    use crate::band::Band;
    use crate::graph::{
        DistributionConfiguration, DistributionData, HeatmapConfiguration, HeatmapData, LinesConfiguration,
        LinesData, PointsConfiguration, PointsData,
    };
    use crate::stack::StackingMode;

    #[test]
    fn test_svg_encoder_new() {
        let svg = SvgEncoder::new(800.0, 600.0).render();
        assert!(svg.contains("width=\"800\""));
        assert!(svg.contains("height=\"600\""));
        assert!(svg.contains("</svg>"));
    }

    #[test]
    fn test_svg_rect() {
        let mut encoder = SvgEncoder::new(100.0, 100.0);
        encoder.add_element(SvgElement::Rect {
            x: 10.0,
            y: 20.5,
            width: 30.0,
            height: 40.0,
            fill: Rgba::rgb(255, 0, 0),
            stroke: None,
            stroke_width: 1.0,
        });
        let svg = encoder.render();
        assert!(svg.contains(r#"<rect x="10" y="20.5" width="30" height="40" fill="rgb(255,0,0)"/>"#));
    }

    #[test]
    fn test_svg_dashed_polyline() {
        let mut encoder = SvgEncoder::new(100.0, 100.0);
        encoder.add_element(SvgElement::Polyline {
            points: vec![(0.0, 0.0), (50.0, 100.0), (100.0, 0.0)],
            stroke: Rgba::BLACK,
            stroke_width: 1.5,
            dashed: true,
        });
        let svg = encoder.render();
        assert!(svg.contains("points=\"0,0 50,100 100,0\""));
        assert!(svg.contains("fill=\"none\""));
        assert!(svg.contains("stroke-dasharray=\"6,4\""));
    }

    #[test]
    fn test_svg_text_escaping() {
        let mut encoder = SvgEncoder::new(100.0, 100.0);
        encoder.add_element(SvgElement::Text {
            x: 10.0,
            y: 50.0,
            text: "<script>A & B</script>".into(),
            font_size: 12.0,
            fill: Rgba::BLACK,
            anchor: TextAnchor::End,
            vertical: true,
        });
        let svg = encoder.render();
        assert!(!svg.contains("<script>"));
        assert!(svg.contains("&lt;script&gt;A &amp; B"));
        assert!(svg.contains("text-anchor=\"end\""));
        assert!(svg.contains("rotate(-90 10 50)"));
    }

    #[test]
    fn test_svg_transparent_background() {
        let svg = SvgEncoder::new(100.0, 100.0).background(None).render();
        assert_eq!(svg.matches("<rect").count(), 0);
    }

    #[test]
    fn test_svg_rgba_alpha() {
        let css = rgba_to_css(Rgba::new(255, 0, 0, 128));
        assert_eq!(css, "rgba(255,0,0,0.502)");
    }

    #[test]
    fn test_num_formatting() {
        assert_eq!(num(10.0), "10");
        assert_eq!(num(2.126), "2.13");
        assert_eq!(num(-0.001), "0");
        assert_eq!(num(0.5), "0.5");
    }

    #[test]
    fn test_gradient_color() {
        let stops = [(0.0, Rgba::BLACK), (1.0, Rgba::WHITE)];
        assert_eq!(gradient_color(&stops, -1.0), Rgba::BLACK);
        assert_eq!(gradient_color(&stops, 2.0), Rgba::WHITE);
        assert_eq!(gradient_color(&stops, 0.5), Rgba::rgb(128, 128, 128));
    }

    #[test]
    fn test_render_points_clipped() {
        let data = PointsData {
            points_xs: vec![0.0, 1.0, 2.0],
            points_ys: vec![0.0, 1.0, 4.0],
            name: Some("samples".into()),
            ..Default::default()
        };
        let mut configuration = PointsConfiguration::default();
        configuration.xy.y_bands.middle = Some(Band::line(2.0).title("limit"));
        let figure = figure(&data, &configuration).unwrap();
        let svg = SvgRenderer::new().render(&figure).unwrap();
        assert!(svg.contains(r#"<clipPath id="plot-area">"#));
        assert!(svg.contains(r#"<g clip-path="url(#plot-area)">"#));
        assert_eq!(svg.matches("<circle").count(), 4);
        assert!(svg.contains(">samples</text>"));
        assert!(svg.contains(">limit</text>"));
    }

    #[test]
    fn test_render_stacked_area() {
        let data = LinesData {
            points_xs: vec![vec![0.0, 1.0], vec![0.0, 1.0]],
            points_ys: vec![vec![1.0, 2.0], vec![1.0, 1.0]],
            ..Default::default()
        };
        let configuration = LinesConfiguration { stacking: Some(StackingMode::Raw), ..Default::default() };
        let figure = figure(&data, &configuration).unwrap();
        let svg = SvgRenderer::new().render(&figure).unwrap();
        assert_eq!(svg.matches("<polygon").count(), 2);
        assert_eq!(svg.matches("<polyline").count(), 2);
    }

    #[test]
    fn test_render_heatmap_cells() {
        let data = HeatmapData {
            values: vec![vec![0.0, 1.0, 2.0], vec![3.0, 4.0, 5.0]],
            ..Default::default()
        };
        let mut configuration = HeatmapConfiguration::default();
        configuration.graph.show_legend = false;
        let figure = figure(&data, &configuration).unwrap();
        let svg = SvgRenderer::new().background(None).render(&figure).unwrap();
        // six cells plus the clip rectangle and the plot frame
        assert_eq!(svg.matches("<rect").count(), 8);
    }

    #[test]
    fn test_render_violin() {
        let data = DistributionData { values: vec![1.0, 2.0, 2.5, 3.0, 7.0], ..Default::default() };
        let mut configuration = DistributionConfiguration::default();
        configuration.style.show_violin = true;
        let figure = figure(&data, &configuration).unwrap();
        let svg = SvgRenderer::new().render(&figure).unwrap();
        assert_eq!(svg.matches("<polygon").count(), 1);
        assert!(svg.contains("<line"));
    }

    #[test]
    fn test_canvas_too_small() {
        let data = PointsData { points_xs: vec![1.0], points_ys: vec![1.0], ..Default::default() };
        let mut configuration = PointsConfiguration::default();
        configuration.graph.width = 50.0;
        let figure = figure(&data, &configuration).unwrap();
        let err = SvgRenderer::new().render(&figure).unwrap_err();
        assert_eq!(err.to_string(), "Rendering error: canvas 50x600 leaves no room for the plot area");
    }
}
