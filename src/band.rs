//! Reference bands.
//!
//! A [`BandConfiguration`] holds up to three bands (low, middle, high) at
//! fixed offsets along an axis. Each band is either a line at its offset or a
//! filled region: low fills from the domain start up to its offset, high from
//! its offset to the domain end, and middle between the low and high offsets.
//! Diagonal bands are lines `y = x + offset` in internal units.

use crate::axis::{AxisConfiguration, AxisDomain};
use crate::color::Rgba;
use crate::error::{Error, Result};
use crate::figure::{LegendEntry, LegendSymbol, Shape};
use crate::validate::{check_finite, check_larger, check_positive, FieldPath, Validate};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default band line color.
pub const DEFAULT_LINE_COLOR: Rgba = Rgba::GRAY;

/// Default band fill color.
pub const DEFAULT_FILL_COLOR: Rgba = Rgba::new(128, 128, 128, 48);

/// Which way band offsets are measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BandOrientation {
    /// Lines at `x = offset`.
    Vertical,
    /// Lines at `y = offset`.
    Horizontal,
    /// Lines at `y = x + offset`.
    Diagonal,
}

/// Line or fill styling of a band.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(tag = "style", rename_all = "snake_case")
)]
pub enum BandStyle {
    /// A line at the offset.
    Line {
        /// Stroke width in pixels.
        #[cfg_attr(feature = "serde", serde(default = "default_width"))]
        width: f64,
        /// Dashed stroke.
        #[cfg_attr(feature = "serde", serde(default))]
        is_dashed: bool,
    },
    /// A filled region.
    Fill,
}

#[cfg(feature = "serde")]
fn default_width() -> f64 {
    1.0
}

impl Default for BandStyle {
    fn default() -> Self {
        Self::Line { width: 1.0, is_dashed: false }
    }
}

/// One reference band.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct Band {
    /// Position along the axis in data units (internal units for diagonals).
    pub offset: f64,
    /// Line or fill.
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub style: BandStyle,
    /// Color token.
    pub color: Option<String>,
    /// Legend label.
    pub title: Option<String>,
}

impl Band {
    /// A default line band at `offset`.
    #[must_use]
    pub fn line(offset: f64) -> Self {
        Self { offset, ..Self::default() }
    }

    /// A filled band at `offset`.
    #[must_use]
    pub fn fill(offset: f64) -> Self {
        Self { offset, style: BandStyle::Fill, ..Self::default() }
    }

    /// Sets the color token.
    #[must_use]
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Sets the legend label.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Whether this band is filled.
    #[must_use]
    pub const fn is_filled(&self) -> bool {
        matches!(self.style, BandStyle::Fill)
    }

    fn resolved_color(&self) -> Rgba {
        let fallback = if self.is_filled() { DEFAULT_FILL_COLOR } else { DEFAULT_LINE_COLOR };
        self.color.as_deref().and_then(Rgba::parse).unwrap_or(fallback)
    }

    fn legend_symbol(&self) -> LegendSymbol {
        match self.style {
            BandStyle::Line { width, is_dashed } => {
                LegendSymbol::Line { color: self.resolved_color(), width, dashed: is_dashed }
            }
            BandStyle::Fill => LegendSymbol::Fill { color: self.resolved_color() },
        }
    }
}

impl Validate for Band {
    fn validate(&self, path: &FieldPath) -> Result<()> {
        if let BandStyle::Line { width, .. } = self.style {
            check_positive(&path.field("width"), width)?;
        }
        if let Some(color) = &self.color {
            Rgba::resolve(&path.field("color"), color)?;
        }
        Ok(())
    }
}

/// Low, middle and high bands along one axis.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct BandConfiguration {
    /// Lowest band.
    pub low: Option<Band>,
    /// Middle band.
    pub middle: Option<Band>,
    /// Highest band.
    pub high: Option<Band>,
}

impl BandConfiguration {
    /// Whether no band is configured.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.low.is_none() && self.middle.is_none() && self.high.is_none()
    }

    fn named(&self) -> [(&'static str, Option<&Band>); 3] {
        [("low", self.low.as_ref()), ("middle", self.middle.as_ref()), ("high", self.high.as_ref())]
    }

    /// Checks the bands against the axes they are drawn over.
    ///
    /// `x_axis` is the axis offsets are measured along for vertical bands,
    /// `y_axis` for horizontal ones; diagonal bands need both.
    ///
    /// # Errors
    ///
    /// Returns the first violation of [`Validate`], then mixed axis kinds for
    /// diagonals, then offsets a log axis cannot take.
    pub fn validate_on_axes(
        &self,
        path: &FieldPath,
        orientation: BandOrientation,
        x_axis: &AxisConfiguration,
        y_axis: &AxisConfiguration,
    ) -> Result<()> {
        self.validate(path)?;
        if self.is_empty() {
            return Ok(());
        }
        match orientation {
            BandOrientation::Diagonal => {
                if x_axis.kind() != y_axis.kind() {
                    return Err(Error::MixedAxisScales { path: path.into() });
                }
            }
            BandOrientation::Vertical | BandOrientation::Horizontal => {
                let axis = if orientation == BandOrientation::Vertical { x_axis } else { y_axis };
                for (name, band) in self.named() {
                    if let Some(band) = band {
                        axis.transform().check(&path.field(name).field("offset"), band.offset)?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Lines and fills over the resolved domains.
    #[must_use]
    pub fn shapes(&self, orientation: BandOrientation, x: &AxisDomain, y: &AxisDomain) -> Vec<Shape> {
        let offset_of = |band: &Band| match orientation {
            BandOrientation::Vertical => x.transform.forward(band.offset),
            BandOrientation::Horizontal => y.transform.forward(band.offset),
            BandOrientation::Diagonal => band.offset,
        };
        let (start, end) = match orientation {
            BandOrientation::Vertical => (x.minimum, x.maximum),
            BandOrientation::Horizontal => (y.minimum, y.maximum),
            BandOrientation::Diagonal => (y.minimum - x.maximum, y.maximum - x.minimum),
        };
        let low = self.low.as_ref().map(offset_of);
        let high = self.high.as_ref().map(offset_of);

        let mut shapes = Vec::new();
        for (name, band) in self.named() {
            let Some(band) = band else { continue };
            let offset = offset_of(band);
            let color = band.resolved_color();
            match band.style {
                BandStyle::Line { width, is_dashed } => {
                    shapes.push(line_shape(orientation, offset, x, y, color, width, is_dashed));
                }
                BandStyle::Fill => {
                    let (from, to) = match name {
                        "low" => (start.min(offset), offset),
                        "high" => (offset, end.max(offset)),
                        _ => (low.unwrap_or(start), high.unwrap_or(end)),
                    };
                    shapes.push(fill_shape(orientation, from, to, x, y, color));
                }
            }
        }
        tracing::trace!(count = shapes.len(), ?orientation, "band shapes");
        shapes
    }

    /// Legend entries of titled bands, low to high.
    #[must_use]
    pub fn legend_entries(&self) -> Vec<LegendEntry> {
        self.named()
            .into_iter()
            .filter_map(|(_, band)| band)
            .filter_map(|band| {
                band.title.as_ref().map(|title| LegendEntry {
                    title: title.clone(),
                    symbol: band.legend_symbol(),
                })
            })
            .collect()
    }
}

impl Validate for BandConfiguration {
    fn validate(&self, path: &FieldPath) -> Result<()> {
        let present: Vec<(&str, &Band)> = self
            .named()
            .into_iter()
            .filter_map(|(name, band)| band.map(|band| (name, band)))
            .collect();
        for (name, band) in &present {
            check_finite(&path.field(name).field("offset"), band.offset)?;
        }
        for pair in present.windows(2) {
            let (lower_name, lower) = pair[0];
            let (upper_name, upper) = pair[1];
            check_larger(
                &path.field(upper_name).field("offset"),
                upper.offset,
                &path.field(lower_name).field("offset"),
                lower.offset,
            )?;
        }
        for (name, band) in &present {
            band.validate(&path.field(name))?;
        }
        if self.middle.as_ref().is_some_and(Band::is_filled)
            && (self.low.is_none() || self.high.is_none())
        {
            return Err(Error::IncompleteFill {
                path: (&path.field("middle")).into(),
                low: (&path.field("low")).into(),
                high: (&path.field("high")).into(),
            });
        }
        Ok(())
    }
}

fn line_shape(
    orientation: BandOrientation,
    offset: f64,
    x: &AxisDomain,
    y: &AxisDomain,
    color: Rgba,
    width: f64,
    dashed: bool,
) -> Shape {
    let (x0, y0, x1, y1) = match orientation {
        BandOrientation::Vertical => (offset, y.minimum, offset, y.maximum),
        BandOrientation::Horizontal => (x.minimum, offset, x.maximum, offset),
        BandOrientation::Diagonal => (x.minimum, x.minimum + offset, x.maximum, x.maximum + offset),
    };
    Shape::Line { x0, y0, x1, y1, color, width, dashed }
}

fn fill_shape(
    orientation: BandOrientation,
    from: f64,
    to: f64,
    x: &AxisDomain,
    y: &AxisDomain,
    color: Rgba,
) -> Shape {
    match orientation {
        BandOrientation::Vertical => {
            Shape::Rect { x0: from, y0: y.minimum, x1: to, y1: y.maximum, color }
        }
        BandOrientation::Horizontal => {
            Shape::Rect { x0: x.minimum, y0: from, x1: x.maximum, y1: to, color }
        }
        BandOrientation::Diagonal => Shape::Polygon {
            points: vec![
                (x.minimum, x.minimum + from),
                (x.maximum, x.maximum + from),
                (x.maximum, x.maximum + to),
                (x.minimum, x.minimum + to),
            ],
            color,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scale::ValueTransform;

    fn path() -> FieldPath {
        FieldPath::root("configuration").field("x_bands")
    }

    fn domain(minimum: f64, maximum: f64) -> AxisDomain {
        AxisDomain { transform: ValueTransform::Linear, minimum, maximum }
    }

    #[test]
    fn test_ordering_violation() {
        let bands = BandConfiguration {
            low: Some(Band::line(2.0)),
            middle: Some(Band::line(1.0)),
            high: None,
        };
        assert_eq!(
            bands.validation_message(&path()).as_deref(),
            Some(
                "configuration.x_bands.middle.offset: 1\n\
                 is not larger than configuration.x_bands.low.offset: 2"
            )
        );
    }

    #[test]
    fn test_offset_must_be_finite() {
        let path = FieldPath::root("configuration").field("y_bands");
        let bands = BandConfiguration { middle: Some(Band::line(f64::NAN)), ..Default::default() };
        assert_eq!(
            bands.validation_message(&path).as_deref(),
            Some("non-finite configuration.y_bands.middle.offset: NaN")
        );
        let bands = BandConfiguration {
            low: Some(Band::line(0.0)),
            high: Some(Band::fill(f64::INFINITY)),
            ..Default::default()
        };
        assert_eq!(
            bands.validation_message(&path).as_deref(),
            Some("non-finite configuration.y_bands.high.offset: inf")
        );
    }

    #[test]
    fn test_ordering_skips_missing_middle() {
        let bands = BandConfiguration { low: Some(Band::line(3.0)), middle: None, high: Some(Band::line(3.0)) };
        assert!(bands.validation_message(&path()).unwrap().starts_with("configuration.x_bands.high.offset: 3"));
    }

    #[test]
    fn test_line_width_must_be_positive() {
        let mut band = Band::line(0.0);
        band.style = BandStyle::Line { width: 0.0, is_dashed: false };
        let bands = BandConfiguration { low: Some(band), ..Default::default() };
        assert_eq!(
            bands.validation_message(&path()).as_deref(),
            Some("non-positive configuration.x_bands.low.width: 0")
        );
    }

    #[test]
    fn test_invalid_color() {
        let bands = BandConfiguration { high: Some(Band::line(1.0).color("nope")), ..Default::default() };
        assert_eq!(
            bands.validation_message(&path()).as_deref(),
            Some("invalid configuration.x_bands.high.color: nope")
        );
    }

    #[test]
    fn test_middle_fill_needs_both_sides() {
        let bands = BandConfiguration {
            low: Some(Band::line(0.0)),
            middle: Some(Band::fill(1.0)),
            high: None,
        };
        assert_eq!(
            bands.validation_message(&path()).as_deref(),
            Some("filled configuration.x_bands.middle requires both configuration.x_bands.low and configuration.x_bands.high")
        );
    }

    #[test]
    fn test_diagonal_mixed_axes() {
        let bands = BandConfiguration { middle: Some(Band::line(0.0)), ..Default::default() };
        let linear = AxisConfiguration::new();
        let log = AxisConfiguration::new().log_regularization(0.0);
        let path = FieldPath::root("configuration").field("xy_bands");
        let err = bands
            .validate_on_axes(&path, BandOrientation::Diagonal, &linear, &log)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "configuration.xy_bands specified for a combination of linear and log scale axes"
        );
        assert!(bands.validate_on_axes(&path, BandOrientation::Diagonal, &log, &log).is_ok());
        assert!(BandConfiguration::default()
            .validate_on_axes(&path, BandOrientation::Diagonal, &linear, &log)
            .is_ok());
    }

    #[test]
    fn test_log_axis_offsets() {
        let bands = BandConfiguration { low: Some(Band::line(0.0)), ..Default::default() };
        let log = AxisConfiguration::new().log_regularization(0.0);
        let linear = AxisConfiguration::new();
        let err = bands
            .validate_on_axes(&path(), BandOrientation::Vertical, &log, &linear)
            .unwrap_err();
        assert_eq!(err.to_string(), "log of non-positive configuration.x_bands.low.offset: 0");
        assert!(bands.validate_on_axes(&path(), BandOrientation::Horizontal, &log, &linear).is_ok());
    }

    #[test]
    fn test_vertical_line_spans_y_domain() {
        let bands = BandConfiguration { middle: Some(Band::line(5.0)), ..Default::default() };
        let shapes = bands.shapes(BandOrientation::Vertical, &domain(0.0, 10.0), &domain(-1.0, 1.0));
        assert_eq!(
            shapes,
            vec![Shape::Line {
                x0: 5.0,
                y0: -1.0,
                x1: 5.0,
                y1: 1.0,
                color: DEFAULT_LINE_COLOR,
                width: 1.0,
                dashed: false
            }]
        );
    }

    #[test]
    fn test_fill_regions() {
        let bands = BandConfiguration {
            low: Some(Band::fill(2.0)),
            middle: Some(Band::fill(4.0)),
            high: Some(Band::fill(6.0)),
        };
        let shapes = bands.shapes(BandOrientation::Horizontal, &domain(0.0, 1.0), &domain(0.0, 10.0));
        let spans: Vec<(f64, f64)> = shapes
            .iter()
            .map(|shape| match shape {
                Shape::Rect { y0, y1, .. } => (*y0, *y1),
                other => panic!("unexpected shape {other:?}"),
            })
            .collect();
        assert_eq!(spans, vec![(0.0, 2.0), (2.0, 6.0), (6.0, 10.0)]);
    }

    #[test]
    fn test_diagonal_line() {
        let bands = BandConfiguration { middle: Some(Band::line(1.0)), ..Default::default() };
        let shapes = bands.shapes(BandOrientation::Diagonal, &domain(0.0, 4.0), &domain(0.0, 4.0));
        match &shapes[0] {
            Shape::Line { x0, y0, x1, y1, .. } => assert_eq!((*x0, *y0, *x1, *y1), (0.0, 1.0, 4.0, 5.0)),
            other => panic!("unexpected shape {other:?}"),
        }
    }

    #[test]
    fn test_diagonal_low_fill_reaches_visible_corner() {
        let bands = BandConfiguration { low: Some(Band::fill(0.0)), ..Default::default() };
        let shapes = bands.shapes(BandOrientation::Diagonal, &domain(0.0, 4.0), &domain(0.0, 4.0));
        match &shapes[0] {
            Shape::Polygon { points, .. } => {
                assert_eq!(points[0], (0.0, -4.0));
                assert_eq!(points[3], (0.0, 0.0));
            }
            other => panic!("unexpected shape {other:?}"),
        }
    }

    #[test]
    fn test_partial_legend() {
        let bands = BandConfiguration {
            low: Some(Band::line(0.0).title("floor")),
            middle: Some(Band::line(1.0)),
            high: Some(Band::fill(2.0).title("ceiling").color("red")),
        };
        let entries = bands.legend_entries();
        let titles: Vec<&str> = entries.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["floor", "ceiling"]);
        assert_eq!(entries[1].symbol, LegendSymbol::Fill { color: Rgba::rgb(255, 0, 0) });
    }
}
