//! Pieces shared by the kinds plotted on two numeric axes (line, lines,
//! points).

use crate::axis::{AxisConfiguration, AxisDomain};
use crate::band::{BandConfiguration, BandOrientation};
use crate::color::Rgba;
use crate::color_scale::{ColorScaleConfiguration, ColorValue};
use crate::error::Result;
use crate::figure::{ColorLegend, Layout, Shape, SizeLegend};
use crate::graph::{indexed_colors, indexed_values, GraphConfiguration, MarkerStyle};
use crate::size::SizeScaleConfiguration;
use crate::validate::{FieldPath, Validate};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The two numeric axes and the bands drawn over them.
///
/// Flattened into its parent configuration: validation paths read
/// `configuration.x_axis`, not `configuration.xy.x_axis`.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct XyConfiguration {
    /// Horizontal axis.
    pub x_axis: AxisConfiguration,
    /// Vertical axis.
    pub y_axis: AxisConfiguration,
    /// Bands at `x = offset`.
    pub x_bands: BandConfiguration,
    /// Bands at `y = offset`.
    pub y_bands: BandConfiguration,
    /// Bands at `y = x + offset`.
    pub xy_bands: BandConfiguration,
}

impl XyConfiguration {
    pub(crate) fn validate_axes(&self, path: &FieldPath) -> Result<()> {
        self.x_axis.validate(&path.field("x_axis"))?;
        self.y_axis.validate(&path.field("y_axis"))
    }

    pub(crate) fn validate_bands(&self, path: &FieldPath) -> Result<()> {
        for (name, bands, orientation) in self.oriented_bands() {
            bands.validate_on_axes(&path.field(name), orientation, &self.x_axis, &self.y_axis)?;
        }
        Ok(())
    }

    fn oriented_bands(&self) -> [(&'static str, &BandConfiguration, BandOrientation); 3] {
        [
            ("x_bands", &self.x_bands, BandOrientation::Vertical),
            ("y_bands", &self.y_bands, BandOrientation::Horizontal),
            ("xy_bands", &self.xy_bands, BandOrientation::Diagonal),
        ]
    }

    pub(crate) fn band_configurations(&self) -> Vec<&BandConfiguration> {
        vec![&self.x_bands, &self.y_bands, &self.xy_bands]
    }

    pub(crate) fn layout(&self, graph: &GraphConfiguration, x: &AxisDomain, y: &AxisDomain) -> Layout {
        let shapes: Vec<Shape> = self
            .oriented_bands()
            .into_iter()
            .flat_map(|(_, bands, orientation)| bands.shapes(orientation, x, y))
            .collect();
        graph.layout(x.layout(self.x_axis.title.clone()), y.layout(self.y_axis.title.clone()), shapes)
    }
}

/// Per-marker colors and sizes after scale resolution.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MarkerScales {
    /// One color per marker, empty when no color data was given.
    pub colors: Vec<Rgba>,
    /// One diameter per marker, empty when no size data was given.
    pub sizes: Vec<f64>,
    /// Color legend, when requested.
    pub color_legend: Option<ColorLegend>,
    /// Size legend, when requested.
    pub size_legend: Option<SizeLegend>,
}

impl MarkerScales {
    /// Resolves optional color and size data through their scales.
    pub(crate) fn resolve(
        configuration: &FieldPath,
        data: &FieldPath,
        scales: (&ColorScaleConfiguration, &SizeScaleConfiguration),
        colors: Option<&[ColorValue]>,
        sizes: Option<&[f64]>,
    ) -> Result<Self> {
        let (color_scale, size_scale) = scales;
        let color_field = data.field("points_colors");
        let size_field = data.field("points_sizes");
        let colors = color_scale.resolve(
            &configuration.field("color_scale"),
            &color_field,
            &indexed_colors(&color_field, colors.unwrap_or_default()),
        )?;
        let sizes = size_scale.resolve(
            &configuration.field("size_scale"),
            &size_field,
            &indexed_values(&size_field, sizes.unwrap_or_default()),
        )?;
        Ok(Self {
            colors: colors.colors,
            sizes: sizes.sizes,
            color_legend: colors.legend,
            size_legend: sizes.legend,
        })
    }

    /// Whether markers need drawing on top of a line.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty() && self.sizes.is_empty()
    }

    /// Colors for `count` markers, falling back to `fallback`.
    pub(crate) fn colors_or(&self, count: usize, fallback: Rgba) -> Vec<Rgba> {
        if self.colors.is_empty() {
            vec![fallback; count]
        } else {
            self.colors.clone()
        }
    }

    /// Sizes for `count` markers, falling back to the marker style.
    pub(crate) fn sizes_or(&self, count: usize, marker: &MarkerStyle) -> Vec<f64> {
        if self.sizes.is_empty() {
            vec![marker.size; count]
        } else {
            self.sizes.clone()
        }
    }

    pub(crate) fn attach_legends(&self, layout: &mut Layout) {
        layout.color_legend.clone_from(&self.color_legend);
        layout.size_legend.clone_from(&self.size_legend);
    }
}

/// Checks per-point color and size data against their scales.
pub(crate) fn check_marker_scales(
    configuration: &FieldPath,
    data: &FieldPath,
    scales: (&ColorScaleConfiguration, &SizeScaleConfiguration),
    colors: Option<&[ColorValue]>,
    sizes: Option<&[f64]>,
) -> Result<()> {
    let (color_scale, size_scale) = scales;
    let color_path = configuration.field("color_scale");
    let color_field = data.field("points_colors");
    color_scale.validate(&color_path)?;
    color_scale.check_values(
        &color_path,
        &color_field,
        &indexed_colors(&color_field, colors.unwrap_or_default()),
    )?;
    let size_path = configuration.field("size_scale");
    let size_field = data.field("points_sizes");
    size_scale.validate(&size_path)?;
    size_scale.check_values(&size_path, &size_field, &indexed_values(&size_field, sizes.unwrap_or_default()))
}
