//! # Trueno-Plot
//!
//! Declarative charting engine: callers describe a graph as a typed **data**
//! object plus a typed **configuration** object, and the engine validates the
//! pair, derives every visual parameter and assembles a backend-neutral
//! [`Figure`].
//!
//! ## Features
//!
//! - **Closed set of graph kinds**: distribution(s), line(s), cdf(s), bar(s),
//!   points, grid and heatmap
//! - **Path-addressed validation**: the first violated invariant is reported
//!   with a dotted field path such as `data.points_sizes[1,2]`
//! - **Engines**: linear/log axes, categorical and continuous color scales,
//!   size scales, reference bands, stacking, box/density/CDF statistics
//! - **Renderer seam**: SVG out of the box, JSON (feature `serde`) for
//!   interactive front ends
//!
//! ## Quick Start
//!
//! ```rust
//! use trueno_plot::prelude::*;
//!
//! let data = LineData {
//!     points_xs: vec![0.0, 1.0, 2.0],
//!     points_ys: vec![1.0, 3.0, 2.0],
//!     ..Default::default()
//! };
//! let svg = render(&data, &LineConfiguration::default(), &mut SvgRenderer::new())?;
//! assert!(svg.starts_with("<svg"));
//! # Ok::<(), trueno_plot::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: `Serialize`/`Deserialize` on every data, configuration and
//!   figure type, plus [`JsonRenderer`](output::JsonRenderer)

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
// Allow unwrap() in tests only - banned in production code
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Core Modules
// ============================================================================

/// Color tokens and the resolved [`Rgba`](color::Rgba) type.
pub mod color;

/// Value transforms and linear mappings.
pub mod scale;

/// Field paths, the validation trait and primitive checks.
pub mod validate;

// ============================================================================
// Engines
// ============================================================================

/// Linear and log axes.
pub mod axis;

/// Band lines and fills.
pub mod band;

/// Color scales and palettes.
pub mod color_scale;

/// Size scales.
pub mod size;

/// Raw, percent and fraction stacking.
pub mod stack;

/// Box statistics, densities and empirical CDFs.
pub mod stats;

// ============================================================================
// Graphs and Assembly
// ============================================================================

/// Figure assembly and rendering entry points.
pub mod assemble;

/// Backend-neutral figure description.
pub mod figure;

/// Graph kinds.
pub mod graph;

/// Renderers (SVG, JSON).
pub mod output;

// ============================================================================
// Error Types
// ============================================================================

/// Error types for trueno-plot operations.
pub mod error;

pub use assemble::{figure, render};
pub use error::{Error, ErrorCategory, Result};
pub use figure::Figure;

// ============================================================================
// Prelude
// ============================================================================

/// Commonly used types and traits for convenient imports.
///
/// ```rust
/// use trueno_plot::prelude::*;
/// ```
pub mod prelude {
    pub use crate::assemble::{figure, render};
    pub use crate::axis::AxisConfiguration;
    pub use crate::band::{Band, BandConfiguration, BandStyle};
    pub use crate::color::Rgba;
    pub use crate::color_scale::{ColorScaleConfiguration, ColorValue, Palette};
    pub use crate::error::{Error, Result};
    pub use crate::figure::{Figure, MarkerShape, Orientation, Trace};
    pub use crate::graph::{
        BarConfiguration, BarData, BarsConfiguration, BarsData, CdfConfiguration, CdfData, CdfsConfiguration,
        CdfsData, DistributionConfiguration, DistributionData, DistributionsConfiguration, DistributionsData,
        Graph, GraphKind, GraphRef, GridConfiguration, GridData, HeatmapConfiguration, HeatmapData,
        LineConfiguration, LineData, LinesConfiguration, LinesData, PointsConfiguration, PointsData,
    };
    #[cfg(feature = "serde")]
    pub use crate::output::JsonRenderer;
    pub use crate::output::{Renderer, SvgRenderer};
    pub use crate::size::SizeScaleConfiguration;
    pub use crate::stack::StackingMode;
    pub use crate::validate::{assert_valid, FieldPath, Validate};
}
