//! Renderers turning a [`Figure`] into an artifact.
//!
//! The crate stops at the figure description; a [`Renderer`] is the hand-off
//! point to a backend. Two are provided: [`SvgRenderer`] for static vector
//! images and, with the `serde` feature, [`JsonRenderer`] for interactive
//! front ends that draw the description themselves.

#[cfg(feature = "serde")]
mod json;
mod svg;

#[cfg(feature = "serde")]
pub use json::JsonRenderer;
pub use svg::{Margin, SvgElement, SvgEncoder, SvgRenderer, TextAnchor};

use crate::error::Result;
use crate::figure::Figure;

/// Rendering backend.
pub trait Renderer {
    /// Artifact produced per figure.
    type Output;

    /// Renders one figure.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Rendering`](crate::Error::Rendering) or another
    /// backend failure.
    fn render(&mut self, figure: &Figure) -> Result<Self::Output>;
}
