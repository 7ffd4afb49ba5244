//! Color tokens.
//!
//! [`Rgba`] is the resolved color everything downstream works with. Caller
//! supplied colors are tokens: a name from a fixed CSS-derived vocabulary, or
//! a `#rgb` / `#rrggbb` / `#rrggbbaa` hex literal.

use std::fmt;

use crate::error::{Error, Result};
use crate::validate::FieldPath;

/// RGBA color with 8-bit components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(into = "String", try_from = "String")
)]
pub struct Rgba {
    /// Red component (0-255).
    pub r: u8,
    /// Green component (0-255).
    pub g: u8,
    /// Blue component (0-255).
    pub b: u8,
    /// Alpha component (0-255, 255 = fully opaque).
    pub a: u8,
}

/// Named color vocabulary.
const NAMED_COLORS: &[(&str, Rgba)] = &[
    ("black", Rgba::rgb(0, 0, 0)),
    ("white", Rgba::rgb(255, 255, 255)),
    ("red", Rgba::rgb(255, 0, 0)),
    ("green", Rgba::rgb(0, 128, 0)),
    ("lime", Rgba::rgb(0, 255, 0)),
    ("blue", Rgba::rgb(0, 0, 255)),
    ("yellow", Rgba::rgb(255, 255, 0)),
    ("cyan", Rgba::rgb(0, 255, 255)),
    ("magenta", Rgba::rgb(255, 0, 255)),
    ("orange", Rgba::rgb(255, 165, 0)),
    ("purple", Rgba::rgb(128, 0, 128)),
    ("pink", Rgba::rgb(255, 192, 203)),
    ("brown", Rgba::rgb(165, 42, 42)),
    ("gray", Rgba::rgb(128, 128, 128)),
    ("grey", Rgba::rgb(128, 128, 128)),
    ("lightgray", Rgba::rgb(211, 211, 211)),
    ("lightgrey", Rgba::rgb(211, 211, 211)),
    ("darkgray", Rgba::rgb(169, 169, 169)),
    ("darkgrey", Rgba::rgb(169, 169, 169)),
    ("silver", Rgba::rgb(192, 192, 192)),
    ("navy", Rgba::rgb(0, 0, 128)),
    ("teal", Rgba::rgb(0, 128, 128)),
    ("olive", Rgba::rgb(128, 128, 0)),
    ("maroon", Rgba::rgb(128, 0, 0)),
    ("aqua", Rgba::rgb(0, 255, 255)),
    ("fuchsia", Rgba::rgb(255, 0, 255)),
    ("gold", Rgba::rgb(255, 215, 0)),
    ("indigo", Rgba::rgb(75, 0, 130)),
    ("violet", Rgba::rgb(238, 130, 238)),
    ("turquoise", Rgba::rgb(64, 224, 208)),
    ("salmon", Rgba::rgb(250, 128, 114)),
    ("coral", Rgba::rgb(255, 127, 80)),
    ("tomato", Rgba::rgb(255, 99, 71)),
    ("crimson", Rgba::rgb(220, 20, 60)),
    ("darkred", Rgba::rgb(139, 0, 0)),
    ("darkgreen", Rgba::rgb(0, 100, 0)),
    ("darkblue", Rgba::rgb(0, 0, 139)),
    ("lightblue", Rgba::rgb(173, 216, 230)),
    ("lightgreen", Rgba::rgb(144, 238, 144)),
    ("skyblue", Rgba::rgb(135, 206, 235)),
    ("steelblue", Rgba::rgb(70, 130, 180)),
    ("forestgreen", Rgba::rgb(34, 139, 34)),
    ("seagreen", Rgba::rgb(46, 139, 87)),
    ("khaki", Rgba::rgb(240, 230, 140)),
    ("beige", Rgba::rgb(245, 245, 220)),
    ("tan", Rgba::rgb(210, 180, 140)),
    ("chocolate", Rgba::rgb(210, 105, 30)),
    ("transparent", Rgba::new(0, 0, 0, 0)),
];

/// Series colors used when the caller supplies none.
pub const SERIES_COLORS: [Rgba; 10] = [
    Rgba::rgb(31, 119, 180),
    Rgba::rgb(255, 127, 14),
    Rgba::rgb(44, 160, 44),
    Rgba::rgb(214, 39, 40),
    Rgba::rgb(148, 103, 189),
    Rgba::rgb(140, 86, 75),
    Rgba::rgb(227, 119, 194),
    Rgba::rgb(127, 127, 127),
    Rgba::rgb(188, 189, 34),
    Rgba::rgb(23, 190, 207),
];

impl Rgba {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);
    /// Opaque black.
    pub const BLACK: Self = Self::new(0, 0, 0, 255);
    /// Opaque white.
    pub const WHITE: Self = Self::new(255, 255, 255, 255);
    /// Opaque mid gray.
    pub const GRAY: Self = Self::rgb(128, 128, 128);

    /// Create a new RGBA color.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque RGB color (alpha = 255).
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Create a color with modified alpha.
    #[must_use]
    pub const fn with_alpha(self, a: u8) -> Self {
        Self::new(self.r, self.g, self.b, a)
    }

    /// Default color of the `index`-th series.
    #[must_use]
    pub const fn series(index: usize) -> Self {
        SERIES_COLORS[index % SERIES_COLORS.len()]
    }

    /// Resolves a color token, or `None` when it is not one.
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        let token = token.trim();
        if let Some(hex) = token.strip_prefix('#') {
            return parse_hex(hex);
        }
        let lower = token.to_ascii_lowercase();
        NAMED_COLORS
            .iter()
            .find(|(name, _)| *name == lower)
            .map(|&(_, color)| color)
    }

    /// Resolves a color token found at `path`.
    ///
    /// # Errors
    ///
    /// Returns `invalid <path>: <token>` for an unknown token.
    pub fn resolve(path: &FieldPath, token: &str) -> Result<Self> {
        Self::parse(token).ok_or_else(|| Error::InvalidToken {
            path: path.into(),
            token: token.to_string(),
        })
    }

    /// `#rrggbb`, or `#rrggbbaa` when not opaque.
    #[must_use]
    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }

    /// Alpha as a fraction.
    #[must_use]
    pub fn opacity(self) -> f64 {
        f64::from(self.a) / 255.0
    }

    /// Linear interpolation between two colors.
    #[must_use]
    pub fn lerp(self, other: Self, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |from: u8, to: u8| {
            let value = f64::from(from) + (f64::from(to) - f64::from(from)) * t;
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let value = value.round().clamp(0.0, 255.0) as u8;
            value
        };
        Self::new(
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
            mix(self.a, other.a),
        )
    }
}

fn parse_hex(hex: &str) -> Option<Rgba> {
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let nibble = |i: usize| u8::from_str_radix(&hex[i..=i], 16).ok();
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    match hex.len() {
        3 => Some(Rgba::rgb(nibble(0)? * 17, nibble(1)? * 17, nibble(2)? * 17)),
        6 => Some(Rgba::rgb(byte(0)?, byte(2)?, byte(4)?)),
        8 => Some(Rgba::new(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
        _ => None,
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl From<Rgba> for String {
    fn from(color: Rgba) -> Self {
        color.to_hex()
    }
}

impl TryFrom<String> for Rgba {
    type Error = Error;

    fn try_from(token: String) -> Result<Self> {
        Self::parse(&token).ok_or(Error::InvalidToken { path: "color".to_string(), token })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgba_constants() {
        assert_eq!(Rgba::BLACK, Rgba::rgb(0, 0, 0));
        assert_eq!(Rgba::WHITE, Rgba::rgb(255, 255, 255));
        assert_eq!(Rgba::TRANSPARENT.a, 0);
    }

    #[test]
    fn test_parse_named() {
        assert_eq!(Rgba::parse("red"), Some(Rgba::rgb(255, 0, 0)));
        assert_eq!(Rgba::parse("Teal"), Some(Rgba::rgb(0, 128, 128)));
        assert_eq!(Rgba::parse("nosuchcolor"), None);
    }

    #[test]
    fn test_parse_hex() {
        assert_eq!(Rgba::parse("#ff8000"), Some(Rgba::rgb(255, 128, 0)));
        assert_eq!(Rgba::parse("#f80"), Some(Rgba::rgb(255, 136, 0)));
        assert_eq!(Rgba::parse("#00000080"), Some(Rgba::new(0, 0, 0, 128)));
        assert_eq!(Rgba::parse("#12345"), None);
        assert_eq!(Rgba::parse("#gggggg"), None);
    }

    #[test]
    fn test_resolve_reports_path_and_token() {
        let path = FieldPath::root("data").field("points_colors").index(2);
        let err = Rgba::resolve(&path, "oops").unwrap_err();
        assert_eq!(err.to_string(), "invalid data.points_colors[2]: oops");
    }

    #[test]
    fn test_to_hex() {
        assert_eq!(Rgba::rgb(255, 128, 0).to_hex(), "#ff8000");
        assert_eq!(Rgba::new(0, 0, 0, 128).to_hex(), "#00000080");
        assert_eq!(Rgba::parse(&Rgba::rgb(1, 2, 3).to_string()), Some(Rgba::rgb(1, 2, 3)));
    }

    #[test]
    fn test_rgba_lerp() {
        let mid = Rgba::BLACK.lerp(Rgba::WHITE, 0.5);
        assert_eq!(mid, Rgba::rgb(128, 128, 128));
        assert_eq!(Rgba::BLACK.lerp(Rgba::WHITE, -1.0), Rgba::BLACK);
        assert_eq!(Rgba::BLACK.lerp(Rgba::WHITE, 2.0), Rgba::WHITE);
    }

    #[test]
    fn test_series_colors_cycle() {
        assert_eq!(Rgba::series(0), Rgba::series(SERIES_COLORS.len()));
        assert_ne!(Rgba::series(0), Rgba::series(1));
    }
}
