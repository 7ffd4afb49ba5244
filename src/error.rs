//! Error types for trueno-plot operations.
//!
//! Every validation failure is reported as exactly one [`Error`] whose
//! `Display` output is the diagnostic message. Field references use the dotted
//! path form produced by [`FieldPath`](crate::validate::FieldPath), e.g.
//! `configuration.value_axis.maximum` or `data.points_sizes[1,2]`.

use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Broad classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Parallel arrays or matrices of disagreeing length or shape.
    StructuralMismatch,
    /// A value outside its permitted numeric domain.
    DomainViolation,
    /// A maximum/high that does not exceed its paired minimum/low.
    RangeOrderingViolation,
    /// "At least one of" / "not both of" flag sets.
    MutualExclusivity,
    /// An unresolvable color name or categorical key.
    UnknownToken,
    /// Options that cannot be combined (scale-kind mismatches and friends).
    ConfigurationConflict,
    /// Failure inside a renderer backend.
    Backend,
}

/// Errors that can occur while validating, assembling or rendering a figure.
#[derive(Error, Debug)]
pub enum Error {
    /// Two parallel arrays disagree in length.
    #[error("inconsistent size of {path}: {size}\nexpected size (from {reference}): {expected}")]
    SizeMismatch {
        /// Offending field.
        path: String,
        /// Its length.
        size: usize,
        /// Field the length is compared against.
        reference: String,
        /// Length of the reference field.
        expected: usize,
    },

    /// A collection that must hold at least one element is empty.
    #[error("empty {path}")]
    Empty {
        /// Offending field.
        path: String,
    },

    /// NaN or infinite value.
    #[error("non-finite {path}: {value}")]
    NonFinite {
        /// Offending field.
        path: String,
        /// The value.
        value: f64,
    },

    /// Value must be strictly positive.
    #[error("non-positive {path}: {value}")]
    NonPositive {
        /// Offending field.
        path: String,
        /// The value.
        value: f64,
    },

    /// Value must be non-negative.
    #[error("negative {path}: {value}")]
    Negative {
        /// Offending field.
        path: String,
        /// The value.
        value: f64,
    },

    /// Value plus log regularization is not strictly positive.
    #[error("log of non-positive {path}: {value}")]
    LogOfNonPositive {
        /// Offending field.
        path: String,
        /// The value, before regularization.
        value: f64,
    },

    /// An upper bound does not exceed its lower bound.
    #[error("{upper_path}: {upper}\nis not larger than {lower_path}: {lower}")]
    NotLarger {
        /// Field that should hold the larger value.
        upper_path: String,
        /// Its value.
        upper: f64,
        /// Field that should hold the smaller value.
        lower_path: String,
        /// Its value.
        lower: f64,
    },

    /// None of a set of related flags is enabled.
    #[error("must specify at least one of: {}", .paths.join(", "))]
    AtLeastOneOf {
        /// The flags, one of which must be set.
        paths: Vec<String>,
    },

    /// Two mutually exclusive options are both enabled.
    #[error("must not specify both of: {first}, {second}")]
    NotBoth {
        /// First option.
        first: String,
        /// Second option.
        second: String,
    },

    /// Unknown color token, preset name or categorical key.
    #[error("invalid {path}: {token}")]
    InvalidToken {
        /// Offending field.
        path: String,
        /// The unresolvable token.
        token: String,
    },

    /// A categorical palette defines the same key twice.
    #[error("duplicate key in {path}: {key}")]
    DuplicateKey {
        /// Offending field.
        path: String,
        /// The repeated key.
        key: String,
    },

    /// A continuous palette has fewer than two distinct stop values.
    #[error("too few distinct stop values in {path}: {count}")]
    TooFewStops {
        /// Offending field.
        path: String,
        /// Number of distinct stop values.
        count: usize,
    },

    /// Diagonal bands over one linear and one log axis.
    #[error("{path} specified for a combination of linear and log scale axes")]
    MixedAxisScales {
        /// The band configuration.
        path: String,
    },

    /// Reverse requested for a categorical palette.
    #[error("reversed categorical {path}")]
    ReversedCategorical {
        /// The palette field.
        path: String,
    },

    /// A scale legend is requested but no data feeds the scale.
    #[error("{flag} specified without {field}")]
    MissingScaleData {
        /// The flag requesting the scale.
        flag: String,
        /// The data field that should feed it.
        field: String,
    },

    /// A color scale legend is requested for literal colors.
    #[error("{flag} specified for explicit colors in {path}")]
    ExplicitColorsWithScale {
        /// The flag requesting the scale.
        flag: String,
        /// The first literal color.
        path: String,
    },

    /// Categorical colors without a categorical palette.
    #[error("missing {palette} for categorical {path}")]
    MissingPalette {
        /// The palette field.
        palette: String,
        /// The first categorical color.
        path: String,
    },

    /// Palette kind disagrees with the kind of a color value.
    #[error("{palette} is {palette_kind} but {path} is {value_kind}")]
    PaletteMismatch {
        /// The palette field.
        palette: String,
        /// "continuous" or "categorical".
        palette_kind: &'static str,
        /// The offending color value.
        path: String,
        /// "numeric" or "categorical".
        value_kind: &'static str,
    },

    /// A filled middle band without both surrounding bands.
    #[error("filled {path} requires both {low} and {high}")]
    IncompleteFill {
        /// The middle band.
        path: String,
        /// The low band.
        low: String,
        /// The high band.
        high: String,
    },

    /// Rendering backend failure.
    #[error("Rendering error: {0}")]
    Rendering(String),

    /// Figure serialization failure.
    #[cfg(feature = "serde")]
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Returns the taxonomy bucket of this error.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::SizeMismatch { .. } | Self::Empty { .. } => ErrorCategory::StructuralMismatch,
            Self::NonFinite { .. }
            | Self::NonPositive { .. }
            | Self::Negative { .. }
            | Self::LogOfNonPositive { .. }
            | Self::TooFewStops { .. } => ErrorCategory::DomainViolation,
            Self::NotLarger { .. } => ErrorCategory::RangeOrderingViolation,
            Self::AtLeastOneOf { .. } | Self::NotBoth { .. } => ErrorCategory::MutualExclusivity,
            Self::InvalidToken { .. } | Self::DuplicateKey { .. } => ErrorCategory::UnknownToken,
            Self::MixedAxisScales { .. }
            | Self::ReversedCategorical { .. }
            | Self::MissingScaleData { .. }
            | Self::ExplicitColorsWithScale { .. }
            | Self::MissingPalette { .. }
            | Self::PaletteMismatch { .. }
            | Self::IncompleteFill { .. } => ErrorCategory::ConfigurationConflict,
            Self::Rendering(_) => ErrorCategory::Backend,
            #[cfg(feature = "serde")]
            Self::Serialization(_) => ErrorCategory::Backend,
        }
    }
}
