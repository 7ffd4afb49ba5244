//! Validation protocol.
//!
//! Every data and configuration structure implements [`Validate`]: it either
//! reports the first violation it finds or nothing. Composite structures
//! validate their nested fields in a fixed order and stop at the first
//! failure, so each failing input yields exactly one message.
//!
//! Fields are addressed with [`FieldPath`], which renders as a dotted path
//! mirroring the nesting of the structure being checked.

use std::fmt;

use crate::error::{Error, Result};

/// Dotted address of a field, e.g. `configuration.graph.width`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath(String);

impl FieldPath {
    /// Root path (`data`, `configuration`, ...).
    #[must_use]
    pub fn root(name: &str) -> Self {
        Self(name.to_string())
    }

    /// Path of a named child field.
    #[must_use]
    pub fn field(&self, name: &str) -> Self {
        Self(format!("{}.{name}", self.0))
    }

    /// Path of the `index`-th element of a list field.
    #[must_use]
    pub fn index(&self, index: usize) -> Self {
        Self(format!("{}[{index}]", self.0))
    }

    /// Path of the `(row, column)` element of a matrix field.
    #[must_use]
    pub fn index2(&self, row: usize, column: usize) -> Self {
        Self(format!("{}[{row},{column}]", self.0))
    }

    /// The rendered path.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&FieldPath> for String {
    fn from(path: &FieldPath) -> Self {
        path.0.clone()
    }
}

/// Capability of reporting why a value is invalid.
pub trait Validate {
    /// Returns the first violation found, addressed relative to `path`.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    fn validate(&self, path: &FieldPath) -> Result<()>;

    /// Message form of [`Validate::validate`]: `None` when valid.
    fn validation_message(&self, path: &FieldPath) -> Option<String> {
        self.validate(path).err().map(|e| e.to_string())
    }
}

impl<T: Validate> Validate for Option<T> {
    fn validate(&self, path: &FieldPath) -> Result<()> {
        match self {
            Some(value) => value.validate(path),
            None => Ok(()),
        }
    }
}

/// Asserts that `value` is valid, failing with its first violation.
///
/// # Errors
///
/// Returns the error reported by [`Validate::validate`].
pub fn assert_valid<T: Validate + ?Sized>(value: &T, path: &FieldPath) -> Result<()> {
    value.validate(path).inspect_err(|e| {
        tracing::debug!(path = %path, error = %e, "validation failed");
    })
}

// ============================================================================
// Primitive checks
// ============================================================================

/// Fails unless `value` is finite.
pub(crate) fn check_finite(path: &FieldPath, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(Error::NonFinite { path: path.into(), value })
    }
}

/// Fails unless `value` is finite and strictly positive.
pub(crate) fn check_positive(path: &FieldPath, value: f64) -> Result<()> {
    check_finite(path, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(Error::NonPositive { path: path.into(), value })
    }
}

/// Fails unless `value` is finite and non-negative.
pub(crate) fn check_non_negative(path: &FieldPath, value: f64) -> Result<()> {
    check_finite(path, value)?;
    if value >= 0.0 {
        Ok(())
    } else {
        Err(Error::Negative { path: path.into(), value })
    }
}

/// Fails unless `upper > lower`.
pub(crate) fn check_larger(
    upper_path: &FieldPath,
    upper: f64,
    lower_path: &FieldPath,
    lower: f64,
) -> Result<()> {
    if upper > lower {
        Ok(())
    } else {
        Err(Error::NotLarger {
            upper_path: upper_path.into(),
            upper,
            lower_path: lower_path.into(),
            lower,
        })
    }
}

/// Fails unless `size == expected`.
pub(crate) fn check_same_size(
    path: &FieldPath,
    size: usize,
    reference: &FieldPath,
    expected: usize,
) -> Result<()> {
    if size == expected {
        Ok(())
    } else {
        Err(Error::SizeMismatch {
            path: path.into(),
            size,
            reference: reference.into(),
            expected,
        })
    }
}

/// Fails when `len == 0`.
pub(crate) fn check_non_empty(path: &FieldPath, len: usize) -> Result<()> {
    if len == 0 {
        Err(Error::Empty { path: path.into() })
    } else {
        Ok(())
    }
}

/// Fails unless at least one flag is set.
pub(crate) fn check_at_least_one(flags: &[(FieldPath, bool)]) -> Result<()> {
    if flags.iter().any(|(_, set)| *set) {
        Ok(())
    } else {
        Err(Error::AtLeastOneOf {
            paths: flags.iter().map(|(path, _)| path.into()).collect(),
        })
    }
}

/// Fails when both flags are set.
pub(crate) fn check_not_both(first: (&FieldPath, bool), second: (&FieldPath, bool)) -> Result<()> {
    if first.1 && second.1 {
        Err(Error::NotBoth {
            first: first.0.into(),
            second: second.0.into(),
        })
    } else {
        Ok(())
    }
}

/// Checks every element of `values` is finite.
pub(crate) fn check_all_finite(path: &FieldPath, values: &[f64]) -> Result<()> {
    values
        .iter()
        .enumerate()
        .try_for_each(|(i, &v)| check_finite(&path.index(i), v))
}

/// Checks every row of a matrix matches the length of row 0 and returns that
/// length (0 for an empty matrix).
pub(crate) fn check_rectangular<T>(path: &FieldPath, rows: &[Vec<T>]) -> Result<usize> {
    let Some(first) = rows.first() else {
        return Ok(0);
    };
    let reference = path.index(0);
    for (i, row) in rows.iter().enumerate().skip(1) {
        check_same_size(&path.index(i), row.len(), &reference, first.len())?;
    }
    Ok(first.len())
}

/// Checks a matrix has the same shape as `reference_rows`, row by row.
pub(crate) fn check_same_shape<T, U>(
    path: &FieldPath,
    rows: &[Vec<T>],
    reference: &FieldPath,
    reference_rows: &[Vec<U>],
) -> Result<()> {
    check_same_size(path, rows.len(), reference, reference_rows.len())?;
    for (i, (row, reference_row)) in rows.iter().zip(reference_rows).enumerate() {
        check_same_size(
            &path.index(i),
            row.len(),
            &reference.index(i),
            reference_row.len(),
        )?;
    }
    Ok(())
}
