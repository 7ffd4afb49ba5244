//! Stacking of parallel series.
//!
//! Series are stacked per category index in input order, the first series
//! nearest the baseline. `Raw` stacks positive values upward and negative
//! values downward from zero; `Percent` and `Fraction` first rescale every
//! column to sum to 100 or 1.

use crate::error::Result;
use crate::validate::{check_non_negative, check_same_size, FieldPath};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How series are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "snake_case"))]
pub enum StackingMode {
    /// Cumulative sums of the values as given.
    Raw,
    /// Columns rescaled to sum to 100.
    Percent,
    /// Columns rescaled to sum to 1.
    Fraction,
}

impl StackingMode {
    /// Column total after rescaling, if any.
    #[must_use]
    pub const fn total(self) -> Option<f64> {
        match self {
            Self::Raw => None,
            Self::Percent => Some(100.0),
            Self::Fraction => Some(1.0),
        }
    }
}

/// Lower and upper edge of every stacked segment, indexed `[series][column]`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Stack {
    /// Segment starts.
    pub lower: Vec<Vec<f64>>,
    /// Segment ends.
    pub upper: Vec<Vec<f64>>,
}

/// Checks that `series` can be stacked with `mode`.
///
/// `path` addresses the matrix; elements are `path[i,j]`.
///
/// # Errors
///
/// Fails when a series differs in length from the first one, or on negative
/// values for `Percent` and `Fraction`.
pub fn check_stackable(path: &FieldPath, mode: StackingMode, series: &[Vec<f64>]) -> Result<()> {
    let Some(first) = series.first() else {
        return Ok(());
    };
    for (i, values) in series.iter().enumerate().skip(1) {
        check_same_size(&path.index(i), values.len(), &path.index(0), first.len())?;
    }
    if mode.total().is_some() {
        for (i, values) in series.iter().enumerate() {
            for (j, &value) in values.iter().enumerate() {
                check_non_negative(&path.index2(i, j), value)?;
            }
        }
    }
    Ok(())
}

/// Stacks already-checked series.
#[must_use]
pub fn stack(mode: StackingMode, series: &[Vec<f64>]) -> Stack {
    let columns = series.first().map_or(0, Vec::len);
    let scaled: Vec<Vec<f64>> = match mode.total() {
        None => series.to_vec(),
        Some(total) => {
            let sums: Vec<f64> = (0..columns)
                .map(|j| series.iter().filter_map(|values| values.get(j)).sum())
                .collect();
            series
                .iter()
                .map(|values| {
                    values
                        .iter()
                        .zip(&sums)
                        .map(|(&value, &sum)| if sum > 0.0 { value / sum * total } else { 0.0 })
                        .collect()
                })
                .collect()
        }
    };

    let mut positive = vec![0.0; columns];
    let mut negative = vec![0.0; columns];
    let mut result = Stack::default();
    for values in &scaled {
        let mut lower = Vec::with_capacity(columns);
        let mut upper = Vec::with_capacity(columns);
        for (j, &value) in values.iter().take(columns).enumerate() {
            let top = if value < 0.0 { &mut negative[j] } else { &mut positive[j] };
            lower.push(*top);
            *top += value;
            upper.push(*top);
        }
        result.lower.push(lower);
        result.upper.push(upper);
    }
    tracing::trace!(?mode, series = series.len(), columns, "stacked series");
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn path() -> FieldPath {
        FieldPath::root("data").field("values")
    }

    #[test]
    fn test_raw_stack() {
        let stack = stack(StackingMode::Raw, &[vec![1.0, 2.0], vec![3.0, 4.0]]);
        assert_eq!(stack.lower, vec![vec![0.0, 0.0], vec![1.0, 2.0]]);
        assert_eq!(stack.upper, vec![vec![1.0, 2.0], vec![4.0, 6.0]]);
    }

    #[test]
    fn test_raw_negative_values_stack_down() {
        let stack = stack(StackingMode::Raw, &[vec![2.0], vec![-1.0], vec![3.0], vec![-2.0]]);
        let segments: Vec<(f64, f64)> =
            stack.lower.iter().zip(&stack.upper).map(|(l, u)| (l[0], u[0])).collect();
        assert_eq!(segments, vec![(0.0, 2.0), (0.0, -1.0), (2.0, 5.0), (-1.0, -3.0)]);
    }

    #[test]
    fn test_percent_columns_sum_to_100() {
        let stack = stack(StackingMode::Percent, &[vec![1.0, 0.0], vec![3.0, 2.0]]);
        assert_relative_eq!(stack.upper[1][0], 100.0);
        assert_relative_eq!(stack.upper[0][0], 25.0);
        assert_relative_eq!(stack.upper[1][1], 100.0);
    }

    #[test]
    fn test_fraction_zero_column_stays_zero() {
        let stack = stack(StackingMode::Fraction, &[vec![0.0, 1.0], vec![0.0, 1.0]]);
        assert_eq!(stack.upper[1][0], 0.0);
        assert_relative_eq!(stack.upper[1][1], 1.0);
    }

    #[test]
    fn test_check_lengths() {
        let err = check_stackable(&path(), StackingMode::Raw, &[vec![0.0, 1.0, 2.0], vec![0.0, 1.0, 2.0, 3.0]])
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "inconsistent size of data.values[1]: 4\nexpected size (from data.values[0]): 3"
        );
    }

    #[test]
    fn test_check_percent_rejects_negative() {
        let err = check_stackable(&path(), StackingMode::Percent, &[vec![1.0], vec![-1.0]]).unwrap_err();
        assert_eq!(err.to_string(), "negative data.values[1,0]: -1");
        assert!(check_stackable(&path(), StackingMode::Raw, &[vec![1.0], vec![-1.0]]).is_ok());
    }

    #[test]
    fn test_empty() {
        assert_eq!(stack(StackingMode::Raw, &[]), Stack::default());
        assert!(check_stackable(&path(), StackingMode::Percent, &[]).is_ok());
    }
}
