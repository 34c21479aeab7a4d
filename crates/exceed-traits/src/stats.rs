//! Statistical helpers shared by the pipeline and the aggregator.
//!
//! Everything here ignores missing values: callers pass `Option<f64>`
//! columns and nulls (or non-finite values) are skipped rather than
//! poisoning the result.

use std::cmp::Ordering;

/// Collect the finite values of a nullable column, sorted ascending.
///
/// # Examples
///
/// ```
/// use exceed_traits::stats::sorted_finite;
///
/// let sorted = sorted_finite([Some(3.0), None, Some(1.0), Some(f64::NAN)]);
/// assert_eq!(sorted, vec![1.0, 3.0]);
/// ```
pub fn sorted_finite<I>(values: I) -> Vec<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    let mut out: Vec<f64> = values
        .into_iter()
        .flatten()
        .filter(|v| v.is_finite())
        .collect();
    out.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    out
}

/// Quantile of an ascending slice using linear interpolation.
///
/// The position is `q * (n - 1)`; the result interpolates between the two
/// neighbouring order statistics. Returns `None` for an empty slice.
///
/// # Examples
///
/// ```
/// use exceed_traits::stats::quantile_sorted;
///
/// let sorted = [1.0, 2.0, 3.0, 4.0];
/// assert_eq!(quantile_sorted(&sorted, 0.5), Some(2.5));
/// assert_eq!(quantile_sorted(&sorted, 0.25), Some(1.75));
/// ```
pub fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() || !q.is_finite() {
        return None;
    }
    let q = q.clamp(0.0, 1.0);
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    if lo == hi {
        return Some(sorted[lo]);
    }
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Median of an ascending slice.
pub fn median_sorted(sorted: &[f64]) -> Option<f64> {
    quantile_sorted(sorted, 0.5)
}

/// One-based ranks with ties sharing the average of their positions.
///
/// Non-finite inputs receive `None` and are not counted when ranking the
/// others.
///
/// # Examples
///
/// ```
/// use exceed_traits::stats::average_ranks;
///
/// let ranks = average_ranks(&[Some(10.0), Some(20.0), Some(20.0), Some(30.0)]);
/// assert_eq!(ranks, vec![Some(1.0), Some(2.5), Some(2.5), Some(4.0)]);
/// ```
pub fn average_ranks(values: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut indexed: Vec<(usize, f64)> = values
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.filter(|x| x.is_finite()).map(|x| (i, x)))
        .collect();

    indexed.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));

    let n = indexed.len();
    let mut ranks = vec![None; values.len()];
    let mut i = 0;

    while i < n {
        let mut j = i;
        // Find ties
        while j < n && indexed[j].1 == indexed[i].1 {
            j += 1;
        }

        // Positions i..j hold ranks i+1..=j
        let avg_rank = (i + 1 + j) as f64 / 2.0;
        for &(idx, _) in &indexed[i..j] {
            ranks[idx] = Some(avg_rank);
        }

        i = j;
    }

    ranks
}
