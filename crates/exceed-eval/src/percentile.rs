//! Price percentile ranking.
//!
//! Observations are ranked by price with ties sharing their average rank,
//! the rank is expressed as a percentage of the ranked sample and rounded
//! to a whole-number bucket between 0 and 100.

use exceed_traits::stats::average_ranks;

/// A whole-number percentile bucket, `0..=100`.
pub type Bucket = u8;

/// Fractional percentile ranks in `(0, 100]`.
///
/// # Arguments
///
/// * `prices` - Ranking covariate; nulls are not ranked
///
/// # Returns
///
/// Ranks aligned with `prices`, `None` where the price is missing.
///
/// # Example
///
/// ```
/// use exceed_eval::percentile_ranks;
///
/// let ranks = percentile_ranks(&[Some(10.0), Some(20.0), Some(20.0), Some(30.0)]);
/// assert_eq!(ranks, vec![Some(25.0), Some(62.5), Some(62.5), Some(100.0)]);
/// ```
pub fn percentile_ranks(prices: &[Option<f64>]) -> Vec<Option<f64>> {
    let ranks = average_ranks(prices);
    let n = ranks.iter().flatten().count();
    if n == 0 {
        return ranks;
    }
    ranks
        .into_iter()
        .map(|r| r.map(|r| r / n as f64 * 100.0))
        .collect()
}

/// Round a fractional percentile rank to its bucket.
///
/// Halves round to even, so 62.5 falls in bucket 62.
#[must_use]
pub fn bucket_of(rank: f64) -> Bucket {
    rank.round_ties_even().clamp(0.0, 100.0) as Bucket
}

/// Percentile bucket of every observation.
///
/// Rows with a missing price receive no bucket.
pub fn percentile_buckets(prices: &[Option<f64>]) -> Vec<Option<Bucket>> {
    percentile_ranks(prices)
        .into_iter()
        .map(|r| r.map(bucket_of))
        .collect()
}
