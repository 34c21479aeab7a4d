//! Clipped samples and one-cent histograms.

use serde::Serialize;

/// Histogram samples keep values within `[-CLIP_CENTS, CLIP_CENTS]`.
pub const CLIP_CENTS: f64 = 20.0;

/// Drop nulls and values outside `[-CLIP_CENTS, CLIP_CENTS]`.
///
/// Bounds are inclusive, so exactly zero and exactly ±20 cents survive.
pub fn clip_sample<I>(values: I) -> Vec<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    values
        .into_iter()
        .flatten()
        .filter(|v| (-CLIP_CENTS..=CLIP_CENTS).contains(v))
        .collect()
}

/// Equal-width histogram.
///
/// Bins are half-open `[lo, lo + width)` except the last, which is closed
/// so the upper edge is counted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    /// Left edge of the first bin.
    pub start: f64,
    /// Bin width.
    pub width: f64,
    /// Count per bin.
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Bin `values` into `bins` bins of `width` starting at `start`.
    ///
    /// Values outside the covered range are ignored.
    #[must_use]
    pub fn new(values: &[f64], start: f64, width: f64, bins: usize) -> Self {
        let mut counts = vec![0; bins];
        let end = start + width * bins as f64;
        for &v in values {
            if !(start..=end).contains(&v) || bins == 0 {
                continue;
            }
            let idx = (((v - start) / width).floor() as usize).min(bins - 1);
            counts[idx] += 1;
        }
        Self {
            start,
            width,
            counts,
        }
    }

    /// One-cent bins from −20 to +20 cents.
    ///
    /// # Example
    ///
    /// ```
    /// use exceed_eval::Histogram;
    ///
    /// let h = Histogram::one_cent(&[-20.0, -0.5, 0.0, 0.0, 19.5, 20.0]);
    /// assert_eq!(h.counts.len(), 40);
    /// assert_eq!(h.counts[0], 1);
    /// assert_eq!(h.counts[19], 1);
    /// assert_eq!(h.counts[20], 2);
    /// assert_eq!(h.counts[39], 2);
    /// ```
    #[must_use]
    pub fn one_cent(values: &[f64]) -> Self {
        Self::new(values, -CLIP_CENTS, 1.0, (2.0 * CLIP_CENTS) as usize)
    }

    /// Total count.
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// `(left edge, count)` of each bin.
    pub fn bins(&self) -> impl Iterator<Item = (f64, usize)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .map(|(i, &c)| (self.start + self.width * i as f64, c))
    }

    /// Bin with the highest count, first on ties.
    pub fn mode(&self) -> Option<(f64, usize)> {
        self.bins()
            .fold(None, |best: Option<(f64, usize)>, (edge, count)| match best {
                Some((_, c)) if c >= count => best,
                _ => Some((edge, count)),
            })
    }
}
