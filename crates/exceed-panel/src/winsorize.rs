//! Two-sided winsorization.
//!
//! Values in the lower and upper tails are clamped to the nearest retained
//! order statistic. With `n` finite values, `floor(lower * n)` values are
//! raised to the `(floor(lower * n) + 1)`-th smallest and `floor(upper * n)`
//! values are lowered to the `(n - floor(upper * n))`-th smallest. Nulls are
//! ignored when choosing the bounds and stay null.

use exceed_traits::{ExceedError, Result, stats::sorted_finite};
use serde::{Deserialize, Serialize};

/// Fractions of the sample clipped from each tail.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WinsorLimits {
    /// Fraction clipped from the bottom.
    pub lower: f64,
    /// Fraction clipped from the top.
    pub upper: f64,
}

impl Default for WinsorLimits {
    fn default() -> Self {
        Self::symmetric(0.01)
    }
}

impl WinsorLimits {
    /// Same fraction on both tails.
    #[must_use]
    pub const fn symmetric(limit: f64) -> Self {
        Self {
            lower: limit,
            upper: limit,
        }
    }

    /// Check both limits lie in `[0, 0.5)`.
    ///
    /// # Errors
    ///
    /// Returns [`ExceedError::InvalidConfig`] for a limit outside the range.
    pub fn validate(&self) -> Result<()> {
        for (side, limit) in [("lower", self.lower), ("upper", self.upper)] {
            if !(0.0..0.5).contains(&limit) {
                return Err(ExceedError::InvalidConfig(format!(
                    "{side} winsor limit {limit} is outside [0, 0.5)"
                )));
            }
        }
        Ok(())
    }
}

/// Clamp thresholds computed from a sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WinsorBounds {
    /// Values below are raised to this.
    pub lower: f64,
    /// Values above are lowered to this.
    pub upper: f64,
}

impl WinsorBounds {
    /// Compute the bounds of a nullable sample.
    ///
    /// Returns `None` when the sample holds no finite values. Limits are
    /// expected to be validated.
    pub fn from_sample(values: &[Option<f64>], limits: &WinsorLimits) -> Option<Self> {
        let sorted = sorted_finite(values.iter().copied());
        let n = sorted.len();
        if n == 0 {
            return None;
        }
        let k_lo = ((limits.lower * n as f64).floor() as usize).min(n - 1);
        let k_hi = ((limits.upper * n as f64).floor() as usize).min(n - 1 - k_lo);
        Some(Self {
            lower: sorted[k_lo],
            upper: sorted[n - 1 - k_hi],
        })
    }

    /// Clamp one value. Non-finite values pass through.
    #[must_use]
    pub fn apply(&self, value: f64) -> f64 {
        if value.is_finite() {
            value.clamp(self.lower, self.upper)
        } else {
            value
        }
    }
}

/// Winsorize a nullable sample.
///
/// Returns the clamped values, aligned with the input, and the bounds used.
///
/// # Examples
///
/// ```
/// use exceed_panel::{WinsorLimits, winsorize};
///
/// let values = [-50.0, 1.0, 2.0, 3.0, 4.0, 5.0, 100.0].map(Some);
/// let (clamped, _) = winsorize(&values, &WinsorLimits::symmetric(0.15));
/// let clamped: Vec<f64> = clamped.into_iter().flatten().collect();
/// assert_eq!(clamped, vec![1.0, 1.0, 2.0, 3.0, 4.0, 5.0, 5.0]);
/// ```
pub fn winsorize(
    values: &[Option<f64>],
    limits: &WinsorLimits,
) -> (Vec<Option<f64>>, Option<WinsorBounds>) {
    let Some(bounds) = WinsorBounds::from_sample(values, limits) else {
        return (values.to_vec(), None);
    };
    let clamped = values.iter().map(|v| v.map(|v| bounds.apply(v))).collect();
    (clamped, Some(bounds))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_clips_one_value_per_tail() {
        let values = [-50.0, 1.0, 2.0, 3.0, 4.0, 5.0, 100.0].map(Some);
        let (clamped, bounds) = winsorize(&values, &WinsorLimits::symmetric(0.15));
        assert_eq!(
            clamped,
            [1.0, 1.0, 2.0, 3.0, 4.0, 5.0, 5.0].map(Some).to_vec()
        );
        assert_eq!(
            bounds,
            Some(WinsorBounds {
                lower: 1.0,
                upper: 5.0
            })
        );
    }

    #[test]
    fn test_nulls_ignored_and_preserved() {
        let values = [
            None,
            Some(-50.0),
            Some(1.0),
            None,
            Some(2.0),
            Some(3.0),
            Some(4.0),
            Some(5.0),
            Some(100.0),
        ];
        let (clamped, _) = winsorize(&values, &WinsorLimits::symmetric(0.15));
        assert_eq!(clamped[0], None);
        assert_eq!(clamped[3], None);
        assert_eq!(clamped[1], Some(1.0));
        assert_eq!(clamped[8], Some(5.0));
    }

    #[test]
    fn test_is_projection() {
        let values: Vec<Option<f64>> = (0..200)
            .map(|i| Some(((i * 37) % 200) as f64 - 100.0))
            .collect();
        let limits = WinsorLimits::default();
        let (clamped, bounds) = winsorize(&values, &limits);
        let bounds = bounds.unwrap();
        for (before, after) in values.iter().zip(&clamped) {
            let (before, after) = (before.unwrap(), after.unwrap());
            assert!(after >= bounds.lower && after <= bounds.upper);
            if before >= bounds.lower && before <= bounds.upper {
                assert_eq!(before, after);
            }
        }
        // 1% of 200 is two values per tail.
        assert_eq!(bounds.lower, -98.0);
        assert_eq!(bounds.upper, 97.0);
    }

    #[rstest]
    #[case(0.0, 0.0, 1.0, 10.0)]
    #[case(0.1, 0.0, 2.0, 10.0)]
    #[case(0.0, 0.2, 1.0, 8.0)]
    #[case(0.25, 0.25, 3.0, 8.0)]
    fn test_asymmetric_limits(
        #[case] lower: f64,
        #[case] upper: f64,
        #[case] lo: f64,
        #[case] hi: f64,
    ) {
        let values: Vec<Option<f64>> = (1..=10).map(|v| Some(f64::from(v))).collect();
        let bounds = WinsorBounds::from_sample(&values, &WinsorLimits { lower, upper }).unwrap();
        assert_eq!(bounds.lower, lo);
        assert_eq!(bounds.upper, hi);
    }

    #[test]
    fn test_all_null_sample_unchanged() {
        let values = [None, None];
        let (clamped, bounds) = winsorize(&values, &WinsorLimits::default());
        assert_eq!(clamped, vec![None, None]);
        assert_eq!(bounds, None);
    }

    #[test]
    fn test_single_value() {
        let (clamped, bounds) = winsorize(&[Some(7.0)], &WinsorLimits::symmetric(0.4));
        assert_eq!(clamped, vec![Some(7.0)]);
        assert_eq!(bounds.map(|b| (b.lower, b.upper)), Some((7.0, 7.0)));
    }

    #[rstest]
    #[case(-0.01, 0.01)]
    #[case(0.01, 0.5)]
    #[case(f64::NAN, 0.01)]
    fn test_validate_rejects(#[case] lower: f64, #[case] upper: f64) {
        assert!(WinsorLimits { lower, upper }.validate().is_err());
    }

    #[test]
    fn test_validate_accepts_default() {
        assert!(WinsorLimits::default().validate().is_ok());
        assert!(WinsorLimits::symmetric(0.0).validate().is_ok());
    }
}
