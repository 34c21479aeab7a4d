//! Scaled earnings metrics.
//!
//! All three metrics are expressed in cents per share. Nulls propagate: a
//! missing input yields a missing metric, never an error.

use exceed_traits::Metric;
use serde::{Deserialize, Serialize};

/// Scale from dollars to cents.
pub const CENTS_PER_DOLLAR: f64 = 100.0;

/// The three study metrics of one observation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EarningsMetrics {
    /// Reported EPS in cents.
    pub eps: Option<f64>,
    /// Actual minus consensus mean estimate, in cents.
    pub forecast_error: Option<f64>,
    /// Actual minus prior-year actual, in cents.
    pub change_in_eps: Option<f64>,
}

impl EarningsMetrics {
    /// Derive the metrics from the actual, the consensus mean estimate and
    /// the prior-year actual.
    ///
    /// # Examples
    ///
    /// ```
    /// use exceed_panel::EarningsMetrics;
    ///
    /// let m = EarningsMetrics::derive(Some(1.20), Some(1.10), None);
    /// assert_eq!(m.change_in_eps, None);
    /// assert!((m.forecast_error.unwrap() - 10.0).abs() < 1e-9);
    /// ```
    #[must_use]
    pub fn derive(
        actual: Option<f64>,
        mean_estimate: Option<f64>,
        prior_year_actual: Option<f64>,
    ) -> Self {
        Self {
            eps: actual.map(|a| a * CENTS_PER_DOLLAR),
            forecast_error: difference(actual, mean_estimate),
            change_in_eps: difference(actual, prior_year_actual),
        }
    }

    /// Value of one metric.
    #[must_use]
    pub const fn get(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Eps => self.eps,
            Metric::ForecastError => self.forecast_error,
            Metric::ChangeInEps => self.change_in_eps,
        }
    }

    /// Replace one metric.
    pub fn set(&mut self, metric: Metric, value: Option<f64>) {
        match metric {
            Metric::Eps => self.eps = value,
            Metric::ForecastError => self.forecast_error = value,
            Metric::ChangeInEps => self.change_in_eps = value,
        }
    }
}

fn difference(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    Some((a? - b?) * CENTS_PER_DOLLAR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_derive_all_present() {
        let m = EarningsMetrics::derive(Some(1.20), Some(1.25), Some(1.00));
        assert_relative_eq!(m.eps.unwrap(), 120.0, epsilon = 1e-9);
        assert_relative_eq!(m.forecast_error.unwrap(), -5.0, epsilon = 1e-9);
        assert_relative_eq!(m.change_in_eps.unwrap(), 20.0, epsilon = 1e-9);
    }

    #[test]
    fn test_change_in_eps_null_iff_prior_null() {
        let with_prior = EarningsMetrics::derive(Some(0.5), Some(0.5), Some(0.5));
        let without = EarningsMetrics::derive(Some(0.5), Some(0.5), None);
        assert_eq!(with_prior.change_in_eps, Some(0.0));
        assert_eq!(without.change_in_eps, None);
    }

    #[test]
    fn test_missing_actual_nulls_everything() {
        let m = EarningsMetrics::derive(None, Some(1.0), Some(1.0));
        assert_eq!(m, EarningsMetrics::default());
    }

    #[test]
    fn test_get_set() {
        let mut m = EarningsMetrics::default();
        m.set(Metric::ChangeInEps, Some(3.0));
        assert_eq!(m.get(Metric::ChangeInEps), Some(3.0));
        assert_eq!(m.get(Metric::Eps), None);
    }
}
