//! Trailing-year resolver.
//!
//! For every observation, looks back through the firm's own preceding
//! fiscal periods for the one ending roughly a year earlier and takes its
//! actual as the prior-year EPS. Fiscal calendars drift, so the match uses
//! a day window rather than an exact anniversary.

use crate::observation::JoinedObservation;
use exceed_traits::{ExceedError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Window and depth of the trailing-year lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrailingYearConfig {
    /// Smallest accepted gap between fiscal-period ends, in days (inclusive).
    pub min_days: i64,
    /// Largest accepted gap, in days (exclusive).
    pub max_days: i64,
    /// How many preceding periods of the same firm to examine.
    pub max_lag: usize,
}

impl Default for TrailingYearConfig {
    fn default() -> Self {
        Self {
            min_days: 355,
            max_days: 375,
            max_lag: 4,
        }
    }
}

impl TrailingYearConfig {
    /// Check the window is non-empty and at least one lag is examined.
    ///
    /// # Errors
    ///
    /// Returns [`ExceedError::InvalidConfig`] otherwise.
    pub fn validate(&self) -> Result<()> {
        if self.min_days >= self.max_days {
            return Err(ExceedError::InvalidConfig(format!(
                "trailing window [{}, {}) is empty",
                self.min_days, self.max_days
            )));
        }
        if self.max_lag == 0 {
            return Err(ExceedError::InvalidConfig(
                "trailing max_lag must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Whether a gap in days falls inside the window.
    #[must_use]
    pub const fn accepts(&self, days: i64) -> bool {
        self.min_days <= days && days < self.max_days
    }
}

/// The candidate accepted as prior year for one observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrailingMatch {
    /// Rank distance within the firm's sequence (1 = immediately preceding).
    pub lag: usize,
    /// Days between the two fiscal-period ends.
    pub days: i64,
    /// The candidate's actual.
    pub actual: f64,
}

/// Resolve the prior-year actual of every observation.
///
/// Firms are handled independently. Within a firm, observations are ordered
/// by fiscal-period end and, for each one, offsets `1..=max_lag` are scanned
/// in increasing order. The first candidate whose gap falls inside the
/// window and whose actual is present wins. The result is aligned with
/// `observations`.
pub fn resolve_prior_year(
    observations: &[JoinedObservation],
    config: &TrailingYearConfig,
) -> Vec<Option<TrailingMatch>> {
    let mut resolved = vec![None; observations.len()];
    for sequence in firm_sequences(observations) {
        for (k, &target) in sequence.iter().enumerate() {
            let current = &observations[target];
            resolved[target] = (1..=config.max_lag.min(k)).find_map(|lag| {
                let candidate = &observations[sequence[k - lag]];
                let days = (current.fiscal_period_end - candidate.fiscal_period_end).num_days();
                if !config.accepts(days) {
                    return None;
                }
                candidate
                    .actual
                    .map(|actual| TrailingMatch { lag, days, actual })
            });
        }
    }
    resolved
}

/// Indices of each firm's observations, ordered by fiscal-period end.
fn firm_sequences(observations: &[JoinedObservation]) -> Vec<Vec<usize>> {
    let mut firms: HashMap<&str, usize> = HashMap::new();
    let mut sequences: Vec<Vec<usize>> = Vec::new();
    for (i, row) in observations.iter().enumerate() {
        let slot = *firms.entry(row.firm_id.as_str()).or_insert_with(|| {
            sequences.push(Vec::new());
            sequences.len() - 1
        });
        sequences[slot].push(i);
    }
    for sequence in &mut sequences {
        sequence.sort_by_key(|&i| observations[i].fiscal_period_end);
    }
    sequences
}
