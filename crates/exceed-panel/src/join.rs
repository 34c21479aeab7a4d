//! Panel joiner.
//!
//! Inner-joins the forecast and actuals summaries on (firm, statistics
//! period), drops rows that cannot be keyed downstream and keeps a single
//! row per (firm, announcement date).

use crate::observation::JoinedObservation;
use exceed_traits::{ActualsSummary, Date, ForecastSummary};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, info};

/// Row counts observed while joining.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct JoinStats {
    /// Forecast-summary rows received.
    pub forecast_rows: usize,
    /// Actuals-summary rows received.
    pub actuals_rows: usize,
    /// Rows produced by the inner join.
    pub matched: usize,
    /// Joined rows dropped for a missing fiscal-period end.
    pub missing_keys: usize,
    /// Rows removed by deduplication.
    pub duplicates: usize,
}

/// Joined observations with the counts that produced them.
#[derive(Debug, Clone, Default)]
pub struct JoinOutput {
    /// Observations sorted by (firm, fiscal-period end).
    pub observations: Vec<JoinedObservation>,
    /// Stage counts.
    pub stats: JoinStats,
}

/// Join the two summary panels.
///
/// Rows without a partner on the other side are dropped silently, as are
/// joined rows without a fiscal-period end. Duplicates on (firm,
/// announcement date) are resolved by keeping the last row after sorting by
/// (firm, statistics period, announcement date).
pub fn join_panels(forecasts: &[ForecastSummary], actuals: &[ActualsSummary]) -> JoinOutput {
    let mut by_key: HashMap<(&str, Date), Vec<&ActualsSummary>> = HashMap::new();
    for row in actuals {
        if let (Some(ticker), Some(period)) = (row.ticker.as_deref(), row.statistics_period) {
            by_key.entry((ticker, period)).or_default().push(row);
        }
    }

    let mut matched = 0usize;
    let mut missing_keys = 0usize;
    let mut joined = Vec::new();
    for forecast in forecasts {
        let (Some(ticker), Some(period)) = (forecast.ticker.as_deref(), forecast.statistics_period)
        else {
            continue;
        };
        let Some(partners) = by_key.get(&(ticker, period)) else {
            continue;
        };
        for actual in partners {
            matched += 1;
            let Some(fiscal_period_end) = forecast.fiscal_period_end else {
                missing_keys += 1;
                continue;
            };
            joined.push(JoinedObservation {
                firm_id: ticker.to_string(),
                statistics_period: period,
                fiscal_period_end,
                announcement_date: actual.announcement_date,
                price: actual.price,
                actual: actual.actual,
                mean_estimate: forecast.mean_estimate,
                median_estimate: forecast.median_estimate,
                num_estimates: forecast.num_estimates,
            });
        }
    }
    debug!(matched, missing_keys, "joined summary panels");

    let before = joined.len();
    let mut observations = dedup_announcements(joined);
    let duplicates = before - observations.len();
    observations.sort_by(|a, b| {
        a.firm_id
            .cmp(&b.firm_id)
            .then(a.fiscal_period_end.cmp(&b.fiscal_period_end))
    });

    let stats = JoinStats {
        forecast_rows: forecasts.len(),
        actuals_rows: actuals.len(),
        matched,
        missing_keys,
        duplicates,
    };
    info!(
        rows = observations.len(),
        matched, missing_keys, duplicates, "panel join complete"
    );
    JoinOutput {
        observations,
        stats,
    }
}

/// Keep one row per (firm, announcement date).
///
/// Rows are stably sorted by (firm, statistics period, announcement date)
/// and the last row of each key survives. The result stays in that order,
/// so applying this twice is the same as applying it once.
pub fn dedup_announcements(mut rows: Vec<JoinedObservation>) -> Vec<JoinedObservation> {
    rows.sort_by(|a, b| {
        a.firm_id
            .cmp(&b.firm_id)
            .then(a.statistics_period.cmp(&b.statistics_period))
            .then(a.announcement_date.cmp(&b.announcement_date))
    });

    let mut last: HashMap<(&str, Option<Date>), usize> = HashMap::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        last.insert((row.firm_id.as_str(), row.announcement_date), i);
    }
    let keep: Vec<bool> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| last.get(&(row.firm_id.as_str(), row.announcement_date)) == Some(&i))
        .collect();

    rows.into_iter()
        .zip(keep)
        .filter_map(|(row, keep)| keep.then_some(row))
        .collect()
}
