//! Typed summary records delivered by a panel data source.
//!
//! Both tables are keyed by `(ticker, statistics_period)`. Every field is
//! optional: the source is only trusted to honour its server-side
//! predicates, and rows missing a key are dropped later by the joiner.

use crate::types::{Date, FirmId};
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// One consensus-forecast snapshot for a firm.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastSummary {
    /// Firm identifier.
    pub ticker: Option<FirmId>,
    /// Date on which the consensus was compiled.
    pub statistics_period: Option<Date>,
    /// End of the fiscal period the forecast refers to.
    pub fiscal_period_end: Option<Date>,
    /// Consensus mean estimate.
    pub mean_estimate: Option<f64>,
    /// Consensus median estimate.
    pub median_estimate: Option<f64>,
    /// Standard deviation of the estimates.
    pub std_dev: Option<f64>,
    /// Number of contributing estimates.
    pub num_estimates: Option<u32>,
    /// Number of upward revisions.
    pub num_up: Option<u32>,
    /// Number of downward revisions.
    pub num_down: Option<u32>,
    /// Highest estimate.
    pub highest: Option<f64>,
    /// Lowest estimate.
    pub lowest: Option<f64>,
    /// Currency code of the estimates.
    pub currency: Option<String>,
}

/// Realised earnings and pricing for a firm at a statistics period.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActualsSummary {
    /// Firm identifier.
    pub ticker: Option<FirmId>,
    /// Statistics period the row belongs to.
    pub statistics_period: Option<Date>,
    /// Reported earnings per share.
    pub actual: Option<f64>,
    /// Date the actual was announced.
    pub announcement_date: Option<Date>,
    /// Wall-clock time of the announcement.
    pub announcement_time: Option<NaiveTime>,
    /// Share price.
    pub price: Option<f64>,
    /// Currency code of the price.
    pub currency: Option<String>,
}
