//! Row types flowing through the pipeline.

use crate::metrics::EarningsMetrics;
use chrono::Datelike;
use exceed_traits::{AnalysisTable, Date, FirmId, Metric, Result, columns, date_column};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// One row of the joined forecast and actuals panels.
///
/// Firm and fiscal-period end are not optional: rows missing either are
/// dropped by the joiner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinedObservation {
    /// Firm identifier.
    pub firm_id: FirmId,
    /// Statistics period shared by both input rows.
    pub statistics_period: Date,
    /// Fiscal-period end the figures refer to.
    pub fiscal_period_end: Date,
    /// Announcement date of the actual.
    pub announcement_date: Option<Date>,
    /// Share price.
    pub price: Option<f64>,
    /// Reported earnings per share.
    pub actual: Option<f64>,
    /// Consensus mean estimate.
    pub mean_estimate: Option<f64>,
    /// Consensus median estimate.
    pub median_estimate: Option<f64>,
    /// Number of estimates in the consensus.
    pub num_estimates: Option<u32>,
}

impl JoinedObservation {
    /// Calendar year of the announcement.
    pub fn year(&self) -> Option<i32> {
        self.announcement_date.map(|d| d.year())
    }
}

/// A joined observation with its prior-year actual and derived metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedObservation {
    /// The underlying joined row.
    pub joined: JoinedObservation,
    /// Actual of the same fiscal period one year earlier.
    pub prior_year_actual: Option<f64>,
    /// Raw metrics.
    pub metrics: EarningsMetrics,
    /// Winsorized metrics.
    pub winsorized: EarningsMetrics,
}

/// Convert enriched observations into the persisted table.
///
/// # Errors
///
/// Returns an error if polars cannot assemble the frame.
pub fn to_table(rows: &[EnrichedObservation]) -> Result<AnalysisTable> {
    let mut frame: Vec<Column> = vec![
        Column::new(
            columns::FIRM_ID.into(),
            rows.iter()
                .map(|r| r.joined.firm_id.as_str())
                .collect::<Vec<_>>(),
        ),
        date_column(
            columns::STATISTICS_PERIOD,
            rows.iter().map(|r| Some(r.joined.statistics_period)),
        )?,
        date_column(
            columns::FISCAL_PERIOD_END,
            rows.iter().map(|r| Some(r.joined.fiscal_period_end)),
        )?,
        date_column(
            columns::ANNOUNCEMENT_DATE,
            rows.iter().map(|r| r.joined.announcement_date),
        )?,
        Column::new(
            columns::YEAR.into(),
            rows.iter().map(|r| r.joined.year()).collect::<Vec<_>>(),
        ),
        float_column(columns::PRICE, rows, |r| r.joined.price),
        float_column(columns::ACTUAL, rows, |r| r.joined.actual),
        float_column(columns::MEAN_ESTIMATE, rows, |r| r.joined.mean_estimate),
        float_column(columns::PRIOR_YEAR_ACTUAL, rows, |r| r.prior_year_actual),
    ];
    for metric in Metric::ALL {
        frame.push(float_column(metric.column(), rows, |r| r.metrics.get(metric)));
        frame.push(float_column(metric.winsorized_column(), rows, |r| {
            r.winsorized.get(metric)
        }));
    }
    AnalysisTable::new(DataFrame::new(frame)?)
}

fn float_column(
    name: &str,
    rows: &[EnrichedObservation],
    value: impl Fn(&EnrichedObservation) -> Option<f64>,
) -> Column {
    Column::new(name.into(), rows.iter().map(value).collect::<Vec<_>>())
}
