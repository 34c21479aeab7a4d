//! Raw export rows and the server-side predicate filter.
//!
//! Raw rows mirror the I/B/E/S column names and hold every cell as an
//! untyped string. [`RawForecastRow::into_record`] and
//! [`RawActualsRow::into_record`] coerce them into the typed records of
//! `exceed-traits`.

use crate::{IbesError, Result, coerce};
use exceed_traits::{ActualsSummary, ForecastSummary};
use serde::{Deserialize, Serialize};

/// Table name of the summary-statistics export in errors and logs.
pub const FORECAST_TABLE: &str = "statsum";

/// Table name of the actuals/pricing export in errors and logs.
pub const ACTUALS_TABLE: &str = "actpsum";

/// Columns the summary-statistics export must carry.
pub const FORECAST_REQUIRED_COLUMNS: &[&str] =
    &["ticker", "statpers", "fpedats", "meanest", "medest", "numest", "curcode"];

/// Columns the actuals/pricing export must carry.
pub const ACTUALS_REQUIRED_COLUMNS: &[&str] =
    &["ticker", "statpers", "actual", "anndats_act", "price", "curcode"];

/// One untyped row of the summary-statistics export.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawForecastRow {
    /// I/B/E/S ticker.
    pub ticker: Option<String>,
    /// Company name.
    pub cname: Option<String>,
    /// Statistics period.
    pub statpers: Option<String>,
    /// Measure code.
    pub measure: Option<String>,
    /// Forecast period indicator.
    pub fpi: Option<String>,
    /// Fiscal-period-end date.
    pub fpedats: Option<String>,
    /// Mean estimate.
    pub meanest: Option<String>,
    /// Median estimate.
    pub medest: Option<String>,
    /// Standard deviation of estimates.
    pub stdev: Option<String>,
    /// Number of estimates.
    pub numest: Option<String>,
    /// Number of upward revisions.
    pub numup: Option<String>,
    /// Number of downward revisions.
    pub numdown: Option<String>,
    /// Highest estimate.
    pub highest: Option<String>,
    /// Lowest estimate.
    pub lowest: Option<String>,
    /// Currency code.
    pub curcode: Option<String>,
}

/// One untyped row of the actuals/pricing export.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawActualsRow {
    /// I/B/E/S ticker.
    pub ticker: Option<String>,
    /// Statistics period.
    pub statpers: Option<String>,
    /// Measure code.
    pub measure: Option<String>,
    /// Reported earnings per share.
    pub actual: Option<String>,
    /// Announcement date.
    pub anndats_act: Option<String>,
    /// Announcement time.
    pub anntims_act: Option<String>,
    /// Share price.
    pub price: Option<String>,
    /// Currency code.
    pub curcode: Option<String>,
}

/// The fixed predicates the data source applies server-side.
///
/// Re-applied locally so staged exports obey the same contract as a live
/// query. A predicate column absent from the export does not filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceFilter {
    /// Required currency code.
    pub currency: String,
    /// Required forecast period indicator (`6` = next fiscal quarter).
    pub forecast_period_indicator: String,
    /// Required measure code.
    pub measure: String,
}

impl Default for SourceFilter {
    fn default() -> Self {
        Self {
            currency: "USD".to_string(),
            forecast_period_indicator: "6".to_string(),
            measure: "EPS".to_string(),
        }
    }
}

impl SourceFilter {
    /// Whether a summary-statistics row passes the predicates.
    pub fn accepts_forecast(&self, row: &RawForecastRow) -> bool {
        matches_if_present(row.curcode.as_deref(), &self.currency)
            && matches_if_present(row.fpi.as_deref(), &self.forecast_period_indicator)
            && matches_if_present(row.measure.as_deref(), &self.measure)
            && present(row.ticker.as_deref())
            && present(row.statpers.as_deref())
            && present(row.meanest.as_deref())
            && present(row.medest.as_deref())
    }

    /// Whether an actuals/pricing row passes the predicates.
    pub fn accepts_actuals(&self, row: &RawActualsRow) -> bool {
        matches_if_present(row.curcode.as_deref(), &self.currency)
            && matches_if_present(row.measure.as_deref(), &self.measure)
            && present(row.ticker.as_deref())
            && present(row.statpers.as_deref())
            && present(row.actual.as_deref())
            && present(row.anndats_act.as_deref())
            && present(row.price.as_deref())
    }
}

fn present(cell: Option<&str>) -> bool {
    cell.is_some_and(|c| !coerce::is_null(c))
}

fn matches_if_present(cell: Option<&str>, expected: &str) -> bool {
    match cell {
        Some(c) if !coerce::is_null(c) => c.trim() == expected,
        _ => true,
    }
}

/// Coerces the cells of one data row, reporting failures with their position.
struct Cells {
    table: &'static str,
    row: usize,
}

impl Cells {
    fn parse<T>(
        &self,
        column: &'static str,
        cell: Option<String>,
        expected: &'static str,
        parser: impl Fn(&str) -> Option<T>,
    ) -> Result<Option<T>> {
        match cell {
            Some(raw) if !coerce::is_null(&raw) => {
                parser(&raw).map(Some).ok_or_else(|| IbesError::Parse {
                    table: self.table,
                    row: self.row,
                    column,
                    value: raw,
                    expected,
                })
            }
            _ => Ok(None),
        }
    }

    fn text(cell: Option<String>) -> Option<String> {
        cell.filter(|c| !coerce::is_null(c))
            .map(|c| c.trim().to_string())
    }
}

impl RawForecastRow {
    /// Coerce the row into a typed record.
    ///
    /// `row` is the one-based data row number used in error messages.
    ///
    /// # Errors
    ///
    /// Returns [`IbesError::Parse`] if a non-null cell cannot be coerced.
    pub fn into_record(self, row: usize) -> Result<ForecastSummary> {
        let cells = Cells {
            table: FORECAST_TABLE,
            row,
        };
        Ok(ForecastSummary {
            ticker: Cells::text(self.ticker),
            statistics_period: cells.parse("statpers", self.statpers, "date", coerce::parse_date)?,
            fiscal_period_end: cells.parse("fpedats", self.fpedats, "date", coerce::parse_date)?,
            mean_estimate: cells.parse("meanest", self.meanest, "number", coerce::parse_f64)?,
            median_estimate: cells.parse("medest", self.medest, "number", coerce::parse_f64)?,
            std_dev: cells.parse("stdev", self.stdev, "number", coerce::parse_f64)?,
            num_estimates: cells.parse("numest", self.numest, "count", coerce::parse_count)?,
            num_up: cells.parse("numup", self.numup, "count", coerce::parse_count)?,
            num_down: cells.parse("numdown", self.numdown, "count", coerce::parse_count)?,
            highest: cells.parse("highest", self.highest, "number", coerce::parse_f64)?,
            lowest: cells.parse("lowest", self.lowest, "number", coerce::parse_f64)?,
            currency: Cells::text(self.curcode),
        })
    }
}

impl RawActualsRow {
    /// Coerce the row into a typed record.
    ///
    /// `row` is the one-based data row number used in error messages.
    ///
    /// # Errors
    ///
    /// Returns [`IbesError::Parse`] if a non-null cell cannot be coerced.
    pub fn into_record(self, row: usize) -> Result<ActualsSummary> {
        let cells = Cells {
            table: ACTUALS_TABLE,
            row,
        };
        Ok(ActualsSummary {
            ticker: Cells::text(self.ticker),
            statistics_period: cells.parse("statpers", self.statpers, "date", coerce::parse_date)?,
            actual: cells.parse("actual", self.actual, "number", coerce::parse_f64)?,
            announcement_date: cells.parse(
                "anndats_act",
                self.anndats_act,
                "date",
                coerce::parse_date,
            )?,
            announcement_time: cells.parse(
                "anntims_act",
                self.anntims_act,
                "time",
                coerce::parse_time,
            )?,
            price: cells.parse("price", self.price, "number", coerce::parse_f64)?,
            currency: Cells::text(self.curcode),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn forecast_row() -> RawForecastRow {
        RawForecastRow {
            ticker: Some("ABC".to_string()),
            statpers: Some("2021-03-18".to_string()),
            fpi: Some("6".to_string()),
            measure: Some("EPS".to_string()),
            fpedats: Some("20210330".to_string()),
            meanest: Some("1.10".to_string()),
            medest: Some("1.12".to_string()),
            numest: Some("7.0".to_string()),
            curcode: Some("USD".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_forecast_row_into_record() {
        let record = forecast_row().into_record(1).unwrap();
        assert_eq!(record.ticker.as_deref(), Some("ABC"));
        assert_eq!(record.fiscal_period_end, NaiveDate::from_ymd_opt(2021, 3, 30));
        assert_eq!(record.num_estimates, Some(7));
        assert_eq!(record.std_dev, None);
    }

    #[test]
    fn test_forecast_row_bad_cell_reports_position() {
        let row = RawForecastRow {
            meanest: Some("n/a?".to_string()),
            ..forecast_row()
        };
        let err = row.into_record(4).unwrap_err();
        assert!(matches!(
            err,
            IbesError::Parse { row: 4, column: "meanest", .. }
        ));
    }

    #[test]
    fn test_filter_rejects_other_currency_and_fpi() {
        let filter = SourceFilter::default();
        assert!(filter.accepts_forecast(&forecast_row()));

        let cad = RawForecastRow {
            curcode: Some("CAD".to_string()),
            ..forecast_row()
        };
        assert!(!filter.accepts_forecast(&cad));

        let annual = RawForecastRow {
            fpi: Some("1".to_string()),
            ..forecast_row()
        };
        assert!(!filter.accepts_forecast(&annual));
    }

    #[test]
    fn test_filter_requires_keys_and_estimates() {
        let filter = SourceFilter::default();
        let no_mean = RawForecastRow {
            meanest: Some("NA".to_string()),
            ..forecast_row()
        };
        assert!(!filter.accepts_forecast(&no_mean));

        let no_fpi_column = RawForecastRow {
            fpi: None,
            measure: None,
            ..forecast_row()
        };
        assert!(filter.accepts_forecast(&no_fpi_column));
    }

    #[test]
    fn test_actuals_row_into_record() {
        let row = RawActualsRow {
            ticker: Some(" XYZ ".to_string()),
            statpers: Some("1990-06-14".to_string()),
            actual: Some("0.5".to_string()),
            anndats_act: Some("647308800".to_string()),
            anntims_act: Some("57600".to_string()),
            price: Some("30.25".to_string()),
            curcode: Some("USD".to_string()),
            ..Default::default()
        };
        assert!(SourceFilter::default().accepts_actuals(&row));
        let record = row.into_record(1).unwrap();
        assert_eq!(record.ticker.as_deref(), Some("XYZ"));
        assert_eq!(record.announcement_date, NaiveDate::from_ymd_opt(1990, 7, 7));
        assert_eq!(
            record.announcement_time,
            chrono::NaiveTime::from_hms_opt(16, 0, 0)
        );
        assert_eq!(record.price, Some(30.25));
    }
}
