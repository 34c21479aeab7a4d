//! Common types used throughout exceed.
//!
//! The central type is [`AnalysisTable`], the persisted, immutable table of
//! enriched observations produced once by the batch pipeline and read by
//! every presentation request.

use crate::{ExceedError, Result};
use chrono::Datelike;
use derive_more::Display;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

// Re-export date type from chrono
pub use chrono::NaiveDate as Date;

/// A firm identifier (I/B/E/S ticker).
pub type FirmId = String;

/// Days from 0001-01-01 (day 1 of the common era) to 1970-01-01.
///
/// Polars stores `Date` values as days since the Unix epoch.
pub const CE_TO_UNIX_EPOCH_DAYS: i32 = 719_163;

/// Convert a polars physical date (days since the Unix epoch) to a [`Date`].
pub fn date_from_epoch_days(days: i32) -> Option<Date> {
    Date::from_num_days_from_ce_opt(days + CE_TO_UNIX_EPOCH_DAYS)
}

/// Build a polars `Date` column from nullable calendar dates.
///
/// # Errors
///
/// Returns an error if the physical column cannot be cast to `Date`.
pub fn date_column<I>(name: &str, dates: I) -> PolarsResult<Column>
where
    I: IntoIterator<Item = Option<Date>>,
{
    let days: Vec<Option<i32>> = dates
        .into_iter()
        .map(|d| d.map(|d| d.num_days_from_ce() - CE_TO_UNIX_EPOCH_DAYS))
        .collect();
    Column::new(name.into(), days).cast(&DataType::Date)
}

/// Column names of the analysis table.
pub mod columns {
    /// Firm identifier.
    pub const FIRM_ID: &str = "firm_id";
    /// Statistics period of the surviving snapshot.
    pub const STATISTICS_PERIOD: &str = "statistics_period";
    /// Fiscal-period-end date.
    pub const FISCAL_PERIOD_END: &str = "fiscal_period_end";
    /// Announcement date of the actual.
    pub const ANNOUNCEMENT_DATE: &str = "announcement_date";
    /// Calendar year of the announcement.
    pub const YEAR: &str = "year";
    /// Share price.
    pub const PRICE: &str = "price";
    /// Reported earnings per share.
    pub const ACTUAL: &str = "actual";
    /// Consensus mean estimate.
    pub const MEAN_ESTIMATE: &str = "mean_estimate";
    /// Actual of the same fiscal period one year earlier.
    pub const PRIOR_YEAR_ACTUAL: &str = "prior_year_actual";
}

/// The three scaled earnings metrics of the study, in cents per share.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub enum Metric {
    /// Reported earnings per share.
    #[display("EPS")]
    Eps,
    /// Actual minus consensus mean estimate.
    #[display("FERR")]
    ForecastError,
    /// Actual minus the actual one year earlier.
    #[display("∆EPS")]
    ChangeInEps,
}

impl Metric {
    /// All metrics in presentation order.
    pub const ALL: [Self; 3] = [Self::Eps, Self::ForecastError, Self::ChangeInEps];

    /// Column holding the raw metric.
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::Eps => "eps",
            Self::ForecastError => "forecast_error",
            Self::ChangeInEps => "change_in_eps",
        }
    }

    /// Column holding the winsorized metric.
    #[must_use]
    pub const fn winsorized_column(self) -> &'static str {
        match self {
            Self::Eps => "eps_w",
            Self::ForecastError => "forecast_error_w",
            Self::ChangeInEps => "change_in_eps_w",
        }
    }

    /// Column for the requested variant.
    #[must_use]
    pub const fn column_for(self, winsorized: bool) -> &'static str {
        if winsorized {
            self.winsorized_column()
        } else {
            self.column()
        }
    }
}

/// The persisted table of enriched observations.
///
/// `AnalysisTable` wraps a Polars DataFrame whose schema is checked on
/// construction. It is never mutated: filters return new tables.
#[derive(Debug, Clone)]
pub struct AnalysisTable {
    data: DataFrame,
}

impl AnalysisTable {
    /// Name used in schema errors.
    pub const TABLE_NAME: &'static str = "analysis_table";

    /// Create a table from a DataFrame, validating its schema.
    ///
    /// # Errors
    ///
    /// Returns [`ExceedError::Schema`] if a required column is absent or
    /// has the wrong type.
    pub fn new(data: DataFrame) -> Result<Self> {
        for (name, dtype) in Self::schema() {
            let column = data.column(name).map_err(|_| {
                ExceedError::schema(Self::TABLE_NAME, name, "column not found")
            })?;
            if column.dtype() != &dtype {
                return Err(ExceedError::schema(
                    Self::TABLE_NAME,
                    name,
                    format!("expected {dtype}, found {}", column.dtype()),
                ));
            }
        }
        Ok(Self { data })
    }

    /// The required columns and their types.
    pub fn schema() -> Vec<(&'static str, DataType)> {
        let mut schema = vec![
            (columns::FIRM_ID, DataType::String),
            (columns::STATISTICS_PERIOD, DataType::Date),
            (columns::FISCAL_PERIOD_END, DataType::Date),
            (columns::ANNOUNCEMENT_DATE, DataType::Date),
            (columns::YEAR, DataType::Int32),
            (columns::PRICE, DataType::Float64),
            (columns::ACTUAL, DataType::Float64),
            (columns::MEAN_ESTIMATE, DataType::Float64),
            (columns::PRIOR_YEAR_ACTUAL, DataType::Float64),
        ];
        for metric in Metric::ALL {
            schema.push((metric.column(), DataType::Float64));
            schema.push((metric.winsorized_column(), DataType::Float64));
        }
        schema
    }

    /// Returns a reference to the underlying DataFrame.
    pub const fn data(&self) -> &DataFrame {
        &self.data
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.data.height()
    }

    /// Whether the table holds no observations.
    pub fn is_empty(&self) -> bool {
        self.data.height() == 0
    }

    /// Values of a float column.
    ///
    /// # Errors
    ///
    /// Returns an error if the column is missing or not `Float64`.
    pub fn f64_values(&self, name: &str) -> Result<Vec<Option<f64>>> {
        let values = self
            .data
            .column(name)
            .map_err(|_| ExceedError::MissingColumn(name.to_string()))?
            .as_materialized_series()
            .f64()?
            .into_iter()
            .collect();
        Ok(values)
    }

    /// Values of a metric, raw or winsorized.
    ///
    /// # Errors
    ///
    /// Returns an error if the metric column is missing.
    pub fn metric_values(&self, metric: Metric, winsorized: bool) -> Result<Vec<Option<f64>>> {
        self.f64_values(metric.column_for(winsorized))
    }

    /// Share prices.
    ///
    /// # Errors
    ///
    /// Returns an error if the price column is missing.
    pub fn prices(&self) -> Result<Vec<Option<f64>>> {
        self.f64_values(columns::PRICE)
    }

    /// Announcement years.
    ///
    /// # Errors
    ///
    /// Returns an error if the year column is missing or not `Int32`.
    pub fn years(&self) -> Result<Vec<Option<i32>>> {
        let years = self
            .data
            .column(columns::YEAR)
            .map_err(|_| ExceedError::MissingColumn(columns::YEAR.to_string()))?
            .as_materialized_series()
            .i32()?
            .into_iter()
            .collect();
        Ok(years)
    }

    /// Firm identifiers.
    ///
    /// # Errors
    ///
    /// Returns an error if the firm column is missing or not a string column.
    pub fn firm_ids(&self) -> Result<Vec<Option<String>>> {
        let firms = self
            .data
            .column(columns::FIRM_ID)
            .map_err(|_| ExceedError::MissingColumn(columns::FIRM_ID.to_string()))?
            .as_materialized_series()
            .str()?
            .into_iter()
            .map(|s: Option<&str>| s.map(str::to_string))
            .collect();
        Ok(firms)
    }

    /// Values of a date column.
    ///
    /// # Errors
    ///
    /// Returns an error if the column is missing or not a `Date` column.
    pub fn dates(&self, name: &str) -> Result<Vec<Option<Date>>> {
        let dates = self
            .data
            .column(name)
            .map_err(|_| ExceedError::MissingColumn(name.to_string()))?
            .as_materialized_series()
            .date()?
            .into_iter()
            .map(|d: Option<i32>| d.and_then(date_from_epoch_days))
            .collect();
        Ok(dates)
    }

    /// Observations announced within `[min_year, max_year]`.
    ///
    /// Rows without a year never match. The result is a new table.
    ///
    /// # Errors
    ///
    /// Returns an error if the year column cannot be read.
    pub fn filter_years(&self, min_year: i32, max_year: i32) -> Result<Self> {
        let mask = self
            .years()?
            .into_iter()
            .map(|y| y.is_some_and(|y| (min_year..=max_year).contains(&y)))
            .collect::<BooleanChunked>();
        let data = self.data.filter(&mask)?;
        Ok(Self { data })
    }

    /// Observations with a known price. The result is a new table.
    ///
    /// # Errors
    ///
    /// Returns an error if the price column cannot be read.
    pub fn priced(&self) -> Result<Self> {
        let mask = self
            .prices()?
            .into_iter()
            .map(|p| p.is_some())
            .collect::<BooleanChunked>();
        let data = self.data.filter(&mask)?;
        Ok(Self { data })
    }

    /// Earliest and latest announcement year, if any row has one.
    ///
    /// # Errors
    ///
    /// Returns an error if the year column cannot be read.
    pub fn year_span(&self) -> Result<Option<(i32, i32)>> {
        let years: Vec<i32> = self.years()?.into_iter().flatten().collect();
        Ok(years
            .iter()
            .min()
            .copied()
            .zip(years.iter().max().copied()))
    }
}

impl TryFrom<DataFrame> for AnalysisTable {
    type Error = ExceedError;

    fn try_from(data: DataFrame) -> Result<Self> {
        Self::new(data)
    }
}

impl AsRef<DataFrame> for AnalysisTable {
    fn as_ref(&self) -> &DataFrame {
        &self.data
    }
}
