//! CSV-export panel source.

use crate::{
    IbesError, Result,
    types::{
        ACTUALS_REQUIRED_COLUMNS, ACTUALS_TABLE, FORECAST_REQUIRED_COLUMNS, FORECAST_TABLE,
        RawActualsRow, RawForecastRow, SourceFilter,
    },
};
use exceed_traits::{ActualsSummary, ForecastSummary, PanelSource};
use std::{
    fs::File,
    io::Read,
    path::{Path, PathBuf},
};
use tracing::{debug, info};

/// Panel source reading staged CSV exports of the two summary tables.
#[derive(Debug, Clone)]
pub struct CsvPanelSource {
    forecasts_path: PathBuf,
    actuals_path: PathBuf,
    filter: SourceFilter,
}

impl CsvPanelSource {
    /// Create a source over the two export files with the default predicates.
    #[must_use]
    pub fn new(forecasts_path: impl Into<PathBuf>, actuals_path: impl Into<PathBuf>) -> Self {
        Self {
            forecasts_path: forecasts_path.into(),
            actuals_path: actuals_path.into(),
            filter: SourceFilter::default(),
        }
    }

    /// Replace the server-side predicates.
    #[must_use]
    pub fn with_filter(mut self, filter: SourceFilter) -> Self {
        self.filter = filter;
        self
    }

    /// The predicates applied to each row.
    pub const fn filter(&self) -> &SourceFilter {
        &self.filter
    }

    /// Read and coerce the summary-statistics export.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, a required column is
    /// missing, or a cell cannot be coerced.
    pub fn read_forecasts(&self) -> Result<Vec<ForecastSummary>> {
        let file = open(&self.forecasts_path)?;
        parse_forecasts(file, &self.filter)
    }

    /// Read and coerce the actuals/pricing export.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, a required column is
    /// missing, or a cell cannot be coerced.
    pub fn read_actuals(&self) -> Result<Vec<ActualsSummary>> {
        let file = open(&self.actuals_path)?;
        parse_actuals(file, &self.filter)
    }
}

impl PanelSource for CsvPanelSource {
    fn name(&self) -> &str {
        "csv"
    }

    fn forecast_summaries(&self) -> exceed_traits::Result<Vec<ForecastSummary>> {
        Ok(self.read_forecasts()?)
    }

    fn actuals_summaries(&self) -> exceed_traits::Result<Vec<ActualsSummary>> {
        Ok(self.read_actuals()?)
    }
}

fn open(path: &Path) -> Result<File> {
    debug!(path = %path.display(), "opening export");
    Ok(File::open(path)?)
}

/// Parse a summary-statistics export from any reader.
///
/// # Errors
///
/// Returns an error if a required column is missing or a cell cannot be coerced.
pub fn parse_forecasts<R: Read>(reader: R, filter: &SourceFilter) -> Result<Vec<ForecastSummary>> {
    let mut csv = reader_for(reader);
    check_headers(&mut csv, FORECAST_TABLE, FORECAST_REQUIRED_COLUMNS)?;

    let mut records = Vec::new();
    let mut rejected = 0usize;
    for (i, row) in csv.deserialize::<RawForecastRow>().enumerate() {
        let row = row?;
        if !filter.accepts_forecast(&row) {
            rejected += 1;
            continue;
        }
        records.push(row.into_record(i + 1)?);
    }

    info!(
        table = FORECAST_TABLE,
        rows = records.len(),
        rejected,
        "read summary-statistics export"
    );
    Ok(records)
}

/// Parse an actuals/pricing export from any reader.
///
/// # Errors
///
/// Returns an error if a required column is missing or a cell cannot be coerced.
pub fn parse_actuals<R: Read>(reader: R, filter: &SourceFilter) -> Result<Vec<ActualsSummary>> {
    let mut csv = reader_for(reader);
    check_headers(&mut csv, ACTUALS_TABLE, ACTUALS_REQUIRED_COLUMNS)?;

    let mut records = Vec::new();
    let mut rejected = 0usize;
    for (i, row) in csv.deserialize::<RawActualsRow>().enumerate() {
        let row = row?;
        if !filter.accepts_actuals(&row) {
            rejected += 1;
            continue;
        }
        records.push(row.into_record(i + 1)?);
    }

    info!(
        table = ACTUALS_TABLE,
        rows = records.len(),
        rejected,
        "read actuals/pricing export"
    );
    Ok(records)
}

/// Header names are trimmed so the required-column check and row
/// deserialization see the same names.
fn reader_for<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(reader)
}

fn check_headers<R: Read>(
    csv: &mut csv::Reader<R>,
    table: &'static str,
    required: &[&'static str],
) -> Result<()> {
    let headers = csv.headers()?;
    for &column in required {
        if !headers.iter().any(|h| h == column) {
            return Err(IbesError::MissingColumn { table, column });
        }
    }
    Ok(())
}
