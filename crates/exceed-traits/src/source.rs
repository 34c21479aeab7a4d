//! The data-source seam of the batch pipeline.

use crate::{ActualsSummary, ForecastSummary, Result};

/// A supplier of the two summary tables the study is built from.
///
/// Implementations are responsible for the server-side predicates
/// (currency, measure, forecast-period indicator) and for coercing dates
/// and times into typed values. Anything that cannot be coerced into the
/// documented schema must surface as [`crate::ExceedError::Schema`].
///
/// # Example
///
/// ```no_run
/// use exceed_traits::{ActualsSummary, ForecastSummary, PanelSource, Result};
///
/// struct Empty;
///
/// impl PanelSource for Empty {
///     fn name(&self) -> &str {
///         "empty"
///     }
///
///     fn forecast_summaries(&self) -> Result<Vec<ForecastSummary>> {
///         Ok(Vec::new())
///     }
///
///     fn actuals_summaries(&self) -> Result<Vec<ActualsSummary>> {
///         Ok(Vec::new())
///     }
/// }
/// ```
pub trait PanelSource {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Fetch the forecast-summary table.
    ///
    /// # Errors
    ///
    /// Returns an error if the table cannot be read or does not match the schema.
    fn forecast_summaries(&self) -> Result<Vec<ForecastSummary>>;

    /// Fetch the actuals-summary table.
    ///
    /// # Errors
    ///
    /// Returns an error if the table cannot be read or does not match the schema.
    fn actuals_summaries(&self) -> Result<Vec<ActualsSummary>>;
}

/// A source backed by records already held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    forecasts: Vec<ForecastSummary>,
    actuals: Vec<ActualsSummary>,
}

impl InMemorySource {
    /// Create a source over the given tables.
    pub const fn new(forecasts: Vec<ForecastSummary>, actuals: Vec<ActualsSummary>) -> Self {
        Self { forecasts, actuals }
    }
}

impl PanelSource for InMemorySource {
    fn name(&self) -> &str {
        "in-memory"
    }

    fn forecast_summaries(&self) -> Result<Vec<ForecastSummary>> {
        Ok(self.forecasts.clone())
    }

    fn actuals_summaries(&self) -> Result<Vec<ActualsSummary>> {
        Ok(self.actuals.clone())
    }
}
