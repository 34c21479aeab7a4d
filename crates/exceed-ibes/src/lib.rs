//! I/B/E/S summary-file ingestion for exceed.
//!
//! This crate turns staged exports of the two I/B/E/S summary tables
//! (summary statistics and actuals/pricing) into typed records. The export
//! stores dates and times as untyped strings or raw epoch numbers, so every
//! cell is coerced here before the pipeline sees it.
//!
//! # Usage
//!
//! ```rust,ignore
//! use exceed_ibes::CsvPanelSource;
//! use exceed_traits::PanelSource;
//!
//! let source = CsvPanelSource::new("dataPrep/statsum.csv", "dataPrep/actpsum.csv");
//! let forecasts = source.forecast_summaries()?;
//! let actuals = source.actuals_summaries()?;
//! ```

pub mod coerce;
mod error;
mod reader;
mod types;

pub use error::IbesError;
pub use reader::{CsvPanelSource, parse_actuals, parse_forecasts};
pub use types::*;

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IbesError>;
