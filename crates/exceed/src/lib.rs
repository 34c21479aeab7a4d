#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/exceed/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! # exceed
//!
//! exceed is an umbrella crate that re-exports all exceed sub-crates for
//! convenience.
//!
//! ## Quick Start
//!
//! ```ignore
//! use exceed::prelude::*;
//! use exceed::ibes::CsvPanelSource;
//!
//! # fn main() -> Result<()> {
//! let source = CsvPanelSource::new("statsum.csv", "actpsum.csv");
//! let (table, _report) = Pipeline::new(PipelineConfig::default())?.run(&source)?;
//!
//! let view = StudyView::build(&table, &StudyParams::default())?;
//! for bucket in &view.buckets {
//!     println!("{:>3} {:?}", bucket.bucket, bucket.get(Metric::Eps).median);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Crate Organization
//!
//! - [`traits`] - Errors, records, the [`PanelSource`] seam and the analysis table
//! - [`ibes`] - I/B/E/S summary-file ingestion
//! - [`panel`] - The batch pipeline and table persistence
//! - [`eval`] - Percentile aggregation and chart descriptors
//!
//! ## Architecture
//!
//! 1. A **source** delivers forecast and actuals summaries
//! 2. The **pipeline** joins, resolves prior-year actuals, derives and
//!    winsorizes the metrics, once, into an immutable table
//! 3. Each **presentation request** filters that table and aggregates it
//!    by price percentile

/// Version information for the exceed crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Core Types
// ============================================================================

/// Core definitions shared by every exceed crate.
pub mod traits {
    pub use exceed_traits::*;
}

// Re-export core types at top level for convenience
pub use exceed_traits::{
    ActualsSummary, AnalysisTable, Date, ExceedError, FirmId, ForecastSummary, Metric,
    PanelSource, Result,
};

// ============================================================================
// Ingestion
// ============================================================================

/// I/B/E/S summary-file ingestion.
///
/// ## Setup
///
/// Export the summary-statistics (`statsum`) and actuals/pricing
/// (`actpsum`) tables to CSV and point [`ibes::CsvPanelSource`] at them,
/// directly or through `EXCEED_FORECASTS` and `EXCEED_ACTUALS`.
pub mod ibes {
    pub use exceed_ibes::*;
}

// ============================================================================
// Batch Pipeline
// ============================================================================

/// The batch pipeline.
///
/// ## Stages
///
/// ```text
/// statsum ⋈ actpsum on (ticker, statpers)
///   -> drop rows without fiscal-period end
///   -> keep last row per (ticker, announcement date)
///   -> prior-year actual: lags 1..=4, 355 <= days < 375
///   -> eps, forecast error, change in eps (cents)
///   -> winsorized copies (1% / 99%)
/// ```
pub mod panel {
    pub use exceed_panel::*;
}

// ============================================================================
// Presentation
// ============================================================================

/// Percentile aggregation and chart descriptors.
///
/// Price percentile buckets are `round(rank / n * 100)` with ties sharing
/// their average rank and halves rounding to even.
pub mod eval {
    pub use exceed_eval::*;
}

// ============================================================================
// Prelude
// ============================================================================

/// Prelude module for convenient imports.
///
/// ```ignore
/// use exceed::prelude::*;
/// ```
pub mod prelude {
    pub use crate::eval::{StudyParams, StudyView};
    pub use crate::panel::{Pipeline, PipelineConfig};
    pub use crate::{AnalysisTable, ExceedError, Metric, PanelSource, Result};
}
