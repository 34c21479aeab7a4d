//! Batch pipeline for the exceed earnings-threshold study.
//!
//! The pipeline runs once over the full historical panel and produces the
//! immutable [`AnalysisTable`](exceed_traits::AnalysisTable):
//!
//! 1. [`join`]: inner-join forecast and actuals summaries, drop rows
//!    without keys, keep one row per (firm, announcement date).
//! 2. [`trailing`]: resolve the actual of the same fiscal period one year
//!    earlier within each firm.
//! 3. [`metrics`]: derive EPS, forecast error and change in EPS in cents.
//! 4. [`winsorize`]: clamp each metric to its order-statistic limits.
//!
//! [`store`] persists the result as Parquet.
//!
//! # Example
//!
//! ```rust,ignore
//! use exceed_panel::{Pipeline, PipelineConfig, store};
//!
//! let pipeline = Pipeline::new(PipelineConfig::default())?;
//! let (table, report) = pipeline.run(&source)?;
//! store::write_table(&table, "analysis.parquet")?;
//! ```

pub mod join;
pub mod metrics;
pub mod observation;
pub mod pipeline;
pub mod store;
pub mod trailing;
pub mod winsorize;

pub use join::{JoinOutput, JoinStats, join_panels};
pub use metrics::EarningsMetrics;
pub use observation::{EnrichedObservation, JoinedObservation};
pub use pipeline::{MetricBounds, Pipeline, PipelineConfig, PipelineReport};
pub use trailing::{TrailingMatch, TrailingYearConfig, resolve_prior_year};
pub use winsorize::{WinsorBounds, WinsorLimits, winsorize};
