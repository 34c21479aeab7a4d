#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/exceed/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core definitions for the exceed earnings-threshold study.
//!
//! This crate provides the foundational pieces every other exceed crate
//! builds on: the error type, the summary records delivered by a data
//! source, and the analysis table the batch pipeline persists.

/// The version of the exceed-traits crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Module declarations
pub mod error;
pub mod records;
pub mod source;
pub mod stats;
pub mod types;

// Re-exports
pub use error::{ExceedError, Result};
pub use records::{ActualsSummary, ForecastSummary};
pub use source::{InMemorySource, PanelSource};
pub use types::{
    AnalysisTable, CE_TO_UNIX_EPOCH_DAYS, Date, FirmId, Metric, columns, date_column,
    date_from_epoch_days,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
        assert!(VERSION.contains('.'));
    }
}
