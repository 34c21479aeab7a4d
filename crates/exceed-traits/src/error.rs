//! Error types for the exceed crates.
//!
//! Only conditions that abort a run are errors. Sparse panel coverage
//! (rows without a key, periods without a trailing-year match, empty
//! percentile buckets) is expected and handled by exclusion or nulls.

use thiserror::Error;

/// The main error type for exceed operations.
#[derive(Debug, Error)]
pub enum ExceedError {
    /// A required column is absent or has the wrong type.
    ///
    /// Raised before any output is produced; the run is aborted.
    #[error("Schema error in {table}.{column}: {reason}")]
    Schema {
        /// Table (source file or analysis table) being validated.
        table: String,
        /// Offending column.
        column: String,
        /// What was wrong with it.
        reason: String,
    },

    /// A configuration value is outside its allowed range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Error when a required column is missing from a DataFrame.
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// Error from Polars operations.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Filesystem error while reading or writing a table.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error fetching rows from a data source.
    #[error("Data fetch error: {0}")]
    DataFetch(String),
}

impl ExceedError {
    /// Shorthand for a [`ExceedError::Schema`] error.
    pub fn schema(
        table: impl Into<String>,
        column: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Schema {
            table: table.into(),
            column: column.into(),
            reason: reason.into(),
        }
    }
}

/// A specialized Result type for exceed operations.
pub type Result<T> = std::result::Result<T, ExceedError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ExceedError::schema("actuals", "price", "column not found");
        assert_eq!(
            err.to_string(),
            "Schema error in actuals.price: column not found"
        );

        let err = ExceedError::MissingColumn("eps".to_string());
        assert_eq!(err.to_string(), "Missing required column: eps");
    }

    #[test]
    fn test_result_type() {
        let ok_result: Result<i32> = Ok(42);
        assert!(ok_result.is_ok());

        let err_result: Result<i32> = Err(ExceedError::InvalidConfig("bad".to_string()));
        assert!(err_result.is_err());
    }
}
