//! Error types for summary-file ingestion.

use exceed_traits::ExceedError;
use thiserror::Error;

/// Errors that can occur while reading a summary export.
#[derive(Debug, Error)]
pub enum IbesError {
    /// The CSV reader failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The file could not be opened.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A required column is absent from the header.
    #[error("{table}: required column `{column}` not found")]
    MissingColumn {
        /// Table being read.
        table: &'static str,
        /// Missing column.
        column: &'static str,
    },

    /// A cell could not be coerced to the column's type.
    #[error("{table} row {row}: cannot read `{value}` in column `{column}` as {expected}")]
    Parse {
        /// Table being read.
        table: &'static str,
        /// One-based data row number.
        row: usize,
        /// Column of the cell.
        column: &'static str,
        /// Raw cell content.
        value: String,
        /// Expected type.
        expected: &'static str,
    },
}

impl From<IbesError> for ExceedError {
    fn from(err: IbesError) -> Self {
        match err {
            IbesError::MissingColumn { table, column } => {
                Self::schema(table, column, "column not found")
            }
            IbesError::Parse {
                table,
                row,
                column,
                value,
                expected,
            } => Self::schema(
                table,
                column,
                format!("row {row}: `{value}` is not a valid {expected}"),
            ),
            IbesError::Io(e) => Self::Io(e),
            other => Self::DataFetch(other.to_string()),
        }
    }
}
