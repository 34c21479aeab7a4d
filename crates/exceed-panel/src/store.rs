//! Persistence of the analysis table as Parquet.

use exceed_traits::{AnalysisTable, Result};
use polars::prelude::*;
use std::{fs::File, path::Path};
use tracing::info;

/// Write the table to a zstd-compressed Parquet file, replacing any
/// existing file.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn write_table(table: &AnalysisTable, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let mut frame = table.data().clone();
    let file = File::create(path)?;
    ParquetWriter::new(file)
        .with_compression(ParquetCompression::Zstd(None))
        .finish(&mut frame)?;
    info!(path = %path.display(), rows = table.len(), "wrote analysis table");
    Ok(())
}

/// Read a table written by [`write_table`], validating its schema.
///
/// # Errors
///
/// Returns an error if the file cannot be read or a column is missing or
/// mistyped.
pub fn read_table(path: impl AsRef<Path>) -> Result<AnalysisTable> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let frame = ParquetReader::new(file).finish()?;
    let table = AnalysisTable::new(frame)?;
    info!(path = %path.display(), rows = table.len(), "loaded analysis table");
    Ok(table)
}
