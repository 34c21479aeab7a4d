//! Build command implementation.

use crate::args::OutputFormat;
use anyhow::{Context, Result};
use exceed_ibes::CsvPanelSource;
use exceed_panel::{Pipeline, PipelineConfig, PipelineReport, store};
use std::path::Path;
use tracing::info;

/// Run the batch pipeline over two CSV exports and persist the table.
pub(crate) fn build_table(
    forecasts: &Path,
    actuals: &Path,
    out: &Path,
    config: Option<&Path>,
    format: OutputFormat,
) -> Result<()> {
    let config = match config {
        Some(path) => {
            info!(path = %path.display(), "loading pipeline configuration");
            PipelineConfig::from_json_file(path)?
        }
        None => PipelineConfig::default(),
    };

    let source = CsvPanelSource::new(forecasts, actuals).with_filter(config.source.clone());
    let pipeline = Pipeline::new(config)?;
    let (table, report) = pipeline
        .run(&source)
        .context("Failed to build the analysis table")?;
    store::write_table(&table, out)
        .with_context(|| format!("Failed to write {}", out.display()))?;

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&report)
                .map_err(|e| anyhow::anyhow!("JSON serialization error: {}", e))?;
            println!("{}", json);
        }
        OutputFormat::Text => print_report(&report, out),
    }
    Ok(())
}

fn print_report(report: &PipelineReport, out: &Path) {
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("ANALYSIS TABLE");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");

    println!("Join:");
    println!("  Forecast rows:       {:>10}", report.join.forecast_rows);
    println!("  Actuals rows:        {:>10}", report.join.actuals_rows);
    println!("  Matched:             {:>10}", report.join.matched);
    println!("  Missing keys:        {:>10}", report.join.missing_keys);
    println!("  Duplicates removed:  {:>10}", report.join.duplicates);
    println!();

    println!("Observations:          {:>10}", report.observations);
    println!("Prior-year resolved:   {:>10}", report.prior_year_resolved);
    println!();

    println!("Winsorization bounds (cents):");
    for entry in &report.bounds {
        let metric = entry.metric.to_string();
        match entry.bounds {
            Some(b) => println!("  {:<6} [{:>10.2}, {:>10.2}]", metric, b.lower, b.upper),
            None => println!("  {:<6} no values", metric),
        }
    }
    println!();
    println!("Written to {}", out.display());
}
