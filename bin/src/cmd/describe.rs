//! Describe command implementation.

use anyhow::{Context, Result};
use exceed_panel::store;
use exceed_traits::{Metric, columns};
use std::path::Path;

/// Print the size, year span and missing values of an analysis table.
pub(crate) fn describe_table(path: &Path) -> Result<()> {
    let table = store::read_table(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    println!("Table:         {}", path.display());
    println!("Observations:  {}", table.len());
    match table.year_span()? {
        Some((min, max)) => println!("Years:         {min}-{max}"),
        None => println!("Years:         none"),
    }

    let prior = table.f64_values(columns::PRIOR_YEAR_ACTUAL)?;
    let missing = prior.iter().filter(|v| v.is_none()).count();
    println!(
        "Prior-year EPS missing: {} of {} ({:.1}%)",
        missing,
        prior.len(),
        percent(missing, prior.len())
    );
    println!();

    println!("{:<20} {:>10} {:>10}", "Column", "Type", "Nulls");
    println!("{}", "─".repeat(42));
    for column in table.data().get_columns() {
        println!(
            "{:<20} {:>10} {:>10}",
            column.name().as_str(),
            column.dtype().to_string(),
            column.null_count()
        );
    }
    println!();

    println!("{:<6} {:>10} {:>10}", "Metric", "Raw", "Winsorized");
    for metric in Metric::ALL {
        let raw = table.metric_values(metric, false)?;
        let wins = table.metric_values(metric, true)?;
        println!(
            "{:<6} {:>10} {:>10}",
            metric.to_string(),
            raw.iter().flatten().count(),
            wins.iter().flatten().count()
        );
    }
    Ok(())
}

fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}
