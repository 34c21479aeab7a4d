//! Figures command implementation.

use crate::args::{OutputFormat, Range};
use anyhow::{Context, Result};
use exceed_eval::{
    Bucket, BucketStatistic, ChartKind, DistributionChart, Histogram, StudyParams, StudyView,
};
use exceed_panel::store;
use exceed_traits::Metric;
use serde::Serialize;
use std::path::Path;

/// Widest histogram bar in characters.
const BAR_WIDTH: usize = 40;

#[derive(Serialize)]
struct FiguresOutput<'a> {
    params: &'a StudyParams,
    sample_size: usize,
    cutoff_size: usize,
    buckets: &'a [BucketStatistic],
    charts: Vec<DistributionChart>,
}

/// Compute and print figures 4 to 7 for a selection.
pub(crate) fn show_figures(
    path: &Path,
    years: Range<i32>,
    cutoff: Range<Bucket>,
    winsorized: bool,
    format: OutputFormat,
) -> Result<()> {
    let table = store::read_table(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let params = StudyParams {
        years: (years.min, years.max),
        cutoff: (cutoff.min, cutoff.max),
        winsorized,
    };
    let view = StudyView::build(&table, &params)?;
    let charts = view.charts();

    if format == OutputFormat::Json {
        let output = FiguresOutput {
            params: &view.params,
            sample_size: view.sample_size,
            cutoff_size: view.cutoff_size,
            buckets: &view.buckets,
            charts,
        };
        let json = serde_json::to_string_pretty(&output)
            .map_err(|e| anyhow::anyhow!("JSON serialization error: {}", e))?;
        println!("{}", json);
        return Ok(());
    }

    println!("Years:      {years}");
    println!("Cutoff:     {cutoff}");
    println!("Metrics:    {}", metrics_label(winsorized));
    println!("Sample:     {} observations", view.sample_size);
    println!("In cutoff:  {} observations", view.cutoff_size);
    println!();

    for chart in &charts {
        println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        println!("FIGURE {}", chart.figure.number());
        println!("{}", chart.figure.title());
        println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
        match &chart.kind {
            ChartKind::PercentileScatter { .. } => print_buckets(&view.buckets),
            ChartKind::ClippedHistogram { histogram, .. } => print_histogram(histogram),
        }
        println!();
    }
    Ok(())
}

fn print_buckets(buckets: &[BucketStatistic]) {
    if buckets.is_empty() {
        println!("(no observations)");
        return;
    }
    print!("{:>7} {:>6}", "Centile", "N");
    for metric in Metric::ALL {
        print!(" {:>9} {:>9}", metric.to_string(), format!("IQR {metric}"));
    }
    println!();
    println!("{}", "─".repeat(14 + 20 * Metric::ALL.len()));

    for bucket in buckets {
        print!("{:>7} {:>6}", bucket.bucket, bucket.count);
        for metric in Metric::ALL {
            let q = bucket.get(metric);
            print!(" {:>9} {:>9}", cents(q.median), cents(q.iqr));
        }
        println!();
    }
}

fn print_histogram(histogram: &Histogram) {
    let Some((_, peak)) = histogram.mode().filter(|&(_, count)| count > 0) else {
        println!("(no observations)");
        return;
    };
    for (edge, count) in histogram.bins() {
        let bar = "█".repeat(count * BAR_WIDTH / peak);
        println!("{:>6.0} {:>8} {}", edge, count, bar);
    }
}

/// The table does not record its winsorization limits, so the label
/// names only the variant.
const fn metrics_label(winsorized: bool) -> &'static str {
    if winsorized { "winsorized" } else { "raw" }
}

fn cents(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.2}"))
}
