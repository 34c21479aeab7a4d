//! exceed CLI binary.
//!
//! Builds the analysis table from I/B/E/S summary exports and prints the
//! study's figures from it.

mod args;
mod cmd;

use anyhow::Result;
use args::{OutputFormat, Range};
use clap::{Parser, Subcommand};
use std::{path::PathBuf, process};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "exceed")]
#[command(about = "Earnings management to exceed thresholds: a replication", long_about = None)]
#[command(version)]
struct Cli {
    /// Log at debug level (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the analysis table from summary exports
    Build {
        /// Summary-statistics export (statsum CSV)
        #[arg(long, env = "EXCEED_FORECASTS")]
        forecasts: PathBuf,

        /// Actuals/pricing export (actpsum CSV)
        #[arg(long, env = "EXCEED_ACTUALS")]
        actuals: PathBuf,

        /// Output Parquet file
        #[arg(short, long, env = "EXCEED_TABLE")]
        out: PathBuf,

        /// Pipeline configuration (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format (text or json)
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Compute the study's figures for a selection
    Figures {
        /// Analysis table (Parquet)
        #[arg(short, long, env = "EXCEED_TABLE")]
        table: PathBuf,

        /// Inclusive announcement-year range
        #[arg(short, long, default_value = "1984-1996")]
        years: Range<i32>,

        /// Inclusive price-percentile cutoff for the histograms
        #[arg(short, long, default_value = "10-90")]
        cutoff: Range<u8>,

        /// Use winsorized metrics
        #[arg(short, long)]
        winsorized: bool,

        /// Output format (text or json)
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Summarise an analysis table
    Describe {
        /// Analysis table (Parquet)
        #[arg(short, long, env = "EXCEED_TABLE")]
        table: PathBuf,
    },
}

fn main() {
    // Try to load .env file (ignore errors if not found)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Build {
            forecasts,
            actuals,
            out,
            config,
            format,
        } => {
            cmd::build::build_table(&forecasts, &actuals, &out, config.as_deref(), format)?;
        }
        Commands::Figures {
            table,
            years,
            cutoff,
            winsorized,
            format,
        } => {
            cmd::figures::show_figures(&table, years, cutoff, winsorized, format)?;
        }
        Commands::Describe { table } => {
            cmd::describe::describe_table(&table)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_figures_defaults() {
        let cli = Cli::try_parse_from(["exceed", "figures", "--table", "t.parquet"]).unwrap();
        let Commands::Figures {
            years,
            cutoff,
            winsorized,
            format,
            ..
        } = cli.command
        else {
            panic!("expected figures");
        };
        assert_eq!((years.min, years.max), (1984, 1996));
        assert_eq!((cutoff.min, cutoff.max), (10, 90));
        assert!(!winsorized);
        assert_eq!(format, OutputFormat::Text);
    }

    #[test]
    fn test_parse_build() {
        let cli = Cli::try_parse_from([
            "exceed",
            "-v",
            "build",
            "--forecasts",
            "f.csv",
            "--actuals",
            "a.csv",
            "--out",
            "t.parquet",
            "--format",
            "json",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Commands::Build {
                format: OutputFormat::Json,
                config: None,
                ..
            }
        ));
    }

    #[test]
    fn test_reject_bad_range() {
        let parsed =
            Cli::try_parse_from(["exceed", "figures", "--table", "t", "--years", "1996"]);
        assert!(parsed.is_err());
    }
}
