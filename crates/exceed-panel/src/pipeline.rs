//! The batch pipeline.

use crate::{
    join::{JoinStats, join_panels},
    metrics::EarningsMetrics,
    observation::{EnrichedObservation, to_table},
    trailing::{TrailingYearConfig, resolve_prior_year},
    winsorize::{WinsorBounds, WinsorLimits, winsorize},
};
use exceed_ibes::SourceFilter;
use exceed_traits::{
    ActualsSummary, AnalysisTable, ExceedError, ForecastSummary, Metric, PanelSource, Result,
};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use tracing::{debug, info};

/// Configuration of a pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Predicates applied by the data source.
    pub source: SourceFilter,
    /// Trailing-year lookup window.
    pub trailing: TrailingYearConfig,
    /// Winsorization limits.
    pub winsor: WinsorLimits,
}

impl PipelineConfig {
    /// Load a configuration from a JSON file. Missing fields take defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid JSON, or
    /// holds an invalid value.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&text).map_err(|e| {
            ExceedError::InvalidConfig(format!("{}: {e}", path.as_ref().display()))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Validate every section.
    ///
    /// # Errors
    ///
    /// Returns [`ExceedError::InvalidConfig`] for the first invalid value.
    pub fn validate(&self) -> Result<()> {
        self.trailing.validate()?;
        self.winsor.validate()
    }
}

/// Winsorization bounds of one metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricBounds {
    /// The metric.
    pub metric: Metric,
    /// Bounds, absent when the metric has no values.
    pub bounds: Option<WinsorBounds>,
}

/// Counts gathered over a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PipelineReport {
    /// Join stage counts.
    pub join: JoinStats,
    /// Observations in the analysis table.
    pub observations: usize,
    /// Observations with a resolved prior-year actual.
    pub prior_year_resolved: usize,
    /// Winsorization bounds per metric.
    pub bounds: Vec<MetricBounds>,
}

/// Builds the analysis table from the two summary panels.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Create a pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`ExceedError::InvalidConfig`] if the configuration is invalid.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The configuration in use.
    pub const fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Fetch both panels from a source and build the analysis table.
    ///
    /// # Errors
    ///
    /// Returns an error if the source fails or the table cannot be assembled.
    pub fn run(&self, source: &dyn PanelSource) -> Result<(AnalysisTable, PipelineReport)> {
        info!(source = source.name(), "fetching summary panels");
        let forecasts = source.forecast_summaries()?;
        let actuals = source.actuals_summaries()?;
        let (rows, report) = self.enrich(&forecasts, &actuals);
        let table = to_table(&rows)?;
        Ok((table, report))
    }

    /// Join, resolve, derive and winsorize.
    pub fn enrich(
        &self,
        forecasts: &[ForecastSummary],
        actuals: &[ActualsSummary],
    ) -> (Vec<EnrichedObservation>, PipelineReport) {
        let joined = join_panels(forecasts, actuals);
        let matches = resolve_prior_year(&joined.observations, &self.config.trailing);
        let prior_year_resolved = matches.iter().filter(|m| m.is_some()).count();
        info!(
            observations = joined.observations.len(),
            prior_year_resolved, "resolved trailing-year actuals"
        );

        let mut rows: Vec<EnrichedObservation> = joined
            .observations
            .into_iter()
            .zip(matches)
            .map(|(joined, matched)| {
                let prior_year_actual = matched.map(|m| m.actual);
                let metrics =
                    EarningsMetrics::derive(joined.actual, joined.mean_estimate, prior_year_actual);
                EnrichedObservation {
                    joined,
                    prior_year_actual,
                    metrics,
                    winsorized: metrics,
                }
            })
            .collect();

        let mut bounds = Vec::with_capacity(Metric::ALL.len());
        for metric in Metric::ALL {
            let raw: Vec<Option<f64>> = rows.iter().map(|r| r.metrics.get(metric)).collect();
            let (clamped, metric_bounds) = winsorize(&raw, &self.config.winsor);
            for (row, value) in rows.iter_mut().zip(clamped) {
                row.winsorized.set(metric, value);
            }
            match metric_bounds {
                Some(b) => info!(%metric, lower = b.lower, upper = b.upper, "winsorized"),
                None => debug!(%metric, "no values to winsorize"),
            }
            bounds.push(MetricBounds {
                metric,
                bounds: metric_bounds,
            });
        }

        let report = PipelineReport {
            join: joined.stats,
            observations: rows.len(),
            prior_year_resolved,
            bounds,
        };
        (rows, report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use exceed_traits::{Date, InMemorySource, columns};

    fn d(y: i32, m: u32, day: u32) -> Option<Date> {
        Date::from_ymd_opt(y, m, day)
    }

    fn panel() -> (Vec<ForecastSummary>, Vec<ActualsSummary>) {
        let forecasts = vec![
            ForecastSummary {
                ticker: Some("ABC".into()),
                statistics_period: d(2020, 3, 19),
                fiscal_period_end: d(2020, 3, 31),
                mean_estimate: Some(0.95),
                ..Default::default()
            },
            ForecastSummary {
                ticker: Some("ABC".into()),
                statistics_period: d(2021, 3, 18),
                fiscal_period_end: d(2021, 3, 30),
                mean_estimate: Some(1.10),
                ..Default::default()
            },
        ];
        let actuals = vec![
            ActualsSummary {
                ticker: Some("ABC".into()),
                statistics_period: d(2020, 3, 19),
                actual: Some(1.00),
                announcement_date: d(2020, 4, 20),
                price: Some(10.0),
                ..Default::default()
            },
            ActualsSummary {
                ticker: Some("ABC".into()),
                statistics_period: d(2021, 3, 18),
                actual: Some(1.20),
                announcement_date: d(2021, 4, 22),
                price: Some(12.0),
                ..Default::default()
            },
        ];
        (forecasts, actuals)
    }

    #[test]
    fn test_enrich_abc_scenario() {
        let (forecasts, actuals) = panel();
        let pipeline = Pipeline::new(PipelineConfig::default()).unwrap();
        let (rows, report) = pipeline.enrich(&forecasts, &actuals);

        assert_eq!(rows.len(), 2);
        assert_eq!(report.prior_year_resolved, 1);
        assert_eq!(rows[0].metrics.change_in_eps, None);
        assert_eq!(rows[1].prior_year_actual, Some(1.00));
        assert_relative_eq!(rows[1].metrics.change_in_eps.unwrap(), 20.0, epsilon = 1e-9);
        assert_relative_eq!(rows[1].metrics.forecast_error.unwrap(), 10.0, epsilon = 1e-9);
        // Two values: 1% of either tail clips nothing.
        assert_eq!(rows[1].winsorized, rows[1].metrics);
        assert_eq!(report.bounds.len(), 3);
    }

    #[test]
    fn test_run_builds_table() {
        let (forecasts, actuals) = panel();
        let source = InMemorySource::new(forecasts, actuals);
        let pipeline = Pipeline::new(PipelineConfig::default()).unwrap();
        let (table, report) = pipeline.run(&source).unwrap();
        assert_eq!(table.len(), report.observations);
        assert_eq!(
            table.f64_values(columns::PRIOR_YEAR_ACTUAL).unwrap(),
            vec![None, Some(1.00)]
        );
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = PipelineConfig {
            winsor: WinsorLimits::symmetric(0.6),
            ..Default::default()
        };
        assert!(matches!(
            Pipeline::new(config),
            Err(ExceedError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_config_json_defaults() {
        let config: PipelineConfig =
            serde_json::from_str(r#"{"winsor": {"lower": 0.05}}"#).unwrap();
        assert_eq!(config.winsor.lower, 0.05);
        assert_eq!(config.winsor.upper, 0.01);
        assert_eq!(config.trailing, TrailingYearConfig::default());
        assert_eq!(config.source.currency, "USD");
    }

    #[test]
    fn test_config_from_json_file() {
        let path = std::env::temp_dir().join(format!("exceed-config-{}.json", std::process::id()));
        fs::write(&path, r#"{"trailing": {"max_lag": 8}}"#).unwrap();
        let config = PipelineConfig::from_json_file(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(config.trailing.max_lag, 8);
        assert_eq!(config.trailing.min_days, 355);
    }
}
