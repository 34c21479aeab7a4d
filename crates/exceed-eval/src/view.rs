//! Presentation requests.
//!
//! A request names a year range, a price-percentile cutoff and whether to
//! use the winsorized metrics. [`StudyView::build`] applies it to the
//! analysis table without mutating it.

use crate::{
    aggregate::{BucketStatistic, aggregate_buckets},
    chart::{DistributionChart, Figure},
    histogram::clip_sample,
    percentile::{Bucket, percentile_buckets},
};
use exceed_traits::{AnalysisTable, ExceedError, Metric, Result, columns};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Parameters of one presentation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudyParams {
    /// Inclusive announcement-year range.
    pub years: (i32, i32),
    /// Inclusive percentile-bucket range of the histogram sample.
    pub cutoff: (Bucket, Bucket),
    /// Use winsorized metrics instead of raw ones.
    pub winsorized: bool,
}

impl Default for StudyParams {
    fn default() -> Self {
        Self {
            years: (1984, 1996),
            cutoff: (10, 90),
            winsorized: false,
        }
    }
}

impl StudyParams {
    /// Check both ranges are ordered and the cutoff lies within 0 to 100.
    ///
    /// # Errors
    ///
    /// Returns [`ExceedError::InvalidConfig`] for a malformed range.
    pub fn validate(&self) -> Result<()> {
        let (min_year, max_year) = self.years;
        if min_year > max_year {
            return Err(ExceedError::InvalidConfig(format!(
                "year range {min_year}-{max_year} is reversed"
            )));
        }
        let (low, high) = self.cutoff;
        if low > high || high > 100 {
            return Err(ExceedError::InvalidConfig(format!(
                "cutoff {low}-{high} must satisfy 0 <= low <= high <= 100"
            )));
        }
        Ok(())
    }

    /// Whether a bucket falls inside the cutoff.
    #[must_use]
    pub const fn within_cutoff(&self, bucket: Bucket) -> bool {
        self.cutoff.0 <= bucket && bucket <= self.cutoff.1
    }
}

/// Everything the charts of one request need.
#[derive(Debug, Clone, Serialize)]
pub struct StudyView {
    /// The request.
    pub params: StudyParams,
    /// Priced observations within the year range. Rows without a price
    /// cannot be ranked and are left out.
    pub sample_size: usize,
    /// Observations that received a percentile bucket.
    pub ranked: usize,
    /// Statistics of every populated bucket.
    pub buckets: Vec<BucketStatistic>,
    /// Observations within the cutoff.
    pub cutoff_size: usize,
    /// Clipped cutoff samples per metric, in [`Metric::ALL`] order.
    pub clipped: [Vec<f64>; 3],
    /// Row-level cutoff sample: firm, year, price, bucket and the chosen
    /// metric variant under the raw metric names.
    #[serde(skip)]
    pub cutoff_sample: DataFrame,
}

impl StudyView {
    /// Run a request against the analysis table.
    ///
    /// An empty selection produces an empty view, not an error.
    ///
    /// # Errors
    ///
    /// Returns an error for invalid parameters or a malformed table.
    pub fn build(table: &AnalysisTable, params: &StudyParams) -> Result<Self> {
        params.validate()?;
        let sample = table
            .filter_years(params.years.0, params.years.1)?
            .priced()?;
        if sample.is_empty() {
            warn!(
                min_year = params.years.0,
                max_year = params.years.1,
                "no observations in the selected years"
            );
        }

        let prices = sample.prices()?;
        let buckets = percentile_buckets(&prices);
        let metrics: [Vec<Option<f64>>; 3] = [
            sample.metric_values(Metric::Eps, params.winsorized)?,
            sample.metric_values(Metric::ForecastError, params.winsorized)?,
            sample.metric_values(Metric::ChangeInEps, params.winsorized)?,
        ];
        let stats = aggregate_buckets(&buckets, &metrics);

        let keep: Vec<bool> = buckets
            .iter()
            .map(|b| b.is_some_and(|b| params.within_cutoff(b)))
            .collect();
        let clipped = std::array::from_fn(|m| {
            clip_sample(
                metrics[m]
                    .iter()
                    .zip(&keep)
                    .filter_map(|(v, &k)| k.then_some(*v)),
            )
        });
        let cutoff_sample = cutoff_frame(&sample, &prices, &buckets, &metrics, &keep)?;

        let view = Self {
            params: *params,
            sample_size: sample.len(),
            ranked: buckets.iter().flatten().count(),
            buckets: stats,
            cutoff_size: cutoff_sample.height(),
            clipped,
            cutoff_sample,
        };
        debug!(
            sample = view.sample_size,
            buckets = view.buckets.len(),
            cutoff = view.cutoff_size,
            "built study view"
        );
        Ok(view)
    }

    /// Clipped cutoff sample of one metric.
    #[must_use]
    pub fn clipped(&self, metric: Metric) -> &[f64] {
        match metric {
            Metric::Eps => &self.clipped[0],
            Metric::ForecastError => &self.clipped[1],
            Metric::ChangeInEps => &self.clipped[2],
        }
    }

    /// Descriptors for figures 4 to 7.
    pub fn charts(&self) -> Vec<DistributionChart> {
        Figure::ALL
            .iter()
            .filter_map(|&figure| match figure.histogram_metric() {
                Some(metric) => DistributionChart::clipped_histogram(figure, self.clipped(metric)),
                None => Some(DistributionChart::percentile_scatter(&self.buckets)),
            })
            .collect()
    }
}

fn cutoff_frame(
    sample: &AnalysisTable,
    prices: &[Option<f64>],
    buckets: &[Option<Bucket>],
    metrics: &[Vec<Option<f64>>; 3],
    keep: &[bool],
) -> Result<DataFrame> {
    fn select<T: Clone>(values: &[T], keep: &[bool]) -> Vec<T> {
        values
            .iter()
            .zip(keep)
            .filter_map(|(v, &k)| k.then(|| v.clone()))
            .collect()
    }

    let mut frame = vec![
        Column::new(
            columns::FIRM_ID.into(),
            select(&sample.firm_ids()?, keep),
        ),
        Column::new(columns::YEAR.into(), select(&sample.years()?, keep)),
        Column::new(columns::PRICE.into(), select(prices, keep)),
        Column::new(
            "price_percentile".into(),
            select(buckets, keep)
                .into_iter()
                .map(|b| b.map(u32::from))
                .collect::<Vec<_>>(),
        ),
    ];
    for (metric, values) in Metric::ALL.iter().zip(metrics) {
        frame.push(Column::new(metric.column().into(), select(values, keep)));
    }
    Ok(DataFrame::new(frame)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::ChartKind;
    use exceed_traits::{Date, date_column};

    /// Ten observations in 1990 with prices 1..=10 plus one in 2001.
    fn table() -> AnalysisTable {
        let n = 11;
        let d = Date::from_ymd_opt(1990, 3, 31);
        let mut years = vec![1990i32; n - 1];
        years.push(2001);
        let prices: Vec<f64> = (1..=n).map(|p| p as f64).collect();
        let eps: Vec<Option<f64>> = (1..=n).map(|p| Some(p as f64 * 10.0 - 50.0)).collect();
        let mut frame = df! {
            columns::FIRM_ID => (1..=n).map(|i| format!("F{i}")).collect::<Vec<_>>(),
            columns::YEAR => years,
            columns::PRICE => prices,
            columns::ACTUAL => vec![Some(1.0); n],
            columns::MEAN_ESTIMATE => vec![Some(1.0); n],
            columns::PRIOR_YEAR_ACTUAL => vec![None::<f64>; n],
        }
        .unwrap();
        for name in [
            columns::STATISTICS_PERIOD,
            columns::FISCAL_PERIOD_END,
            columns::ANNOUNCEMENT_DATE,
        ] {
            frame.with_column(date_column(name, vec![d; n]).unwrap()).unwrap();
        }
        for metric in Metric::ALL {
            let raw: Vec<Option<f64>> = match metric {
                Metric::Eps => eps.clone(),
                Metric::ForecastError => vec![Some(0.0); n],
                Metric::ChangeInEps => vec![None; n],
            };
            let wins: Vec<Option<f64>> = raw.iter().map(|v| v.map(|v| v.clamp(-30.0, 30.0))).collect();
            frame
                .with_column(Column::new(metric.column().into(), raw))
                .unwrap();
            frame
                .with_column(Column::new(metric.winsorized_column().into(), wins))
                .unwrap();
        }
        AnalysisTable::new(frame).unwrap()
    }

    #[test]
    fn test_defaults() {
        let params = StudyParams::default();
        assert_eq!(params.years, (1984, 1996));
        assert_eq!(params.cutoff, (10, 90));
        assert!(!params.winsorized);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_ranges() {
        let reversed = StudyParams {
            years: (1996, 1984),
            ..Default::default()
        };
        assert!(reversed.validate().is_err());
        let over = StudyParams {
            cutoff: (10, 101),
            ..Default::default()
        };
        assert!(over.validate().is_err());
    }

    #[test]
    fn test_build_raw() {
        let view = StudyView::build(&table(), &StudyParams::default()).unwrap();
        assert_eq!(view.sample_size, 10);
        assert_eq!(view.ranked, 10);
        // Prices 1..=10 rank to buckets 10, 20, ..., 100.
        let buckets: Vec<Bucket> = view.buckets.iter().map(|b| b.bucket).collect();
        assert_eq!(buckets, (1..=10).map(|b| b * 10).collect::<Vec<Bucket>>());
        assert_eq!(view.buckets[0].get(Metric::Eps).median, Some(-40.0));
        // Buckets 10 through 90 survive the cutoff.
        assert_eq!(view.cutoff_size, 9);
        // EPS -40..=40 step 10, clipped to [-20, 20].
        assert_eq!(view.clipped(Metric::Eps), [-20.0, -10.0, 0.0, 10.0, 20.0]);
        assert!(view.clipped(Metric::ChangeInEps).is_empty());
        assert_eq!(view.cutoff_sample.height(), 9);
        assert!(view.cutoff_sample.column("price_percentile").is_ok());
    }

    #[test]
    fn test_unpriced_rows_left_out() {
        let mut frame = table().data().clone();
        let mut prices: Vec<Option<f64>> = (1..=11).map(|p| Some(p as f64)).collect();
        prices[0] = None;
        frame
            .with_column(Column::new(columns::PRICE.into(), prices))
            .unwrap();
        let view =
            StudyView::build(&AnalysisTable::new(frame).unwrap(), &StudyParams::default()).unwrap();
        assert_eq!(view.sample_size, 9);
        assert_eq!(view.ranked, view.sample_size);
        let total: usize = view.buckets.iter().map(|b| b.count).sum();
        assert_eq!(total, view.sample_size);
    }

    #[test]
    fn test_build_winsorized() {
        let params = StudyParams {
            winsorized: true,
            ..Default::default()
        };
        let view = StudyView::build(&table(), &params).unwrap();
        assert_eq!(view.buckets[0].get(Metric::Eps).median, Some(-30.0));
    }

    #[test]
    fn test_empty_selection_renders_empty() {
        let params = StudyParams {
            years: (1950, 1960),
            ..Default::default()
        };
        let view = StudyView::build(&table(), &params).unwrap();
        assert_eq!(view.sample_size, 0);
        assert!(view.buckets.is_empty());
        let charts = view.charts();
        assert_eq!(charts.len(), 4);
        for chart in charts {
            match chart.kind {
                ChartKind::PercentileScatter { series, .. } => {
                    assert!(series.iter().all(|s| s.points.is_empty()));
                }
                ChartKind::ClippedHistogram { histogram, .. } => {
                    assert_eq!(histogram.total(), 0);
                }
            }
        }
    }
}
