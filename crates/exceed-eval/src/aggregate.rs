//! Percentile aggregator.
//!
//! Groups a sample by price percentile bucket and summarises each metric
//! within a bucket by its median, quartiles and interquartile range.

use crate::percentile::Bucket;
use exceed_traits::{
    Metric, Result,
    stats::{median_sorted, quantile_sorted, sorted_finite},
};
use polars::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;

/// Median and quartiles of one metric within one bucket.
///
/// All fields are `None` when the bucket holds no value of the metric.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Quartiles {
    /// Median.
    pub median: Option<f64>,
    /// 25th percentile.
    pub p25: Option<f64>,
    /// 75th percentile.
    pub p75: Option<f64>,
    /// `p75 - p25`.
    pub iqr: Option<f64>,
}

impl Quartiles {
    /// Summarise a nullable sample. Quartiles interpolate linearly.
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = Option<f64>>,
    {
        let sorted = sorted_finite(values);
        let p25 = quantile_sorted(&sorted, 0.25);
        let p75 = quantile_sorted(&sorted, 0.75);
        Self {
            median: median_sorted(&sorted),
            p25,
            p75,
            iqr: p75.zip(p25).map(|(hi, lo)| hi - lo),
        }
    }
}

/// Statistics of one populated percentile bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketStatistic {
    /// The bucket.
    pub bucket: Bucket,
    /// Observations in the bucket.
    pub count: usize,
    /// Quartiles per metric, in [`Metric::ALL`] order.
    pub quartiles: [Quartiles; 3],
}

impl BucketStatistic {
    /// Quartiles of one metric.
    #[must_use]
    pub const fn get(&self, metric: Metric) -> &Quartiles {
        match metric {
            Metric::Eps => &self.quartiles[0],
            Metric::ForecastError => &self.quartiles[1],
            Metric::ChangeInEps => &self.quartiles[2],
        }
    }
}

/// Aggregate metric values by percentile bucket.
///
/// # Arguments
///
/// * `buckets` - Bucket of each observation; `None` rows are skipped
/// * `metrics` - Values of each metric in [`Metric::ALL`] order, aligned with `buckets`
///
/// # Returns
///
/// One statistic per populated bucket, ascending. Empty buckets do not
/// appear.
pub fn aggregate_buckets(
    buckets: &[Option<Bucket>],
    metrics: &[Vec<Option<f64>>; 3],
) -> Vec<BucketStatistic> {
    let mut members: BTreeMap<Bucket, Vec<usize>> = BTreeMap::new();
    for (i, bucket) in buckets.iter().enumerate() {
        if let Some(bucket) = bucket {
            members.entry(*bucket).or_default().push(i);
        }
    }

    members
        .into_iter()
        .map(|(bucket, rows)| BucketStatistic {
            bucket,
            count: rows.len(),
            quartiles: std::array::from_fn(|m| {
                Quartiles::from_values(
                    rows.iter()
                        .map(|&i| metrics[m].get(i).copied().flatten()),
                )
            }),
        })
        .collect()
}

/// Lay bucket statistics out as a DataFrame.
///
/// Columns are `price_percentile`, `count`, then for each metric
/// `<metric>`, `<metric>_p25`, `<metric>_p75` and `iqr_<metric>`, where
/// the median carries the bare metric name.
///
/// # Errors
///
/// Returns an error if polars cannot assemble the frame.
pub fn buckets_to_dataframe(stats: &[BucketStatistic]) -> Result<DataFrame> {
    let mut columns = vec![
        Column::new(
            "price_percentile".into(),
            stats.iter().map(|s| u32::from(s.bucket)).collect::<Vec<_>>(),
        ),
        Column::new(
            "count".into(),
            stats.iter().map(|s| s.count as u64).collect::<Vec<_>>(),
        ),
    ];
    for metric in Metric::ALL {
        let name = metric.column();
        let field = |f: fn(&Quartiles) -> Option<f64>| {
            stats.iter().map(|s| f(s.get(metric))).collect::<Vec<_>>()
        };
        columns.push(Column::new(name.into(), field(|q| q.median)));
        columns.push(Column::new(format!("{name}_p25").into(), field(|q| q.p25)));
        columns.push(Column::new(format!("{name}_p75").into(), field(|q| q.p75)));
        columns.push(Column::new(format!("iqr_{name}").into(), field(|q| q.iqr)));
    }
    Ok(DataFrame::new(columns)?)
}
