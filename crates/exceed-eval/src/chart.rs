//! Distribution chart descriptors.
//!
//! The study presents four charts: a scatter of per-bucket medians and
//! interquartile ranges (figure 4) and three clipped one-cent histograms
//! (figures 5 to 7). A descriptor carries the data and axis ranges; drawing
//! is left to the consumer.

use crate::{aggregate::BucketStatistic, histogram::Histogram, percentile::Bucket};
use exceed_traits::Metric;
use serde::Serialize;

/// The figures of the study.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Figure {
    /// Medians and IQRs by price centile.
    Four,
    /// Histogram of change in EPS.
    Five,
    /// Histogram of forecast error.
    Six,
    /// Histogram of EPS.
    Seven,
}

impl Figure {
    /// All figures in order.
    pub const ALL: [Self; 4] = [Self::Four, Self::Five, Self::Six, Self::Seven];

    /// Figure number.
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Self::Four => 4,
            Self::Five => 5,
            Self::Six => 6,
            Self::Seven => 7,
        }
    }

    /// Chart title.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Four => {
                "Medians and interquartile ranges for EPS, FERR, and ∆EPS \
                 as a function of centiles of price per share"
            }
            Self::Five => {
                "Histogram of change in EPS (∆EPS = EPS(t) - EPS(t-4)): \
                 exploring the threshold of \"sustain recent performance.\""
            }
            Self::Six => {
                "Histogram of forecast error for earnings per share: \
                 exploring the threshold of meeting analysts' expectations."
            }
            Self::Seven => {
                "Histogram of EPS: exploring the threshold of \"positive/zero profit.\""
            }
        }
    }

    /// Metric shown by a histogram figure.
    #[must_use]
    pub const fn histogram_metric(self) -> Option<Metric> {
        match self {
            Self::Four => None,
            Self::Five => Some(Metric::ChangeInEps),
            Self::Six => Some(Metric::ForecastError),
            Self::Seven => Some(Metric::Eps),
        }
    }
}

/// Inclusive axis range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AxisRange {
    /// Lower end.
    pub min: f64,
    /// Upper end.
    pub max: f64,
}

/// One marker series of the percentile scatter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterSeries {
    /// Legend label, e.g. `EPS` or `IQR FERR`.
    pub name: String,
    /// `(bucket, cents)` points; buckets without a value are skipped.
    pub points: Vec<(Bucket, f64)>,
}

/// What a chart draws.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ChartKind {
    /// Medians and IQRs of every metric against price centile.
    PercentileScatter {
        /// Median series then IQR series, per metric.
        series: Vec<ScatterSeries>,
        /// Horizontal axis range.
        x_range: AxisRange,
        /// Vertical axis range.
        y_range: AxisRange,
    },
    /// One-cent histogram of a clipped metric sample.
    ClippedHistogram {
        /// Metric binned.
        metric: Metric,
        /// The bins.
        histogram: Histogram,
    },
}

/// A chart ready to draw.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionChart {
    /// Which figure.
    pub figure: Figure,
    /// Horizontal axis label.
    pub x_label: &'static str,
    /// Vertical axis label.
    pub y_label: &'static str,
    /// Chart data.
    pub kind: ChartKind,
}

impl DistributionChart {
    /// Figure 4 from bucket statistics.
    pub fn percentile_scatter(stats: &[BucketStatistic]) -> Self {
        let medians = Metric::ALL
            .iter()
            .map(|&m| scatter_series(m.to_string(), stats, |s| s.get(m).median));
        let iqrs = Metric::ALL
            .iter()
            .map(|&m| scatter_series(format!("IQR {m}"), stats, |s| s.get(m).iqr));
        Self {
            figure: Figure::Four,
            x_label: "Centile of Price",
            y_label: "Cents per Share: Median: IQR",
            kind: ChartKind::PercentileScatter {
                series: medians.chain(iqrs).collect(),
                x_range: AxisRange {
                    min: 0.0,
                    max: 100.0,
                },
                y_range: AxisRange {
                    min: -10.0,
                    max: 100.0,
                },
            },
        }
    }

    /// A histogram figure from its clipped sample.
    ///
    /// Returns `None` for figure 4, which is not a histogram.
    pub fn clipped_histogram(figure: Figure, sample: &[f64]) -> Option<Self> {
        let metric = figure.histogram_metric()?;
        Some(Self {
            figure,
            x_label: "Cents per Share",
            y_label: "Frequency",
            kind: ChartKind::ClippedHistogram {
                metric,
                histogram: Histogram::one_cent(sample),
            },
        })
    }
}

fn scatter_series(
    name: String,
    stats: &[BucketStatistic],
    value: impl Fn(&BucketStatistic) -> Option<f64>,
) -> ScatterSeries {
    ScatterSeries {
        name,
        points: stats
            .iter()
            .filter_map(|s| value(s).map(|v| (s.bucket, v)))
            .collect(),
    }
}
