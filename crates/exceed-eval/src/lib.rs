//! Presentation-time analysis for exceed.
//!
//! Every request filters the immutable analysis table into a fresh sample
//! and recomputes from scratch:
//! - Price percentile ranking into whole-number buckets
//! - Per-bucket median, quartiles and interquartile range of each metric
//! - Cutoff-filtered, clipped samples and one-cent histograms
//! - Chart descriptors for figures 4 to 7 of the study
//!
//! # Example
//!
//! ```rust,ignore
//! use exceed_eval::{StudyParams, StudyView};
//!
//! let params = StudyParams { winsorized: true, ..Default::default() };
//! let view = StudyView::build(&table, &params)?;
//! for chart in view.charts() {
//!     println!("{}", chart.figure.title());
//! }
//! ```

pub mod aggregate;
pub mod chart;
pub mod histogram;
pub mod percentile;
pub mod view;

// Re-export main types
pub use aggregate::{BucketStatistic, Quartiles, aggregate_buckets, buckets_to_dataframe};
pub use chart::{AxisRange, ChartKind, DistributionChart, Figure, ScatterSeries};
pub use histogram::{CLIP_CENTS, Histogram, clip_sample};
pub use percentile::{Bucket, bucket_of, percentile_buckets, percentile_ranks};
pub use view::{StudyParams, StudyView};
