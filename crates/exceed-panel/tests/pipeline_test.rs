//! End-to-end run: CSV exports to a persisted table to a study view.

use approx::assert_relative_eq;
use exceed_eval::{StudyParams, StudyView};
use exceed_ibes::{SourceFilter, parse_actuals, parse_forecasts};
use exceed_panel::{Pipeline, PipelineConfig, store};
use exceed_traits::{InMemorySource, Metric, columns};

const STATSUM: &str = "\
ticker,statpers,measure,fpi,fpedats,meanest,medest,numest,curcode
ABC,2020-03-19,EPS,6,2020-03-31,0.95,0.95,5,USD
ABC,2021-03-18,EPS,6,2021-03-30,1.10,1.10,6,USD
XYZ,1990-01-18,EPS,6,1990-01-31,0.40,0.40,2,USD
XYZ,1991-02-21,EPS,6,1991-03-07,0.50,0.50,2,USD
DEF,1990-03-15,EPS,6,1990-03-31,0.20,0.20,3,USD
DEF,1990-04-12,EPS,6,1990-03-31,0.22,0.22,3,USD
GHI,1990-03-15,EPS,6,1990-03-31,0.20,0.20,3,CAD
";

const ACTPSUM: &str = "\
ticker,statpers,measure,actual,anndats_act,price,curcode
ABC,2020-03-19,EPS,1.00,2020-04-20,10.0,USD
ABC,2021-03-18,EPS,1.20,2021-04-22,12.0,USD
XYZ,1990-01-18,EPS,0.45,1990-02-20,30.0,USD
XYZ,1991-02-21,EPS,0.55,1991-03-28,31.0,USD
DEF,1990-03-15,EPS,0.25,1990-04-19,5.0,USD
DEF,1990-04-12,EPS,0.25,1990-04-19,5.0,USD
GHI,1990-03-15,EPS,0.25,1990-04-19,5.0,USD
";

fn source() -> InMemorySource {
    let filter = SourceFilter::default();
    InMemorySource::new(
        parse_forecasts(STATSUM.as_bytes(), &filter).unwrap(),
        parse_actuals(ACTPSUM.as_bytes(), &filter).unwrap(),
    )
}

#[test]
fn test_pipeline_end_to_end() {
    let pipeline = Pipeline::new(PipelineConfig::default()).unwrap();
    let (table, report) = pipeline.run(&source()).unwrap();

    // GHI is filtered at the source; DEF's two snapshots collapse to one.
    assert_eq!(report.join.forecast_rows, 6);
    assert_eq!(report.join.duplicates, 1);
    assert_eq!(table.len(), 5);
    assert_eq!(report.prior_year_resolved, 1);

    let firms = table.firm_ids().unwrap();
    let prior = table.f64_values(columns::PRIOR_YEAR_ACTUAL).unwrap();
    let change = table.metric_values(Metric::ChangeInEps, false).unwrap();
    let ferr = table.metric_values(Metric::ForecastError, false).unwrap();

    // Sorted by firm then fiscal-period end.
    let order: Vec<&str> = firms.iter().map(|f| f.as_deref().unwrap()).collect();
    assert_eq!(order, vec!["ABC", "ABC", "DEF", "XYZ", "XYZ"]);

    // ABC: 364 days apart.
    assert_eq!(prior[1], Some(1.00));
    assert_relative_eq!(change[1].unwrap(), 20.0, epsilon = 1e-9);
    // DEF keeps the later snapshot.
    assert_relative_eq!(ferr[2].unwrap(), 3.0, epsilon = 1e-9);
    // XYZ: 400 days apart, outside the window.
    assert_eq!(prior[4], None);
    assert_eq!(change[4], None);

    for (i, value) in change.iter().enumerate() {
        assert_eq!(value.is_none(), prior[i].is_none());
    }
}

#[test]
fn test_store_round_trip_and_view() {
    let pipeline = Pipeline::new(PipelineConfig::default()).unwrap();
    let (table, _) = pipeline.run(&source()).unwrap();

    let path = std::env::temp_dir().join(format!("exceed-it-{}.parquet", std::process::id()));
    store::write_table(&table, &path).unwrap();
    let loaded = store::read_table(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(loaded.len(), table.len());
    assert_eq!(loaded.firm_ids().unwrap(), table.firm_ids().unwrap());
    assert_eq!(
        loaded.dates(columns::FISCAL_PERIOD_END).unwrap(),
        table.dates(columns::FISCAL_PERIOD_END).unwrap()
    );

    let params = StudyParams {
        years: (1990, 2021),
        cutoff: (0, 100),
        winsorized: false,
    };
    let view = StudyView::build(&loaded, &params).unwrap();
    assert_eq!(view.sample_size, 5);
    assert_eq!(view.cutoff_size, 5);
    assert_eq!(view.buckets.iter().map(|b| b.count).sum::<usize>(), 5);
    // Only ABC's second year has a change in EPS.
    assert_eq!(view.clipped(Metric::ChangeInEps).len(), 1);

    let default_years = StudyView::build(&loaded, &StudyParams::default()).unwrap();
    assert_eq!(default_years.sample_size, 3);
}
