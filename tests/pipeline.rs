//! End-to-end checks of the documented pipeline scenarios.

use approx::assert_relative_eq;
use ocean_heat::data::export::{export_path, write_csv};
use ocean_heat::{
    annual_mean_anomaly, build_report, clean_monthly, filter_by_year_range,
    generate_spatial_anomaly_grid, generate_year_series, monthly_sea_surface_temperature,
    moving_average, read_monthly_csv, FilterRange, Indicator, PipelineError, ReportConfig,
    SmoothingWindow, SpatialGrid, YearMonth, YearPoint, YearSeries, YearTable,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

#[test]
fn noiseless_sea_temperature_scenario() {
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    let series = generate_year_series(2000, 2004, 14.0, 0.1, 0.0, &mut rng).unwrap();

    let expected = [(2000, 14.0), (2001, 14.1), (2002, 14.2), (2003, 14.3), (2004, 14.4)];
    assert_eq!(series.len(), expected.len());
    for (point, (year, value)) in series.iter().zip(expected) {
        assert_eq!(point.year, year);
        assert_relative_eq!(point.value, value, epsilon = 1e-12);
    }
}

#[test]
fn two_year_moving_average_scenario() {
    let series = YearSeries::from_points(vec![
        YearPoint::new(2000, 10.0),
        YearPoint::new(2001, 20.0),
        YearPoint::new(2002, 30.0),
    ])
    .unwrap();
    let smoothed: Vec<(i32, f64)> = moving_average(&series, 2)
        .unwrap()
        .iter()
        .map(|p| (p.year, p.value))
        .collect();
    assert_eq!(smoothed, vec![(2000, 10.0), (2001, 15.0), (2002, 25.0)]);
}

#[test]
fn validation_errors_surface_immediately() {
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    assert!(matches!(
        generate_year_series(2005, 2000, 14.0, 0.1, 0.2, &mut rng),
        Err(PipelineError::InvalidRange { start: 2005, end: 2000 })
    ));

    let series = YearSeries::from_values(2000, [1.0, 2.0, 3.0]);
    assert_eq!(moving_average(&series, 0), Err(PipelineError::InvalidWindow(0)));
}

#[test]
fn two_by_two_grid_over_two_years_has_eight_rows() {
    let rng = ChaCha8Rng::seed_from_u64(1);
    let samples: Vec<_> = generate_spatial_anomaly_grid(1990, 1991, 2, 2, 0.02, 0.5, 0.1, rng)
        .unwrap()
        .collect();
    assert_eq!(samples.len(), 8);
    assert_eq!(samples.iter().filter(|s| s.year == 1990).count(), 4);
    assert_eq!(samples.iter().filter(|s| s.year == 1991).count(), 4);
}

#[test]
fn empty_filter_result_flows_through_smoothing() {
    let mut rng = ChaCha8Rng::seed_from_u64(2);
    let series = Indicator::CoralBleaching
        .generate(FilterRange::new(2000, 2019).unwrap(), &mut rng)
        .unwrap();
    let empty = filter_by_year_range(&series, FilterRange::new(2030, 2040).unwrap());
    assert!(empty.is_empty());
    assert!(moving_average(&empty, 5).unwrap().is_empty());
}

#[test]
fn reference_grid_annual_means_warm_over_time() {
    let grid = SpatialGrid {
        noise_std_dev: 0.0,
        ..SpatialGrid::default()
    };
    let means = annual_mean_anomaly(grid.samples(ChaCha8Rng::seed_from_u64(0)).unwrap());
    assert_eq!(means.len(), 36);
    let values: Vec<f64> = means.values().collect();
    assert!(values.windows(2).all(|w| w[1] > w[0]));
}

#[test]
fn report_round_trips_through_csv_file() {
    let config = ReportConfig {
        filter: Some(FilterRange::new(2010, 2014).unwrap()),
        window: SmoothingWindow::new(2).unwrap(),
        seed: Some(2024),
        indicators: vec![Indicator::GlobalSeaTemperature, Indicator::FisheryOutput],
        ..ReportConfig::default()
    };
    let table = build_report(&config, &mut config.rng()).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.csv");
    export_path(&table, &path).unwrap();

    let mut reader = csv::Reader::from_path(&path).unwrap();
    let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
    assert_eq!(headers, vec!["year", "global_sea_temp_c", "fishery_output_t"]);

    let years: Vec<i32> = reader
        .records()
        .map(|r| r.unwrap()[0].parse().unwrap())
        .collect();
    assert_eq!(years, vec![2010, 2011, 2012, 2013, 2014]);
}

#[test]
fn stdout_style_csv_of_single_series() {
    let series = YearSeries::from_values(2000, [14.0, 14.5]);
    let mut buf = Vec::new();
    write_csv(&YearTable::from(&series), &mut buf).unwrap();
    assert_eq!(String::from_utf8(buf).unwrap(), "year,value\n2000,14\n2001,14.5\n");
}

#[test]
fn monthly_fallback_exports_date_value_rows() {
    let series = monthly_sea_surface_temperature()
        .generate(&mut ChaCha8Rng::seed_from_u64(3))
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sst.csv");
    export_path(&series, &path).unwrap();

    let mut reader = csv::Reader::from_path(&path).unwrap();
    let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
    assert_eq!(headers, vec!["date", "value"]);
    let dates: Vec<String> = reader.records().map(|r| r.unwrap()[0].to_string()).collect();
    assert_eq!(dates.len(), 240);
    assert_eq!(dates[0], "2000-01");
    assert_eq!(dates[239], "2019-12");
}

#[test]
fn observed_monthly_csv_is_cleaned_before_export() {
    let raw = "date,value\n\
               2023-11-30,20.5\n\
               2023-12-31,\n\
               2023-11-30,20.5\n\
               2024-01-31,21.0\n\
               2099-01-31,40.0\n";
    let rows = read_monthly_csv(raw.as_bytes()).unwrap();
    let cleaned = clean_monthly(rows, YearMonth::new(2024, 6).unwrap()).unwrap();

    let mut buf = Vec::new();
    write_csv(&cleaned, &mut buf).unwrap();
    assert_eq!(
        String::from_utf8(buf).unwrap(),
        "date,value\n2023-11,20.5\n2023-12,20.5\n2024-01,21\n"
    );
}
