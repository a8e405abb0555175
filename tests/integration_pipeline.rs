//! End-to-end runs of the pipeline against fixture files.

mod common;

use std::fs;

use demand_prep::calendar::{HOURS_PER_YEAR, Month};
use demand_prep::error::PrepError;
use demand_prep::io::export::{DEMAND_FILE, GRID_CI_FILE, profile_file_name};
use demand_prep::pipeline::{PipelineOutput, Stage, run_pipeline};

fn run_all(dir: &std::path::Path) -> PipelineOutput {
    let cfg = common::write_sources(dir);
    run_pipeline(&cfg, Stage::All).expect("pipeline should succeed")
}

#[test]
fn full_run_writes_three_artifacts() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let output = run_all(tmp.path());

    let out = tmp.path().join("out");
    assert_eq!(output.written.len(), 3);
    assert!(out.join(profile_file_name(4101)).is_file());
    assert!(out.join(GRID_CI_FILE).is_file());
    assert!(out.join(DEMAND_FILE).is_file());
}

#[test]
fn normalised_columns_sum_to_usage_times_scale() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let output = run_all(tmp.path());
    let profile = output.profile.expect("profile stage ran");

    let usage = common::target_usage();
    for month in Month::ALL {
        let expected = usage[month.index()] * 0.79;
        let sum = profile.column_sum(month);
        assert!((sum - expected).abs() < 1e-9, "{month}: {sum} != {expected}");
    }
    // January weights sum to 744 and usage is 10 kWh/day: 10 * 0.79.
    assert!((profile.column_sum(Month::January) - 7.9).abs() < 1e-9);
    assert!((profile.get(0, Month::January) - 7.9 / 24.0).abs() < 1e-12);
}

#[test]
fn grid_aggregate_is_hourly_mean_per_kwh() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let output = run_all(tmp.path());
    let grid = output.grid.expect("grid stage ran");

    assert_eq!(grid.rows().len(), 24);
    for (hour, row) in grid.rows().iter().enumerate() {
        assert_eq!(row.hour, hour);
        assert_eq!(row.intensity_kg_per_kwh, (500.0 + 10.0 * hour as f64) / 1000.0);
        assert_eq!(row.price_aud_per_mwh, 40.0 + hour as f64);
    }
}

#[test]
fn demand_series_covers_reference_year() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let output = run_all(tmp.path());
    let demand = output.demand.expect("demand stage ran");

    assert_eq!(demand.len(), HOURS_PER_YEAR);
    assert_eq!(demand.timestamp(0).to_string(), "2013-01-01 00:00:00");
    assert_eq!(demand.timestamp(HOURS_PER_YEAR - 1).to_string(), "2013-12-31 23:00:00");

    let csv = fs::read_to_string(tmp.path().join("out").join(DEMAND_FILE)).expect("read demand");
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), HOURS_PER_YEAR + 1);
    assert_eq!(lines[0], "datetime,Demand (KWh)");
    assert!(lines[1].starts_with("2013-01-01 00:00:00,"));
    assert!(lines[HOURS_PER_YEAR].starts_with("2013-12-31 23:00:00,"));
}

#[test]
fn year_boundary_blends_december_into_january() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let output = run_all(tmp.path());
    let profile = output.profile.expect("profile stage ran");
    let demand = output.demand.expect("demand stage ran");

    let hour = 0;
    let jan = profile.get(hour, Month::January);
    let dec = profile.get(hour, Month::December);
    let day1 = demand.values()[hour];
    let day365 = demand.values()[364 * 24 + hour];

    assert!((day1 - (dec + (jan - dec) * 17.0 / 31.0)).abs() < 1e-12);
    assert!((day365 - (dec + (jan - dec) * 16.0 / 31.0)).abs() < 1e-12);
    assert!(day1 != jan && day1 != dec);
    assert!(day365 != jan && day365 != dec);
}

#[test]
fn rerun_produces_byte_identical_files() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let cfg = common::write_sources(tmp.path());

    let first = run_pipeline(&cfg, Stage::All).expect("first run");
    let snapshot: Vec<Vec<u8>> = first
        .written
        .iter()
        .map(|p| fs::read(p).expect("read artifact"))
        .collect();

    let second = run_pipeline(&cfg, Stage::All).expect("second run");
    assert_eq!(first.written, second.written);
    for (path, before) in second.written.iter().zip(snapshot) {
        assert_eq!(fs::read(path).expect("read artifact"), before, "{}", path.display());
    }
}

#[test]
fn grid_stage_runs_alone() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let mut cfg = common::write_sources(tmp.path());
    // profile inputs are not needed for the grid stage
    cfg.profile.reference_path = tmp.path().join("missing.csv");

    let output = run_pipeline(&cfg, Stage::Grid).expect("grid stage should succeed");
    assert!(output.profile.is_none());
    assert!(output.demand.is_none());
    assert_eq!(output.written, vec![tmp.path().join("out").join(GRID_CI_FILE)]);
}

#[test]
fn demand_stage_does_not_write_profile() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let cfg = common::write_sources(tmp.path());

    let output = run_pipeline(&cfg, Stage::Demand).expect("demand stage should succeed");
    assert!(output.demand.is_some());
    assert_eq!(output.written, vec![tmp.path().join("out").join(DEMAND_FILE)]);
}

#[test]
fn unknown_postcode_fails_with_missing_key() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let mut cfg = common::write_sources(tmp.path());
    cfg.profile.postcode = 4999;

    let err = run_pipeline(&cfg, Stage::Profile);
    assert!(matches!(
        err,
        Err(PrepError::MissingKey {
            postcode: 4999,
            year: 2024,
            ..
        })
    ));
}

#[test]
fn renamed_grid_column_fails_loudly() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let cfg = common::write_sources(tmp.path());
    let drifted = common::grid_csv().replacen("Emissions Intensity", "Emission Intensity", 1);
    fs::write(&cfg.grid.generation_path, drifted).expect("rewrite grid");

    let err = run_pipeline(&cfg, Stage::Grid);
    assert!(matches!(err, Err(PrepError::MissingColumn { .. })));
    assert!(!tmp.path().join("out").join(GRID_CI_FILE).exists());
}

#[test]
fn malformed_timestamp_fails_loudly() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let cfg = common::write_sources(tmp.path());
    let mut content = common::grid_csv();
    content.push_str("2024-02-30 10:00:00,500,40,1\n");
    fs::write(&cfg.grid.generation_path, content).expect("rewrite grid");

    let err = run_pipeline(&cfg, Stage::Grid);
    assert!(matches!(err, Err(PrepError::MalformedTimestamp { .. })));
}

#[test]
fn zero_reference_column_fails_loudly() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let cfg = common::write_sources(tmp.path());
    let content: String = common::reference_csv()
        .lines()
        .enumerate()
        .map(|(i, line)| {
            if i == 0 {
                return format!("{line}\n");
            }
            // zero out the February column (second month)
            let mut cells: Vec<String> = line.split(',').map(str::to_string).collect();
            cells[2] = "0".to_string();
            format!("{}\n", cells.join(","))
        })
        .collect();
    fs::write(&cfg.profile.reference_path, content).expect("rewrite reference");

    let err = run_pipeline(&cfg, Stage::Profile);
    assert!(matches!(
        err,
        Err(PrepError::ZeroColumnSum {
            month: Month::February,
            ..
        })
    ));
}

#[test]
fn failed_rerun_leaves_previous_artifacts_untouched() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let cfg = common::write_sources(tmp.path());
    let first = run_pipeline(&cfg, Stage::All).expect("first run");
    let snapshot: Vec<Vec<u8>> = first
        .written
        .iter()
        .map(|p| fs::read(p).expect("read artifact"))
        .collect();

    // new usage data, but a grid file the aggregator rejects
    let usage = common::usage_csv().replacen(",Residential,10,", ",Residential,20,", 1);
    fs::write(&cfg.profile.postcode_usage_path, usage).expect("rewrite usage");
    let mut grid = common::grid_csv();
    grid.push_str("not-a-date,1,1,1\n");
    fs::write(&cfg.grid.generation_path, grid).expect("rewrite grid");

    let err = run_pipeline(&cfg, Stage::All);
    assert!(matches!(err, Err(PrepError::MalformedTimestamp { .. })));
    for (path, before) in first.written.iter().zip(snapshot) {
        assert_eq!(fs::read(path).expect("read artifact"), before, "{}", path.display());
    }
}

#[test]
fn failing_stage_writes_nothing_into_fresh_output_dir() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let cfg = common::write_sources(tmp.path());
    let mut grid = common::grid_csv();
    grid.push_str("not-a-date,1,1,1\n");
    fs::write(&cfg.grid.generation_path, grid).expect("rewrite grid");

    assert!(run_pipeline(&cfg, Stage::All).is_err());
    let out = tmp.path().join("out");
    assert!(!out.join(profile_file_name(4101)).exists());
    assert!(!out.join(DEMAND_FILE).exists());
}
