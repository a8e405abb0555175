//! Shared fixtures for integration tests: small source files in a temp dir.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use demand_prep::calendar::Month;
use demand_prep::config::PipelineConfig;

/// January usage (kWh/customer/day) for postcode 4101 in 2024.
pub const JANUARY_USAGE: f64 = 10.0;

/// Per-month usage for the target row: 10.0 in January, falling 0.5 per month.
pub fn target_usage() -> [f64; 12] {
    std::array::from_fn(|i| JANUARY_USAGE - 0.5 * i as f64)
}

/// Reference weight: January is a flat 31.0 per hour (sums to 744); other
/// months follow a repeating six-hour ramp scaled by month number.
pub fn reference_weight(hour: usize, month: Month) -> f64 {
    if month == Month::January {
        31.0
    } else {
        ((hour % 6) + 1) as f64 * (month.index() + 1) as f64
    }
}

pub fn reference_csv() -> String {
    let names: Vec<&str> = Month::ALL.iter().map(|m| m.name()).collect();
    let mut out = format!("Hour,{}\n", names.join(","));
    for hour in 0..24 {
        let cells: Vec<String> = Month::ALL
            .iter()
            .map(|&m| reference_weight(hour, m).to_string())
            .collect();
        out.push_str(&format!("{hour},{}\n", cells.join(",")));
    }
    out
}

pub fn usage_csv() -> String {
    let months = |values: [f64; 12]| {
        values
            .iter()
            .map(f64::to_string)
            .collect::<Vec<_>>()
            .join(",")
    };
    let mut out = String::from("Usage by Postcode\n");
    out.push_str("Year,Postcode,Data Type,Customer Type,Jan,Feb,Mar,Apr,May,Jun,Jul,Aug,Sep,Oct,Nov,Dec\n");
    let rows = [
        (2024, 4101, "Average daily usage (kWh)", "Residential", target_usage()),
        (2024, 4101, "Average daily usage (kWh)", "Business", [80.0; 12]),
        (2024, 4101, "Customer count", "Residential", [9000.0; 12]),
        (2023, 4101, "Average daily usage (kWh)", "Residential", [11.0; 12]),
        (2024, 4000, "Average daily usage (kWh)", "Residential", [14.0; 12]),
    ];
    for (year, postcode, data_type, customer_type, values) in rows {
        out.push_str(&format!(
            "{year},{postcode},{data_type},{customer_type},{}\n",
            months(values)
        ));
    }
    out
}

/// Two days of half-hourly records. Intensity at hour `h` averages to
/// `500 + 10h` kg/MWh and price to `40 + h` AUD/MWh.
pub fn grid_csv() -> String {
    let mut out = String::from("date,Emissions Intensity - kgCO₂e/MWh,Price - AUD/MWh,Demand - MW\n");
    for (day, delta) in [(1, -20.0), (2, 20.0)] {
        for hour in 0..24 {
            for minute in [0, 30] {
                let intensity = 500.0 + 10.0 * hour as f64 + delta;
                let price = 40.0 + hour as f64 - delta / 10.0;
                out.push_str(&format!(
                    "2024-01-{day:02} {hour:02}:{minute:02}:00+10:00,{intensity},{price},1234\n"
                ));
            }
        }
    }
    out
}

/// Writes the three source files under `dir/data` and returns a config
/// pointing at them with outputs under `dir/out`.
pub fn write_sources(dir: &Path) -> PipelineConfig {
    let data = dir.join("data");
    fs::create_dir_all(&data).expect("create data dir");
    fs::write(data.join("reference.csv"), reference_csv()).expect("write reference");
    fs::write(data.join("usage.csv"), usage_csv()).expect("write usage");
    fs::write(data.join("grid.csv"), grid_csv()).expect("write grid");

    let mut cfg = PipelineConfig::apartment();
    cfg.profile.reference_path = data.join("reference.csv");
    cfg.profile.postcode_usage_path = data.join("usage.csv");
    cfg.grid.generation_path = data.join("grid.csv");
    cfg.output.dir = dir.join("out");
    cfg
}

/// Renders a config as TOML for CLI runs.
pub fn config_toml(cfg: &PipelineConfig) -> String {
    let p = |path: &PathBuf| path.display().to_string().replace('\\', "/");
    format!(
        "[profile]\nreference_path = \"{}\"\npostcode_usage_path = \"{}\"\n\n\
         [grid]\ngeneration_path = \"{}\"\n\n[output]\ndir = \"{}\"\n",
        p(&cfg.profile.reference_path),
        p(&cfg.profile.postcode_usage_path),
        p(&cfg.grid.generation_path),
        p(&cfg.output.dir),
    )
}
