//! CSV export for the derived datasets.
//!
//! Every writer emits a header row whose first column is the index, and
//! formats floats with their shortest round-trip representation so identical
//! tables always produce identical bytes. Files are truncated, never appended.

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::calendar::Month;
use crate::error::{PrepError, Result};
use crate::tables::{DemandSeries, HourMonthTable, HourlyIntensityTable};

/// File name of the hourly grid intensity artifact.
pub const GRID_CI_FILE: &str = "grid_ci.csv";
/// File name of the annual demand artifact.
pub const DEMAND_FILE: &str = "demand_timeseries.csv";

const HOUR_INDEX: &str = "hour";
const DATETIME_INDEX: &str = "datetime";
const INTENSITY_KWH_COLUMN: &str = "Emissions Intensity - kgCO₂e/kWh";
const PRICE_COLUMN: &str = "Price - AUD/MWh";
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// File name of the normalised profile artifact for `postcode`.
pub fn profile_file_name(postcode: u32) -> String {
    format!("{postcode}_monthly_usage_profile.csv")
}

/// Writes the hour-by-month profile: `hour,January,...,December`.
///
/// # Errors
///
/// Returns a `csv::Error` if writing fails.
pub fn write_profile_csv(table: &HourMonthTable, writer: impl Write) -> csv::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(std::iter::once(HOUR_INDEX).chain(Month::ALL.iter().map(|m| m.name())))?;
    for hour in 0..24 {
        let mut record = Vec::with_capacity(13);
        record.push(hour.to_string());
        record.extend(table.row(hour).iter().map(f64::to_string));
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Writes the hourly intensity table: `hour,<intensity kWh>,<price>`.
///
/// # Errors
///
/// Returns a `csv::Error` if writing fails.
pub fn write_grid_csv(table: &HourlyIntensityTable, writer: impl Write) -> csv::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record([HOUR_INDEX, INTENSITY_KWH_COLUMN, PRICE_COLUMN])?;
    for row in table.rows() {
        wtr.write_record(&[
            row.hour.to_string(),
            row.intensity_kg_per_kwh.to_string(),
            row.price_aud_per_mwh.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Writes the demand series: `datetime,<series name>`.
///
/// # Errors
///
/// Returns a `csv::Error` if writing fails.
pub fn write_demand_csv(series: &DemandSeries, writer: impl Write) -> csv::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record([DATETIME_INDEX, series.name()])?;
    for (ts, value) in series.iter() {
        wtr.write_record(&[ts.format(DATETIME_FORMAT).to_string(), value.to_string()])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Writes the normalised profile to `dir/{postcode}_monthly_usage_profile.csv`.
///
/// # Errors
///
/// [`PrepError::Io`] if the file cannot be created, [`PrepError::Csv`] if
/// writing fails.
pub fn export_profile(table: &HourMonthTable, postcode: u32, dir: &Path) -> Result<PathBuf> {
    export_to(&dir.join(profile_file_name(postcode)), |w| write_profile_csv(table, w))
}

/// Writes the hourly intensity table to `dir/grid_ci.csv`.
///
/// # Errors
///
/// As for [`export_profile`].
pub fn export_grid(table: &HourlyIntensityTable, dir: &Path) -> Result<PathBuf> {
    export_to(&dir.join(GRID_CI_FILE), |w| write_grid_csv(table, w))
}

/// Writes the demand series to `dir/demand_timeseries.csv`.
///
/// # Errors
///
/// As for [`export_profile`].
pub fn export_demand(series: &DemandSeries, dir: &Path) -> Result<PathBuf> {
    export_to(&dir.join(DEMAND_FILE), |w| write_demand_csv(series, w))
}

fn export_to<F>(path: &Path, write: F) -> Result<PathBuf>
where
    F: FnOnce(io::BufWriter<File>) -> csv::Result<()>,
{
    let file = File::create(path).map_err(|source| PrepError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    write(io::BufWriter::new(file)).map_err(|source| PrepError::Csv {
        source_name: path.display().to_string(),
        source,
    })?;
    Ok(path.to_path_buf())
}
