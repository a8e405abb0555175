//! CSV loaders for the three source tables.
//!
//! Column names are matched after trimming, ignoring ASCII case. A missing
//! expected column is a hard error so upstream renames surface immediately.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Read;
use std::path::Path;

use chrono::{DateTime, NaiveDateTime};
use tracing::{debug, info, warn};

use crate::calendar::{HOURS_PER_DAY, Month};
use crate::error::{PrepError, Result};
use crate::tables::{GenerationRecord, HourMonthTable, PostcodeUsageRow, PostcodeUsageTable};

pub const YEAR_COLUMN: &str = "Year";
pub const POSTCODE_COLUMN: &str = "Postcode";
pub const DATA_TYPE_COLUMN: &str = "Data Type";
/// Accepted headers for the customer-type column, in preference order.
pub const CUSTOMER_TYPE_COLUMNS: &[&str] = &["Customer Type", "Consumption Type"];

/// Header names of the grid generation export.
#[derive(Debug, Clone, PartialEq)]
pub struct GridColumns {
    pub date: String,
    pub intensity: String,
    pub price: String,
}

impl Default for GridColumns {
    fn default() -> Self {
        Self {
            date: "date".to_string(),
            intensity: "Emissions Intensity - kgCO₂e/MWh".to_string(),
            price: "Price - AUD/MWh".to_string(),
        }
    }
}

/// Reads the reference hour-by-month profile from a CSV export.
///
/// The first column holds the hour of day (`0`, `13`, `13:00`, `7.0`); the
/// remaining headers are month names in any order. Non-month columns are
/// ignored with a warning.
///
/// # Errors
///
/// See [`parse_reference_profile`]; also [`PrepError::Io`] if the file
/// cannot be opened.
pub fn read_reference_profile(path: &Path) -> Result<HourMonthTable> {
    let file = open(path)?;
    parse_reference_profile(file, &path.display().to_string())
}

/// Parses a reference profile from any reader. `source_name` labels errors.
///
/// # Errors
///
/// * [`PrepError::MissingMonths`] if any of the 12 month columns is absent
/// * [`PrepError::BadLayout`] unless hours 0-23 each appear exactly once
/// * [`PrepError::MalformedNumber`] for an unparseable weight
pub fn parse_reference_profile<R: Read>(reader: R, source_name: &str) -> Result<HourMonthTable> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let headers = rdr.headers().map_err(|e| csv_err(source_name, e))?.clone();

    let mut month_cols: BTreeMap<Month, usize> = BTreeMap::new();
    for (idx, name) in headers.iter().enumerate().skip(1) {
        match Month::parse(name) {
            Some(month) => {
                if month_cols.insert(month, idx).is_some() {
                    return Err(PrepError::BadLayout {
                        source_name: source_name.to_string(),
                        message: format!("month {month} appears in more than one column"),
                    });
                }
            }
            None => warn!(source = source_name, column = name, "ignoring non-month column"),
        }
    }
    require_all_months(&month_cols, source_name)?;

    let mut table = HourMonthTable::zeros();
    let mut seen = [false; HOURS_PER_DAY];
    for result in rdr.records() {
        let record = result.map_err(|e| csv_err(source_name, e))?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        let line = line_of(&record);
        let raw_hour = record.get(0).unwrap_or_default();
        let hour = parse_hour(raw_hour)
            .filter(|h| *h < HOURS_PER_DAY)
            .ok_or_else(|| PrepError::BadLayout {
                source_name: source_name.to_string(),
                message: format!("line {line}: \"{raw_hour}\" is not an hour of day 0-23"),
            })?;
        if std::mem::replace(&mut seen[hour], true) {
            return Err(PrepError::BadLayout {
                source_name: source_name.to_string(),
                message: format!("line {line}: hour {hour} appears more than once"),
            });
        }
        for (&month, &idx) in &month_cols {
            let cell = record.get(idx).unwrap_or_default();
            let value = parse_number(cell).ok_or_else(|| PrepError::MalformedNumber {
                source_name: source_name.to_string(),
                line,
                column: headers.get(idx).unwrap_or_default().to_string(),
                value: cell.to_string(),
            })?;
            table.set(hour, month, value);
        }
    }

    let missing: Vec<String> = seen
        .iter()
        .enumerate()
        .filter(|(_, s)| !**s)
        .map(|(h, _)| h.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(PrepError::BadLayout {
            source_name: source_name.to_string(),
            message: format!("missing hour(s): {}", missing.join(", ")),
        });
    }

    info!(source = source_name, "loaded reference profile");
    Ok(table)
}

/// Reads the postcode usage table from a CSV export of the
/// "Usage by Postcode" sheet.
///
/// `preamble_rows` physical lines are skipped before the header row.
///
/// # Errors
///
/// See [`parse_postcode_usage`]; also [`PrepError::Io`] if the file cannot
/// be read.
pub fn read_postcode_usage(path: &Path, preamble_rows: usize) -> Result<PostcodeUsageTable> {
    let content = fs::read_to_string(path).map_err(|source| PrepError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_postcode_usage(&content, preamble_rows, &path.display().to_string())
}

/// Parses postcode usage rows from CSV text after skipping `preamble_rows`
/// lines.
///
/// Rows with a blank year and postcode (spreadsheet padding) or a blank data
/// type (footnotes such as `Source: Energex`) are skipped. Blank month cells
/// load as NaN.
///
/// # Errors
///
/// * [`PrepError::MissingColumn`] for an absent key column
/// * [`PrepError::MissingMonths`] if any month column is absent
/// * [`PrepError::MalformedNumber`] for an unparseable key or month cell
pub fn parse_postcode_usage(
    content: &str,
    preamble_rows: usize,
    source_name: &str,
) -> Result<PostcodeUsageTable> {
    let body = skip_lines(content, preamble_rows);
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(body.as_bytes());
    let headers = rdr.headers().map_err(|e| csv_err(source_name, e))?.clone();

    let year_idx = column_index(&headers, YEAR_COLUMN, source_name)?;
    let postcode_idx = column_index(&headers, POSTCODE_COLUMN, source_name)?;
    let data_type_idx = column_index(&headers, DATA_TYPE_COLUMN, source_name)?;
    let customer_idx = CUSTOMER_TYPE_COLUMNS
        .iter()
        .find_map(|name| find_column(&headers, name))
        .ok_or_else(|| PrepError::MissingColumn {
            source_name: source_name.to_string(),
            column: CUSTOMER_TYPE_COLUMNS.join("\" or \""),
        })?;

    let mut month_cols: BTreeMap<Month, usize> = BTreeMap::new();
    for (idx, name) in headers.iter().enumerate() {
        if let Some(month) = Month::parse(name) {
            month_cols.entry(month).or_insert(idx);
        }
    }
    require_all_months(&month_cols, source_name)?;

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(|e| csv_err(source_name, e))?;
        let line = line_of(&record) + preamble_rows as u64;
        let cell = |idx: usize| record.get(idx).unwrap_or_default();
        if cell(year_idx).is_empty() && cell(postcode_idx).is_empty() {
            continue;
        }
        if cell(data_type_idx).is_empty() {
            debug!(source = source_name, line, "skipping row without a data type");
            continue;
        }
        let malformed = |idx: usize| PrepError::MalformedNumber {
            source_name: source_name.to_string(),
            line,
            column: headers.get(idx).unwrap_or_default().to_string(),
            value: cell(idx).to_string(),
        };

        let year = parse_integer(cell(year_idx))
            .and_then(|v| i32::try_from(v).ok())
            .ok_or_else(|| malformed(year_idx))?;
        let postcode = parse_integer(cell(postcode_idx))
            .and_then(|v| u32::try_from(v).ok())
            .ok_or_else(|| malformed(postcode_idx))?;

        let mut months = [f64::NAN; 12];
        for (&month, &idx) in &month_cols {
            let raw = cell(idx);
            if raw.is_empty() {
                continue;
            }
            months[month.index()] = parse_number(raw).ok_or_else(|| malformed(idx))?;
        }

        rows.push(PostcodeUsageRow {
            year,
            postcode,
            data_type: cell(data_type_idx).to_string(),
            customer_type: cell(customer_idx).to_string(),
            months,
        });
    }

    info!(source = source_name, rows = rows.len(), "loaded postcode usage table");
    Ok(PostcodeUsageTable::new(rows))
}

/// Reads grid generation records from a CSV export.
///
/// # Errors
///
/// See [`parse_generation_records`]; also [`PrepError::Io`] if the file
/// cannot be opened.
pub fn read_generation_records(path: &Path, columns: &GridColumns) -> Result<Vec<GenerationRecord>> {
    let file = open(path)?;
    parse_generation_records(file, columns, &path.display().to_string())
}

/// Parses grid generation records from any reader.
///
/// Blank intensity/price cells become `None`.
///
/// # Errors
///
/// * [`PrepError::MissingColumn`] if a configured column is absent
/// * [`PrepError::MalformedTimestamp`] for an unparseable date cell
/// * [`PrepError::MalformedNumber`] for an unparseable intensity/price cell
pub fn parse_generation_records<R: Read>(
    reader: R,
    columns: &GridColumns,
    source_name: &str,
) -> Result<Vec<GenerationRecord>> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let headers = rdr.headers().map_err(|e| csv_err(source_name, e))?.clone();

    let date_idx = column_index(&headers, &columns.date, source_name)?;
    let intensity_idx = column_index(&headers, &columns.intensity, source_name)?;
    let price_idx = column_index(&headers, &columns.price, source_name)?;

    let mut records = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(|e| csv_err(source_name, e))?;
        let line = line_of(&record);
        let raw_date = record.get(date_idx).unwrap_or_default();
        let timestamp = parse_timestamp(raw_date).ok_or_else(|| PrepError::MalformedTimestamp {
            source_name: source_name.to_string(),
            line,
            value: raw_date.to_string(),
        })?;

        let optional = |idx: usize, column: &str| -> Result<Option<f64>> {
            let raw = record.get(idx).unwrap_or_default();
            if raw.is_empty() {
                return Ok(None);
            }
            parse_number(raw)
                .map(Some)
                .ok_or_else(|| PrepError::MalformedNumber {
                    source_name: source_name.to_string(),
                    line,
                    column: column.to_string(),
                    value: raw.to_string(),
                })
        };

        records.push(GenerationRecord {
            timestamp,
            intensity_kg_per_mwh: optional(intensity_idx, &columns.intensity)?,
            price_aud_per_mwh: optional(price_idx, &columns.price)?,
        });
    }

    info!(source = source_name, records = records.len(), "loaded grid generation records");
    Ok(records)
}

/// Parses a grid timestamp into wall-clock time.
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM[:SS]` with an optional `±HH:MM`
/// offset, and `DD/MM/YYYY HH:MM[:SS]`. Offsets are dropped: the hour of day
/// is the one written in the source.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    for fmt in ["%Y-%m-%d %H:%M:%S%:z", "%Y-%m-%d %H:%M%:z"] {
        if let Ok(dt) = DateTime::parse_from_str(raw, fmt) {
            return Some(dt.naive_local());
        }
    }
    [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
        "%d/%m/%Y %H:%M:%S",
        "%d/%m/%Y %H:%M",
    ]
    .iter()
    .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|source| PrepError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn csv_err(source_name: &str, source: csv::Error) -> PrepError {
    PrepError::Csv {
        source_name: source_name.to_string(),
        source,
    }
}

fn line_of(record: &csv::StringRecord) -> u64 {
    record.position().map_or(0, csv::Position::line)
}

fn find_column(headers: &csv::StringRecord, name: &str) -> Option<usize> {
    let wanted = name.trim();
    headers.iter().position(|h| h.trim().eq_ignore_ascii_case(wanted))
}

fn column_index(headers: &csv::StringRecord, name: &str, source_name: &str) -> Result<usize> {
    find_column(headers, name).ok_or_else(|| PrepError::MissingColumn {
        source_name: source_name.to_string(),
        column: name.to_string(),
    })
}

fn require_all_months(found: &BTreeMap<Month, usize>, source_name: &str) -> Result<()> {
    let missing: Vec<Month> = Month::ALL
        .iter()
        .copied()
        .filter(|m| !found.contains_key(m))
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(PrepError::MissingMonths {
            source_name: source_name.to_string(),
            missing,
        })
    }
}

/// Skips `n` physical lines (LF or CRLF).
fn skip_lines(content: &str, n: usize) -> &str {
    let mut rest = content;
    for _ in 0..n {
        match rest.find('\n') {
            Some(pos) => rest = &rest[pos + 1..],
            None => return "",
        }
    }
    rest
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().replace(',', "").parse::<f64>().ok()
}

/// Integers as exported from spreadsheets: `"4101"` or `"4101.0"`.
fn parse_integer(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if let Ok(v) = raw.parse::<i64>() {
        return Some(v);
    }
    let v = raw.parse::<f64>().ok()?;
    (v.is_finite() && v.fract() == 0.0).then_some(v as i64)
}

fn parse_hour(raw: &str) -> Option<usize> {
    let head = raw.split(':').next().unwrap_or_default();
    parse_integer(head).and_then(|v| usize::try_from(v).ok())
}
