//! Error type shared by the loaders and pipeline stages.

use std::io;
use std::path::PathBuf;

use crate::calendar::Month;

/// Every failure the pipeline can surface.
///
/// All variants are data-quality or configuration problems; none are
/// transient, so callers abort the affected stage rather than retry.
#[derive(Debug, thiserror::Error)]
pub enum PrepError {
    /// The requested `(year, postcode)` pair is absent after filtering.
    #[error("no usage row for postcode {postcode} in year {year} ({data_type} / {customer_type})")]
    MissingKey {
        year: i32,
        postcode: u32,
        data_type: String,
        customer_type: String,
    },

    /// More than one row matches the requested `(year, postcode)` pair.
    #[error("{count} usage rows match postcode {postcode} in year {year}; expected exactly one")]
    AmbiguousKey {
        year: i32,
        postcode: u32,
        count: usize,
    },

    /// An expected column is absent from a source table.
    #[error("{source_name}: expected column \"{column}\" not found")]
    MissingColumn { source_name: String, column: String },

    /// A table lacks one or more of the twelve month columns.
    #[error("{source_name}: missing month column(s): {}", join_months(.missing))]
    MissingMonths {
        source_name: String,
        missing: Vec<Month>,
    },

    /// A reference profile column sums to zero (or a non-positive value).
    #[error("reference profile column {month} sums to {sum}; cannot normalise")]
    ZeroColumnSum { month: Month, sum: f64 },

    /// A value that must be finite is NaN or infinite.
    #[error("{context}: non-finite value {value}")]
    NonFinite { context: String, value: f64 },

    /// A reference profile weight is negative.
    #[error("reference profile {month} hour {hour}: negative weight {value}")]
    NegativeWeight { month: Month, hour: usize, value: f64 },

    /// A table's rows or columns are laid out wrongly (duplicate or missing hours, repeated months).
    #[error("{source_name}: {message}")]
    BadLayout { source_name: String, message: String },

    /// A timestamp cell could not be parsed.
    #[error("{source_name} line {line}: malformed timestamp \"{value}\"")]
    MalformedTimestamp {
        source_name: String,
        line: u64,
        value: String,
    },

    /// A numeric cell could not be parsed.
    #[error("{source_name} line {line}, column \"{column}\": malformed number \"{value}\"")]
    MalformedNumber {
        source_name: String,
        line: u64,
        column: String,
        value: String,
    },

    /// No usable records fell into an hour-of-day bucket.
    #[error("no generation records with a usable {field} for hour {hour}")]
    EmptyHourBucket { hour: usize, field: &'static str },

    /// The timestamp year of the annual series has a Feb 29.
    #[error("reference year {0} is a leap year; the annual series needs a 365-day year")]
    LeapReferenceYear(i32),

    /// Interpolation anchors are unusable.
    #[error("interpolation: {0}")]
    Interpolation(String),

    /// Filesystem failure while reading or writing a table.
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// CSV framing failure.
    #[error("{source_name}: {source}")]
    Csv {
        source_name: String,
        #[source]
        source: csv::Error,
    },
}

fn join_months(months: &[Month]) -> String {
    months
        .iter()
        .map(|m| m.name())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Convenience alias for fallible pipeline operations.
pub type Result<T> = std::result::Result<T, PrepError>;
