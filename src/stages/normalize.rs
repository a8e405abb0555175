//! Usage Profile Normalizer: rescales the reference hour-by-month weights to
//! a postcode's known per-customer daily consumption.

use tracing::{debug, info};

use crate::calendar::{HOURS_PER_DAY, Month};
use crate::error::{PrepError, Result};
use crate::tables::{HourMonthTable, PostcodeUsageTable};

/// Which postcode slice to scale to, and the dwelling adjustment to apply.
#[derive(Debug, Clone, PartialEq)]
pub struct UsageSelection {
    pub year: i32,
    pub postcode: u32,
    /// "Data Type" filter value.
    pub data_type: String,
    /// "Customer Type" filter value.
    pub customer_type: String,
    /// Occupancy/dwelling-type multiplier (e.g. 0.79 for apartments).
    pub scale_factor: f64,
}

/// Filters the postcode table to the selected slice, looks up the month
/// vector for `(year, postcode)` and normalises the reference profile to it.
///
/// # Errors
///
/// Propagates [`PostcodeUsageTable::month_usage`] and [`normalize_profile`]
/// errors.
pub fn normalize_for_postcode(
    reference: &HourMonthTable,
    usage: &PostcodeUsageTable,
    selection: &UsageSelection,
) -> Result<HourMonthTable> {
    let slice = usage.filter(&selection.data_type, &selection.customer_type);
    let month_usage = slice.month_usage(
        selection.year,
        selection.postcode,
        &selection.data_type,
        &selection.customer_type,
    )?;
    debug!(
        year = selection.year,
        postcode = selection.postcode,
        ?month_usage,
        "selected postcode month usage"
    );
    let profile = normalize_profile(reference, &month_usage, selection.scale_factor)?;
    info!(
        postcode = selection.postcode,
        year = selection.year,
        scale_factor = selection.scale_factor,
        "normalised monthly usage profile"
    );
    Ok(profile)
}

/// Rescales each month column so it sums to that month's usage times
/// `scale_factor`.
///
/// Each reference column is divided by its own sum, multiplied by the
/// corresponding `month_usage` entry (kWh per customer per day) and then by
/// `scale_factor`. The result is in kWh per hour per customer.
///
/// # Errors
///
/// * [`PrepError::NonFinite`] for a NaN/infinite weight, usage value or scale factor
/// * [`PrepError::NegativeWeight`] for a negative reference weight
/// * [`PrepError::ZeroColumnSum`] when a column does not sum to a positive value
pub fn normalize_profile(
    reference: &HourMonthTable,
    month_usage: &[f64; 12],
    scale_factor: f64,
) -> Result<HourMonthTable> {
    if !scale_factor.is_finite() {
        return Err(PrepError::NonFinite {
            context: "scale factor".into(),
            value: scale_factor,
        });
    }

    for (hour, month, value) in reference.cells() {
        if !value.is_finite() {
            return Err(PrepError::NonFinite {
                context: format!("reference profile {month} hour {hour}"),
                value,
            });
        }
        if value < 0.0 {
            return Err(PrepError::NegativeWeight { month, hour, value });
        }
    }

    let mut out = HourMonthTable::zeros();
    for month in Month::ALL {
        let usage = month_usage[month.index()];
        if !usage.is_finite() {
            return Err(PrepError::NonFinite {
                context: format!("postcode usage for {month}"),
                value: usage,
            });
        }

        let sum = reference.column_sum(month);
        if !(sum > 0.0 && sum.is_finite()) {
            return Err(PrepError::ZeroColumnSum { month, sum });
        }

        for hour in 0..HOURS_PER_DAY {
            let share = reference.get(hour, month) / sum;
            out.set(hour, month, share * usage * scale_factor);
        }
    }
    Ok(out)
}
