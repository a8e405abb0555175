//! Annual Hourly Demand Synthesizer: expands the 24x12 monthly profile into
//! a non-leap-year hourly series.

use tracing::info;

use crate::calendar::{DAYS_PER_YEAR, HOURS_PER_DAY, HOURS_PER_YEAR, Month, is_leap_year};
use crate::error::{PrepError, Result};
use crate::interp::PeriodicInterpolator;
use crate::tables::{DEMAND_COLUMN, DemandSeries, HourMonthTable};

/// Interpolates one hour-of-day's 12 monthly values across days 1..=365.
///
/// Each monthly value is anchored on the 15th of its month; days before
/// Jan 15 and after Dec 15 blend December into January across the year
/// boundary.
///
/// # Errors
///
/// Returns [`PrepError::NonFinite`] if any monthly value is NaN/infinite.
pub fn interpolate_hour(monthly: &[f64; 12]) -> Result<Vec<f64>> {
    let anchors: Vec<(f64, f64)> = Month::ALL
        .iter()
        .map(|m| (m.anchor_day_of_year() as f64, monthly[m.index()]))
        .collect();
    let interp = PeriodicInterpolator::new(&anchors, DAYS_PER_YEAR as f64)?;
    Ok((1..=DAYS_PER_YEAR)
        .map(|day| interp.value_at(day as f64))
        .collect())
}

/// Builds the day-by-hour grid: `grid[day][hour]`, 365 rows of 24.
///
/// # Errors
///
/// Returns [`PrepError::NonFinite`] naming the first non-finite profile cell.
pub fn daily_grid(profile: &HourMonthTable) -> Result<Vec<[f64; HOURS_PER_DAY]>> {
    if let Some((hour, month, value)) = profile.cells().find(|(_, _, v)| !v.is_finite()) {
        return Err(PrepError::NonFinite {
            context: format!("monthly profile {month} hour {hour}"),
            value,
        });
    }

    let mut grid = vec![[0.0; HOURS_PER_DAY]; DAYS_PER_YEAR];
    for hour in 0..HOURS_PER_DAY {
        let daily = interpolate_hour(profile.row(hour))?;
        for (day, value) in daily.into_iter().enumerate() {
            grid[day][hour] = value;
        }
    }
    Ok(grid)
}

/// Produces the 8760-entry hourly demand series for `reference_year`.
///
/// The day-by-hour grid is flattened day-major, hour-minor, and indexed from
/// Jan 1 00:00 through Dec 31 23:00.
///
/// # Errors
///
/// * [`PrepError::LeapReferenceYear`] if `reference_year` has a Feb 29
/// * [`PrepError::NonFinite`] for a non-finite profile value
pub fn synthesize_annual(profile: &HourMonthTable, reference_year: i32) -> Result<DemandSeries> {
    if is_leap_year(reference_year) {
        return Err(PrepError::LeapReferenceYear(reference_year));
    }

    let values: Vec<f64> = daily_grid(profile)?.into_iter().flatten().collect();
    debug_assert_eq!(values.len(), HOURS_PER_YEAR);

    let series = DemandSeries::for_year(DEMAND_COLUMN, reference_year, values).ok_or_else(|| {
        PrepError::Interpolation(format!("reference year {reference_year} is out of range"))
    })?;
    info!(
        reference_year,
        hours = series.len(),
        annual_kwh = series.annual_total(),
        "synthesised annual hourly demand"
    );
    Ok(series)
}
