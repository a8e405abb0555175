use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::calendar::{DAYS_PER_YEAR, HOURS_PER_DAY, Month};

/// Column name of the annual demand series.
pub const DEMAND_COLUMN: &str = "Demand (KWh)";

/// A named, hourly-indexed demand series starting at midnight on Jan 1.
///
/// Timestamps are implicit: entry `i` is `start + i hours`, so the index is
/// strictly increasing and gap-free by construction.
#[derive(Debug, Clone, PartialEq)]
pub struct DemandSeries {
    name: String,
    start: NaiveDateTime,
    values: Vec<f64>,
}

impl DemandSeries {
    /// Creates a series for `year` whose first value is at Jan 1 00:00.
    ///
    /// Returns `None` if `year` is outside chrono's supported range.
    pub fn for_year(name: impl Into<String>, year: i32, values: Vec<f64>) -> Option<Self> {
        let start = NaiveDate::from_ymd_opt(year, 1, 1)?.and_hms_opt(0, 0, 0)?;
        Some(Self {
            name: name.into(),
            start,
            values,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Timestamp of the first entry.
    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    /// Timestamp of entry `index`.
    pub fn timestamp(&self, index: usize) -> NaiveDateTime {
        self.start + Duration::hours(index as i64)
    }

    /// Iterates `(timestamp, value)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDateTime, f64)> + '_ {
        self.values
            .iter()
            .enumerate()
            .map(|(i, &v)| (self.timestamp(i), v))
    }

    /// Sum of all values (kWh).
    pub fn annual_total(&self) -> f64 {
        self.values.iter().sum()
    }

    /// Per-day totals, one per full day in the series.
    pub fn daily_totals(&self) -> Vec<f64> {
        self.values
            .chunks_exact(HOURS_PER_DAY)
            .map(|day| day.iter().sum())
            .collect()
    }

    /// Per-month totals for a 365-day series (January first).
    ///
    /// Days past the end of the series contribute nothing.
    pub fn monthly_totals(&self) -> [f64; 12] {
        let mut totals = [0.0; 12];
        for (day_index, total) in self.daily_totals().into_iter().take(DAYS_PER_YEAR).enumerate() {
            totals[Month::from_day_of_year(day_index + 1).index()] += total;
        }
        totals
    }

    /// Timestamp and value of the largest entry; `None` when empty.
    ///
    /// Ties resolve to the earliest entry.
    pub fn peak(&self) -> Option<(NaiveDateTime, f64)> {
        self.iter()
            .fold(None, |best: Option<(NaiveDateTime, f64)>, (ts, v)| match best {
                Some((_, b)) if b >= v => best,
                _ => Some((ts, v)),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::HOURS_PER_YEAR;

    fn flat_year(value: f64) -> Option<DemandSeries> {
        DemandSeries::for_year(DEMAND_COLUMN, 2013, vec![value; HOURS_PER_YEAR])
    }

    #[test]
    fn timestamps_are_hourly_from_new_year() {
        let series = flat_year(1.0);
        let series = series.as_ref();
        assert_eq!(
            series.map(|s| s.timestamp(0).to_string()),
            Some("2013-01-01 00:00:00".to_string())
        );
        assert_eq!(
            series.map(|s| s.timestamp(HOURS_PER_YEAR - 1).to_string()),
            Some("2013-12-31 23:00:00".to_string())
        );
    }

    #[test]
    fn resampling_totals() {
        let series = flat_year(0.5);
        let series = series.as_ref();
        let daily = series.map(DemandSeries::daily_totals).unwrap_or_default();
        assert_eq!(daily.len(), DAYS_PER_YEAR);
        assert!(daily.iter().all(|d| (*d - 12.0).abs() < 1e-12));

        let monthly = series.map(DemandSeries::monthly_totals);
        assert_eq!(monthly.map(|m| m[Month::February.index()]), Some(28.0 * 12.0));
        assert_eq!(monthly.map(|m| m[Month::December.index()]), Some(31.0 * 12.0));
        assert_eq!(series.map(DemandSeries::annual_total), Some(4380.0));
    }

    #[test]
    fn peak_prefers_earliest_maximum() {
        let mut values = vec![1.0; 48];
        values[5] = 3.0;
        values[30] = 3.0;
        let series = DemandSeries::for_year("x", 2013, values);
        let peak = series.as_ref().and_then(DemandSeries::peak);
        assert_eq!(peak.map(|(ts, _)| ts.to_string()), Some("2013-01-01 05:00:00".to_string()));
        assert_eq!(peak.map(|(_, v)| v), Some(3.0));
    }
}
