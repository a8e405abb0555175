use crate::calendar::{HOURS_PER_DAY, Month};

/// An hour-of-day by calendar-month grid of values.
///
/// Rows are hours 0-23, columns are January through December. Used both for
/// the unitless reference weights and for the normalised per-customer
/// kWh-per-hour profile, which share the same shape.
#[derive(Debug, Clone, PartialEq)]
pub struct HourMonthTable {
    values: [[f64; 12]; HOURS_PER_DAY],
}

impl HourMonthTable {
    /// Creates a table from row-major `[hour][month]` values.
    pub fn new(values: [[f64; 12]; HOURS_PER_DAY]) -> Self {
        Self { values }
    }

    /// Creates a table filled with zeros.
    pub fn zeros() -> Self {
        Self::new([[0.0; 12]; HOURS_PER_DAY])
    }

    /// Value at `(hour, month)`.
    ///
    /// # Panics
    ///
    /// Panics if `hour` is not in `0..24`.
    pub fn get(&self, hour: usize, month: Month) -> f64 {
        self.values[hour][month.index()]
    }

    /// Sets the value at `(hour, month)`.
    ///
    /// # Panics
    ///
    /// Panics if `hour` is not in `0..24`.
    pub fn set(&mut self, hour: usize, month: Month, value: f64) {
        self.values[hour][month.index()] = value;
    }

    /// The 24 hourly values of one month column.
    pub fn column(&self, month: Month) -> [f64; HOURS_PER_DAY] {
        std::array::from_fn(|hour| self.get(hour, month))
    }

    /// The 12 monthly values of one hour row.
    pub fn row(&self, hour: usize) -> &[f64; 12] {
        &self.values[hour]
    }

    /// Sum of one month column across all hours.
    pub fn column_sum(&self, month: Month) -> f64 {
        self.values.iter().map(|row| row[month.index()]).sum()
    }

    /// Iterates `(hour, month, value)` over every cell, hour-major.
    pub fn cells(&self) -> impl Iterator<Item = (usize, Month, f64)> + '_ {
        self.values.iter().enumerate().flat_map(|(hour, row)| {
            Month::ALL
                .iter()
                .map(move |&month| (hour, month, row[month.index()]))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_and_row_views_agree() {
        let mut table = HourMonthTable::zeros();
        table.set(3, Month::April, 2.5);
        table.set(4, Month::April, 1.5);
        assert_eq!(table.column(Month::April)[3], 2.5);
        assert_eq!(table.row(4)[Month::April.index()], 1.5);
        assert_eq!(table.column_sum(Month::April), 4.0);
        assert_eq!(table.column_sum(Month::May), 0.0);
    }

    #[test]
    fn cells_visits_every_value_once() {
        let table = HourMonthTable::new([[1.0; 12]; HOURS_PER_DAY]);
        assert_eq!(table.cells().count(), 24 * 12);
        assert_eq!(table.cells().map(|(_, _, v)| v).sum::<f64>(), 288.0);
    }
}
