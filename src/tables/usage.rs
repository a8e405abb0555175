use tracing::debug;

use crate::error::{PrepError, Result};

/// One row of the postcode-level usage table.
///
/// Month cells hold the average energy per customer per day (kWh); empty
/// source cells load as NaN and are rejected only if the row is selected.
#[derive(Debug, Clone, PartialEq)]
pub struct PostcodeUsageRow {
    pub year: i32,
    pub postcode: u32,
    pub data_type: String,
    pub customer_type: String,
    /// January through December.
    pub months: [f64; 12],
}

/// Postcode-level annual usage table keyed by
/// `(year, postcode, data type, customer type)`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostcodeUsageTable {
    rows: Vec<PostcodeUsageRow>,
}

impl PostcodeUsageTable {
    pub fn new(rows: Vec<PostcodeUsageRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[PostcodeUsageRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Keeps only rows of one data-type/customer-type slice.
    ///
    /// Matching trims surrounding whitespace and ignores ASCII case.
    pub fn filter(&self, data_type: &str, customer_type: &str) -> PostcodeUsageTable {
        let rows: Vec<PostcodeUsageRow> = self
            .rows
            .iter()
            .filter(|r| {
                r.data_type.trim().eq_ignore_ascii_case(data_type.trim())
                    && r.customer_type
                        .trim()
                        .eq_ignore_ascii_case(customer_type.trim())
            })
            .cloned()
            .collect();
        debug!(
            data_type,
            customer_type,
            kept = rows.len(),
            total = self.rows.len(),
            "filtered postcode usage table"
        );
        PostcodeUsageTable { rows }
    }

    /// Looks up the 12-value month vector for one `(year, postcode)` pair.
    ///
    /// The table is expected to be already filtered to a single slice; the
    /// `data_type`/`customer_type` arguments only label the error.
    ///
    /// # Errors
    ///
    /// [`PrepError::MissingKey`] if no row matches, and
    /// [`PrepError::AmbiguousKey`] if more than one does.
    pub fn month_usage(
        &self,
        year: i32,
        postcode: u32,
        data_type: &str,
        customer_type: &str,
    ) -> Result<[f64; 12]> {
        let matches: Vec<&PostcodeUsageRow> = self
            .rows
            .iter()
            .filter(|r| r.year == year && r.postcode == postcode)
            .collect();
        match matches.as_slice() {
            [row] => Ok(row.months),
            [] => Err(PrepError::MissingKey {
                year,
                postcode,
                data_type: data_type.to_string(),
                customer_type: customer_type.to_string(),
            }),
            many => Err(PrepError::AmbiguousKey {
                year,
                postcode,
                count: many.len(),
            }),
        }
    }
}
