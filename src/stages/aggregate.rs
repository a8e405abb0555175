//! Emissions Intensity Aggregator: mean grid intensity and price by hour of day.

use chrono::Timelike;
use tracing::info;

use crate::calendar::HOURS_PER_DAY;
use crate::error::{PrepError, Result};
use crate::tables::{GenerationRecord, HourlyIntensityTable};

/// kg per MWh to kg per kWh.
const KWH_PER_MWH: f64 = 1000.0;

#[derive(Debug, Clone, Copy, Default)]
struct Mean {
    sum: f64,
    count: usize,
}

impl Mean {
    fn push(&mut self, value: Option<f64>) {
        if let Some(v) = value {
            self.sum += v;
            self.count += 1;
        }
    }

    fn value(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

/// Groups records by hour of day (ignoring the date) and averages
/// intensity and price within each bucket.
///
/// Intensity is converted from kgCO2e/MWh to kgCO2e/kWh; price stays in
/// AUD/MWh. Missing cells are left out of the mean for that field only.
///
/// # Errors
///
/// Returns [`PrepError::EmptyHourBucket`] if any hour 0-23 has no usable
/// value for either field, so the result always has exactly 24 rows.
pub fn aggregate_by_hour(records: &[GenerationRecord]) -> Result<HourlyIntensityTable> {
    let mut intensity = [Mean::default(); HOURS_PER_DAY];
    let mut price = [Mean::default(); HOURS_PER_DAY];

    for record in records {
        let hour = record.timestamp.hour() as usize;
        intensity[hour].push(record.intensity_kg_per_mwh);
        price[hour].push(record.price_aud_per_mwh);
    }

    let mut intensity_kwh = [0.0; HOURS_PER_DAY];
    let mut price_mwh = [0.0; HOURS_PER_DAY];
    for hour in 0..HOURS_PER_DAY {
        intensity_kwh[hour] = intensity[hour]
            .value()
            .ok_or(PrepError::EmptyHourBucket {
                hour,
                field: "emissions intensity",
            })?
            / KWH_PER_MWH;
        price_mwh[hour] = price[hour].value().ok_or(PrepError::EmptyHourBucket {
            hour,
            field: "price",
        })?;
    }

    info!(records = records.len(), "aggregated grid intensity by hour");
    Ok(HourlyIntensityTable::from_means(intensity_kwh, price_mwh))
}
