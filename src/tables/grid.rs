use chrono::NaiveDateTime;

use crate::calendar::HOURS_PER_DAY;

/// One timestamped grid generation record.
///
/// Intensity and price are `None` where the source cell was empty.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRecord {
    /// Wall-clock time as written in the source (any UTC offset dropped).
    pub timestamp: NaiveDateTime,
    /// Emissions intensity (kgCO2e/MWh).
    pub intensity_kg_per_mwh: Option<f64>,
    /// Spot price (AUD/MWh).
    pub price_aud_per_mwh: Option<f64>,
}

/// Mean grid figures for one hour of the day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HourlyIntensity {
    /// Hour of day, 0-23.
    pub hour: usize,
    /// Mean emissions intensity (kgCO2e/kWh).
    pub intensity_kg_per_kwh: f64,
    /// Mean spot price (AUD/MWh).
    pub price_aud_per_mwh: f64,
}

/// Hourly carbon-intensity table: exactly one row per hour 0-23.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlyIntensityTable {
    rows: [HourlyIntensity; HOURS_PER_DAY],
}

impl HourlyIntensityTable {
    /// Builds the table from per-hour means, indexed by hour.
    pub fn from_means(intensity_kg_per_kwh: [f64; HOURS_PER_DAY], price: [f64; HOURS_PER_DAY]) -> Self {
        Self {
            rows: std::array::from_fn(|hour| HourlyIntensity {
                hour,
                intensity_kg_per_kwh: intensity_kg_per_kwh[hour],
                price_aud_per_mwh: price[hour],
            }),
        }
    }

    pub fn rows(&self) -> &[HourlyIntensity] {
        &self.rows
    }

    /// Row for one hour of the day (`hour` taken modulo 24).
    pub fn at(&self, hour: usize) -> &HourlyIntensity {
        &self.rows[hour % HOURS_PER_DAY]
    }

    /// Unweighted mean of the 24 hourly intensities (kgCO2e/kWh).
    pub fn mean_intensity(&self) -> f64 {
        self.rows.iter().map(|r| r.intensity_kg_per_kwh).sum::<f64>() / HOURS_PER_DAY as f64
    }

    /// Unweighted mean of the 24 hourly prices (AUD/MWh).
    pub fn mean_price(&self) -> f64 {
        self.rows.iter().map(|r| r.price_aud_per_mwh).sum::<f64>() / HOURS_PER_DAY as f64
    }
}
