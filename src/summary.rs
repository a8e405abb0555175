//! Post-hoc summary of the derived datasets.

use std::fmt;

use chrono::{NaiveDateTime, Timelike};

use crate::calendar::Month;
use crate::pipeline::PipelineOutput;
use crate::tables::{DemandSeries, HourlyIntensityTable};

/// Headline figures computed from a completed run.
///
/// Every section is optional; only stages that ran contribute.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Total synthesised demand over the year (kWh).
    pub annual_demand_kwh: Option<f64>,
    /// Largest hourly demand and when it occurs.
    pub peak_demand: Option<(NaiveDateTime, f64)>,
    /// Demand per calendar month (kWh).
    pub monthly_demand_kwh: Option<[f64; 12]>,
    /// Mean of the 24 hourly intensities (kgCO2e/kWh).
    pub mean_intensity_kg_per_kwh: Option<f64>,
    /// Mean of the 24 hourly prices (AUD/MWh).
    pub mean_price_aud_per_mwh: Option<f64>,
    /// Sum over the year of demand times the intensity of its hour (kgCO2e).
    pub annual_emissions_kg: Option<f64>,
}

impl RunSummary {
    pub fn from_output(output: &PipelineOutput) -> Self {
        let mut summary = Self::default();

        if let Some(demand) = &output.demand {
            summary.annual_demand_kwh = Some(demand.annual_total());
            summary.peak_demand = demand.peak();
            summary.monthly_demand_kwh = Some(demand.monthly_totals());
        }
        if let Some(grid) = &output.grid {
            summary.mean_intensity_kg_per_kwh = Some(grid.mean_intensity());
            summary.mean_price_aud_per_mwh = Some(grid.mean_price());
        }
        if let (Some(demand), Some(grid)) = (&output.demand, &output.grid) {
            summary.annual_emissions_kg = Some(estimate_emissions_kg(demand, grid));
        }
        summary
    }
}

/// Weights each hour of demand by the mean intensity for its hour of day.
pub fn estimate_emissions_kg(demand: &DemandSeries, grid: &HourlyIntensityTable) -> f64 {
    demand
        .iter()
        .map(|(ts, kwh)| kwh * grid.at(ts.hour() as usize).intensity_kg_per_kwh)
        .sum()
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Run Summary ---")?;
        if let Some(total) = self.annual_demand_kwh {
            writeln!(f, "Annual demand: {total:.2} kWh")?;
        }
        if let Some((ts, kwh)) = self.peak_demand {
            writeln!(f, "Peak hourly demand: {kwh:.4} kWh at {ts}")?;
        }
        if let Some(monthly) = self.monthly_demand_kwh {
            for month in Month::ALL {
                writeln!(f, "  {:<10} {:>10.2} kWh", month.name(), monthly[month.index()])?;
            }
        }
        if let Some(ci) = self.mean_intensity_kg_per_kwh {
            writeln!(f, "Mean grid intensity: {ci:.4} kgCO2e/kWh")?;
        }
        if let Some(price) = self.mean_price_aud_per_mwh {
            writeln!(f, "Mean grid price: {price:.2} AUD/MWh")?;
        }
        if let Some(kg) = self.annual_emissions_kg {
            write!(f, "Estimated annual emissions: {kg:.1} kgCO2e")?;
        }
        Ok(())
    }
}
