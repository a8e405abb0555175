//! In-memory tables exchanged between the loaders, stages and exporters.

/// Hourly demand series and its resampling helpers.
pub mod demand;
pub mod grid;
/// Hour-of-day by month profile grid.
pub mod profile;
pub mod usage;

pub use demand::{DEMAND_COLUMN, DemandSeries};
pub use grid::{GenerationRecord, HourlyIntensity, HourlyIntensityTable};
pub use profile::HourMonthTable;
pub use usage::{PostcodeUsageRow, PostcodeUsageTable};
