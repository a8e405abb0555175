//! Stage runners: load inputs, run one stage, hand back in-memory tables.
//!
//! Stage 1 (profile) feeds stage 3 (demand); stage 2 (grid) is independent.

use std::fs;
use std::path::PathBuf;

use tracing::info;

use crate::config::{DemandConfig, GridConfig, PipelineConfig, ProfileConfig};
use crate::error::{PrepError, Result};
use crate::io::{export, load};
use crate::stages::{aggregate_by_hour, normalize_for_postcode, synthesize_annual};
use crate::tables::{DemandSeries, HourMonthTable, HourlyIntensityTable};

/// Which part of the pipeline to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Stage {
    /// All three stages.
    #[default]
    All,
    /// Usage profile normalisation only.
    Profile,
    /// Grid intensity aggregation only.
    Grid,
    /// Annual demand synthesis (runs profile normalisation first).
    Demand,
}

impl Stage {
    fn runs_profile(self) -> bool {
        matches!(self, Stage::All | Stage::Profile | Stage::Demand)
    }

    fn runs_grid(self) -> bool {
        matches!(self, Stage::All | Stage::Grid)
    }

    fn runs_demand(self) -> bool {
        matches!(self, Stage::All | Stage::Demand)
    }
}

/// Tables produced by a run and the files written for them.
#[derive(Debug, Clone, Default)]
pub struct PipelineOutput {
    pub profile: Option<HourMonthTable>,
    pub grid: Option<HourlyIntensityTable>,
    pub demand: Option<DemandSeries>,
    pub written: Vec<PathBuf>,
}

/// Loads the reference profile and postcode table, then normalises.
///
/// # Errors
///
/// Any load or [`normalize_for_postcode`] error.
pub fn run_profile_stage(cfg: &ProfileConfig) -> Result<HourMonthTable> {
    let reference = load::read_reference_profile(&cfg.reference_path)?;
    let usage = load::read_postcode_usage(&cfg.postcode_usage_path, cfg.preamble_rows)?;
    normalize_for_postcode(&reference, &usage, &cfg.selection())
}

/// Loads the grid generation records and aggregates them by hour.
///
/// # Errors
///
/// Any load or [`aggregate_by_hour`] error.
pub fn run_grid_stage(cfg: &GridConfig) -> Result<HourlyIntensityTable> {
    let records = load::read_generation_records(&cfg.generation_path, &cfg.columns())?;
    aggregate_by_hour(&records)
}

/// Expands a normalised profile into the annual hourly series.
///
/// # Errors
///
/// Any [`synthesize_annual`] error.
pub fn run_demand_stage(profile: &HourMonthTable, cfg: &DemandConfig) -> Result<DemandSeries> {
    synthesize_annual(profile, cfg.reference_year)
}

/// Runs the selected stages and writes their artifacts to `cfg.output.dir`.
///
/// Every selected table is computed before anything is written, so a failing
/// stage leaves the previous run's artifacts untouched. Existing artifacts
/// are overwritten.
///
/// # Errors
///
/// [`PrepError::Io`] if the output directory cannot be created, otherwise
/// the first stage or export error.
pub fn run_pipeline(cfg: &PipelineConfig, stage: Stage) -> Result<PipelineOutput> {
    let mut out = PipelineOutput::default();

    if stage.runs_profile() {
        let profile = run_profile_stage(&cfg.profile)?;
        if stage.runs_demand() {
            out.demand = Some(run_demand_stage(&profile, &cfg.demand)?);
        }
        out.profile = Some(profile);
    }
    if stage.runs_grid() {
        out.grid = Some(run_grid_stage(&cfg.grid)?);
    }

    let dir = &cfg.output.dir;
    fs::create_dir_all(dir).map_err(|source| PrepError::Io {
        path: dir.clone(),
        source,
    })?;

    if let Some(profile) = out.profile.as_ref().filter(|_| stage != Stage::Demand) {
        out.written
            .push(export::export_profile(profile, cfg.profile.postcode, dir)?);
    }
    if let Some(grid) = &out.grid {
        out.written.push(export::export_grid(grid, dir)?);
    }
    if let Some(demand) = &out.demand {
        out.written.push(export::export_demand(demand, dir)?);
    }

    for path in &out.written {
        info!(path = %path.display(), "wrote artifact");
    }
    Ok(out)
}
