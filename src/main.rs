//! demand-prep entry point: CLI wiring and config-driven pipeline run.

use std::path::PathBuf;
use std::process;

use anyhow::Context;
use clap::Parser;
use tracing::error;

use demand_prep::config::PipelineConfig;
use demand_prep::observability;
use demand_prep::pipeline::{Stage, run_pipeline};
use demand_prep::summary::RunSummary;

/// Derives usage profile, grid intensity and annual demand datasets.
///
/// If neither --config nor --preset is given, the apartment preset is used.
#[derive(Debug, Parser)]
#[command(name = "demand-prep", version)]
struct Cli {
    /// Load configuration from a TOML file
    #[arg(long, value_name = "PATH", conflicts_with = "preset")]
    config: Option<PathBuf>,

    /// Use a built-in preset (apartment, house)
    #[arg(long, value_name = "NAME")]
    preset: Option<String>,

    /// Which stage(s) to run
    #[arg(long, value_enum, default_value_t = Stage::All)]
    stage: Stage,

    /// Override the target postcode
    #[arg(long)]
    postcode: Option<u32>,

    /// Override the target year in the postcode table
    #[arg(long)]
    year: Option<i32>,

    /// Override the dwelling scale factor
    #[arg(long)]
    scale_factor: Option<f64>,

    /// Override the output directory
    #[arg(long, value_name = "DIR")]
    out_dir: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn load_config(&self) -> anyhow::Result<PipelineConfig> {
        // --config takes priority, then --preset, then the default
        let mut cfg = if let Some(path) = &self.config {
            PipelineConfig::from_toml_file(path)?
        } else if let Some(name) = &self.preset {
            PipelineConfig::from_preset(name)?
        } else {
            PipelineConfig::apartment()
        };

        if let Some(postcode) = self.postcode {
            cfg.profile.postcode = postcode;
        }
        if let Some(year) = self.year {
            cfg.profile.year = year;
        }
        if let Some(scale) = self.scale_factor {
            cfg.profile.scale_factor = scale;
        }
        if let Some(dir) = &self.out_dir {
            cfg.output.dir = dir.clone();
        }
        Ok(cfg)
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let cfg = cli.load_config()?;

    let errors = cfg.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    let output = run_pipeline(&cfg, cli.stage)
        .with_context(|| format!("{:?} stage failed", cli.stage))?;

    println!("{}", RunSummary::from_output(&output));
    for path in &output.written {
        eprintln!("Wrote {}", path.display());
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    observability::init_tracing(cli.verbose);

    if let Err(e) = run(&cli) {
        error!("{e:#}");
        process::exit(1);
    }
}
