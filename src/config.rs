//! TOML-based pipeline configuration and preset definitions.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::calendar::is_leap_year;
use crate::io::load::GridColumns;
use crate::stages::UsageSelection;

/// Top-level pipeline configuration parsed from TOML.
///
/// All fields have defaults matching the apartment preset. Load from TOML
/// with [`PipelineConfig::from_toml_file`] or use
/// [`PipelineConfig::apartment`] for the built-in default.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    /// Usage profile normalisation inputs and target.
    #[serde(default)]
    pub profile: ProfileConfig,
    /// Grid generation source.
    #[serde(default)]
    pub grid: GridConfig,
    /// Annual demand synthesis parameters.
    #[serde(default)]
    pub demand: DemandConfig,
    /// Output location.
    #[serde(default)]
    pub output: OutputConfig,
}

/// Usage profile normalisation inputs and target.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProfileConfig {
    /// Reference hour-by-month profile (CSV export).
    pub reference_path: PathBuf,
    /// "Usage by Postcode" sheet (CSV export).
    pub postcode_usage_path: PathBuf,
    /// Target postcode.
    pub postcode: u32,
    /// Target year in the postcode table.
    pub year: i32,
    /// "Data Type" slice to keep.
    pub data_type: String,
    /// "Customer Type" slice to keep.
    pub customer_type: String,
    /// Lines above the header row in the postcode export.
    pub preamble_rows: usize,
    /// Occupancy/dwelling-type multiplier.
    pub scale_factor: f64,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            reference_path: PathBuf::from("data/reference_profile.csv"),
            postcode_usage_path: PathBuf::from("data/usage_by_postcode.csv"),
            postcode: 4101,
            year: 2024,
            data_type: "Average daily usage (kWh)".to_string(),
            customer_type: "Residential".to_string(),
            preamble_rows: 1,
            scale_factor: 0.79,
        }
    }
}

impl ProfileConfig {
    /// The postcode slice and scale this section selects.
    pub fn selection(&self) -> UsageSelection {
        UsageSelection {
            year: self.year,
            postcode: self.postcode,
            data_type: self.data_type.clone(),
            customer_type: self.customer_type.clone(),
            scale_factor: self.scale_factor,
        }
    }
}

/// Grid generation source and its column names.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GridConfig {
    /// Grid generation export (CSV).
    pub generation_path: PathBuf,
    /// Timestamp column.
    pub date_column: String,
    /// Emissions intensity column (kgCO2e/MWh).
    pub intensity_column: String,
    /// Price column (AUD/MWh).
    pub price_column: String,
}

impl Default for GridConfig {
    fn default() -> Self {
        let columns = GridColumns::default();
        Self {
            generation_path: PathBuf::from("data/grid_generation.csv"),
            date_column: columns.date,
            intensity_column: columns.intensity,
            price_column: columns.price,
        }
    }
}

impl GridConfig {
    pub fn columns(&self) -> GridColumns {
        GridColumns {
            date: self.date_column.clone(),
            intensity: self.intensity_column.clone(),
            price: self.price_column.clone(),
        }
    }
}

/// Annual demand synthesis parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DemandConfig {
    /// Non-leap calendar year stamped on the hourly index.
    pub reference_year: i32,
}

impl Default for DemandConfig {
    fn default() -> Self {
        Self {
            reference_year: 2013,
        }
    }
}

/// Output location.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Directory receiving the CSV artifacts; created if absent.
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("out"),
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"profile.scale_factor"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

impl PipelineConfig {
    /// Apartment dwelling: usage scaled by 0.79.
    pub fn apartment() -> Self {
        Self::default()
    }

    /// Detached house: postcode average used unscaled.
    pub fn house() -> Self {
        Self {
            profile: ProfileConfig {
                scale_factor: 1.0,
                ..ProfileConfig::default()
            },
            ..Self::default()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["apartment", "house"];

    /// Loads a configuration from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "apartment" => Ok(Self::apartment()),
            "house" => Ok(Self::house()),
            _ => Err(ConfigError {
                field: "preset".to_string(),
                message: format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            }),
        }
    }

    /// Parses a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "config".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let mut push = |field: &str, message: String| {
            errors.push(ConfigError {
                field: field.to_string(),
                message,
            });
        };

        let p = &self.profile;
        if !(p.scale_factor.is_finite() && p.scale_factor > 0.0) {
            push(
                "profile.scale_factor",
                format!("must be positive and finite, got {}", p.scale_factor),
            );
        }
        if p.postcode == 0 {
            push("profile.postcode", "must be > 0".into());
        }
        if p.data_type.trim().is_empty() {
            push("profile.data_type", "must not be empty".into());
        }
        if p.customer_type.trim().is_empty() {
            push("profile.customer_type", "must not be empty".into());
        }

        let g = &self.grid;
        for (field, value) in [
            ("grid.date_column", &g.date_column),
            ("grid.intensity_column", &g.intensity_column),
            ("grid.price_column", &g.price_column),
        ] {
            if value.trim().is_empty() {
                push(field, "must not be empty".into());
            }
        }

        let year = self.demand.reference_year;
        if is_leap_year(year) {
            push(
                "demand.reference_year",
                format!("{year} is a leap year; must have 365 days"),
            );
        }

        errors
    }
}
