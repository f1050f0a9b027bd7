//! TOML-based scenario configuration and preset definitions.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::devices::{BatteryConfig, EfficiencyModel, PvArray};
use crate::error::SimError;
use crate::io::profile::load_demand_csv;
use crate::sim::power_balance::site_demand_profile;

/// Demand profile used by the course exercise (kW, ten one-hour periods).
pub const TUTORIAL_DEMAND_KW: [f64; 10] = [5.0, -8.0, 12.0, -3.0, 7.0, -10.0, 15.0, -5.0, 8.0, -2.0];

/// Top-level scenario configuration parsed from TOML.
///
/// All sections have defaults. Load from TOML with
/// [`ScenarioConfig::from_toml_file`] or pick a built-in with
/// [`ScenarioConfig::from_preset`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Battery storage parameters.
    #[serde(default)]
    pub battery: BatteryParams,
    /// Demand profile source.
    #[serde(default)]
    pub demand: DemandConfig,
    /// Optional PV array offsetting the demand.
    #[serde(default)]
    pub pv: Option<PvConfig>,
}

/// Battery storage parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatteryParams {
    /// Model name shown in reports.
    pub name: String,
    /// Maximum state of charge (kWh).
    pub max_soc_kwh: f64,
    /// Minimum state of charge (kWh).
    pub min_soc_kwh: f64,
    /// Charge/discharge power limit (kW).
    pub max_power_kw: f64,
    /// Round-trip efficiency (0.0–1.0).
    pub efficiency: f64,
    /// Initial state of charge (kWh).
    pub initial_soc_kwh: f64,
    /// Period length (hours).
    pub time_step_hours: f64,
    /// `"derate"` or `"loss_aware"`.
    pub efficiency_model: EfficiencyModel,
    /// Per-period efficiency fade (0.0 disables).
    pub degradation_per_step: f64,
}

impl Default for BatteryParams {
    fn default() -> Self {
        Self {
            name: "Tesla Powerwall".to_string(),
            max_soc_kwh: 10.0,
            min_soc_kwh: 1.0,
            max_power_kw: 15.0,
            efficiency: 0.98,
            initial_soc_kwh: 5.0,
            time_step_hours: 1.0,
            efficiency_model: EfficiencyModel::Derate,
            degradation_per_step: 0.0,
        }
    }
}

/// Demand profile source: an inline list or a CSV column.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DemandConfig {
    /// Inline demand values (kW; positive=load, negative=surplus).
    pub profile_kw: Vec<f64>,
    /// CSV file holding the demand (relative paths resolve against the scenario file).
    pub csv_path: Option<PathBuf>,
    /// CSV column to read.
    pub column: String,
}

impl Default for DemandConfig {
    fn default() -> Self {
        Self {
            profile_kw: Vec::new(),
            csv_path: None,
            column: "demand_kw".to_string(),
        }
    }
}

/// PV array parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PvConfig {
    /// Identifier shown in reports.
    pub id: String,
    /// Peak power (kW).
    pub peak_power_kw: f64,
    /// Per-period capacity factor (kW/kWp), one per demand value.
    pub capacity_factor: Vec<f64>,
}

impl Default for PvConfig {
    fn default() -> Self {
        Self {
            id: "pv".to_string(),
            peak_power_kw: 4.0,
            capacity_factor: Vec::new(),
        }
    }
}

impl PvConfig {
    pub fn to_array(&self) -> PvArray {
        PvArray::new(self.id.clone(), self.capacity_factor.clone(), self.peak_power_kw)
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"battery.max_soc_kwh"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Maps a battery validation failure onto its TOML key.
    fn from_battery(err: SimError) -> Self {
        match err {
            SimError::InvalidConfig { field, message } => {
                let key = match field {
                    "max_soc" => "max_soc_kwh",
                    "min_soc" => "min_soc_kwh",
                    "max_power" => "max_power_kw",
                    "initial_soc" => "initial_soc_kwh",
                    "time_step" => "time_step_hours",
                    other => other,
                };
                Self::new(format!("battery.{key}"), message)
            }
            other => Self::new("battery", other.to_string()),
        }
    }
}

impl ScenarioConfig {
    /// Returns the course exercise: 10 kWh battery against a ten-period profile.
    pub fn tutorial() -> Self {
        Self {
            battery: BatteryParams::default(),
            demand: DemandConfig {
                profile_kw: TUTORIAL_DEMAND_KW.to_vec(),
                ..DemandConfig::default()
            },
            pv: None,
        }
    }

    /// Returns the solar-home preset: one day of household load with a 4 kW PV array.
    pub fn solar_home() -> Self {
        #[rustfmt::skip]
        let load_kw = vec![
            0.5, 0.4, 0.4, 0.4, 0.5, 0.7, 1.5, 2.5,
            2.0, 1.0, 0.8, 0.8, 0.9, 0.8, 0.8, 1.0,
            1.5, 2.5, 3.5, 3.5, 3.0, 2.0, 1.0, 0.6,
        ];
        #[rustfmt::skip]
        let capacity_factor = vec![
            0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.05, 0.15,
            0.3, 0.45, 0.58, 0.66, 0.7, 0.66, 0.58, 0.45,
            0.3, 0.15, 0.05, 0.0, 0.0, 0.0, 0.0, 0.0,
        ];
        Self {
            battery: BatteryParams {
                name: "Home battery".to_string(),
                max_soc_kwh: 13.5,
                min_soc_kwh: 1.35,
                max_power_kw: 5.0,
                efficiency: 0.9,
                initial_soc_kwh: 6.75,
                ..BatteryParams::default()
            },
            demand: DemandConfig {
                profile_kw: load_kw,
                ..DemandConfig::default()
            },
            pv: Some(PvConfig {
                id: "roof".to_string(),
                peak_power_kw: 4.0,
                capacity_factor,
            }),
        }
    }

    /// Returns the lossy preset: the course exercise with loss-aware
    /// efficiency and 1% efficiency fade per period.
    pub fn lossy() -> Self {
        let mut cfg = Self::tutorial();
        cfg.battery.efficiency_model = EfficiencyModel::LossAware;
        cfg.battery.degradation_per_step = 0.01;
        cfg
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["tutorial", "solar_home", "lossy"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "tutorial" => Ok(Self::tutorial()),
            "solar_home" => Ok(Self::solar_home()),
            "lossy" => Ok(Self::lossy()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// A relative `demand.csv_path` is resolved against the file's directory.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("scenario", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        let mut cfg = Self::from_toml_str(&content)?;
        if let (Some(csv), Some(dir)) = (&cfg.demand.csv_path, path.parent()) {
            if csv.is_relative() {
                cfg.demand.csv_path = Some(dir.join(csv));
            }
        }
        Ok(cfg)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid. Every violated
    /// battery bound gets its own entry.
    ///
    /// When the demand comes from `demand.csv_path`, its length is unknown
    /// until the file is read, so a PV profile length mismatch is reported by
    /// [`ScenarioConfig::demand_profile`] instead.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors: Vec<ConfigError> = self
            .unchecked_battery()
            .violations()
            .into_iter()
            .map(ConfigError::from_battery)
            .collect();

        let d = &self.demand;
        if d.csv_path.is_some() && !d.profile_kw.is_empty() {
            errors.push(ConfigError::new(
                "demand.csv_path",
                "cannot be combined with demand.profile_kw",
            ));
        }
        if let Some(t) = d.profile_kw.iter().position(|v| !v.is_finite()) {
            errors.push(ConfigError::new(
                "demand.profile_kw",
                format!("value at index {t} must be finite"),
            ));
        }

        if let Some(pv) = &self.pv {
            if !pv.peak_power_kw.is_finite() || pv.peak_power_kw < 0.0 {
                errors.push(ConfigError::new("pv.peak_power_kw", "must be >= 0"));
            }
            if pv
                .capacity_factor
                .iter()
                .any(|cf| !cf.is_finite() || *cf < 0.0)
            {
                errors.push(ConfigError::new(
                    "pv.capacity_factor",
                    "values must be finite and >= 0",
                ));
            }
            if d.csv_path.is_none() && pv.capacity_factor.len() != d.profile_kw.len() {
                errors.push(ConfigError::new(
                    "pv.capacity_factor",
                    format!(
                        "length {} must match demand.profile_kw length {}",
                        pv.capacity_factor.len(),
                        d.profile_kw.len()
                    ),
                ));
            }
        }

        errors
    }

    /// Builds the validated battery configuration.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` naming the first out-of-bounds battery key.
    pub fn battery_config(&self) -> Result<BatteryConfig, ConfigError> {
        let cfg = self.unchecked_battery();
        cfg.validate().map_err(ConfigError::from_battery)?;
        Ok(cfg)
    }

    fn unchecked_battery(&self) -> BatteryConfig {
        let b = &self.battery;
        BatteryConfig {
            max_soc: b.max_soc_kwh,
            min_soc: b.min_soc_kwh,
            max_power: b.max_power_kw,
            efficiency: b.efficiency,
            time_step: b.time_step_hours,
            initial_soc: b.initial_soc_kwh,
            efficiency_model: b.efficiency_model,
            degradation_per_step: b.degradation_per_step,
        }
    }

    /// Resolves the demand profile seen by the battery, after any PV offset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the CSV cannot be loaded or the PV profile
    /// length does not match the demand.
    pub fn demand_profile(&self) -> Result<Vec<f64>, ConfigError> {
        let load = match &self.demand.csv_path {
            Some(path) => load_demand_csv(path, &self.demand.column)
                .map_err(|e| ConfigError::new("demand.csv_path", e.to_string()))?,
            None => self.demand.profile_kw.clone(),
        };

        let Some(pv) = &self.pv else {
            return Ok(load);
        };
        let array = pv.to_array();
        site_demand_profile(&load, &array.output_kw()).ok_or_else(|| {
            ConfigError::new(
                "pv.capacity_factor",
                format!(
                    "length {} must match demand length {}",
                    array.len(),
                    load.len()
                ),
            )
        })
    }
}
