//! ---
//! rw_section: "01-core-functionality"
//! rw_subsection: "module"
//! rw_type: "source"
//! rw_scope: "code"
//! rw_description: "TOML configuration for racks, savings assumptions and logging."
//! rw_version: "v0.1.0"
//! rw_owner: "tbd"
//! ---
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use rackwatch_calc::savings::{
    SavingsParams, DEFAULT_PRICE_PER_KWH, DEFAULT_TRADITIONAL_WATTS_PER_RACK,
};
use rackwatch_sim::DEFAULT_RACK_NAMES;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::logging::LogFormat;

/// Files searched, in order, when no explicit path or env override is given.
pub const DEFAULT_CONFIG_CANDIDATES: [&str; 2] = ["rackwatch.toml", "configs/rackwatch.toml"];

fn default_racks() -> Vec<String> {
    DEFAULT_RACK_NAMES.iter().map(|name| (*name).to_owned()).collect()
}

fn default_traditional_watts() -> f64 {
    DEFAULT_TRADITIONAL_WATTS_PER_RACK
}

fn default_price_per_kwh() -> f64 {
    DEFAULT_PRICE_PER_KWH
}

fn default_fleet_sites() -> u32 {
    1000
}

fn default_log_format() -> LogFormat {
    LogFormat::Pretty
}

/// Primary configuration object for Rackwatch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_racks")]
    pub racks: Vec<String>,
    #[serde(default)]
    pub savings: SavingsConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Metadata describing where an [`AppConfig`] was loaded from.
#[derive(Debug, Clone)]
pub struct LoadedAppConfig {
    pub config: AppConfig,
    /// `None` when no file was found and built-in defaults apply.
    pub source: Option<PathBuf>,
}

impl AppConfig {
    pub const ENV_CONFIG_PATH: &'static str = "RACKWATCH_CONFIG";

    /// Resolve configuration for a CLI invocation.
    ///
    /// An explicit path must exist. Otherwise the env override and the default
    /// candidates are searched, falling back to built-in defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<LoadedAppConfig> {
        if let Some(path) = explicit {
            let config = Self::from_path(path)?;
            return Ok(LoadedAppConfig {
                config,
                source: Some(path.to_path_buf()),
            });
        }
        match Self::discover(&DEFAULT_CONFIG_CANDIDATES)? {
            Some(loaded) => Ok(loaded),
            None => {
                debug!("no configuration file found; using defaults");
                Ok(LoadedAppConfig {
                    config: Self::default(),
                    source: None,
                })
            }
        }
    }

    fn discover<P: AsRef<Path>>(candidates: &[P]) -> Result<Option<LoadedAppConfig>> {
        if let Ok(env_path) = std::env::var(Self::ENV_CONFIG_PATH) {
            if !env_path.trim().is_empty() {
                let path = PathBuf::from(env_path);
                let config = Self::from_path(&path)?;
                return Ok(Some(LoadedAppConfig {
                    config,
                    source: Some(path),
                }));
            }
        }

        for candidate in candidates {
            let path = candidate.as_ref();
            if path.exists() {
                let config = Self::from_path(path)?;
                return Ok(Some(LoadedAppConfig {
                    config,
                    source: Some(path.to_path_buf()),
                }));
            }
        }
        Ok(None)
    }

    fn from_path(path: &Path) -> Result<Self> {
        debug!(config_path = %path.display(), "loading configuration");
        let contents = fs::read_to_string(path)
            .with_context(|| format!("unable to read config file {}", path.display()))?;
        let config = toml::from_str::<AppConfig>(&contents)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("invalid config file {}", path.display()))?;
        Ok(config)
    }

    /// Validate structural invariants.
    pub fn validate(&self) -> Result<()> {
        validate_racks(&self.racks)?;
        self.savings.validate()?;
        Ok(())
    }
}

/// Rack names are the only stable key of a reading: none may be blank or repeated.
pub fn validate_racks<S: AsRef<str>>(racks: &[S]) -> Result<()> {
    let mut seen = HashSet::new();
    for rack in racks {
        let rack = rack.as_ref();
        if rack.trim().is_empty() {
            return Err(anyhow!("rack names must not be blank"));
        }
        if !seen.insert(rack) {
            return Err(anyhow!("rack '{}' is configured more than once", rack));
        }
    }
    Ok(())
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            racks: default_racks(),
            savings: SavingsConfig::default(),
            simulation: SimulationConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl std::str::FromStr for AppConfig {
    type Err = anyhow::Error;

    fn from_str(content: &str) -> std::result::Result<Self, Self::Err> {
        let config: AppConfig =
            toml::from_str(content).with_context(|| "failed to parse configuration")?;
        config.validate()?;
        Ok(config)
    }
}

/// Business assumptions for the savings comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsConfig {
    #[serde(default = "default_traditional_watts")]
    pub assumed_traditional_watts_per_rack: f64,
    #[serde(default = "default_price_per_kwh")]
    pub price_per_kwh: f64,
    /// Number of sites used for the fleet-wide projection.
    #[serde(default = "default_fleet_sites")]
    pub fleet_sites: u32,
}

impl Default for SavingsConfig {
    fn default() -> Self {
        Self {
            assumed_traditional_watts_per_rack: default_traditional_watts(),
            price_per_kwh: default_price_per_kwh(),
            fleet_sites: default_fleet_sites(),
        }
    }
}

impl SavingsConfig {
    pub fn params(&self) -> SavingsParams {
        SavingsParams {
            assumed_traditional_watts_per_rack: self.assumed_traditional_watts_per_rack,
            price_per_kwh: self.price_per_kwh,
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.params().validate()?;
        if self.fleet_sites == 0 {
            return Err(anyhow!("savings.fleet_sites must be greater than zero"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Fixed seed for reproducible snapshots; entropy-seeded when absent.
    #[serde(default)]
    pub random_seed: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Directory for the rolling JSON log file. Logging goes to stderr only when unset.
    #[serde(default)]
    pub directory: Option<PathBuf>,
    #[serde(default = "default_log_format")]
    pub format: LogFormat,
    #[serde(default)]
    pub file_prefix: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: None,
            format: default_log_format(),
            file_prefix: None,
        }
    }
}
