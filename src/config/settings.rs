//! Status checker configuration.
//!
//! Configuration is layered, later sources winning:
//! 1. built-in defaults
//! 2. a TOML file (first CLI argument, else `/etc/status-checker/config.toml`,
//!    else `./config.toml`)
//! 3. environment variables prefixed with `STATUS_CHECKER_`
//!
//! Nested keys use `__` in environment variables:
//!
//! ```text
//! STATUS_CHECKER_INTERVAL=1m
//! STATUS_CHECKER_PROM_PORT=9100
//! STATUS_CHECKER_LOGS__LEVEL=debug
//! ```
//!
//! String values may reference the environment as `$VAR` or `${VAR}`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing_subscriber::filter::LevelFilter;

use super::env_expand::expand_env;

pub const ENV_PREFIX: &str = "STATUS_CHECKER_";
pub const SYSTEM_CONFIG_PATH: &str = "/etc/status-checker/config.toml";
pub const LOCAL_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration load error: {0}")]
    LoadError(#[from] figment::Error),
    #[error("Configuration validation error: {0}")]
    ValidationError(String),
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Whether checks without an explicit `enabled` run
    #[serde(default = "default_enabled_by_default")]
    pub enabled_by_default: bool,
    /// Default period between check runs
    #[serde(default = "default_interval", with = "humantime_serde")]
    pub interval: Duration,
    #[serde(default)]
    pub logs: LogsConfig,
    /// Directory scanned for check programs
    #[serde(default = "default_checks_dir")]
    pub checks_dir: PathBuf,
    /// Per-check overrides keyed by path relative to `checks_dir`
    #[serde(default)]
    pub checks: BTreeMap<String, CheckConfig>,
    /// Add executable bits to discovered files
    #[serde(default)]
    pub modify_permissions: bool,
    /// Port of the Prometheus `/metrics` endpoint
    #[serde(default = "default_prom_port")]
    pub prom_port: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogsConfig {
    /// Human-readable output instead of JSON lines
    #[serde(default)]
    pub pretty: bool,
    /// trace, debug, info, warn, error or off
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// Per-check overrides. Unset fields fall back to the global values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CheckConfig {
    #[serde(default)]
    pub enabled: Option<bool>,
    #[serde(default, with = "humantime_serde")]
    pub interval: Option<Duration>,
}

/// Effective settings of one check after applying the global fallbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckSettings {
    pub enabled: bool,
    pub interval: Duration,
}

fn default_enabled_by_default() -> bool {
    true
}

fn default_interval() -> Duration {
    Duration::from_secs(30)
}

fn default_checks_dir() -> PathBuf {
    PathBuf::from("./checks")
}

fn default_prom_port() -> u16 {
    9090
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            enabled_by_default: default_enabled_by_default(),
            interval: default_interval(),
            logs: LogsConfig::default(),
            checks_dir: default_checks_dir(),
            checks: BTreeMap::new(),
            modify_permissions: false,
            prom_port: default_prom_port(),
        }
    }
}

impl Default for LogsConfig {
    fn default() -> Self {
        Self { pretty: false, level: default_log_level() }
    }
}

impl Config {
    /// Picks the config file to read: `explicit` when given, otherwise the
    /// first existing file of the search path. `None` means defaults only.
    pub fn locate(explicit: Option<&Path>) -> Option<PathBuf> {
        match explicit {
            Some(path) => path.is_file().then(|| path.to_path_buf()),
            None => [SYSTEM_CONFIG_PATH, LOCAL_CONFIG_PATH]
                .iter()
                .map(PathBuf::from)
                .find(|p| p.is_file()),
        }
    }

    /// The layered figment for `file` (if any) plus the environment.
    pub fn figment(file: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = file {
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Loads, expands and validates the configuration.
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        Self::from_figment(Self::figment(file))
    }

    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let mut config: Config = figment.extract()?;
        config.expand_env();
        config.validate()?;
        Ok(config)
    }

    fn expand_env(&mut self) {
        self.checks_dir = PathBuf::from(expand_env(&self.checks_dir.to_string_lossy()));
        self.logs.level = expand_env(&self.logs.level);
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.interval.is_zero() {
            return Err(ConfigError::ValidationError("interval must be non-zero".to_string()));
        }
        if self.prom_port == 0 {
            return Err(ConfigError::ValidationError("prom_port must be non-zero".to_string()));
        }
        if !self.checks_dir.is_dir() {
            return Err(ConfigError::ValidationError(format!(
                "checks_dir {} is not a directory",
                self.checks_dir.display()
            )));
        }
        self.log_level()?;
        for (name, check) in &self.checks {
            if check.interval.is_some_and(|i| i.is_zero()) {
                return Err(ConfigError::ValidationError(format!(
                    "checks.{name}.interval must be non-zero"
                )));
            }
        }
        Ok(())
    }

    pub fn log_level(&self) -> Result<LevelFilter, ConfigError> {
        LevelFilter::from_str(&self.logs.level).map_err(|e| {
            ConfigError::ValidationError(format!("invalid logs.level {:?}: {}", self.logs.level, e))
        })
    }

    /// Effective settings for the check named `name`.
    pub fn check_settings(&self, name: &str) -> CheckSettings {
        let overrides = self.checks.get(name).cloned().unwrap_or_default();
        CheckSettings {
            enabled: overrides.enabled.unwrap_or(self.enabled_by_default),
            interval: overrides.interval.unwrap_or(self.interval),
        }
    }
}
