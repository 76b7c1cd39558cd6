//! # rpt-config
//!
//! Layered configuration loading for the report exporter using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`RPT_*` prefix, `__` as separator)
//! 2. Project-level `.rpt/config.toml`
//! 3. User-level `~/.config/rpt/config.toml`
//! 4. Built-in defaults
//!
//! Figment maps `RPT_OUTPUT__FORMAT` -> `output.format`,
//! `RPT_OUTPUT__PATH` -> `output.path`, and so on.
//!
//! # Usage
//!
//! ```no_run
//! use rpt_config::ReportConfig;
//!
//! let config = ReportConfig::load().expect("config");
//! println!("writing {} to {}", config.output.format, config.output.path.display());
//! ```

mod error;
mod output;

pub use error::ConfigError;
pub use output::{OutputConfig, OutputFormat};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ReportConfig {
    #[serde(default)]
    pub output: OutputConfig,
}

impl ReportConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Figment`] if a source cannot be parsed, or
    /// [`ConfigError::InvalidValue`] if the merged values fail validation.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(&Self::figment())
    }

    /// Extract and validate a config from an arbitrary figment.
    ///
    /// # Errors
    ///
    /// Same as [`ReportConfig::load`].
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can add providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        let local_path = PathBuf::from(".rpt/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed("RPT_").split("__"))
    }

    /// Check values figment cannot express as types.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for an empty output path.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.output.path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "output.path".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("rpt").join("config.toml"))
    }
}
