use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::CoreError;

/// Environment variable naming the configuration file to use.
pub const CONFIG_ENV: &str = "OIW_CONFIG";

/// Environment variable naming the real OpenCL library, overriding the file.
pub const REAL_LIBRARY_ENV: &str = "OIW_REAL_LIBRARY";

/// Top-level wrapper configuration, loaded from oiw.toml.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OiwConfig {
    #[serde(default)]
    pub driver: DriverConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverConfig {
    /// Path or file name of the real OpenCL implementation.
    /// When unset the platform's system OpenCL library is used.
    pub library: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// tracing filter directive used when OIW_LOG is not set
    #[serde(default = "default_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
        }
    }
}

impl OiwConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self, CoreError> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from file if it exists, otherwise return defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(path = %path.display(), "ignoring configuration file: {}", e);
                Self::default()
            }
        }
    }

    /// Load the effective configuration of this process: the file named by
    /// OIW_CONFIG or found at the default location, with the OIW_REAL_LIBRARY
    /// override applied.
    pub fn from_env() -> Self {
        let mut config = Self::load_or_default(default_config_path());
        config.apply_env_overrides();
        config
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(library) = std::env::var(REAL_LIBRARY_ENV) {
            if !library.is_empty() {
                self.driver.library = Some(library);
            }
        }
    }

    /// Render the configuration back to TOML.
    pub fn to_toml(&self) -> Result<String, CoreError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Returns the config file path based on platform conventions.
/// Search order:
/// 1. `OIW_CONFIG`, when set
/// 2. System-wide config: `%PROGRAMDATA%\OIW\oiw.toml` (Windows) or `/etc/oiw/oiw.toml`
/// 3. Local fallback: `./oiw.toml`
pub fn default_config_path() -> PathBuf {
    if let Ok(path) = std::env::var(CONFIG_ENV) {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }
    let system_path = oiw_common::platform::system_config_path();
    if system_path.exists() {
        return system_path;
    }
    PathBuf::from("oiw.toml")
}

fn default_filter() -> String {
    "warn".to_string()
}
