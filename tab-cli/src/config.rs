//! `table-tab.toml` configuration.
//!
//! ```toml
//! [store]
//! backend  = "sqlite"        # or "memory"
//! location = "table-tab.db"  # file path, or ":memory:"
//!
//! [logging]
//! level = "info"             # any EnvFilter directive
//! file  = "table-tab.log"    # optional, appended to
//! ```
//!
//! Every key is optional. Command-line flags win over the file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tab_core::store::StoreConfig;
use tracing::debug;

/// Read from the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "table-tab.toml";

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub store: StoreConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

/// Values given on the command line, applied over the file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub backend: Option<String>,
    pub location: Option<String>,
    pub log_level: Option<String>,
}

impl AppConfig {
    /// Loads `path` when given (it must exist), otherwise
    /// [`DEFAULT_CONFIG_FILE`] if present, otherwise the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.is_file() {
                    Self::from_file(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
        let config = Self::from_toml_str(&text)
            .with_context(|| format!("Invalid config file '{}'", path.display()))?;
        debug!(path = %path.display(), ?config, "loaded configuration");
        Ok(config)
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn apply_overrides(
        &mut self,
        overrides: ConfigOverrides,
    ) {
        if let Some(backend) = overrides.backend {
            self.store.backend = backend;
        }
        if let Some(location) = overrides.location {
            self.store.location = location;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }
}
