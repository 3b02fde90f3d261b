//! Configuration loading.
//!
//! Settings live in `<config_dir>/pomodoro-history/config.json`. A missing file
//! means defaults; command-line flags are applied on top by the caller.

mod error;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

pub use error::ConfigError;

use crate::types::PomodoroConfig;

/// Directory name used under the platform config and data directories.
pub const APP_DIR_NAME: &str = "pomodoro-history";

/// File name of the configuration file.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Returns the default directory for session history.
pub fn default_data_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join(APP_DIR_NAME))
}

/// Returns the default configuration file path.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Source of persisted configuration.
pub trait ConfigStore {
    /// Loads the configuration, falling back to defaults when none is stored.
    fn load(&self) -> Result<PomodoroConfig, ConfigError>;

    /// Persists the configuration.
    fn save(&self, config: &PomodoroConfig) -> Result<(), ConfigError>;
}

/// JSON file backed configuration store.
#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    /// Creates a store for the given file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates a store at the platform default location.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NoConfigDir` if the platform has no config directory.
    pub fn at_default_location() -> Result<Self, ConfigError> {
        default_config_path()
            .map(Self::new)
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Returns the file path backing this store.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Result<PomodoroConfig, ConfigError> {
        if !self.path.exists() {
            debug!("No config file at {}, using defaults", self.path.display());
            return Ok(PomodoroConfig::default());
        }

        let text = fs::read_to_string(&self.path).map_err(|source| ConfigError::Io {
            path: self.path.clone(),
            source,
        })?;
        let config: PomodoroConfig =
            serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
                path: self.path.clone(),
                source,
            })?;
        config.validate()?;

        debug!("Loaded config from {}", self.path.display());
        Ok(config)
    }

    fn save(&self, config: &PomodoroConfig) -> Result<(), ConfigError> {
        config.validate()?;
        let io_err = |source| ConfigError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json = serde_json::to_string_pretty(config).map_err(|source| ConfigError::Parse {
            path: self.path.clone(),
            source,
        })?;
        fs::write(&self.path, json).map_err(io_err)
    }
}
