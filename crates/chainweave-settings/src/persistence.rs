//! Settings Persistence
//!
//! Locates the configuration file in the platform config directory and
//! loads or saves it, falling back to defaults when nothing is stored yet.

use crate::config::Config;
use crate::error::{SettingsError, SettingsResult};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Directory name under the platform config dir
pub const APP_DIR_NAME: &str = "chainweave";

/// File name of the stored configuration
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Settings persistence layer
#[derive(Debug, Clone)]
pub struct SettingsPersistence {
    path: PathBuf,
    config: Config,
}

impl SettingsPersistence {
    /// Default configuration path, e.g. `~/.config/chainweave/config.toml`
    pub fn default_path() -> SettingsResult<PathBuf> {
        let base = dirs::config_dir().ok_or(SettingsError::NoConfigDir)?;
        Ok(base.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Load from the default path
    pub fn load_default() -> SettingsResult<Self> {
        Self::load_or_default(Self::default_path()?)
    }

    /// Load settings from `path`, or start from defaults if the file does not exist.
    ///
    /// A file that exists but fails to parse or validate is an error; it is
    /// never silently replaced.
    pub fn load_or_default(path: impl Into<PathBuf>) -> SettingsResult<Self> {
        let path = path.into();
        if !path.exists() {
            info!("No settings at {}, using defaults", path.display());
            return Ok(Self {
                path,
                config: Config::default(),
            });
        }
        let config = Config::load_from_file(&path).map_err(|e| {
            warn!("Failed to load settings from {}: {}", path.display(), e);
            e
        })?;
        info!("Loaded settings from {}", path.display());
        Ok(Self { path, config })
    }

    /// Save settings, creating the parent directory if needed
    pub fn save(&self) -> SettingsResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| SettingsError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        self.config.save_to_file(&self.path)?;
        info!("Saved settings to {}", self.path.display());
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }
}
