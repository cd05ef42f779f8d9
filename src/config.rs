//! User configuration file with default viewer and pager commands

use crate::error::{FpickError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct UserConfig {
    /// Image viewer command used when `--imgviewer` is not given
    pub imgviewer: Option<String>,
    /// Video viewer command used when `--vidviewer` is not given
    pub vidviewer: Option<String>,
    /// Pager command used when `--pager` is not given
    pub pager: Option<String>,
}

impl UserConfig {
    /// Get the config file path (~/.config/fpick/config.json)
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("fpick").join("config.json"))
    }

    /// Load config from the default location, or defaults if there is none
    pub fn load() -> Result<Self> {
        let path = Self::config_path().ok_or_else(|| {
            FpickError::ConfigError("Could not determine config directory".to_string())
        })?;

        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path).map_err(|e| {
            FpickError::ConfigError(format!("Failed to read config file: {}", e))
        })?;

        serde_json::from_str(&contents).map_err(|e| {
            FpickError::ConfigError(format!("Failed to parse config file: {}", e))
        })
    }
}
