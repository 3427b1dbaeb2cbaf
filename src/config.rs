//! Application configuration
//!
//! Only settings of the program itself live here. Chosen modes are never
//! written back; the display server is the source of truth for those.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::constants::config::{APP_DIR, FILENAME};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// X display to open, `$DISPLAY` when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
    #[serde(default = "default_window_width")]
    pub window_width: u16,
    #[serde(default = "default_window_height")]
    pub window_height: u16,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_window_width() -> u16 {
    640
}

fn default_window_height() -> u16 {
    480
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            display: None,
            window_width: default_window_width(),
            window_height: default_window_height(),
        }
    }
}

impl Config {
    pub fn path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(APP_DIR);
        path.push(FILENAME);
        path
    }

    /// Load from the default location, writing defaults on first run
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!("Config file not found, creating default config at {:?}", path);
            let config = Config::default();
            config.save_to(path)?;
            return Ok(config);
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;

        toml::from_str(&contents).with_context(|| format!("Failed to parse TOML from {:?}", path))
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {:?}", parent))?;
        }

        let toml_string =
            toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        fs::write(path, toml_string)
            .with_context(|| format!("Failed to write config to {:?}", path))?;

        info!("Saved config to {:?}", path);
        Ok(())
    }
}
