//! Configuration file management for wavedraw.
//!
//! This module handles loading and saving application configuration from TOML
//! files. Configuration is stored in the user's config directory; a file with
//! defaults is written on first run.

use crate::editor::SmoothingKind;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Audio playback configuration.
#[derive(Debug, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Audio device to use. Options:
    /// - "default" for the system default device
    /// - numeric index (0, 1, 2, etc.) from `wavedraw list-devices`
    /// - device name from `wavedraw list-devices`
    #[serde(default = "default_device")]
    pub device: String,
    /// Playback sample rate in Hz; also the rate the buffer loops at
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,
}

/// Editor behavior configuration.
#[derive(Debug, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Initial smoothing tick interval in milliseconds (minimum 1)
    #[serde(default = "default_smooth_interval_ms")]
    pub smooth_interval_ms: u64,
    /// Smoothing algorithm: "causal" (running average) or "symmetric"
    #[serde(default)]
    pub smoothing: SmoothingKind,
    /// Default session file for in-editor save and load
    #[serde(default = "default_file")]
    pub file: String,
}

fn default_device() -> String {
    "default".to_string()
}

fn default_sample_rate() -> u32 {
    22050
}

fn default_smooth_interval_ms() -> u64 {
    10
}

fn default_file() -> String {
    "wave.txt".to_string()
}

/// Complete application configuration.
#[derive(Debug, Serialize, Deserialize)]
pub struct WavedrawConfig {
    pub audio: AudioConfig,
    pub editor: EditorConfig,
}

impl Default for WavedrawConfig {
    fn default() -> Self {
        WavedrawConfig {
            audio: AudioConfig {
                device: default_device(),
                sample_rate: default_sample_rate(),
            },
            editor: EditorConfig {
                smooth_interval_ms: default_smooth_interval_ms(),
                smoothing: SmoothingKind::default(),
                file: default_file(),
            },
        }
    }
}

impl WavedrawConfig {
    /// Loads configuration, writing a file with defaults if none exists.
    ///
    /// # Errors
    /// - If the config directory cannot be determined or created
    /// - If the config file cannot be read or written
    /// - If the TOML is malformed
    pub fn load_or_default() -> anyhow::Result<Self> {
        let config_path = get_config_path()?;
        if !config_path.exists() {
            let config = WavedrawConfig::default();
            config.save()?;
            tracing::info!("Created default config at {}", config_path.display());
            return Ok(config);
        }
        let config_content = fs::read_to_string(&config_path)?;
        let config: WavedrawConfig = toml::from_str(&config_content)?;
        Ok(config)
    }

    /// Saves configuration to the user's config directory.
    ///
    /// # Errors
    /// - If the config directory cannot be determined or created
    /// - If the file cannot be written
    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = get_config_path()?;
        let config_content = toml::to_string_pretty(self)?;
        fs::write(&config_path, config_content)?;
        tracing::info!("Configuration saved");
        Ok(())
    }
}

/// Retrieves the path to the config file, creating the directory if needed.
///
/// # Errors
/// - If the home directory cannot be determined
pub fn get_config_path() -> Result<PathBuf, std::io::Error> {
    let config_dir = dirs::home_dir().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not find home directory",
        )
    })?;
    let config_path = config_dir
        .join(".config")
        .join("wavedraw")
        .join("wavedraw.toml");

    std::fs::create_dir_all(config_path.parent().unwrap())?;

    Ok(config_path)
}
