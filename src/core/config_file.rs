//! User configuration file handling
//!
//! Manages settings from ~/.config/glyphloop/settings.json

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// User configuration from ~/.config/glyphloop/settings.json
///
/// These settings override built-in defaults but are overridden by CLI arguments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ConfigFile {
    /// Log filter level (e.g., "info", "debug", "glyphloop=trace")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
    /// Also write logs to ~/.config/glyphloop/logs/
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_to_file: Option<bool>,
    /// Skip the per-frame yield of the animation thread
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_as_fast_as_possible: Option<bool>,
    /// Frames between FPS reports
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_fps_frames: Option<u32>,
}

impl ConfigFile {
    /// Get the path to the glyphloop config directory
    pub fn config_dir() -> PathBuf {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")));
        config_dir.join("glyphloop")
    }

    /// Get the path to the user config file
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("settings.json")
    }

    /// Load configuration from the user config file
    pub fn load() -> Option<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from `path`; a missing or malformed file yields `None`
    pub fn load_from(path: &Path) -> Option<Self> {
        if !path.exists() {
            return None;
        }

        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    debug!("Loaded user settings from {:?}", path);
                    Some(config)
                }
                Err(e) => {
                    warn!("Failed to parse {:?}: {}", path, e);
                    None
                }
            },
            Err(e) => {
                warn!("Failed to read {:?}: {}", path, e);
                None
            }
        }
    }

    /// Save configuration to the user config file
    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;

        debug!("Saved settings to {:?}", path);
        Ok(())
    }

    /// Settings file written by `--new-config`
    pub fn example() -> Self {
        Self {
            log_level: Some("info".to_string()),
            log_to_file: Some(false),
            run_as_fast_as_possible: Some(false),
            update_fps_frames: Some(60),
        }
    }

    /// Initialize the complete user configuration directory
    pub fn initialize_config_directory() -> anyhow::Result<()> {
        Self::initialize_config_directory_at(&Self::config_dir())
    }

    /// Create `config_dir`, its logs directory and a default settings file.
    /// An existing settings file is left untouched.
    pub fn initialize_config_directory_at(config_dir: &Path) -> anyhow::Result<()> {
        fs::create_dir_all(config_dir)?;
        println!("Created config directory: {:?}", config_dir);

        let logs_dir = config_dir.join("logs");
        fs::create_dir_all(&logs_dir)?;
        println!("Created logs directory: {:?}", logs_dir);

        let settings_path = config_dir.join("settings.json");
        if !settings_path.exists() {
            Self::example().save_to(&settings_path)?;
            println!("Created settings file: {:?}", settings_path);
        } else {
            println!("Settings file already exists: {:?}", settings_path);
        }

        println!("\nConfiguration initialized successfully!");
        println!("You can now:");
        println!("  - Edit settings at: {:?}", settings_path);
        println!("  - View application logs in: {:?}", logs_dir);

        Ok(())
    }
}
