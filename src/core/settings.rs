//! Resolved runtime settings
//!
//! Built-in defaults overlaid by the user config file. The CLI applies its own
//! flags on top (see `CliArgs::resolve_settings`).

use crate::core::config_file::ConfigFile;

pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_UPDATE_FPS_FRAMES: u32 = 60;

/// Log filter for our crate with third-party noise kept down
pub const LOG_FILTER_TEMPLATE: &str = "glyphloop={level},norad=warn";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub log_level: String,
    pub log_to_file: bool,
    pub run_as_fast_as_possible: bool,
    pub update_fps_frames: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            log_to_file: false,
            run_as_fast_as_possible: false,
            update_fps_frames: DEFAULT_UPDATE_FPS_FRAMES,
        }
    }
}

impl Settings {
    /// Defaults overridden by whatever the config file sets
    pub fn from_config(config: Option<&ConfigFile>) -> Self {
        let mut settings = Self::default();
        let Some(config) = config else {
            return settings;
        };
        if let Some(level) = &config.log_level {
            settings.log_level = level.clone();
        }
        if let Some(to_file) = config.log_to_file {
            settings.log_to_file = to_file;
        }
        if let Some(fast) = config.run_as_fast_as_possible {
            settings.run_as_fast_as_possible = fast;
        }
        if let Some(frames) = config.update_fps_frames {
            settings.update_fps_frames = frames;
        }
        settings
    }

    /// `EnvFilter` directive for the configured level.
    ///
    /// A bare level ("debug") is scoped to our crate; anything containing a
    /// target or a comma is used as given.
    pub fn log_filter(&self) -> String {
        let level = self.log_level.trim();
        if level.contains('=') || level.contains(',') {
            level.to_string()
        } else {
            LOG_FILTER_TEMPLATE.replace("{level}", level)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_overrides_defaults() {
        let config = ConfigFile {
            log_level: Some("debug".to_string()),
            update_fps_frames: Some(10),
            ..ConfigFile::default()
        };
        let settings = Settings::from_config(Some(&config));
        assert_eq!(settings.log_level, "debug");
        assert_eq!(settings.update_fps_frames, 10);
        assert!(!settings.log_to_file);
        assert_eq!(Settings::from_config(None), Settings::default());
    }

    #[test]
    fn test_log_filter() {
        let mut settings = Settings::default();
        assert_eq!(settings.log_filter(), "glyphloop=info,norad=warn");
        settings.log_level = "glyphloop::animation=trace".to_string();
        assert_eq!(settings.log_filter(), "glyphloop::animation=trace");
    }
}
