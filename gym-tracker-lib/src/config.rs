//src/config.rs
use comfy_table::Color;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use strum::IntoEnumIterator;
use strum_macros::EnumIter;
use thiserror::Error;
use tracing::warn;

const CONFIG_FILE_NAME: &str = "config.toml";
const APP_CONFIG_DIR: &str = "gym-tracker";
const CONFIG_ENV_VAR: &str = "GYM_TRACKER_CONFIG_DIR"; // Environment variable name

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-preview-09-2025";
pub const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_RECENT_LOG_LIMIT: usize = 20;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not determine configuration directory.")]
    CannotDetermineConfigDir,
    #[error("I/O error accessing config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file (TOML): {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("Failed to serialize config data (TOML): {0}")]
    TomlSerialize(#[from] toml::ser::Error),
    #[error("Invalid color name: {0}")]
    InvalidColor(String),
    #[error("Recent log limit must be at least 1.")]
    InvalidRecentLogLimit,
}

// Define standard colors using strum for easy iteration/parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum StandardColor {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    DarkGrey,
    DarkRed,
    DarkGreen,
    DarkYellow,
    DarkBlue,
    DarkMagenta,
    DarkCyan,
    Grey,
}

impl From<StandardColor> for Color {
    fn from(value: StandardColor) -> Self {
        match value {
            StandardColor::Black => Self::Black,
            StandardColor::Red => Self::Red,
            StandardColor::Green => Self::Green,
            StandardColor::Yellow => Self::Yellow,
            StandardColor::Blue => Self::Blue,
            StandardColor::Magenta => Self::Magenta,
            StandardColor::Cyan => Self::Cyan,
            StandardColor::White => Self::White,
            StandardColor::DarkGrey => Self::DarkGrey,
            StandardColor::DarkRed => Self::DarkRed,
            StandardColor::DarkGreen => Self::DarkGreen,
            StandardColor::DarkYellow => Self::DarkYellow,
            StandardColor::DarkBlue => Self::DarkBlue,
            StandardColor::DarkMagenta => Self::DarkMagenta,
            StandardColor::DarkCyan => Self::DarkCyan,
            StandardColor::Grey => Self::Grey,
        }
    }
}

/// Parses a case-insensitive color name ("blue", "DarkGreen").
pub fn parse_color(color_str: &str) -> Result<StandardColor, ConfigError> {
    StandardColor::iter()
        .find(|color| format!("{color:?}").eq_ignore_ascii_case(color_str.trim()))
        .ok_or_else(|| ConfigError::InvalidColor(color_str.to_string()))
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Theme {
    pub header_color: String,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            header_color: "Green".to_string(),
        }
    }
}

impl Theme {
    /// The header color, falling back to green for unknown names.
    pub fn header_color(&self) -> Color {
        match parse_color(&self.header_color) {
            Ok(color) => color.into(),
            Err(e) => {
                warn!(error = %e, "unknown theme color, using green");
                Color::Green
            }
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct CoachConfig {
    pub model: String,
    pub api_base_url: String,
    /// Used when GEMINI_API_KEY is not set.
    pub api_key: Option<String>,
    pub recent_log_limit: usize,
}

impl Default for CoachConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            api_key: None,
            recent_log_limit: DEFAULT_RECENT_LOG_LIMIT,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)] // Ensure defaults are used if fields are missing
pub struct Config {
    pub coach: CoachConfig,
    pub theme: Theme,
}

/// Determines the path to the configuration file.
pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    let config_dir_override = std::env::var(CONFIG_ENV_VAR).ok();

    let config_dir_path = if let Some(path_str) = config_dir_override {
        let path = PathBuf::from(path_str);
        if !path.is_dir() {
            warn!(
                env_var = CONFIG_ENV_VAR,
                path = %path.display(),
                "config directory override does not exist, creating it"
            );
            fs::create_dir_all(&path)?;
        }
        path
    } else {
        let base_config_dir = dirs::config_dir().ok_or(ConfigError::CannotDetermineConfigDir)?;
        base_config_dir.join(APP_CONFIG_DIR)
    };

    if !config_dir_path.exists() {
        fs::create_dir_all(&config_dir_path)?;
    }

    Ok(config_dir_path.join(CONFIG_FILE_NAME))
}

/// Loads the configuration, writing a default file first if none exists.
pub fn load(config_path: &Path) -> Result<Config, ConfigError> {
    if config_path.exists() {
        let config_content = fs::read_to_string(config_path)?;
        let config: Config = toml::from_str(&config_content)?;
        if config.coach.recent_log_limit == 0 {
            return Err(ConfigError::InvalidRecentLogLimit);
        }
        Ok(config)
    } else {
        let default_config = Config::default();
        save(config_path, &default_config)?;
        Ok(default_config)
    }
}

pub fn save(config_path: &Path, config: &Config) -> Result<(), ConfigError> {
    if let Some(parent_dir) = config_path.parent() {
        if !parent_dir.exists() {
            fs::create_dir_all(parent_dir)?;
        }
    }
    let config_content = toml::to_string_pretty(config)?;
    fs::write(config_path, config_content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_created_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);
        let config = load(&path).unwrap();
        assert_eq!(config, Config::default());
        assert!(path.exists());
        assert_eq!(config.coach.recent_log_limit, 20);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "[coach]\nmodel = \"gemini-2.5-flash\"\n").unwrap();
        let config = load(&path).unwrap();
        assert_eq!(config.coach.model, "gemini-2.5-flash");
        assert_eq!(config.coach.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.theme, Theme::default());
    }

    #[test]
    fn zero_log_limit_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "[coach]\nrecent_log_limit = 0\n").unwrap();
        assert!(matches!(load(&path), Err(ConfigError::InvalidRecentLogLimit)));
    }

    #[test]
    fn colors_parse_case_insensitively() {
        assert_eq!(parse_color("darkblue").unwrap(), StandardColor::DarkBlue);
        assert!(parse_color("chartreuse").is_err());
    }
}
