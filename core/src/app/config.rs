//! Configuration management (`config.toml`)
//!
//! Every field has a default, so a missing file, a missing section or a
//! partial section all load.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::log_panel::DEFAULT_PANEL_CAPACITY;

/// Name of the configuration file inside the config directory
pub const CONFIG_FILE: &str = "config.toml";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Game module and its internal resolution
    #[serde(default)]
    pub game: GameConfig,
    /// Where assets are fetched from
    #[serde(default)]
    pub assets: AssetsConfig,
    #[serde(default)]
    pub audio: AudioConfig,
    /// Initial on-screen layout
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Module locator relative to the asset root (default: towerd.wasm)
    #[serde(default = "default_module")]
    pub module: String,
    /// Internal width passed to `init` (default: 800)
    #[serde(default = "default_width")]
    pub width: u32,
    /// Internal height passed to `init` (default: 600)
    #[serde(default = "default_height")]
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetsConfig {
    /// Directory or http(s) base URL (default: current directory)
    #[serde(default = "default_root")]
    pub root: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Open an output device (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Master volume level (default: 0.8, range: 0.0-1.0)
    #[serde(default = "default_volume")]
    pub master_volume: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Container width in screen pixels (default: 800)
    #[serde(default = "default_container_width")]
    pub container_width: f64,
    /// Device pixels per screen pixel (default: 1.0)
    #[serde(default = "default_device_pixel_ratio")]
    pub device_pixel_ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SchedulerConfig {
    /// Largest delta passed to `update` (default: uncapped)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_delta_secs: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Entries kept in the log panel (default: 100)
    #[serde(default = "default_panel_capacity")]
    pub panel_capacity: usize,
}

fn default_module() -> String {
    "towerd.wasm".to_string()
}
fn default_width() -> u32 {
    800
}
fn default_height() -> u32 {
    600
}
fn default_root() -> String {
    ".".to_string()
}
fn default_true() -> bool {
    true
}
fn default_volume() -> f32 {
    0.8
}
fn default_container_width() -> f64 {
    800.0
}
fn default_device_pixel_ratio() -> f64 {
    1.0
}
fn default_panel_capacity() -> usize {
    DEFAULT_PANEL_CAPACITY
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            module: default_module(),
            width: default_width(),
            height: default_height(),
        }
    }
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            master_volume: default_volume(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            container_width: default_container_width(),
            device_pixel_ratio: default_device_pixel_ratio(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            panel_capacity: default_panel_capacity(),
        }
    }
}

/// Returns the platform-specific configuration directory.
///
/// On Windows: `%APPDATA%\towerd\config`
/// On macOS: `~/Library/Application Support/io.towerd.towerd`
/// On Linux: `~/.config/towerd`
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("io", "towerd", "towerd")
        .map(|dirs| dirs.config_dir().to_path_buf())
}

/// Loads the configuration from the platform config directory.
///
/// Returns defaults if the file doesn't exist or cannot be parsed.
pub fn load() -> Config {
    let Some(path) = config_dir().map(|dir| dir.join(CONFIG_FILE)) else {
        return Config::default();
    };
    if !path.exists() {
        return Config::default();
    }
    load_from(&path).unwrap_or_else(|e| {
        tracing::warn!("Using default config: {:#}", e);
        Config::default()
    })
}

/// Loads the configuration from an explicit file.
pub fn load_from(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
}

/// Saves the configuration to the platform config directory.
pub fn save(config: &Config) -> Result<()> {
    let dir = config_dir().context("no home directory for config")?;
    save_to(config, &dir.join(CONFIG_FILE))
}

/// Saves the configuration to an explicit file, creating parent directories.
pub fn save_to(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let content = toml::to_string_pretty(config).context("failed to serialize config")?;
    std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    // =============================================================
    // Default value tests
    // =============================================================

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.game.module, "towerd.wasm");
        assert_eq!((config.game.width, config.game.height), (800, 600));
        assert!(config.audio.enabled);
        assert!((config.audio.master_volume - 0.8).abs() < f32::EPSILON);
        assert_eq!(config.scheduler.max_delta_secs, None);
        assert_eq!(config.log.panel_capacity, 100);
    }

    #[test]
    fn test_config_deserialize_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_config_deserialize_partial_section() {
        let toml_str = r#"
[game]
width = 1024

[assets]
root = "https://games.example.org/towerd"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.game.width, 1024);
        assert_eq!(config.game.height, 600); // default
        assert_eq!(config.game.module, "towerd.wasm"); // default
        assert_eq!(config.assets.root, "https://games.example.org/towerd");
    }

    #[test]
    fn test_config_frame_delta_cap_is_opt_in() {
        let config: Config = toml::from_str("[scheduler]\nmax_delta_secs = 0.1\n").unwrap();
        assert_eq!(config.scheduler.max_delta_secs, Some(0.1));

        let config: Config = toml::from_str("[scheduler]\n").unwrap();
        assert_eq!(config.scheduler.max_delta_secs, None);
    }

    // =============================================================
    // File round trip
    // =============================================================

    #[test]
    fn test_save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE);

        let mut config = Config::default();
        config.audio.enabled = false;
        config.display.container_width = 400.0;
        save_to(&config, &path).unwrap();

        assert_eq!(load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_load_from_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "[game\nwidth = ").unwrap();

        assert!(load_from(&path).is_err());
        assert!(load_from(&dir.path().join("missing.toml")).is_err());
    }
}
