//! Configuration for the binary: where saves live, an optional fixed rng
//! seed, and logging. Loaded from TOML with every field defaulted, so an
//! empty file and a missing file both mean "stock settings".
//!
//! ```toml
//! [game]
//! save_path = "gloomdelve-save.json"
//! player_name = "Adventurer"
//! # seed = 12345
//!
//! [logging]
//! level = "info"
//! # file = "gloomdelve.log"
//! ```

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub game: GameSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSettings {
    /// Where `save` writes and `load` reads.
    #[serde(default = "default_save_path")]
    pub save_path: String,
    /// Fixed rng seed for reproducible delves; unset means OS entropy.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_player_name")]
    pub player_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// One of error, warn, info, debug, trace.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log file path; unset logs to stderr.
    #[serde(default)]
    pub file: Option<String>,
}

fn default_save_path() -> String {
    "gloomdelve-save.json".to_string()
}

fn default_player_name() -> String {
    "Adventurer".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            save_path: default_save_path(),
            seed: None,
            player_name: default_player_name(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            game: GameSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path, e))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse config file {}: {}", path, e))?;
        Ok(config)
    }

    /// Load the file when it exists; stock settings when it does not.
    pub fn load_or_default(path: &str) -> Result<Self> {
        if Path::new(path).exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Write a default configuration file.
    pub fn create_default(path: &str) -> Result<()> {
        let config = Config::default();
        let content = toml::to_string_pretty(&config)
            .map_err(|e| anyhow!("Failed to serialize default config: {}", e))?;
        fs::write(path, content)
            .map_err(|e| anyhow!("Failed to write config file {}: {}", path, e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn empty_toml_means_stock_settings() {
        let config: Config = toml::from_str("").expect("parse");
        assert_eq!(config.game.save_path, "gloomdelve-save.json");
        assert_eq!(config.game.player_name, "Adventurer");
        assert!(config.game.seed.is_none());
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn partial_sections_fill_in_the_rest() {
        let config: Config =
            toml::from_str("[game]\nseed = 42\n\n[logging]\nlevel = \"debug\"\n").expect("parse");
        assert_eq!(config.game.seed, Some(42));
        assert_eq!(config.game.save_path, "gloomdelve-save.json");
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn create_default_writes_a_loadable_file() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("config.toml");
        let path_str = path.to_string_lossy().into_owned();
        Config::create_default(&path_str).expect("create");
        let config = Config::load(&path_str).expect("load");
        assert_eq!(config.game.player_name, "Adventurer");
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = Config::load_or_default("no-such-config.toml").expect("defaults");
        assert!(config.game.seed.is_none());
    }
}
