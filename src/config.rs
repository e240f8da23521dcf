//! Game settings loaded from an optional TOML file
//!
//! Every key has a default, so an empty file (or no file) gives the stock
//! game: a 40 second countdown with a hurry warning below 20 seconds.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::countdown::CountdownSettings;
use crate::error::{ConfigError, DoorError};

/// Longest idle timeout accepted, one day
pub const MAX_IDLE_TIMEOUT_SECS: u64 = 24 * 60 * 60;
/// Longest tick, notice or pause accepted, one minute
pub const MAX_DELAY_MILLIS: u64 = 60_000;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub countdown_secs: u32,
    pub hurry_threshold_secs: u32,
    pub tick_millis: u64,
    pub idle_timeout_secs: u64,
    pub notice_millis: u64,
    pub intro_secs: u32,
    pub game_over_pause_millis: u64,
    pub art_dir: PathBuf,
    pub log_file: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            countdown_secs: 40,
            hurry_threshold_secs: 20,
            tick_millis: 1000,
            idle_timeout_secs: 300,
            notice_millis: 1500,
            intro_secs: 3,
            game_over_pause_millis: 2000,
            art_dir: PathBuf::from("art/"),
            log_file: PathBuf::from("door.log"),
        }
    }
}

impl GameConfig {
    /// Parse settings from TOML text
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: GameConfig =
            toml::from_str(text).map_err(|e| ConfigError::InvalidSetting(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, DoorError> {
        let text = fs::read_to_string(path).map_err(|e| DoorError::ConfigFile {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Ok(Self::from_toml(&text)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_millis == 0 {
            return Err(ConfigError::InvalidSetting(
                "tick_millis must be greater than zero".to_string(),
            ));
        }
        if self.idle_timeout_secs == 0 {
            return Err(ConfigError::InvalidSetting(
                "idle_timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.idle_timeout_secs > MAX_IDLE_TIMEOUT_SECS {
            return Err(ConfigError::InvalidSetting(format!(
                "idle_timeout_secs must be at most {}",
                MAX_IDLE_TIMEOUT_SECS
            )));
        }
        for (key, value) in [
            ("tick_millis", self.tick_millis),
            ("notice_millis", self.notice_millis),
            ("game_over_pause_millis", self.game_over_pause_millis),
        ] {
            if value > MAX_DELAY_MILLIS {
                return Err(ConfigError::InvalidSetting(format!(
                    "{} must be at most {}",
                    key, MAX_DELAY_MILLIS
                )));
            }
        }
        Ok(())
    }

    pub fn countdown(&self) -> CountdownSettings {
        CountdownSettings {
            initial_secs: self.countdown_secs,
            hurry_below_secs: self.hurry_threshold_secs,
            tick: Duration::from_millis(self.tick_millis),
        }
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    pub fn notice(&self) -> Duration {
        Duration::from_millis(self.notice_millis)
    }

    pub fn game_over_pause(&self) -> Duration {
        Duration::from_millis(self.game_over_pause_millis)
    }
}
