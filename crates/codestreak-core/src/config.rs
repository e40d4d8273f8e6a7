//! Bot configuration.
//!
//! Two layers, following the usual split:
//! - [`BotEnv`]: secrets and identity from the environment. A missing
//!   token is the only fatal startup condition.
//! - [`Settings`]: tunables from `settings.toml` in the data directory,
//!   every field defaulted so a missing or partial file just works.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::store::data_dir;

const TOKEN_VAR: &str = "CODESTREAK_TOKEN";
const OWNER_VAR: &str = "CODESTREAK_OWNER_ID";

/// Environment-provided identity.
#[derive(Debug, Clone)]
pub struct BotEnv {
    /// Chat-platform authentication token, handed to the connector.
    pub token: String,
    /// User id that is always treated as admin.
    pub owner_id: Option<String>,
}

impl BotEnv {
    /// Read the environment. Absence of the token is fatal.
    ///
    /// # Errors
    /// Returns [`ConfigError::MissingEnv`] when `CODESTREAK_TOKEN` is
    /// unset or empty.
    pub fn from_env() -> Result<Self, ConfigError> {
        let token = std::env::var(TOKEN_VAR)
            .ok()
            .filter(|t| !t.is_empty())
            .ok_or(ConfigError::MissingEnv(TOKEN_VAR))?;
        let owner_id = std::env::var(OWNER_VAR).ok().filter(|o| !o.is_empty());
        Ok(Self { token, owner_id })
    }
}

/// Tunable settings.
///
/// Serialized to/from TOML at `~/.config/codestreak/settings.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Hours without activity before a member counts as inactive.
    #[serde(default = "default_inactive_after_hours")]
    pub inactive_after_hours: u64,
    /// Hours between inactivity sweeps (process uptime, not calendar).
    #[serde(default = "default_sweep_interval_hours")]
    pub sweep_interval_hours: u64,
    /// Entries shown on the leaderboard and streak board.
    #[serde(default = "default_leaderboard_size")]
    pub leaderboard_size: usize,
    /// Days summed for the progress command.
    #[serde(default = "default_progress_window_days")]
    pub progress_window_days: u64,
    /// Days summed for the admin user report.
    #[serde(default = "default_report_window_days")]
    pub report_window_days: u64,
    /// Activity data file name inside the data directory.
    #[serde(default = "default_data_file")]
    pub data_file: String,
}

fn default_inactive_after_hours() -> u64 {
    24
}
fn default_sweep_interval_hours() -> u64 {
    24
}
fn default_leaderboard_size() -> usize {
    10
}
fn default_progress_window_days() -> u64 {
    7
}
fn default_report_window_days() -> u64 {
    30
}
fn default_data_file() -> String {
    "data.json".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            inactive_after_hours: default_inactive_after_hours(),
            sweep_interval_hours: default_sweep_interval_hours(),
            leaderboard_size: default_leaderboard_size(),
            progress_window_days: default_progress_window_days(),
            report_window_days: default_report_window_days(),
            data_file: default_data_file(),
        }
    }
}

impl Settings {
    fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("settings.toml"))
    }

    /// Load from disk, writing the defaults on first run.
    ///
    /// # Errors
    /// Returns an error if the settings file exists but cannot be parsed,
    /// or if the default file cannot be written.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path,
                message: e.to_string(),
            }),
            Err(_) => {
                let settings = Self::default();
                settings.save()?;
                Ok(settings)
            }
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    /// Returns an error if serialization or the write fails.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path()?;
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, content).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })
    }

    /// Full path of the activity data file.
    ///
    /// # Errors
    /// Returns an error if the data directory cannot be accessed.
    pub fn data_path(&self) -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join(&self.data_file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_roundtrip() {
        let settings = Settings::default();
        let toml_str = toml::to_string_pretty(&settings).unwrap();
        let parsed: Settings = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.inactive_after_hours, 24);
        assert_eq!(parsed.leaderboard_size, 10);
        assert_eq!(parsed.data_file, "data.json");
    }

    #[test]
    fn partial_file_fills_defaults() {
        let parsed: Settings = toml::from_str("leaderboard_size = 5\n").unwrap();
        assert_eq!(parsed.leaderboard_size, 5);
        assert_eq!(parsed.progress_window_days, 7);
        assert_eq!(parsed.report_window_days, 30);
    }
}
