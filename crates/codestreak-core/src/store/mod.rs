mod activity;
mod persist;

pub use activity::{ActivityRecord, ActivityStore};
pub use persist::{JsonStore, StorePersistence};

#[cfg(test)]
pub(crate) use persist::memory::MemoryStore;

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/codestreak[-dev]/` based on CODESTREAK_ENV.
///
/// Set CODESTREAK_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if the home directory cannot be determined or if
/// creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("CODESTREAK_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("codestreak-dev")
    } else {
        base_dir.join("codestreak")
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::DataDir(e.to_string()))?;
    Ok(dir)
}
