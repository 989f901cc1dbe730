mod config;
pub mod database;
pub mod run_state;

pub use config::{Config, DisplayConfig, RoutineDefaults};
pub use database::{Database, RoutineSummary};
pub use run_state::RunState;

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/ritual[-dev]/` based on RITUAL_ENV.
///
/// Set RITUAL_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("RITUAL_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("ritual-dev")
    } else {
        base_dir.join("ritual")
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
