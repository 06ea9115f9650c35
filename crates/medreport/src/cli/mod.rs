//! Command implementations.

pub mod config;
pub mod models;
pub mod report;
pub mod serve;

use medreport_core::Config;
use std::path::Path;

/// Load configuration for a command.
///
/// An explicit path must load cleanly. The default location falls back to
/// built-in defaults with a warning, since logging is not up yet.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    if let Some(path) = path {
        return Config::load_from(path)
            .map_err(|e| anyhow::anyhow!("Failed to load config {}: {e}", path.display()));
    }

    match Config::load() {
        Ok(config) => Ok(config),
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `medreport config path`."
            );
            Ok(Config::default())
        }
    }
}
