//! Configuration loading
//!
//! The wall configuration is compiled in from `flipdot.toml`. A file that
//! fails to parse or validate falls back to the built-in defaults so the
//! wall still comes up.

pub mod toml;

use defmt::*;
use flipdot_core::config::DisplayConfig;

pub use toml::parse_config;

/// Parse and validate the embedded configuration
pub fn load_config(input: &str) -> DisplayConfig {
    let config = match parse_config(input) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to parse flipdot.toml: {:?}, using defaults", e);
            return DisplayConfig::default();
        }
    };

    match config.validate() {
        Ok(()) => {
            info!(
                "Wall: {} modules x {} columns x {} rows",
                config.geometry.modules, config.geometry.module_columns, config.geometry.rows
            );
            config
        }
        Err(e) => {
            error!("Invalid flipdot.toml: {:?}, using defaults", e);
            DisplayConfig::default()
        }
    }
}
