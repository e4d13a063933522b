//! webtty configuration.
//!
//! TOML-based configuration for the server, the spawned command, session
//! protocol options, auditing and logging. Every section uses serde defaults
//! so partial configs work out of the box.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use webtty_config::{load_config, config_to_json};
//!
//! let config = load_config(None).expect("failed to load config");
//! println!("{}", config_to_json(&config));
//! ```

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{
    AuditConfig, CommandConfig, LogLevel, LoggingConfig, ServerConfig, SessionConfig,
    WebTtyConfig,
};

use std::path::Path;

use webtty_common::ConfigError;

/// Load and validate config.
///
/// With `path`, the file must exist. Without it, the platform default path
/// is used and a commented default file is created on first run.
pub fn load_config(path: Option<&Path>) -> Result<WebTtyConfig, ConfigError> {
    let config = match path {
        Some(path) => toml_loader::load_from_path(path)?,
        None => toml_loader::load_default()?,
    };
    validation::validate(&config)?;
    Ok(config)
}

/// Serialize a config to a pretty-printed JSON string.
pub fn config_to_json(config: &WebTtyConfig) -> String {
    serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}
