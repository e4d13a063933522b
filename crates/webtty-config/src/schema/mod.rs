//! Configuration schema types for webtty.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod audit;
mod command;
mod logging;
mod server;
mod session;

pub use audit::*;
pub use command::*;
pub use logging::*;
pub use server::*;
pub use session::*;

use serde::{Deserialize, Serialize};

/// Root configuration for webtty.
///
/// Only override what you want to change.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WebTtyConfig {
    pub server: ServerConfig,
    pub command: CommandConfig,
    pub session: SessionConfig,
    pub audit: AuditConfig,
    pub logging: LoggingConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let config: WebTtyConfig = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.session.buffer_size, 1024);
        assert!(!config.session.permit_write);
        assert!(!config.audit.enabled);
        assert_eq!(config.logging.level, LogLevel::Info);
    }

    #[test]
    fn unknown_sections_are_ignored() {
        let config: WebTtyConfig = toml::from_str("[theme]\nname = \"dark\"\n").unwrap();
        assert_eq!(config.server.address, "0.0.0.0");
    }
}
