//! Per-session protocol options.

use serde::{Deserialize, Serialize};

/// Options announced to, or enforced on, every client session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Window title sent on connect. Empty means `<program>@<host>`.
    pub title: String,
    /// Let clients type into the terminal.
    pub permit_write: bool,
    /// Fixed columns (valid range: 0-1000). 0 lets the client decide.
    pub columns: u16,
    /// Fixed rows (valid range: 0-1000). 0 lets the client decide.
    pub rows: u16,
    /// Client reconnect interval in seconds (valid range: 0-86400). 0 disables.
    pub reconnect: u32,
    /// Relay read buffer in bytes (valid range: 1-1048576).
    pub buffer_size: u32,
    /// Client-side terminal preferences, sent to the browser as JSON.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferences: Option<serde_json::Value>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            title: String::new(),
            permit_write: false,
            columns: 0,
            rows: 0,
            reconnect: 0,
            buffer_size: 1024,
            preferences: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_config_defaults() {
        let config = SessionConfig::default();
        assert!(config.title.is_empty());
        assert!(!config.permit_write);
        assert_eq!((config.columns, config.rows), (0, 0));
        assert_eq!(config.reconnect, 0);
        assert_eq!(config.buffer_size, 1024);
        assert!(config.preferences.is_none());
    }

    #[test]
    fn preferences_table_becomes_json() {
        let toml_str = r##"
permit_write = true
columns = 80

[preferences]
font-size = 14
background-color = "#000000"
"##;
        let config: SessionConfig = toml::from_str(toml_str).unwrap();
        assert!(config.permit_write);
        assert_eq!(config.columns, 80);
        assert_eq!(config.rows, 0);

        let prefs = config.preferences.unwrap();
        assert_eq!(prefs["font-size"], 14);
        assert_eq!(prefs["background-color"], "#000000");
    }
}
