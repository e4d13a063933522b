use serde::{Deserialize, Serialize};

/// Command audit reporting. Off unless explicitly enabled.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    pub enabled: bool,
    /// Collector URL; each command is sent as its `command` query parameter.
    pub endpoint: String,
    /// Cluster label stamped on every record.
    pub cluster: String,
    /// HTTP timeout in seconds (valid range: 1-300).
    pub timeout_secs: u32,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: String::new(),
            cluster: String::new(),
            timeout_secs: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn audit_config_defaults() {
        let config = AuditConfig::default();
        assert!(!config.enabled);
        assert!(config.endpoint.is_empty());
        assert!(config.cluster.is_empty());
        assert_eq!(config.timeout_secs, 10);
    }

    #[test]
    fn audit_config_partial_toml() {
        let toml_str = r#"
enabled = true
endpoint = "http://collector.internal/audit"
"#;
        let config: AuditConfig = toml::from_str(toml_str).unwrap();
        assert!(config.enabled);
        assert_eq!(config.endpoint, "http://collector.internal/audit");
        assert_eq!(config.timeout_secs, 10);
    }
}
