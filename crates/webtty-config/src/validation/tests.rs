//! Tests for the full validation pipeline.

use super::*;

#[test]
fn default_config_validates() {
    let config = WebTtyConfig::default();
    assert!(validate(&config).is_ok());
}

#[test]
fn catches_port_zero() {
    let mut config = WebTtyConfig::default();
    config.server.port = 0;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("server.port"));
}

#[test]
fn catches_empty_address() {
    let mut config = WebTtyConfig::default();
    config.server.address = "  ".into();
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("server.address"));
}

#[test]
fn catches_oversized_geometry() {
    let mut config = WebTtyConfig::default();
    config.session.columns = 1001;
    config.session.rows = 2000;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("session.columns"));
    assert!(err.contains("session.rows"));
}

#[test]
fn catches_zero_buffer_size() {
    let mut config = WebTtyConfig::default();
    config.session.buffer_size = 0;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("session.buffer_size = 0 is out of range [1, 1048576]"));
}

#[test]
fn catches_reconnect_too_long() {
    let mut config = WebTtyConfig::default();
    config.session.reconnect = 100_000;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("session.reconnect"));
}

#[test]
fn catches_non_table_preferences() {
    let mut config = WebTtyConfig::default();
    config.session.preferences = Some(serde_json::json!(5));
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("session.preferences"));
}

#[test]
fn disabled_audit_is_not_checked() {
    let mut config = WebTtyConfig::default();
    config.audit.endpoint = "not a url".into();
    config.audit.timeout_secs = 0;
    assert!(validate(&config).is_ok());
}

#[test]
fn enabled_audit_requires_http_endpoint() {
    let mut config = WebTtyConfig::default();
    config.audit.enabled = true;
    config.audit.endpoint = "ftp://collector".into();
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("audit.endpoint"));

    config.audit.endpoint = "https://collector.example.com/audit".into();
    assert!(validate(&config).is_ok());
}

#[test]
fn collects_multiple_errors() {
    let mut config = WebTtyConfig::default();
    config.server.port = 0;
    config.session.buffer_size = 0;
    config.audit.enabled = true;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("server.port"));
    assert!(err.contains("session.buffer_size"));
    assert!(err.contains("audit.endpoint"));
    assert_eq!(err.matches("; ").count(), 2);
}
