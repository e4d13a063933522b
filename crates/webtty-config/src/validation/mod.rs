//! Full configuration validation.
//!
//! Checks numeric ranges and the audit endpoint, collecting every problem
//! into a single `ConfigError`.

mod helpers;

#[cfg(test)]
mod tests;

use crate::schema::WebTtyConfig;
use webtty_common::ConfigError;

use helpers::validate_range;

/// Largest relay read buffer accepted, 1 MiB.
const MAX_BUFFER_SIZE: u32 = 1_048_576;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &WebTtyConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_server(&mut errors, config);
    validate_session(&mut errors, config);
    validate_audit(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

fn validate_server(errors: &mut Vec<String>, config: &WebTtyConfig) {
    validate_range(errors, "server.port", u32::from(config.server.port), 1, 65535);
    if config.server.address.trim().is_empty() {
        errors.push("server.address must not be empty".into());
    }
}

fn validate_session(errors: &mut Vec<String>, config: &WebTtyConfig) {
    let session = &config.session;
    validate_range(errors, "session.columns", u32::from(session.columns), 0, 1000);
    validate_range(errors, "session.rows", u32::from(session.rows), 0, 1000);
    validate_range(errors, "session.reconnect", session.reconnect, 0, 86_400);
    validate_range(
        errors,
        "session.buffer_size",
        session.buffer_size,
        1,
        MAX_BUFFER_SIZE,
    );
    if let Some(prefs) = &session.preferences {
        if !prefs.is_object() {
            errors.push("session.preferences must be a table".into());
        }
    }
}

fn validate_audit(errors: &mut Vec<String>, config: &WebTtyConfig) {
    let audit = &config.audit;
    if !audit.enabled {
        return;
    }
    validate_range(errors, "audit.timeout_secs", audit.timeout_secs, 1, 300);
    if !(audit.endpoint.starts_with("http://") || audit.endpoint.starts_with("https://")) {
        errors.push(format!(
            "audit.endpoint = {:?} must be an http(s) URL when audit is enabled",
            audit.endpoint
        ));
    }
}
