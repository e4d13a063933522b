//! Mapping from loaded config to what each connection needs.

use webtty::{SessionOptions, TerminalSize};
use webtty_common::WebTtyError;
use webtty_config::SessionConfig;

use crate::slave::{PtyCommand, DEFAULT_SIZE};

/// Session options shared by every connection. Observers are added per connection.
pub fn session_options(
    config: &SessionConfig,
    command: &PtyCommand,
) -> Result<SessionOptions, WebTtyError> {
    let title = if config.title.is_empty() {
        default_title(&command.program)
    } else {
        config.title.clone()
    };

    let mut options = SessionOptions::new()
        .with_window_title(title)
        .with_permit_write(config.permit_write)
        .with_fixed_size(config.columns, config.rows)
        .with_reconnect(config.reconnect)
        .with_buffer_size(config.buffer_size as usize);

    if let Some(preferences) = &config.preferences {
        let json = serde_json::to_vec(preferences)
            .map_err(|e| WebTtyError::Other(format!("invalid session preferences: {e}")))?;
        options = options.with_preferences(json);
    }
    Ok(options)
}

/// `<program>@<host>`.
pub fn default_title(program: &str) -> String {
    let host = std::env::var("HOSTNAME")
        .ok()
        .filter(|h| !h.is_empty())
        .unwrap_or_else(|| "localhost".to_string());
    format!("{program}@{host}")
}

/// Geometry to open the PTY with: configured axes, default for the rest.
pub fn initial_size(config: &SessionConfig) -> TerminalSize {
    let pick = |configured: u16, default: u16| if configured == 0 { default } else { configured };
    TerminalSize::new(
        pick(config.columns, DEFAULT_SIZE.columns),
        pick(config.rows, DEFAULT_SIZE.rows),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn command(program: &str) -> PtyCommand {
        PtyCommand {
            program: program.into(),
            args: Vec::new(),
            env: HashMap::new(),
            cwd: None,
        }
    }

    #[test]
    fn options_follow_config() {
        let config = SessionConfig {
            title: "shared shell".into(),
            permit_write: true,
            columns: 100,
            rows: 0,
            reconnect: 10,
            buffer_size: 4096,
            preferences: None,
        };
        let options = session_options(&config, &command("bash")).unwrap();

        assert_eq!(options.window_title(), b"shared shell");
        assert!(options.permit_write());
        assert_eq!(options.fixed_size(), TerminalSize::new(100, 0));
        assert_eq!(options.reconnect(), 10);
        assert_eq!(options.buffer_size(), 4096);
        assert!(options.preferences().is_none());
    }

    #[test]
    fn empty_title_uses_program_and_host() {
        let options = session_options(&SessionConfig::default(), &command("htop")).unwrap();
        let title = String::from_utf8(options.window_title().to_vec()).unwrap();
        assert!(title.starts_with("htop@"), "got {title}");
        assert!(title.len() > "htop@".len());
    }

    #[test]
    fn preferences_are_serialized_as_json() {
        let config = SessionConfig {
            preferences: Some(serde_json::json!({"font-size": 14})),
            ..Default::default()
        };
        let options = session_options(&config, &command("sh")).unwrap();
        let prefs: serde_json::Value = serde_json::from_slice(options.preferences().unwrap()).unwrap();
        assert_eq!(prefs["font-size"], 14);
    }

    #[test]
    fn initial_size_fills_unset_axes() {
        let config = SessionConfig {
            columns: 132,
            ..Default::default()
        };
        assert_eq!(initial_size(&config), TerminalSize::new(132, 24));
        assert_eq!(initial_size(&SessionConfig::default()), DEFAULT_SIZE);
    }
}
