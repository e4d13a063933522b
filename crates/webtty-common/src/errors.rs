use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

#[derive(Debug, thiserror::Error)]
pub enum WebTtyError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("network error: {0}")]
    Network(String),

    #[error("terminal error: {0}")]
    Terminal(String),

    #[error("{0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let err = ConfigError::FileNotFound(PathBuf::from("/tmp/missing.toml"));
        assert_eq!(err.to_string(), "config file not found: /tmp/missing.toml");

        let err = ConfigError::ParseError("unexpected token".into());
        assert_eq!(err.to_string(), "config parse error: unexpected token");

        let err = ConfigError::ValidationError("server.port = 0 is out of range".into());
        assert_eq!(
            err.to_string(),
            "config validation error: server.port = 0 is out of range"
        );
    }

    #[test]
    fn webtty_error_from_config() {
        let config_err = ConfigError::ParseError("bad toml".into());
        let err: WebTtyError = config_err.into();
        assert!(matches!(err, WebTtyError::Config(_)));
        assert!(err.to_string().contains("bad toml"));
    }

    #[test]
    fn webtty_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::AddrInUse, "port taken");
        let err: WebTtyError = io_err.into();
        assert!(matches!(err, WebTtyError::Io(_)));
        assert!(err.to_string().contains("port taken"));
    }

    #[test]
    fn webtty_error_other_variants() {
        let err = WebTtyError::Network("handshake failed".into());
        assert_eq!(err.to_string(), "network error: handshake failed");

        let err = WebTtyError::Terminal("pty allocation failed".into());
        assert_eq!(err.to_string(), "terminal error: pty allocation failed");

        let err = WebTtyError::Other("something went wrong".into());
        assert_eq!(err.to_string(), "something went wrong");
    }
}
