//! Where the config file lives, and writing the first one.

use std::ffi::OsString;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::info;
use webtty_common::ConfigError;

use super::template::default_config_toml;

/// Overrides the default config location when set and non-empty.
pub const CONFIG_PATH_ENV: &str = "WEBTTY_CONFIG";

/// `$WEBTTY_CONFIG`, else `<config_dir>/webtty/config.toml`.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    resolve_config_path(std::env::var_os(CONFIG_PATH_ENV), dirs::config_dir())
}

fn resolve_config_path(
    env_override: Option<OsString>,
    config_dir: Option<PathBuf>,
) -> Result<PathBuf, ConfigError> {
    if let Some(path) = env_override.filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(path));
    }
    config_dir
        .map(|dir| dir.join("webtty").join("config.toml"))
        .ok_or_else(|| ConfigError::ParseError("no config directory on this platform".into()))
}

/// Write the commented default config to `path`, creating parent directories.
/// An existing file is never overwritten.
pub fn create_default_config(path: &Path) -> Result<(), ConfigError> {
    let write_failed = |e: std::io::Error| {
        ConfigError::ParseError(format!("cannot write {}: {e}", path.display()))
    };

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(write_failed)?;
    }
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(write_failed)?;
    file.write_all(default_config_toml().as_bytes())
        .map_err(write_failed)?;

    info!(path = %path.display(), "Wrote default config");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_override_wins() {
        let path = resolve_config_path(
            Some(OsString::from("/etc/webtty.toml")),
            Some(PathBuf::from("/home/u/.config")),
        )
        .unwrap();
        assert_eq!(path, PathBuf::from("/etc/webtty.toml"));
    }

    #[test]
    fn empty_override_is_ignored() {
        let path =
            resolve_config_path(Some(OsString::new()), Some(PathBuf::from("/home/u/.config")))
                .unwrap();
        assert_eq!(path, PathBuf::from("/home/u/.config/webtty/config.toml"));
    }

    #[test]
    fn no_config_dir_is_an_error() {
        assert!(resolve_config_path(None, None).is_err());
    }

    #[test]
    fn existing_file_is_not_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "# mine\n").unwrap();

        assert!(create_default_config(&path).is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# mine\n");
    }
}
