//! Slave process configuration.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The program each session spawns on its PTY.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandConfig {
    /// Program path. Empty string means auto-detect from `$SHELL`.
    pub program: String,
    pub args: Vec<String>,
    /// Extra environment variables on top of the sanitized base set.
    pub env: HashMap<String, String>,
    /// Initial working directory. `None` means inherit from the server.
    pub working_directory: Option<String>,
}
