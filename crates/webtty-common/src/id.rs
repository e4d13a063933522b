use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifies one bridged master/slave pair for the lifetime of a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Leading 8 hex digits, for compact log lines.
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0.hyphenated(), f)
    }
}

/// Caller-supplied identity attached to a session for auditing.
///
/// Neither field is interpreted; both are carried verbatim into audit records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionLabels {
    pub user: String,
    pub cluster: String,
}

impl SessionLabels {
    pub fn new(user: impl Into<String>, cluster: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            cluster: cluster.into(),
        }
    }
}
