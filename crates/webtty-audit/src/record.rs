use std::fmt;

use chrono::{DateTime, Local};
use webtty_common::SessionLabels;

/// One command a client ran, stamped with who ran it and when.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditRecord {
    pub labels: SessionLabels,
    pub timestamp: DateTime<Local>,
    pub command: String,
}

impl AuditRecord {
    pub fn new(labels: SessionLabels, command: impl Into<String>) -> Self {
        Self {
            labels,
            timestamp: Local::now(),
            command: command.into(),
        }
    }
}

/// `[cluster:<c>]-[user:<u>]-[time:<YYYY-mm-dd HH:MM:SS>]-[LOG:<command>]`
impl fmt::Display for AuditRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[cluster:{}]-[user:{}]-[time:{}]-[LOG:{}]",
            self.labels.cluster,
            self.labels.user,
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.command
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn display_format() {
        let record = AuditRecord {
            labels: SessionLabels::new("alice", "prod-east"),
            timestamp: Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap(),
            command: "ls -la".into(),
        };
        assert_eq!(
            record.to_string(),
            "[cluster:prod-east]-[user:alice]-[time:2024-03-09 14:05:07]-[LOG:ls -la]"
        );
    }

    #[test]
    fn new_stamps_current_time() {
        let before = Local::now();
        let record = AuditRecord::new(SessionLabels::default(), "pwd");
        assert!(record.timestamp >= before);
        assert_eq!(record.command, "pwd");
    }
}
