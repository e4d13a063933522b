//! Command auditing for webtty sessions.
//!
//! Reconstructs the command lines a client types from the raw frames read
//! off the master, and ships each completed line to a collector:
//! - [`CommandRecorder`] turns `Input` keystrokes into lines
//! - [`AuditObserver`] plugs the recorder into a session without blocking it
//! - [`AuditReporter`] delivers records to an [`AuditSink`] in the background
//! - [`HttpAuditSink`] is the HTTP collector client; its endpoint is injected

pub mod record;
pub mod recorder;
pub mod reporter;
pub mod sink;

pub use record::AuditRecord;
pub use recorder::CommandRecorder;
pub use reporter::{AuditObserver, AuditReporter, AUDIT_QUEUE};
pub use sink::{AuditSink, HttpAuditSink};

#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error("invalid collector endpoint: {0}")]
    InvalidEndpoint(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("collector returned HTTP {0}")]
    Status(u16),
}
