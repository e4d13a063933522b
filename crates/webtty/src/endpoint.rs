//! Capability contracts for the two ends of a session.
//!
//! Both sides are read by one relay loop while another loop may write to
//! them, so every method takes `&self`. A read returning `Ok(0)` means the
//! endpoint is closed. A write either consumes all of `data` or fails; the
//! session treats a shorter count as a `WriteZero` error.

use std::io;

use async_trait::async_trait;

/// The controlling side of a terminal, typically a remote client connection.
///
/// Each successful read is treated as exactly one frame.
#[async_trait]
pub trait Master: Send + Sync {
    async fn read(&self, buf: &mut [u8]) -> io::Result<usize>;

    async fn write(&self, data: &[u8]) -> io::Result<usize>;
}

/// The controlled side of a terminal, typically a process attached to a PTY.
#[async_trait]
pub trait Slave: Send + Sync {
    async fn read(&self, buf: &mut [u8]) -> io::Result<usize>;

    async fn write(&self, data: &[u8]) -> io::Result<usize>;

    /// Apply a new terminal geometry. Must be safe before any data has flowed.
    async fn resize(&self, columns: u16, rows: u16) -> io::Result<()>;
}
