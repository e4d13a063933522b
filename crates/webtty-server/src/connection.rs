//! Per-connection handler: handshake, spawn the PTY, then run a session.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::net::TcpStream;
use tokio_tungstenite::accept_hdr_async;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tokio_util::sync::CancellationToken;
use webtty::{Session, SessionOptions, TerminalSize};
use webtty_audit::AuditReporter;
use webtty_common::{SessionId, SessionLabels};

use crate::master::WsMaster;
use crate::slave::{PtyCommand, PtySlave};

/// Everything the accept loop hands to each connection.
pub struct ServerContext {
    pub command: PtyCommand,
    pub options: SessionOptions,
    pub initial_size: TerminalSize,
    pub audit: Option<AuditReporter>,
    pub cluster: String,
    pub limit: ConnectionLimit,
    pub shutdown: CancellationToken,
}

/// Caps concurrent sessions. A limit of 0 means unlimited.
#[derive(Debug)]
pub struct ConnectionLimit {
    max: usize,
    active: Arc<AtomicUsize>,
}

/// Holds one slot until dropped.
#[derive(Debug)]
pub struct ConnectionSlot {
    active: Arc<AtomicUsize>,
}

impl ConnectionLimit {
    pub fn new(max: usize) -> Self {
        Self {
            max,
            active: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn try_acquire(&self) -> Option<ConnectionSlot> {
        let acquired = self
            .active
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                (self.max == 0 || n < self.max).then_some(n + 1)
            })
            .is_ok();
        acquired.then(|| ConnectionSlot {
            active: Arc::clone(&self.active),
        })
    }

    pub fn active(&self) -> usize {
        self.active.load(Ordering::Acquire)
    }
}

impl Drop for ConnectionSlot {
    fn drop(&mut self) {
        self.active.fetch_sub(1, Ordering::AcqRel);
    }
}

/// Handle a single TCP connection until its session ends.
pub async fn handle_connection(stream: TcpStream, addr: SocketAddr, ctx: Arc<ServerContext>) {
    let Some(_slot) = ctx.limit.try_acquire() else {
        tracing::warn!(peer = %addr, active = ctx.limit.active(), "Connection limit reached, rejecting");
        return;
    };

    let mut user = None;
    let callback = |request: &Request, response: Response| -> Result<Response, ErrorResponse> {
        user = query_param(request.uri().query(), "user");
        Ok(response)
    };
    let ws = match accept_hdr_async(stream, callback).await {
        Ok(ws) => ws,
        Err(e) => {
            tracing::warn!(peer = %addr, error = %e, "WS handshake failed");
            return;
        }
    };

    let id = SessionId::new();
    let sid = id.short();
    let user = user.unwrap_or_default();
    tracing::info!(peer = %addr, session = %sid, id = %id, user = %user, "Client connected");

    let slave = match PtySlave::spawn(&ctx.command, ctx.initial_size) {
        Ok(slave) => Arc::new(slave),
        Err(e) => {
            tracing::error!(session = %sid, error = %e, "Failed to start command");
            WsMaster::new(ws).close().await;
            return;
        }
    };
    let master = Arc::new(WsMaster::new(ws));

    let mut options = ctx.options.clone();
    if let Some(reporter) = &ctx.audit {
        let labels = SessionLabels::new(user, ctx.cluster.clone());
        options = options.with_observer(Arc::new(reporter.observer(labels)));
    }

    match Session::new(master.clone(), slave.clone(), options) {
        Ok(session) => match session.run(ctx.shutdown.child_token()).await {
            Err(e) if e.is_closed() => {
                tracing::debug!(session = %sid, reason = %e, "Session closed")
            }
            Err(e) => tracing::warn!(session = %sid, error = %e, "Session ended with error"),
            Ok(()) => {}
        },
        Err(e) => tracing::error!(session = %sid, error = %e, "Invalid session options"),
    }

    slave.terminate().await;
    master.close().await;
    tracing::info!(peer = %addr, session = %sid, "Client disconnected");
}

/// Value of `key` in a raw query string. No percent-decoding.
fn query_param(query: Option<&str>, key: &str) -> Option<String> {
    query?
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(k, _)| *k == key)
        .map(|(_, v)| v.to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_param_lookup() {
        assert_eq!(query_param(Some("user=alice"), "user").as_deref(), Some("alice"));
        assert_eq!(
            query_param(Some("arg=1&user=bob&x"), "user").as_deref(),
            Some("bob")
        );
        assert_eq!(query_param(Some("username=carol"), "user"), None);
        assert_eq!(query_param(Some("user="), "user"), None);
        assert_eq!(query_param(None, "user"), None);
    }

    #[test]
    fn unlimited_connections() {
        let limit = ConnectionLimit::new(0);
        let slots: Vec<_> = (0..100).filter_map(|_| limit.try_acquire()).collect();
        assert_eq!(slots.len(), 100);
        assert_eq!(limit.active(), 100);
    }

    #[test]
    fn limit_is_enforced_and_released() {
        let limit = ConnectionLimit::new(2);
        let first = limit.try_acquire().unwrap();
        let _second = limit.try_acquire().unwrap();
        assert!(limit.try_acquire().is_none());

        drop(first);
        assert_eq!(limit.active(), 1);
        assert!(limit.try_acquire().is_some());
    }
}
