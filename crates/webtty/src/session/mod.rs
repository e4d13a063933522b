//! The session engine: initialization handshake plus the duplex relay.
//!
//! `run` spawns two loops. One reads the slave and forwards `Output` frames
//! to the master; the other reads the master and dispatches each frame.
//! Both report into one channel and the first error ends the session.
//! Every master write goes through a single lock so frames never interleave.

mod dispatch;


use std::io;
use std::sync::Arc;

use tokio::sync::{mpsc, watch, Mutex};
use tokio_util::sync::CancellationToken;

use crate::endpoint::{Master, Slave};
use crate::error::SessionError;
use crate::frame::{self, OutboundMessage};
use crate::options::SessionOptions;

/// Lifecycle of a session. There is no way back from `Terminated`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Created,
    Initializing,
    Relaying,
    Terminated,
}

/// Bridges one master with one slave. Consumed by [`Session::run`].
///
/// The endpoints are shared handles: the session never closes them, and the
/// caller keeps its own clones to shut the transports down.
pub struct Session {
    shared: Arc<Shared>,
    state: watch::Sender<SessionState>,
}

pub(crate) struct Shared {
    master: Arc<dyn Master>,
    slave: Arc<dyn Slave>,
    options: SessionOptions,
    write_lock: Mutex<()>,
}

impl Session {
    pub fn new(
        master: Arc<dyn Master>,
        slave: Arc<dyn Slave>,
        options: SessionOptions,
    ) -> Result<Self, SessionError> {
        options.validate()?;
        let (state, _) = watch::channel(SessionState::Created);
        Ok(Self {
            shared: Arc::new(Shared {
                master,
                slave,
                options,
                write_lock: Mutex::new(()),
            }),
            state,
        })
    }

    pub fn options(&self) -> &SessionOptions {
        &self.shared.options
    }

    /// Subscribe to lifecycle transitions.
    pub fn state(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Send the handshake, then relay until an endpoint fails or `cancel` fires.
    ///
    /// Always ends with an error describing why the session stopped:
    /// `SlaveClosed`/`MasterClosed` when an endpoint goes away, `Cancelled`
    /// on cancellation, or the protocol/write error that ended it. On
    /// cancellation the relay loops are left blocked in their reads until
    /// the caller closes the endpoints.
    pub async fn run(self, cancel: CancellationToken) -> Result<(), SessionError> {
        self.transition(SessionState::Initializing);
        if let Err(e) = self.shared.send_initialize_message().await {
            self.transition(SessionState::Terminated);
            return Err(e);
        }
        self.transition(SessionState::Relaying);

        let (tx, mut rx) = mpsc::channel::<SessionError>(2);

        let shared = Arc::clone(&self.shared);
        let slave_tx = tx.clone();
        tokio::spawn(async move {
            let _ = slave_tx.send(shared.pump_slave().await).await;
        });

        let shared = Arc::clone(&self.shared);
        tokio::spawn(async move {
            let _ = tx.send(shared.pump_master().await).await;
        });

        let err = tokio::select! {
            _ = cancel.cancelled() => SessionError::Cancelled,
            result = rx.recv() => result.unwrap_or(SessionError::RelayAborted),
        };

        self.transition(SessionState::Terminated);
        tracing::debug!(reason = %err, "Session terminated");
        Err(err)
    }

    fn transition(&self, next: SessionState) {
        tracing::debug!(state = ?next, "Session state");
        self.state.send_replace(next);
    }
}

impl Shared {
    async fn send_initialize_message(&self) -> Result<(), SessionError> {
        let title = frame::encode(
            OutboundMessage::SetWindowTitle.tag(),
            &self.options.window_title,
        );
        self.master_write(&title)
            .await
            .map_err(|source| SessionError::Initialization {
                context: "send window title",
                source,
            })?;

        if self.options.reconnect > 0 {
            let interval = serde_json::Value::from(self.options.reconnect).to_string();
            let frame = frame::encode(OutboundMessage::SetReconnect.tag(), interval.as_bytes());
            self.master_write(&frame)
                .await
                .map_err(|source| SessionError::Initialization {
                    context: "set reconnect",
                    source,
                })?;
        }

        if let Some(preferences) = &self.options.preferences {
            let frame = frame::encode(OutboundMessage::SetPreferences.tag(), preferences);
            self.master_write(&frame)
                .await
                .map_err(|source| SessionError::Initialization {
                    context: "set preferences",
                    source,
                })?;
        }

        Ok(())
    }

    /// Slave -> master. Returns the error that stopped the loop.
    async fn pump_slave(&self) -> SessionError {
        let mut buffer = vec![0u8; self.options.buffer_size];
        loop {
            let n = match self.slave.read(&mut buffer).await {
                Ok(0) => return SessionError::SlaveClosed,
                Ok(n) => n,
                Err(e) => {
                    tracing::debug!(error = %e, "Slave read failed");
                    return SessionError::SlaveClosed;
                }
            };

            if let Err(e) = self.handle_slave_read(&buffer[..n]).await {
                return e;
            }
        }
    }

    /// Master -> slave. Returns the error that stopped the loop.
    async fn pump_master(&self) -> SessionError {
        let mut buffer = vec![0u8; self.options.buffer_size];
        loop {
            let n = match self.master.read(&mut buffer).await {
                Ok(0) => return SessionError::MasterClosed,
                Ok(n) => n,
                Err(e) => {
                    tracing::debug!(error = %e, "Master read failed");
                    return SessionError::MasterClosed;
                }
            };

            let chunk = &buffer[..n];
            if let Some(observer) = &self.options.observer {
                observer.observe(chunk);
            }

            if let Err(e) = self.handle_master_read(chunk).await {
                return e;
            }
        }
    }

    async fn handle_slave_read(&self, data: &[u8]) -> Result<(), SessionError> {
        let frame = frame::encode_output(data);
        self.master_write(&frame)
            .await
            .map_err(|source| SessionError::Write {
                context: "send output to master",
                source,
            })
    }

    async fn master_write(&self, frame: &[u8]) -> io::Result<()> {
        let _guard = self.write_lock.lock().await;
        let written = self.master.write(frame).await?;
        ensure_complete(written, frame.len())
    }
}

/// A frame is only usable whole, so a short write is an error.
fn ensure_complete(written: usize, expected: usize) -> io::Result<()> {
    if written < expected {
        return Err(io::Error::new(
            io::ErrorKind::WriteZero,
            format!("short write: {written} of {expected} bytes"),
        ));
    }
    Ok(())
}
