//! Background delivery of audit records, decoupled from the session relay.

use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinHandle;
use webtty::InputObserver;
use webtty_common::SessionLabels;

use crate::record::AuditRecord;
use crate::recorder::CommandRecorder;
use crate::sink::AuditSink;

/// Records waiting for delivery before new ones are dropped.
pub const AUDIT_QUEUE: usize = 256;

/// Handle to the delivery task. Cheap to clone; the task exits once every
/// reporter and observer has been dropped and the queue is drained.
#[derive(Clone)]
pub struct AuditReporter {
    tx: mpsc::Sender<AuditRecord>,
}

impl AuditReporter {
    pub fn spawn(sink: Arc<dyn AuditSink>) -> (Self, JoinHandle<()>) {
        Self::with_capacity(sink, AUDIT_QUEUE)
    }

    /// Like [`spawn`](Self::spawn) with a queue of `capacity` records.
    /// Records observed while the queue is full are logged and dropped.
    pub fn with_capacity(sink: Arc<dyn AuditSink>, capacity: usize) -> (Self, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::channel::<AuditRecord>(capacity.max(1));
        let handle = tokio::spawn(async move {
            while let Some(record) = rx.recv().await {
                if let Err(e) = sink.report(&record).await {
                    tracing::warn!(error = %e, user = %record.labels.user, "Failed to deliver audit record");
                }
            }
            tracing::debug!("Audit reporter stopped");
        });
        (Self { tx }, handle)
    }

    /// An observer for one session, tagging its records with `labels`.
    pub fn observer(&self, labels: SessionLabels) -> AuditObserver {
        AuditObserver {
            labels,
            recorder: Mutex::new(CommandRecorder::new()),
            tx: self.tx.clone(),
        }
    }
}

/// Watches a session's master reads and queues each completed command.
///
/// Never blocks the relay: reconstruction is synchronous and delivery is
/// handed to the reporter task.
pub struct AuditObserver {
    labels: SessionLabels,
    recorder: Mutex<CommandRecorder>,
    tx: mpsc::Sender<AuditRecord>,
}

impl InputObserver for AuditObserver {
    fn observe(&self, data: &[u8]) {
        let lines = match self.recorder.lock() {
            Ok(mut recorder) => recorder.feed(data),
            Err(_) => return,
        };

        for command in lines {
            let record = AuditRecord::new(self.labels.clone(), command);
            tracing::info!(
                user = %record.labels.user,
                cluster = %record.labels.cluster,
                command = %record.command,
                "Command executed"
            );
            match self.tx.try_send(record) {
                Ok(()) => {}
                Err(TrySendError::Full(record)) => tracing::warn!(
                    user = %record.labels.user,
                    command = %record.command,
                    "Audit queue full, record dropped"
                ),
                Err(TrySendError::Closed(_)) => {
                    tracing::debug!("Audit reporter gone, record dropped")
                }
            }
        }
    }
}
