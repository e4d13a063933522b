//! Per-frame handling of data read from the master.

use crate::error::SessionError;
use crate::frame::{self, InboundMessage, OutboundMessage};
use crate::resize::ResizeArgs;

use super::{ensure_complete, Shared};

impl Shared {
    pub(super) async fn handle_master_read(&self, data: &[u8]) -> Result<(), SessionError> {
        let frame = frame::decode(data)?;

        match frame.inbound_type()? {
            InboundMessage::Input => self.handle_input(frame.payload).await,
            InboundMessage::Ping => self.handle_ping().await,
            InboundMessage::ResizeTerminal => self.handle_resize(frame.payload).await,
        }
    }

    async fn handle_input(&self, payload: &[u8]) -> Result<(), SessionError> {
        if !self.options.permit_write || payload.is_empty() {
            return Ok(());
        }

        self.slave
            .write(payload)
            .await
            .and_then(|written| ensure_complete(written, payload.len()))
            .map_err(|source| SessionError::Write {
                context: "write received data to slave",
                source,
            })
    }

    async fn handle_ping(&self) -> Result<(), SessionError> {
        let pong = frame::encode(OutboundMessage::Pong.tag(), &[]);
        self.master_write(&pong)
            .await
            .map_err(|source| SessionError::Write {
                context: "return pong to master",
                source,
            })
    }

    async fn handle_resize(&self, payload: &[u8]) -> Result<(), SessionError> {
        let fixed = self.options.fixed_size;
        if fixed.is_fixed() {
            tracing::trace!("Ignoring resize request, geometry is fixed");
            return Ok(());
        }

        let args = ResizeArgs::parse(payload)?;
        let size = args.resolve(fixed);

        // Slave-side resize failures leave the session running.
        if let Err(e) = self.slave.resize(size.columns, size.rows).await {
            tracing::warn!(
                columns = size.columns,
                rows = size.rows,
                error = %e,
                "Failed to resize slave terminal"
            );
        }
        Ok(())
    }
}
