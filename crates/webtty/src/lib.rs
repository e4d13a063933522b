//! Terminal bridge protocol engine.
//!
//! Relays a pseudo-terminal ("slave") to a remote controlling connection
//! ("master") over a small tagged-frame protocol:
//! - Slave output travels as base64 `Output` frames
//! - Master input, liveness pings and resize requests are dispatched by tag
//! - A one-shot handshake announces window title, reconnect hint and
//!   client preferences
//!
//! Transports are supplied by the caller through the [`Master`] and
//! [`Slave`] traits; the engine never opens or closes them.

pub mod endpoint;
pub mod error;
pub mod frame;
pub mod observer;
pub mod options;
pub mod resize;
pub mod session;

pub use endpoint::{Master, Slave};
pub use error::{FrameError, SessionError};
pub use frame::{Frame, InboundMessage, OutboundMessage};
pub use observer::InputObserver;
pub use options::{SessionOptions, DEFAULT_BUFFER_SIZE};
pub use resize::{ResizeArgs, TerminalSize};
pub use session::{Session, SessionState};

pub use tokio_util::sync::CancellationToken;
