use std::io;

/// Failure to interpret a chunk as a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FrameError {
    #[error("zero-length frame has no message type")]
    Empty,

    #[error("unknown message type {0:#04x}")]
    UnknownType(u8),
}

/// Terminal outcome of a session. Every variant ends the session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("slave closed")]
    SlaveClosed,

    #[error("master closed")]
    MasterClosed,

    #[error("session cancelled")]
    Cancelled,

    #[error("unexpected zero length read from master")]
    MalformedFrame,

    #[error("received malformed data for terminal resize: {0}")]
    MalformedResize(#[from] serde_json::Error),

    #[error("unknown message type {0:#04x}")]
    UnknownFrameType(u8),

    #[error("failed to send initializing message: failed to {context}: {source}")]
    Initialization {
        context: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("failed to {context}: {source}")]
    Write {
        context: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("invalid session option: {0}")]
    InvalidOption(&'static str),

    #[error("relay tasks ended without reporting a result")]
    RelayAborted,
}

impl SessionError {
    /// Whether the session ended because one of the endpoints went away.
    pub fn is_closed(&self) -> bool {
        matches!(self, SessionError::SlaveClosed | SessionError::MasterClosed)
    }
}

impl From<FrameError> for SessionError {
    fn from(err: FrameError) -> Self {
        match err {
            FrameError::Empty => SessionError::MalformedFrame,
            FrameError::UnknownType(tag) => SessionError::UnknownFrameType(tag),
        }
    }
}
