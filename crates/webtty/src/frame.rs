//! Tagged-frame wire format.
//!
//! A frame is one tag byte followed by a payload whose meaning depends on
//! the tag. Tags are scoped by direction: `'1'` is `Input` when read from
//! the master and `Output` when written to it, so each direction has its
//! own message enum.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::error::FrameError;

/// Messages sent by the master (remote client) toward the slave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InboundMessage {
    /// Raw keystrokes for the slave.
    Input,
    /// Liveness check, answered with [`OutboundMessage::Pong`].
    Ping,
    /// JSON `{"Columns": n, "Rows": n}` geometry request.
    ResizeTerminal,
}

impl InboundMessage {
    pub const fn tag(self) -> u8 {
        match self {
            InboundMessage::Input => b'1',
            InboundMessage::Ping => b'2',
            InboundMessage::ResizeTerminal => b'3',
        }
    }

    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            b'1' => Some(InboundMessage::Input),
            b'2' => Some(InboundMessage::Ping),
            b'3' => Some(InboundMessage::ResizeTerminal),
            _ => None,
        }
    }
}

/// Messages written to the master.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutboundMessage {
    /// Base64 text of raw slave output.
    Output,
    /// Reply to [`InboundMessage::Ping`], empty payload.
    Pong,
    /// Raw title bytes.
    SetWindowTitle,
    /// Opaque client preferences blob.
    SetPreferences,
    /// JSON integer, seconds between client reconnect attempts.
    SetReconnect,
}

impl OutboundMessage {
    pub const fn tag(self) -> u8 {
        match self {
            OutboundMessage::Output => b'1',
            OutboundMessage::Pong => b'2',
            OutboundMessage::SetWindowTitle => b'3',
            OutboundMessage::SetPreferences => b'4',
            OutboundMessage::SetReconnect => b'5',
        }
    }

    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            b'1' => Some(OutboundMessage::Output),
            b'2' => Some(OutboundMessage::Pong),
            b'3' => Some(OutboundMessage::SetWindowTitle),
            b'4' => Some(OutboundMessage::SetPreferences),
            b'5' => Some(OutboundMessage::SetReconnect),
            _ => None,
        }
    }
}

/// A decoded frame borrowing its payload from the read buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame<'a> {
    pub tag: u8,
    pub payload: &'a [u8],
}

impl Frame<'_> {
    pub fn inbound_type(&self) -> Result<InboundMessage, FrameError> {
        InboundMessage::from_tag(self.tag).ok_or(FrameError::UnknownType(self.tag))
    }

    pub fn outbound_type(&self) -> Result<OutboundMessage, FrameError> {
        OutboundMessage::from_tag(self.tag).ok_or(FrameError::UnknownType(self.tag))
    }
}

/// Prepend `tag` to `payload`.
pub fn encode(tag: u8, payload: &[u8]) -> Vec<u8> {
    let mut frame = Vec::with_capacity(payload.len() + 1);
    frame.push(tag);
    frame.extend_from_slice(payload);
    frame
}

/// Split a chunk into its tag and payload.
pub fn decode(data: &[u8]) -> Result<Frame<'_>, FrameError> {
    match data.split_first() {
        Some((&tag, payload)) => Ok(Frame { tag, payload }),
        None => Err(FrameError::Empty),
    }
}

/// Wrap raw slave bytes as an `Output` frame with a base64 payload.
pub fn encode_output(data: &[u8]) -> Vec<u8> {
    encode(OutboundMessage::Output.tag(), STANDARD.encode(data).as_bytes())
}

/// Recover raw slave bytes from an `Output` frame payload.
pub fn decode_output(payload: &[u8]) -> Result<Vec<u8>, base64::DecodeError> {
    STANDARD.decode(payload)
}
