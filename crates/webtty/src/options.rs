//! Construction-time session configuration.

use std::fmt;
use std::sync::Arc;

use crate::error::SessionError;
use crate::observer::InputObserver;
use crate::resize::TerminalSize;

/// Read buffer size used by both relay loops unless overridden.
pub const DEFAULT_BUFFER_SIZE: usize = 1024;

/// Everything a [`Session`](crate::Session) needs besides its endpoints.
///
/// Every option is independent; unset ones keep their defaults (read-only
/// terminal, negotiated size, no reconnect, no preferences, 1 KiB buffer).
#[derive(Clone)]
pub struct SessionOptions {
    pub(crate) window_title: Vec<u8>,
    pub(crate) permit_write: bool,
    pub(crate) fixed_size: TerminalSize,
    pub(crate) reconnect: u32,
    pub(crate) buffer_size: usize,
    pub(crate) preferences: Option<Vec<u8>>,
    pub(crate) observer: Option<Arc<dyn InputObserver>>,
}

impl fmt::Debug for SessionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionOptions")
            .field("window_title", &String::from_utf8_lossy(&self.window_title))
            .field("permit_write", &self.permit_write)
            .field("fixed_size", &self.fixed_size)
            .field("reconnect", &self.reconnect)
            .field("buffer_size", &self.buffer_size)
            .field("preferences", &self.preferences.as_ref().map(Vec::len))
            .field("observer", &self.observer.is_some())
            .finish()
    }
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            window_title: Vec::new(),
            permit_write: false,
            fixed_size: TerminalSize::default(),
            reconnect: 0,
            buffer_size: DEFAULT_BUFFER_SIZE,
            preferences: None,
            observer: None,
        }
    }
}

impl SessionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_window_title(mut self, title: impl Into<Vec<u8>>) -> Self {
        self.window_title = title.into();
        self
    }

    /// Allow `Input` frames to reach the slave.
    pub fn with_permit_write(mut self, permit: bool) -> Self {
        self.permit_write = permit;
        self
    }

    /// Pin the terminal geometry. A zero axis stays negotiable.
    pub fn with_fixed_size(mut self, columns: u16, rows: u16) -> Self {
        self.fixed_size = TerminalSize::new(columns, rows);
        self
    }

    /// Ask the client to reconnect after `seconds` when the connection drops.
    /// Zero disables the hint.
    pub fn with_reconnect(mut self, seconds: u32) -> Self {
        self.reconnect = seconds;
        self
    }

    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size;
        self
    }

    /// Client preferences, forwarded verbatim during the handshake.
    pub fn with_preferences(mut self, preferences: impl Into<Vec<u8>>) -> Self {
        self.preferences = Some(preferences.into());
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn InputObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn window_title(&self) -> &[u8] {
        &self.window_title
    }

    pub fn permit_write(&self) -> bool {
        self.permit_write
    }

    pub fn fixed_size(&self) -> TerminalSize {
        self.fixed_size
    }

    pub fn reconnect(&self) -> u32 {
        self.reconnect
    }

    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    pub fn preferences(&self) -> Option<&[u8]> {
        self.preferences.as_deref()
    }

    pub(crate) fn validate(&self) -> Result<(), SessionError> {
        if self.buffer_size == 0 {
            return Err(SessionError::InvalidOption(
                "buffer size must be greater than zero",
            ));
        }
        Ok(())
    }
}
