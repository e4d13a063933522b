//! Keystroke-to-command-line reconstruction.

use webtty::frame::{self, InboundMessage};

const ESC: char = '\u{1b}';
const BACKSPACE: char = '\u{8}';
const DELETE: char = '\u{7f}';
const INTERRUPT: char = '\u{3}';

/// Accumulates typed characters into the command line being edited.
///
/// Only `Input` frames count. Enter completes a line, backspace/delete
/// removes the last character and Ctrl-C abandons the line. An escape
/// sequence (arrow keys, function keys) ends processing of its chunk, since
/// cursor movement cannot be replayed without a terminal model.
#[derive(Debug, Default)]
pub struct CommandRecorder {
    line: String,
}

impl CommandRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one raw chunk read from the master. Returns completed, non-blank lines.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<String> {
        let Ok(frame) = frame::decode(chunk) else {
            return Vec::new();
        };
        if frame.inbound_type() != Ok(InboundMessage::Input) {
            return Vec::new();
        }

        let mut lines = Vec::new();
        for ch in String::from_utf8_lossy(frame.payload).chars() {
            match ch {
                '\r' | '\n' => {
                    let line = std::mem::take(&mut self.line);
                    if !line.trim().is_empty() {
                        lines.push(line);
                    }
                }
                BACKSPACE | DELETE => {
                    self.line.pop();
                }
                INTERRUPT => self.line.clear(),
                ESC => break,
                c if c.is_control() => {}
                c => self.line.push(c),
            }
        }
        lines
    }

    /// The line typed so far, not yet completed.
    pub fn pending(&self) -> &str {
        &self.line
    }
}
