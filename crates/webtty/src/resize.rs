//! Terminal geometry and the `ResizeTerminal` payload.

use serde::Deserialize;

/// Terminal geometry. A zero axis means "not fixed, negotiate from client".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TerminalSize {
    pub columns: u16,
    pub rows: u16,
}

impl TerminalSize {
    pub fn new(columns: u16, rows: u16) -> Self {
        Self { columns, rows }
    }

    /// Both axes pinned, so remote resize requests have no effect.
    pub fn is_fixed(&self) -> bool {
        self.columns != 0 && self.rows != 0
    }
}

/// Payload of a `ResizeTerminal` frame: `{"Columns": n, "Rows": n}`.
///
/// Browsers send plain JSON numbers, which may carry a fractional part.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ResizeArgs {
    #[serde(rename = "Columns")]
    pub columns: f64,
    #[serde(rename = "Rows")]
    pub rows: f64,
}

impl ResizeArgs {
    pub fn parse(payload: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(payload)
    }

    /// Resolve the requested geometry against `fixed`, axis by axis.
    ///
    /// A nonzero fixed axis always wins; a zero one takes the requested value.
    pub fn resolve(&self, fixed: TerminalSize) -> TerminalSize {
        let columns = if fixed.columns != 0 {
            fixed.columns
        } else {
            to_dimension(self.columns)
        };
        let rows = if fixed.rows != 0 {
            fixed.rows
        } else {
            to_dimension(self.rows)
        };
        TerminalSize { columns, rows }
    }
}

// Float-to-int `as` saturates: negatives and NaN become 0.
fn to_dimension(value: f64) -> u16 {
    value as u16
}
