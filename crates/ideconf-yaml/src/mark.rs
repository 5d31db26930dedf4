//! Positions of events and nodes in the source text.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Start position of an event or node.
///
/// Lines and columns are 1-based so they can be shown to users as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Mark {
    /// Character offset from the start of the source (0-based)
    pub index: usize,

    /// Line number (1-based)
    pub line: usize,

    /// Column number (1-based, in characters)
    pub col: usize,
}

impl Mark {
    pub fn new(index: usize, line: usize, col: usize) -> Self {
        Self { index, line, col }
    }

    /// Create a Mark from a yaml-rust2 marker.
    pub fn from_marker(marker: &yaml_rust2::scanner::Marker) -> Self {
        Self {
            index: marker.index(),
            // yaml-rust2 lines are already 1-based, columns are not
            line: marker.line(),
            col: marker.col() + 1,
        }
    }
}

impl Default for Mark {
    fn default() -> Self {
        Self {
            index: 0,
            line: 1,
            col: 1,
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.col)
    }
}
