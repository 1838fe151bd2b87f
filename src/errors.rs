//! Error types for loading word lists and grid structures.
//!
//! These only cover malformed input. Failing to find a fill is an expected outcome and is
//! reported through `backtracking_search::FillFailure` instead.
//!
//! # Error Codes
//!
//! - I001: `Io` (Reading an input file failed)
//! - I002: `EmptyWordList` (No usable words in the word list)
//! - I003: `NoSlots` (The grid structure contains no fillable slots)
//! - I004: `EmptySlot` (A slot was declared with length 0)
//! - I005: `ConflictingSlots` (Slots overlap in a way a crossword grid can't express)

use std::io;
use std::path::PathBuf;

use crate::grid_config::GridCoord;

#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Word list contains no words")]
    EmptyWordList,

    #[error("Grid structure contains no fillable slots")]
    NoSlots,

    #[error("Slot starting at {loc:?} has length 0")]
    EmptySlot { loc: GridCoord },

    #[error("Conflicting slots at cell {loc:?}: {reason}")]
    ConflictingSlots { loc: GridCoord, reason: &'static str },
}

impl InputError {
    /// Returns the error code for this error variant
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            InputError::Io { .. } => "I001",
            InputError::EmptyWordList => "I002",
            InputError::NoSlots => "I003",
            InputError::EmptySlot { .. } => "I004",
            InputError::ConflictingSlots { .. } => "I005",
        }
    }

    /// Returns a hint for fixing the input, if there's anything useful to say.
    #[must_use]
    pub fn help(&self) -> Option<&'static str> {
        match self {
            InputError::EmptyWordList => Some("Provide a newline-delimited file with one word per line"),
            InputError::NoSlots => Some("Mark fillable cells with '_'; a slot needs at least two adjacent cells"),
            _ => None,
        }
    }

    /// Format the error along with its code and help text.
    #[must_use]
    pub fn display_detailed(&self) -> String {
        match self.help() {
            Some(help) => format!("{} ({})\n  help: {}", self, self.code(), help),
            None => format!("{} ({})", self, self.code()),
        }
    }
}
