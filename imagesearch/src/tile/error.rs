//! Error types for tile selection.

use std::fmt;

use super::TileState;

/// Reasons a tile selection is rejected.
///
/// Only a tile showing a loaded image can be selected; everything else is
/// refused with an error rather than silently ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectError {
    /// The index does not name a gallery slot.
    OutOfRange {
        /// Requested slot index
        index: usize,
        /// Number of slots in the gallery
        capacity: usize,
    },
    /// The slot has no loaded image to publish.
    NotLoaded {
        /// Requested slot index
        index: usize,
        /// Displayed state of the slot at the time of the request
        state: TileState,
    },
}

impl fmt::Display for SelectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectError::OutOfRange { index, capacity } => {
                write!(
                    f,
                    "Slot {} does not exist (gallery has {} slots)",
                    index, capacity
                )
            }
            SelectError::NotLoaded { index, state } => {
                write!(f, "Slot {} cannot be selected while {}", index, state)
            }
        }
    }
}

impl std::error::Error for SelectError {}
