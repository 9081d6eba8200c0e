//! Error types for save-slot storage.

use pv_core::SlotIndex;
use thiserror::Error;

/// Result type for storage operations.
pub type SaveResult<T> = Result<T, SaveError>;

/// Errors that can occur while reading or writing save slots.
#[derive(Debug, Error)]
pub enum SaveError {
    /// Underlying file operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A document could not be encoded or decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Slot index beyond the configured number of slots.
    #[error("slot {slot} out of range (max {max})")]
    SlotOutOfRange {
        /// Requested slot.
        slot: SlotIndex,
        /// Number of configured slots.
        max: usize,
    },

    /// No savegame stored in the slot.
    #[error("savegame at slot {0} not available")]
    SlotUnavailable(SlotIndex),

    /// The world document named by the slot info is missing or empty.
    #[error("target world-file invalid: {0}")]
    InvalidWorldFile(String),
}
