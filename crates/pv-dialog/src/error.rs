//! Error types for the conversation engine.

use pv_save::SaveError;
use thiserror::Error;

/// Result type for conversation operations.
pub type DialogResult<T> = Result<T, DialogError>;

/// Errors reported by the conversation engine.
#[derive(Debug, Error)]
pub enum DialogError {
    /// Choice index outside the currently offered choices.
    #[error("invalid choice: {index} (offered: {len})")]
    InvalidChoice {
        /// Requested index.
        index: usize,
        /// Number of offered choices.
        len: usize,
    },

    /// The conversation document could not be encoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Writing the conversation document failed.
    #[error("save error: {0}")]
    Save(#[from] SaveError),
}
