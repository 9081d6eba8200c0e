//! Save-slot storage for Palaver.
//!
//! Each save slot is a directory of named JSON documents: the slot info
//! (`regoth_save.json`), one file per world, the player, the script engine
//! and the conversation engine. This crate only knows how to read, write and
//! clear those blobs; what goes inside them belongs to the callers.

/// Where save slots live on disk.
pub mod config;
/// Error types for save-slot storage.
pub mod error;
/// Save slots and the documents inside them.
pub mod slots;
/// Named-blob storage backends.
pub mod storage;

pub use config::SaveConfig;
pub use error::{SaveError, SaveResult};
pub use slots::{LoadedSlot, SaveSlots, SavegameInfo, SlotSnapshot};
pub use storage::{FsStorage, MemoryStorage, Storage};
