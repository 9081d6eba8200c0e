//! Dialogue choices for the active conversation.
//!
//! This module provides choice entries, the registry that orders them for
//! display, and the memory of important topics already played.

mod entry;
mod memory;
mod registry;

pub use entry::ChoiceEntry;
pub use memory::ImportantKnown;
pub use registry::ChoiceRegistry;
