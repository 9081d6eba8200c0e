//! Conversation engine for Palaver.
//!
//! Governs how the hero and an NPC enter, progress through and leave a
//! scripted conversation: which topics are offered, in what order, which
//! "important" topics play on their own, when the conversation ends, and what
//! survives a save/load round trip. Script evaluation and on-screen display
//! are collaborators behind the [`ScriptHost`] and [`DialogUi`] traits.

/// Dialogue choices, their registry and the important-topic memory.
pub mod choice;
/// Engine configuration.
pub mod config;
/// Error types for the conversation engine.
pub mod error;
/// Independent conversation state bits.
pub mod flags;
/// The pair of actors currently talking and their eligible topics.
pub mod interaction;
/// The conversation state machine.
pub mod manager;
/// Save/load of the durable conversation state.
pub mod persist;
/// Scripting collaborator contract.
pub mod script;
/// Display collaborator contracts and a headless implementation.
pub mod surface;

#[cfg(test)]
mod testing;

pub use choice::{ChoiceEntry, ChoiceRegistry, ImportantKnown};
pub use config::DialogConfig;
pub use error::{DialogError, DialogResult};
pub use flags::ConversationFlags;
pub use interaction::InteractionState;
pub use manager::{DialogManager, PendingEndSignal};
pub use persist::DialogDocument;
pub use script::{EligibleTopic, ScriptHost};
pub use surface::{
    ChoiceSurface, DEFAULT_SUBTITLE_HISTORY, DialogUi, HeadlessUi, SubtitleSurface, UtteranceHandle,
};
