//! Core types for Palaver: identifiers shared by the conversation engine and
//! the save-slot storage.
//!
//! Actors are opaque UUID handles. Topics and script functions are named by
//! their script symbol, which keeps persisted documents readable and stable
//! across reloads of the same script content.

/// Identifier newtypes for actors, topics, script functions and save slots.
pub mod ids;

/// Re-export identifier types.
pub use ids::{ActorId, ScriptFn, SlotIndex, TopicId};
