//! Memory of important topics already played in a conversation.

use std::collections::BTreeSet;

use pv_core::{ActorId, TopicId};

/// Important topics played during the conversation with one partner.
///
/// The memory belongs to a single conversation partner. It is emptied when a
/// conversation with a different partner begins and never in between.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportantKnown {
    owner: Option<ActorId>,
    topics: BTreeSet<TopicId>,
}

impl ImportantKnown {
    /// Create an empty memory with no owner.
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepare for a conversation with `target`.
    ///
    /// Returns `true` if the memory was reset because `target` differs from
    /// the partner it was recorded for.
    pub fn begin_conversation(&mut self, target: ActorId) -> bool {
        if self.owner == Some(target) {
            return false;
        }
        self.owner = Some(target);
        self.topics.clear();
        true
    }

    /// Conversation partner this memory was recorded for.
    pub fn owner(&self) -> Option<ActorId> {
        self.owner
    }

    /// Remember a played topic. Returns `false` if it was already known.
    pub fn insert(&mut self, topic: TopicId) -> bool {
        self.topics.insert(topic)
    }

    /// Whether `topic` was already played.
    pub fn contains(&self, topic: &TopicId) -> bool {
        self.topics.contains(topic)
    }

    /// Number of known topics.
    pub fn len(&self) -> usize {
        self.topics.len()
    }

    /// Whether no topic is known.
    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    /// Known topics in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = &TopicId> {
        self.topics.iter()
    }

    /// Replace the whole memory, as after loading a savegame.
    pub fn restore(&mut self, owner: Option<ActorId>, topics: impl IntoIterator<Item = TopicId>) {
        self.owner = owner;
        self.topics = topics.into_iter().collect();
    }
}
