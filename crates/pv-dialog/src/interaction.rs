//! The active conversation: who is talking and which topics are eligible.

use pv_core::{ActorId, ScriptFn, TopicId};

use crate::script::EligibleTopic;

/// The two conversing actors and the topics currently valid for them.
///
/// `topics` and `functions` are index-aligned; every index in `ranked` is
/// within their bounds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InteractionState {
    player: Option<ActorId>,
    target: Option<ActorId>,
    topics: Vec<TopicId>,
    functions: Vec<ScriptFn>,
    ranked: Vec<(i32, usize)>,
}

impl InteractionState {
    /// Create an empty state with no conversation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking a conversation between `player` and `target`.
    pub fn begin(&mut self, player: ActorId, target: ActorId) {
        *self = Self {
            player: Some(player),
            target: Some(target),
            ..Self::default()
        };
    }

    /// Forget the conversation.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// The hero, while a conversation is tracked.
    pub fn player(&self) -> Option<ActorId> {
        self.player
    }

    /// The NPC, while a conversation is tracked.
    pub fn target(&self) -> Option<ActorId> {
        self.target
    }

    /// Whether the tracked conversation is with `target`.
    pub fn is_with(&self, target: ActorId) -> bool {
        self.target == Some(target)
    }

    /// Eligible topics, in evaluation order.
    pub fn topics(&self) -> &[TopicId] {
        &self.topics
    }

    /// Backing functions, aligned with [`Self::topics`].
    pub fn functions(&self) -> &[ScriptFn] {
        &self.functions
    }

    /// `(order, index)` pairs in display order.
    pub fn ranked(&self) -> &[(i32, usize)] {
        &self.ranked
    }

    /// Replace the eligible topics with a freshly evaluated set.
    pub fn set_eligible(&mut self, eligible: &[EligibleTopic]) {
        self.topics = eligible.iter().map(|t| t.topic.clone()).collect();
        self.functions = eligible.iter().map(|t| t.function.clone()).collect();
        self.ranked = eligible.iter().enumerate().map(|(i, t)| (t.order, i)).collect();
        // Stable: equal orders keep evaluation order.
        self.ranked.sort_by_key(|&(order, _)| order);
    }

    /// Backing function of an eligible topic.
    pub fn function_for(&self, topic: &TopicId) -> Option<&ScriptFn> {
        self.topics
            .iter()
            .position(|t| t == topic)
            .and_then(|i| self.functions.get(i))
    }
}
