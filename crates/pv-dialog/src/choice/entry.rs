//! A single dialogue option.

use pv_core::{ScriptFn, TopicId};

use crate::script::EligibleTopic;

/// One option offered to the player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceEntry {
    /// Text shown to the player.
    pub text: String,
    /// Script function run when the option is taken.
    pub function: ScriptFn,
    /// Topic the option belongs to.
    pub topic: TopicId,
    /// Sort key, lower first.
    pub order: i32,
    /// Played on its own, once per conversation.
    pub important: bool,
}

impl ChoiceEntry {
    /// Create a regular (not important) choice.
    pub fn new(
        text: impl Into<String>,
        function: ScriptFn,
        topic: TopicId,
        order: i32,
    ) -> Self {
        Self {
            text: text.into(),
            function,
            topic,
            order,
            important: false,
        }
    }

    /// Mark the choice as important.
    pub fn with_important(mut self, important: bool) -> Self {
        self.important = important;
        self
    }
}

impl From<&EligibleTopic> for ChoiceEntry {
    fn from(topic: &EligibleTopic) -> Self {
        Self {
            text: topic.description.clone(),
            function: topic.function.clone(),
            topic: topic.topic.clone(),
            order: topic.order,
            important: topic.important,
        }
    }
}
