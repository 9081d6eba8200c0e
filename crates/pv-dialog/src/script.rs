//! Scripting collaborator contract.

use pv_core::{ActorId, ScriptFn, TopicId};

use crate::manager::DialogManager;

/// A topic whose script conditions currently hold for a pair of actors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EligibleTopic {
    /// The topic record.
    pub topic: TopicId,
    /// Function run when the topic is chosen.
    pub function: ScriptFn,
    /// Menu text.
    pub description: String,
    /// Played on its own instead of being offered.
    pub important: bool,
    /// Sort key, lower first.
    pub order: i32,
}

impl EligibleTopic {
    /// Create a regular topic without menu text.
    pub fn new(topic: TopicId, function: ScriptFn, order: i32) -> Self {
        Self {
            topic,
            function,
            description: String::new(),
            important: false,
            order,
        }
    }

    /// Set the menu text.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Mark the topic as important.
    pub fn with_important(mut self, important: bool) -> Self {
        self.important = important;
        self
    }
}

/// The scripting virtual machine, as seen by the conversation engine.
///
/// The host is handed to every operation that needs it rather than stored in
/// the manager, so a backing function can call straight back into the
/// conversation it was invoked from.
pub trait ScriptHost {
    /// Evaluate topic conditions for `player` talking to `target`.
    fn evaluate_eligible_topics(&mut self, player: ActorId, target: ActorId) -> Vec<EligibleTopic>;

    /// Run a choice's backing function.
    ///
    /// The function may re-enter `dialog`: speak, add choices, open or close
    /// a sub-menu, queue the end of the conversation or start another one.
    fn invoke(&mut self, function: &ScriptFn, dialog: &mut DialogManager);
}
