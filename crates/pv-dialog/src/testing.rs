//! Table-driven script host for engine tests.

use pv_core::{ActorId, ScriptFn, TopicId};

use crate::choice::ChoiceEntry;
use crate::manager::DialogManager;
use crate::script::{EligibleTopic, ScriptHost};

/// What a backing function does when invoked.
#[derive(Debug, Clone)]
pub(crate) enum Action {
    Say(&'static str),
    AddChoice(ChoiceEntry),
    EnterSubDialog,
    /// Leave the sub-menu and clear its choices.
    LeaveSubDialog,
    QueueEnd,
    StartWith(ActorId),
    /// Make a topic ineligible from now on.
    RemoveTopic(TopicId),
}

#[derive(Debug, Default)]
pub(crate) struct ScriptTable {
    pub topics: Vec<EligibleTopic>,
    pub actions: Vec<(ScriptFn, Vec<Action>)>,
    pub invoked: Vec<ScriptFn>,
    pub evaluations: usize,
}

impl ScriptTable {
    pub fn new(topics: Vec<EligibleTopic>) -> Self {
        Self {
            topics,
            ..Self::default()
        }
    }

    pub fn on(mut self, function: &str, actions: Vec<Action>) -> Self {
        self.actions.push((ScriptFn::new(function), actions));
        self
    }

    pub fn invoked_names(&self) -> Vec<&str> {
        self.invoked.iter().map(ScriptFn::as_str).collect()
    }
}

impl ScriptHost for ScriptTable {
    fn evaluate_eligible_topics(&mut self, _player: ActorId, _target: ActorId) -> Vec<EligibleTopic> {
        self.evaluations += 1;
        self.topics.clone()
    }

    fn invoke(&mut self, function: &ScriptFn, dialog: &mut DialogManager) {
        self.invoked.push(function.clone());
        let actions = self
            .actions
            .iter()
            .find(|(f, _)| f == function)
            .map(|(_, a)| a.clone())
            .unwrap_or_default();

        for action in actions {
            match action {
                Action::Say(text) => dialog.begin_utterance(text, "Diego"),
                Action::AddChoice(entry) => dialog.add_choice(entry),
                Action::EnterSubDialog => dialog.set_sub_dialog_active(true),
                Action::LeaveSubDialog => {
                    dialog.set_sub_dialog_active(false);
                    dialog.clear_choices();
                }
                Action::QueueEnd => {
                    if let Some(target) = dialog.target() {
                        dialog.queue_end_on_utterance_complete(target);
                    }
                }
                Action::StartWith(target) => {
                    dialog.start_interaction(target, &mut *self);
                }
                Action::RemoveTopic(topic) => self.topics.retain(|t| t.topic != topic),
            }
        }
    }
}

/// A regular topic named `name`, backed by `<name>_Info`.
pub(crate) fn topic(name: &str, order: i32) -> EligibleTopic {
    EligibleTopic::new(TopicId::new(name), ScriptFn::new(format!("{name}_Info")), order)
        .with_description(name)
}

/// An important topic named `name`, backed by `<name>_Info`.
pub(crate) fn important(name: &str, order: i32) -> EligibleTopic {
    topic(name, order).with_important(true)
}
