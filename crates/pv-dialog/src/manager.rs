//! The conversation state machine.
//!
//! A conversation is not one flat state: a line can be spoken while a menu is
//! open, and the end of a conversation may have to wait for the last line to
//! finish. [`DialogManager`] therefore tracks independent
//! [`ConversationFlags`] and is advanced once per tick through
//! [`DialogManager::update`], which polls the spoken line for completion and
//! applies any deferred end.

use std::any::Any;

use pv_core::{ActorId, TopicId};

use crate::choice::{ChoiceEntry, ChoiceRegistry, ImportantKnown};
use crate::config::DialogConfig;
use crate::error::{DialogError, DialogResult};
use crate::flags::ConversationFlags;
use crate::interaction::InteractionState;
use crate::persist::{DialogDocument, FORMAT_VERSION};
use crate::script::{EligibleTopic, ScriptHost};
use crate::surface::{DialogUi, UtteranceHandle};

/// A request to end the conversation with `target` once the current line
/// finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingEndSignal {
    /// Conversation partner the request applies to.
    pub target: ActorId,
}

/// Drives conversations between the hero and NPCs.
#[derive(Debug)]
pub struct DialogManager {
    config: DialogConfig,
    ui: Box<dyn DialogUi>,
    hero: ActorId,
    interaction: InteractionState,
    choices: ChoiceRegistry,
    flags: ConversationFlags,
    important_known: ImportantKnown,
    utterance: Option<UtteranceHandle>,
    pending_end: Option<PendingEndSignal>,
    elapsed: f64,
}

impl DialogManager {
    /// Create an idle manager for `hero`, drawing on `ui`.
    pub fn new(hero: ActorId, ui: Box<dyn DialogUi>) -> Self {
        Self::with_config(hero, ui, DialogConfig::default())
    }

    /// Create an idle manager with custom tunables.
    pub fn with_config(hero: ActorId, ui: Box<dyn DialogUi>, config: DialogConfig) -> Self {
        Self {
            config,
            ui,
            hero,
            interaction: InteractionState::new(),
            choices: ChoiceRegistry::new(),
            flags: ConversationFlags::default(),
            important_known: ImportantKnown::new(),
            utterance: None,
            pending_end: None,
            elapsed: 0.0,
        }
    }

    // -- accessors --

    /// Active configuration.
    pub fn config(&self) -> &DialogConfig {
        &self.config
    }

    /// The player character.
    pub fn hero(&self) -> ActorId {
        self.hero
    }

    /// The NPC being talked to.
    pub fn target(&self) -> Option<ActorId> {
        self.interaction.target()
    }

    /// The hero, while a conversation is tracked.
    pub fn player(&self) -> Option<ActorId> {
        self.interaction.player()
    }

    /// Current state bits.
    pub fn flags(&self) -> ConversationFlags {
        self.flags
    }

    /// Whether a menu or automatic flow is engaging the player.
    pub fn is_dialog_active(&self) -> bool {
        self.flags.dialog_active
    }

    /// Whether a line is being spoken.
    pub fn is_talking(&self) -> bool {
        self.flags.talking
    }

    /// Whether a conversation is engaging the player.
    pub fn is_active(&self) -> bool {
        self.interaction.target().is_some() && self.flags.is_engaged()
    }

    /// Choices of the current presentation cycle.
    pub fn choices(&self) -> &ChoiceRegistry {
        &self.choices
    }

    /// Important topics already played.
    pub fn important_known(&self) -> &ImportantKnown {
        &self.important_known
    }

    /// The tracked conversation.
    pub fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    /// End request waiting for the current line.
    pub fn pending_end(&self) -> Option<PendingEndSignal> {
        self.pending_end
    }

    /// Seconds spent in the current conversation.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// The display surfaces.
    pub fn ui(&self) -> &dyn DialogUi {
        &*self.ui
    }

    /// The display surfaces (mutable).
    pub fn ui_mut(&mut self) -> &mut dyn DialogUi {
        &mut *self.ui
    }

    /// Downcast the UI to its concrete type.
    pub fn ui_as<T: Any>(&self) -> Option<&T> {
        self.ui.as_any().downcast_ref::<T>()
    }

    /// Downcast the UI to its concrete type (mutable).
    pub fn ui_as_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.ui.as_any_mut().downcast_mut::<T>()
    }

    // -- conversation lifecycle --

    /// Start talking to `target`.
    ///
    /// Returns `false` without changing anything if a conversation with a
    /// different NPC is in progress. Otherwise the topics are evaluated and
    /// either offered or, for an important topic, played straight away.
    pub fn start_interaction(&mut self, target: ActorId, script: &mut dyn ScriptHost) -> bool {
        if self.is_active() && !self.interaction.is_with(target) {
            tracing::debug!(
                npc = %target,
                current = ?self.interaction.target(),
                "Ignoring interaction start, already talking to someone else"
            );
            return false;
        }

        if self.important_known.begin_conversation(target) {
            tracing::debug!(npc = %target, "Reset important-topic memory");
        }

        tracing::info!(player = %self.hero, npc = %target, "Starting interaction");
        self.interaction.begin(self.hero, target);
        self.choices.clear();
        self.flags.sub_dialog_active = false;
        self.flags.refresh_pending = false;
        self.pending_end = None;
        self.elapsed = 0.0;

        self.refresh_choices(target, script);
        true
    }

    /// Leave the conversation. Safe to call at any time.
    ///
    /// A line still being spoken keeps playing; [`Self::update`] clears
    /// `talking` once it finishes.
    pub fn end_interaction(&mut self) {
        if let Some(target) = self.interaction.target() {
            tracing::info!(npc = %target, elapsed = self.elapsed, "Ending interaction");
        }
        self.interaction.clear();
        self.choices.clear();
        self.flags = ConversationFlags {
            talking: self.flags.talking,
            ..ConversationFlags::default()
        };
        self.pending_end = None;
        self.elapsed = 0.0;
        self.ui.dismiss();
    }

    /// End the conversation with `target` once the current line finishes, or
    /// now if nobody is talking.
    pub fn queue_end_on_utterance_complete(&mut self, target: ActorId) {
        if self.flags.talking {
            tracing::debug!(npc = %target, "Queued interaction end");
            self.pending_end = Some(PendingEndSignal { target });
            return;
        }
        if self.interaction.target().is_none_or(|current| current == target) {
            self.end_interaction();
        } else {
            tracing::debug!(npc = %target, "Ignoring end request for another conversation");
        }
    }

    /// Stop everything now, ignoring any queued end.
    pub fn cancel_interaction(&mut self) {
        tracing::debug!(npc = ?self.interaction.target(), "Cancelling interaction");
        self.pending_end = None;
        self.cancel_utterance();
        self.end_interaction();
    }

    // -- utterances --

    /// Show a spoken line. A line still playing is cancelled first.
    pub fn begin_utterance(&mut self, text: &str, speaker: &str) {
        self.cancel_utterance();
        tracing::debug!(speaker, text, "Utterance");
        self.utterance = Some(self.ui.show(text, speaker));
        self.flags.talking = true;
    }

    /// Stop the current line and apply a queued end, if any.
    pub fn stop_utterance(&mut self) {
        self.cancel_utterance();
        self.apply_pending_end();
    }

    fn cancel_utterance(&mut self) {
        if let Some(handle) = self.utterance.take() {
            self.ui.cancel(handle);
        }
        self.flags.talking = false;
    }

    fn apply_pending_end(&mut self) {
        let Some(signal) = self.pending_end.take() else {
            return;
        };
        if self.interaction.is_with(signal.target) {
            self.end_interaction();
        } else {
            tracing::debug!(npc = %signal.target, "Dropping stale end request");
        }
    }

    // -- choices --

    /// Re-evaluate the topics for `target` and present them.
    ///
    /// Does nothing while a sub-menu is open or when `target` is not the
    /// current conversation partner.
    pub fn refresh_choices(&mut self, target: ActorId, script: &mut dyn ScriptHost) {
        if self.flags.sub_dialog_active {
            tracing::trace!("Sub-dialog open, skipping refresh");
            return;
        }
        let Some(player) = self.interaction.player() else {
            tracing::debug!(npc = %target, "No interaction to refresh");
            return;
        };
        if !self.interaction.is_with(target) {
            tracing::debug!(npc = %target, "Refresh for a stale interaction");
            return;
        }

        let topics = script.evaluate_eligible_topics(player, target);
        self.on_topics_resolved(target, &topics, script);
    }

    /// Build the choices from freshly evaluated topics.
    ///
    /// Important topics already played in this conversation are skipped. If
    /// an important topic remains and auto-play is enabled, the one with the
    /// lowest order is executed instead of opening the menu; the others come
    /// back on the next refresh. Ignored while a sub-menu is open.
    pub fn on_topics_resolved(
        &mut self,
        target: ActorId,
        topics: &[EligibleTopic],
        script: &mut dyn ScriptHost,
    ) {
        if self.flags.sub_dialog_active {
            tracing::debug!(npc = %target, "Sub-dialog open, ignoring resolved topics");
            return;
        }
        if !self.interaction.is_with(target) {
            tracing::debug!(npc = %target, "Topics resolved for a stale interaction");
            return;
        }

        self.interaction.set_eligible(topics);
        self.choices.clear();
        for &(_, index) in self.interaction.ranked() {
            let Some(topic) = topics.get(index) else {
                continue;
            };
            if self.important_known.contains(&topic.topic) {
                tracing::trace!(topic = %topic.topic, "Skipping known important topic");
                continue;
            }
            self.choices.add(ChoiceEntry::from(topic));
        }
        self.choices.sort();
        self.flags.dialog_active = true;
        self.flags.refresh_pending = false;

        let autoplay = if self.config.auto_play_important {
            self.choices.first_important()
        } else {
            None
        };
        match autoplay {
            Some(index) => {
                if let Err(e) = self.execute_choice(index, script) {
                    tracing::warn!(error = %e, "Failed to play important topic");
                }
            }
            None => self.flush_choices(),
        }
    }

    /// Take the choice at `index`.
    ///
    /// Out-of-range indices leave every piece of state untouched.
    pub fn execute_choice(&mut self, index: usize, script: &mut dyn ScriptHost) -> DialogResult<()> {
        let Some(entry) = self.choices.get(index).cloned() else {
            let len = self.choices.len();
            tracing::warn!(index, len, "Invalid choice");
            return Err(DialogError::InvalidChoice { index, len });
        };

        tracing::info!(
            topic = %entry.topic,
            function = %entry.function,
            important = entry.important,
            "Executing choice"
        );
        if entry.important {
            self.important_known.insert(entry.topic.clone());
        }

        self.ui.dismiss();
        if !self.flags.sub_dialog_active {
            self.choices.clear();
            self.flags.refresh_pending = true;
        }

        script.invoke(&entry.function, self);

        if self.flags.sub_dialog_active && !self.choices.is_empty() {
            self.sort_choices();
            self.flush_choices();
        }
        Ok(())
    }

    /// Offer an extra choice, as scripts do when building a sub-menu.
    pub fn add_choice(&mut self, entry: ChoiceEntry) {
        self.choices.add(entry);
    }

    /// Remove every choice. Ignored while a sub-menu is open.
    pub fn clear_choices(&mut self) {
        if self.flags.sub_dialog_active {
            tracing::debug!("Sub-dialog open, keeping choices");
            return;
        }
        self.choices.clear();
    }

    /// A sort key that places a new choice before all current ones, or
    /// `None` when a held choice already uses `i32::MIN`.
    pub fn before_front_order(&self) -> Option<i32> {
        self.choices.before_front_order(self.config.front_baseline)
    }

    /// Sort the choices by order.
    pub fn sort_choices(&mut self) {
        self.choices.sort();
    }

    /// Show the current choices.
    pub fn flush_choices(&mut self) {
        self.ui.present(self.choices.entries());
        self.flags.dialog_active = true;
    }

    /// Enter or leave a script-driven sub-menu.
    ///
    /// Leaving schedules a refresh so the regular topics come back.
    pub fn set_sub_dialog_active(&mut self, active: bool) {
        if self.flags.sub_dialog_active && !active {
            self.flags.refresh_pending = true;
        }
        self.flags.sub_dialog_active = active;
    }

    // -- tick --

    /// Advance by `dt` seconds.
    pub fn update(&mut self, dt: f64, script: &mut dyn ScriptHost) {
        if self.interaction.target().is_some() {
            self.elapsed += dt;
        }

        if self.utterance.is_some_and(|handle| self.ui.is_complete(handle)) {
            self.utterance = None;
            self.flags.talking = false;
            self.apply_pending_end();
        }

        let due = self.interaction.target().filter(|_| self.flags.wants_refresh());
        if let Some(target) = due {
            self.refresh_choices(target, script);
        }
    }

    // -- persistence --

    /// The durable part of the conversation state.
    pub fn export_document(&self) -> DialogDocument {
        DialogDocument {
            version: FORMAT_VERSION,
            target: self
                .interaction
                .target()
                .or_else(|| self.important_known.owner()),
            dialog_active: self.flags.dialog_active,
            talking: self.flags.talking,
            sub_dialog_active: self.flags.sub_dialog_active,
            important_known: self.important_known.iter().cloned().collect(),
        }
    }

    /// Replace the conversation state with a restored document.
    ///
    /// The manager comes back idle: no interaction, no line, no menu. Only
    /// the important-topic memory and the sub-menu flag are carried over.
    pub fn import_document(&mut self, doc: &DialogDocument) {
        if doc.dialog_active || doc.talking {
            tracing::debug!("Restoring conversation as idle");
        }
        if let Some(handle) = self.utterance.take() {
            self.ui.cancel(handle);
        }
        self.ui.dismiss();
        self.interaction.clear();
        self.choices.clear();
        self.pending_end = None;
        self.elapsed = 0.0;
        self.flags = ConversationFlags {
            sub_dialog_active: doc.sub_dialog_active,
            ..ConversationFlags::default()
        };
        self.important_known
            .restore(doc.target, doc.important_known.iter().cloned());
        tracing::info!(
            npc = ?doc.target,
            known = self.important_known.len(),
            "Restored conversation state"
        );
    }

    /// Whether `topic` was already played as important in this conversation.
    pub fn knows_topic(&self, topic: &TopicId) -> bool {
        self.important_known.contains(topic)
    }
}
