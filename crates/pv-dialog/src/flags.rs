//! Conversation state bits.

/// Independent conversation phases.
///
/// These overlap: an NPC may speak while a menu is open, and a nested
/// sub-menu stays open across utterances. Valid combinations:
///
/// | dialog_active | talking | meaning |
/// |---|---|---|
/// | false | false | idle |
/// | true  | false | menu open or waiting for the next refresh |
/// | true  | true  | a line is spoken during the conversation |
/// | false | true  | an ambient line outside any conversation |
///
/// `sub_dialog_active` only has an effect while `dialog_active` is set, and
/// `refresh_pending` is consumed by the next update that finds the dialog
/// active and silent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConversationFlags {
    /// A menu or automatic flow is engaging the player.
    pub dialog_active: bool,
    /// A subtitle is being displayed.
    pub talking: bool,
    /// A script-driven sub-menu is open; refreshes and clears are suppressed.
    pub sub_dialog_active: bool,
    /// Topic conditions must be re-evaluated before the next presentation.
    pub refresh_pending: bool,
}

impl ConversationFlags {
    /// Whether the player is engaged by either a menu or a spoken line.
    pub fn is_engaged(&self) -> bool {
        self.dialog_active || self.talking
    }

    /// Whether the next update should re-query the eligible topics.
    pub fn wants_refresh(&self) -> bool {
        self.refresh_pending && self.dialog_active && !self.talking && !self.sub_dialog_active
    }
}
