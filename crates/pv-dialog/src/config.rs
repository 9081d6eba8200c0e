//! Configuration for the conversation engine.

/// Tunables of a [`crate::DialogManager`].
#[derive(Debug, Clone)]
pub struct DialogConfig {
    /// Sort key that front insertion counts down from when no choice is
    /// offered yet. The first front key handed out is `front_baseline - 1`.
    pub front_baseline: i32,
    /// Play important topics on their own instead of offering them.
    pub auto_play_important: bool,
}

impl Default for DialogConfig {
    fn default() -> Self {
        Self {
            front_baseline: 0,
            auto_play_important: true,
        }
    }
}

impl DialogConfig {
    /// Set the front-insertion baseline.
    pub fn with_front_baseline(mut self, baseline: i32) -> Self {
        self.front_baseline = baseline;
        self
    }

    /// Enable or disable automatic playback of important topics.
    pub fn with_auto_play_important(mut self, enabled: bool) -> Self {
        self.auto_play_important = enabled;
        self
    }
}
