//! Display collaborator contracts.
//!
//! The engine drives two surfaces: a subtitle box for spoken lines and a
//! choice menu. [`HeadlessUi`] implements both without drawing anything, for
//! tools and tests.

use std::any::Any;
use std::collections::HashSet;

use crate::choice::ChoiceEntry;

/// Handle of a subtitle being displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UtteranceHandle(pub u64);

/// Where spoken lines appear.
pub trait SubtitleSurface {
    /// Start displaying a line.
    fn show(&mut self, text: &str, speaker: &str) -> UtteranceHandle;

    /// Whether the line finished playing (or was cancelled).
    fn is_complete(&self, handle: UtteranceHandle) -> bool;

    /// Stop a line early.
    fn cancel(&mut self, handle: UtteranceHandle);
}

/// Where the choice menu appears.
pub trait ChoiceSurface {
    /// Show `choices` in the given order, replacing any open menu.
    fn present(&mut self, choices: &[ChoiceEntry]);

    /// Close the menu.
    fn dismiss(&mut self);
}

/// Both surfaces, owned by the conversation engine.
pub trait DialogUi: SubtitleSurface + ChoiceSurface + std::fmt::Debug {
    /// Support downcasting to the concrete surface type.
    fn as_any(&self) -> &dyn Any;

    /// Support downcasting to the concrete surface type.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// A line shown on a [`HeadlessUi`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subtitle {
    /// Handle returned by `show`.
    pub handle: UtteranceHandle,
    /// Name of the speaking actor.
    pub speaker: String,
    /// The spoken line.
    pub text: String,
}

/// Lines a [`HeadlessUi`] remembers by default.
pub const DEFAULT_SUBTITLE_HISTORY: usize = 64;

/// A UI that records what it was asked to show.
///
/// Lines keep playing until [`HeadlessUi::finish`] is called, unless the UI
/// was built with [`HeadlessUi::auto_completing`]. Only the most recent lines
/// are kept; a line that drops out of the history counts as complete.
#[derive(Debug)]
pub struct HeadlessUi {
    next_handle: u64,
    auto_complete: bool,
    history: usize,
    /// Handles below this number were evicted.
    evicted_below: u64,
    finished: HashSet<UtteranceHandle>,
    cancelled: Vec<UtteranceHandle>,
    subtitles: Vec<Subtitle>,
    menu: Option<Vec<String>>,
    presentations: usize,
}

impl Default for HeadlessUi {
    fn default() -> Self {
        Self {
            next_handle: 0,
            auto_complete: false,
            history: DEFAULT_SUBTITLE_HISTORY,
            evicted_below: 0,
            finished: HashSet::new(),
            cancelled: Vec::new(),
            subtitles: Vec::new(),
            menu: None,
            presentations: 0,
        }
    }
}

impl HeadlessUi {
    /// A UI whose lines play until finished.
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep at most `lines` lines (at least one).
    pub fn with_history(mut self, lines: usize) -> Self {
        self.history = lines.max(1);
        self
    }

    /// A UI whose lines complete as soon as they are shown.
    pub fn auto_completing() -> Self {
        Self {
            auto_complete: true,
            ..Self::default()
        }
    }

    /// Mark a line as played to the end.
    pub fn finish(&mut self, handle: UtteranceHandle) {
        if handle.0 >= self.evicted_below {
            self.finished.insert(handle);
        }
    }

    /// Mark every line shown so far as played.
    pub fn finish_all(&mut self) {
        let handles: Vec<_> = self.subtitles.iter().map(|s| s.handle).collect();
        self.finished.extend(handles);
    }

    /// Recent lines, oldest first.
    pub fn subtitles(&self) -> &[Subtitle] {
        &self.subtitles
    }

    /// Recent lines stopped before they finished.
    pub fn cancelled(&self) -> &[UtteranceHandle] {
        &self.cancelled
    }

    /// Texts of the open menu, if any.
    pub fn menu(&self) -> Option<&[String]> {
        self.menu.as_deref()
    }

    /// How many times a menu was presented.
    pub fn presentations(&self) -> usize {
        self.presentations
    }
}

impl HeadlessUi {
    fn evict(&mut self) {
        let excess = self.subtitles.len().saturating_sub(self.history);
        if excess == 0 {
            return;
        }
        for old in self.subtitles.drain(..excess) {
            self.finished.remove(&old.handle);
            self.evicted_below = old.handle.0 + 1;
        }
        let evicted_below = self.evicted_below;
        self.cancelled.retain(|h| h.0 >= evicted_below);
    }
}

impl SubtitleSurface for HeadlessUi {
    fn show(&mut self, text: &str, speaker: &str) -> UtteranceHandle {
        self.next_handle += 1;
        let handle = UtteranceHandle(self.next_handle);
        self.subtitles.push(Subtitle {
            handle,
            speaker: speaker.to_string(),
            text: text.to_string(),
        });
        self.evict();
        handle
    }

    fn is_complete(&self, handle: UtteranceHandle) -> bool {
        self.auto_complete
            || handle.0 < self.evicted_below
            || self.finished.contains(&handle)
            || self.cancelled.contains(&handle)
    }

    fn cancel(&mut self, handle: UtteranceHandle) {
        self.cancelled.push(handle);
    }
}

impl ChoiceSurface for HeadlessUi {
    fn present(&mut self, choices: &[ChoiceEntry]) {
        self.menu = Some(choices.iter().map(|c| c.text.clone()).collect());
        self.presentations += 1;
    }

    fn dismiss(&mut self) {
        self.menu = None;
    }
}

impl DialogUi for HeadlessUi {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
