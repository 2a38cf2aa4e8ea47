//! Typing session state machine.
//!
//! A session hides the content under its root, then types it back one
//! character at a time. It owns no timers and never blocks: the host calls
//! [`TypingSession::advance`] once per scheduler turn with the time elapsed
//! since the previous turn.
//!
//! ```text
//! mount ─► Idle ─turn─► Hiding ─turn─► Typing { entry, char_index } ─► Done
//!                                         │  one char per elapsed period
//!            cancel() from any phase ─────┴──────────────────────────► Cancelled
//! ```

use std::fmt;
use std::time::Duration;

use crate::cursor::{self, CursorState};
use crate::timer::IntervalTimer;
use crate::{Inventory, NodeId, NodeTree, Visibility};

/// Default time between two typed characters.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(20);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    /// Time between two typed characters. Clamped to at least 1ms.
    pub delay_time: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            delay_time: DEFAULT_DELAY,
        }
    }
}

impl SessionOptions {
    #[must_use]
    pub fn with_delay(delay_time: Duration) -> Self {
        Self { delay_time }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Mounted; the inventory is built on the next turn.
    Idle,
    /// Content hidden and inventoried; typing starts on the next turn.
    Hiding,
    /// Typing the inventory entry at `entry`; `char_index` characters of it are shown.
    Typing { entry: usize, char_index: usize },
    Done,
    /// Torn down before finishing.
    Cancelled,
}

impl SessionPhase {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Hiding => "hiding",
            Self::Typing { .. } => "typing",
            Self::Done => "done",
            Self::Cancelled => "cancelled",
        }
    }

    #[must_use]
    pub fn is_finished(self) -> bool {
        matches!(self, Self::Done | Self::Cancelled)
    }
}

type DoneCallback = Box<dyn FnOnce()>;

pub struct TypingSession {
    root: NodeId,
    phase: SessionPhase,
    inventory: Inventory,
    cursor: CursorState,
    timer: IntervalTimer,
    /// Byte offset of the next character in the current entry's original text.
    offset: usize,
    typed: usize,
    on_typing_done: Option<DoneCallback>,
}

impl TypingSession {
    /// Start a session on `root`.
    ///
    /// The whole container is hidden right away so the blanking that happens
    /// on the first turn is never seen.
    pub fn mount(tree: &mut NodeTree, root: NodeId, options: SessionOptions) -> Self {
        tree.set_visibility(root, Visibility::Hidden);
        Self {
            root,
            phase: SessionPhase::Idle,
            inventory: Inventory::default(),
            cursor: CursorState::default(),
            timer: IntervalTimer::new(options.delay_time),
            offset: 0,
            typed: 0,
            on_typing_done: None,
        }
    }

    /// Callback invoked exactly once, after every inventory entry has been
    /// revealed. Never invoked for a cancelled session.
    pub fn on_typing_done(mut self, callback: impl FnOnce() + 'static) -> Self {
        self.on_typing_done = Some(Box::new(callback));
        self
    }

    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    #[must_use]
    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    #[must_use]
    pub fn cursor(&self) -> CursorState {
        self.cursor
    }

    /// Effective time between two characters.
    #[must_use]
    pub fn delay(&self) -> Duration {
        self.timer.period()
    }

    /// Characters typed so far across all entries.
    #[must_use]
    pub fn typed_chars(&self) -> usize {
        self.typed
    }

    /// Inventory entry currently being typed.
    #[must_use]
    pub fn active_entry(&self) -> Option<NodeId> {
        match self.phase {
            SessionPhase::Typing { entry, .. } => self.inventory.get(entry),
            _ => None,
        }
    }

    /// Run one scheduler turn.
    ///
    /// The first turn builds the inventory, the second starts the reveal.
    /// Later turns add `delta` to the typing timer and type one character per
    /// elapsed period. Finished and cancelled sessions ignore the call.
    pub fn advance(&mut self, tree: &mut NodeTree, delta: Duration) -> SessionPhase {
        match self.phase {
            SessionPhase::Idle => self.build(tree),
            SessionPhase::Hiding => self.start_reveal(tree),
            SessionPhase::Typing { .. } => {
                self.timer.advance(delta);
                while matches!(self.phase, SessionPhase::Typing { .. }) && self.timer.take_due() {
                    self.tick(tree);
                }
            }
            SessionPhase::Done | SessionPhase::Cancelled => {}
        }
        self.phase
    }

    /// Fire the typing timer once: type the next character of the active entry.
    ///
    /// Does nothing outside the typing phase, which makes it safe to drive from
    /// a virtual clock.
    pub fn tick(&mut self, tree: &mut NodeTree) -> SessionPhase {
        let SessionPhase::Typing { entry, char_index } = self.phase else {
            return self.phase;
        };
        let Some(node) = self.inventory.get(entry) else {
            self.finish(tree);
            return self.phase;
        };
        let next = self
            .inventory
            .original_text(node)
            .and_then(|text| text.get(self.offset..))
            .and_then(|rest| rest.chars().next());
        let Some(ch) = next else {
            self.enter_entry(tree, entry + 1);
            return self.phase;
        };

        self.cursor.detach();
        tree.push_char(node, ch);
        self.offset += ch.len_utf8();
        self.typed += 1;

        let remaining = self
            .inventory
            .original_text(node)
            .is_some_and(|text| self.offset < text.len());
        if remaining {
            if let Some(anchor) = cursor::anchor_after(tree, node) {
                self.cursor.attach(anchor);
            }
            self.phase = SessionPhase::Typing {
                entry,
                char_index: char_index + 1,
            };
        } else {
            self.enter_entry(tree, entry + 1);
        }
        self.phase
    }

    /// Tear the session down. Nothing is typed and no callback fires afterwards.
    pub fn cancel(&mut self) {
        if self.phase != SessionPhase::Done {
            self.phase = SessionPhase::Cancelled;
        }
        self.on_typing_done = None;
    }

    fn build(&mut self, tree: &mut NodeTree) {
        self.inventory = Inventory::build(tree, self.root);
        if let Some(anchor) = cursor::anchor_for(tree, &self.inventory, 0) {
            self.cursor.attach(anchor);
            self.cursor.show();
        }
        self.phase = SessionPhase::Hiding;
    }

    fn start_reveal(&mut self, tree: &mut NodeTree) {
        self.cursor.set_typing(true);
        if tree.contains(self.root) {
            tree.set_visibility(self.root, Visibility::Visible);
        }
        self.timer.reset();
        self.enter_entry(tree, 0);
    }

    /// Reveal entries from `index` on. Structural entries are shown on the
    /// spot; the first text-bearing one becomes the active entry. Running off
    /// the end finishes the session.
    fn enter_entry(&mut self, tree: &mut NodeTree, mut index: usize) {
        while let Some(node) = self.inventory.get(index) {
            if let Some(parent) = tree.parent(node) {
                tree.set_visibility(parent, Visibility::Visible);
            }
            if self.inventory.is_text_bearing(node) {
                self.offset = 0;
                self.phase = SessionPhase::Typing {
                    entry: index,
                    char_index: 0,
                };
                return;
            }
            tree.set_visibility(node, Visibility::Visible);
            index += 1;
        }
        self.finish(tree);
    }

    fn finish(&mut self, tree: &NodeTree) {
        self.cursor.set_typing(false);
        let last = self.inventory.len().checked_sub(1);
        if let Some(anchor) = last.and_then(|last| cursor::anchor_for(tree, &self.inventory, last))
        {
            self.cursor.attach(anchor);
            self.cursor.show();
        }
        self.phase = SessionPhase::Done;
        if let Some(callback) = self.on_typing_done.take() {
            callback();
        }
    }
}

// Manual Debug impl: the completion callback is opaque.
impl fmt::Debug for TypingSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypingSession")
            .field("root", &self.root)
            .field("phase", &self.phase)
            .field("entries", &self.inventory.len())
            .field("typed", &self.typed)
            .field("cursor", &self.cursor)
            .field("on_typing_done", &self.on_typing_done.is_some())
            .finish_non_exhaustive()
    }
}
