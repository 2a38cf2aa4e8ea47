//! Core engine for Quill - application state without TUI dependencies.
//!
//! [`App`] owns the document tree and the typing session running over it. The
//! binary calls [`App::tick`] once per frame with the elapsed frame time; the
//! renderer reads the tree and the session cursor back out.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

pub use quill_types::ui::UiOptions;
pub use quill_types::{
    CursorAnchor, CursorState, Fragment, NodeId, NodeTree, SessionOptions, SessionPhase,
    TypingSession,
};

/// Tag of the wrapper element every session runs in.
pub const ROOT_TAG: &str = "typing-text";

/// Resolved settings: config file, then environment, then command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AppSettings {
    pub session: SessionOptions,
    pub ui: UiOptions,
    /// Quit once the reveal has finished.
    pub exit_on_done: bool,
}

/// A mounted document: the tree, its wrapper root, and the session typing it.
struct Stage {
    tree: NodeTree,
    root: NodeId,
    session: TypingSession,
    /// Set by the session's completion callback.
    done: Rc<Cell<bool>>,
}

impl Stage {
    fn mount(document: &[Fragment], options: SessionOptions) -> Result<Self> {
        let mut tree = NodeTree::new();
        let root = tree.add_root(ROOT_TAG);
        tree.append_fragments(root, document)
            .context("failed to build document tree")?;

        let done = Rc::new(Cell::new(false));
        let flag = Rc::clone(&done);
        let session =
            TypingSession::mount(&mut tree, root, options).on_typing_done(move || flag.set(true));

        tracing::info!(
            nodes = tree.len(),
            delay_ms = session.delay().as_millis() as u64,
            "Session mounted"
        );
        Ok(Self {
            tree,
            root,
            session,
            done,
        })
    }
}

pub struct App {
    document: Vec<Fragment>,
    settings: AppSettings,
    stage: Stage,
    /// Time since the current session was mounted.
    elapsed: Duration,
    tick: usize,
    runs: usize,
    last_frame: Instant,
    should_quit: bool,
}

impl App {
    pub fn new(document: Vec<Fragment>, settings: AppSettings) -> Result<Self> {
        let stage = Stage::mount(&document, settings.session)?;
        Ok(Self {
            document,
            settings,
            stage,
            elapsed: Duration::ZERO,
            tick: 0,
            runs: 1,
            last_frame: Instant::now(),
            should_quit: false,
        })
    }

    /// Advance the session by one scheduler turn.
    pub fn tick(&mut self, delta: Duration) {
        self.tick = self.tick.wrapping_add(1);
        self.elapsed = self.elapsed.saturating_add(delta);

        let stage = &mut self.stage;
        let before = stage.session.phase();
        let after = stage.session.advance(&mut stage.tree, delta);
        if before != after {
            log_transition(&stage.session, before, after);
        }

        if stage.done.take() {
            tracing::info!(
                typed = stage.session.typed_chars(),
                run = self.runs,
                "Typing done"
            );
            if self.settings.exit_on_done {
                self.request_quit();
            }
        }
    }

    /// Get elapsed time since last frame and update timing.
    pub fn frame_elapsed(&mut self) -> Duration {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_frame);
        self.last_frame = now;
        elapsed
    }

    /// Tear the current session down and replay the document from scratch.
    pub fn restart(&mut self) -> Result<()> {
        self.stage.session.cancel();
        tracing::debug!(
            phase = self.stage.session.phase().as_str(),
            "Session torn down for restart"
        );
        self.stage = Stage::mount(&self.document, self.settings.session)?;
        self.elapsed = Duration::ZERO;
        self.runs += 1;
        Ok(())
    }

    #[must_use]
    pub fn tree(&self) -> &NodeTree {
        &self.stage.tree
    }

    #[must_use]
    pub fn root(&self) -> NodeId {
        self.stage.root
    }

    #[must_use]
    pub fn session(&self) -> &TypingSession {
        &self.stage.session
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.stage.session.phase()
    }

    #[must_use]
    pub fn cursor(&self) -> CursorState {
        self.stage.session.cursor()
    }

    #[must_use]
    pub fn ui_options(&self) -> UiOptions {
        self.settings.ui
    }

    #[must_use]
    pub fn settings(&self) -> AppSettings {
        self.settings
    }

    /// Time since the current session was mounted.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    #[must_use]
    pub fn tick_count(&self) -> usize {
        self.tick
    }

    /// Number of sessions mounted so far, restarts included.
    #[must_use]
    pub fn runs(&self) -> usize {
        self.runs
    }

    /// `(typed, total)` characters of the current session.
    #[must_use]
    pub fn progress(&self) -> (usize, usize) {
        let session = &self.stage.session;
        (session.typed_chars(), session.inventory().char_count())
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn request_quit(&mut self) {
        self.should_quit = true;
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.stage.session.cancel();
    }
}

fn log_transition(session: &TypingSession, before: SessionPhase, after: SessionPhase) {
    match (before, after) {
        (SessionPhase::Idle, SessionPhase::Hiding) => {
            let inventory = session.inventory();
            tracing::info!(
                entries = inventory.len(),
                text_entries = inventory.text_entries(),
                chars = inventory.char_count(),
                "Inventory built"
            );
        }
        (SessionPhase::Hiding, _) => tracing::info!(phase = after.as_str(), "Reveal started"),
        (SessionPhase::Typing { entry: from, .. }, SessionPhase::Typing { entry: to, .. })
            if from != to =>
        {
            tracing::debug!(from, to, "Moved to next entry");
        }
        _ => tracing::debug!(from = before.as_str(), to = after.as_str(), "Phase changed"),
    }
}
