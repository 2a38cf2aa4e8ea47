//! Shared test utilities and fixtures
//!
//! Trees, sessions and a virtual clock for driving them turn by turn.

#![allow(dead_code)]

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use quill_types::{NodeId, NodeTree, SessionOptions, SessionPhase, TypingSession};

pub const DELAY: Duration = Duration::from_millis(20);

/// A session mounted on a tree, with a counter of completion callbacks.
pub struct Harness {
    pub tree: NodeTree,
    pub root: NodeId,
    pub session: TypingSession,
    pub done_calls: Rc<Cell<u32>>,
}

impl Harness {
    /// Mount a session on `root` of an already built tree.
    pub fn mount(mut tree: NodeTree, root: NodeId) -> Self {
        let done_calls = Rc::new(Cell::new(0));
        let calls = Rc::clone(&done_calls);
        let session =
            TypingSession::mount(&mut tree, root, SessionOptions::with_delay(DELAY))
                .on_typing_done(move || calls.set(calls.get() + 1));
        Self {
            tree,
            root,
            session,
            done_calls,
        }
    }

    /// Run the build and reveal-start turns.
    pub fn bootstrap(&mut self) -> SessionPhase {
        self.turn(Duration::ZERO);
        self.turn(Duration::ZERO)
    }

    pub fn turn(&mut self, delta: Duration) -> SessionPhase {
        self.session.advance(&mut self.tree, delta)
    }

    /// One typing period.
    pub fn step(&mut self) -> SessionPhase {
        self.turn(DELAY)
    }

    /// Step until the session stops typing. Returns the number of steps taken.
    pub fn run_to_end(&mut self) -> usize {
        let mut steps = 0;
        while !self.session.phase().is_finished() {
            self.step();
            steps += 1;
            assert!(steps < 10_000, "session never finished");
        }
        steps
    }

    pub fn text(&self, node: NodeId) -> &str {
        self.tree.text(node).unwrap_or_default()
    }
}

/// `<root><p>{text}</p></root>`. Returns the tree, the root and the text node.
pub fn paragraph(text: &str) -> (NodeTree, NodeId, NodeId) {
    let mut tree = NodeTree::new();
    let root = tree.add_root("typing-text");
    let p = tree.append_element(root, "p").unwrap();
    let text = tree.append_text(p, text).unwrap();
    (tree, root, text)
}

/// A mixed document: headings, inline spans, an empty group and an empty leaf.
///
/// ```text
/// root
/// ├── h1 "Title"
/// ├── div (empty)
/// ├── p "one " <span "two"> " three"
/// ├── hr (empty)
/// └── div
///     └── p "end"
/// ```
pub fn mixed_document() -> (NodeTree, NodeId) {
    let mut tree = NodeTree::new();
    let root = tree.add_root("typing-text");
    let h1 = tree.append_element(root, "h1").unwrap();
    tree.append_text(h1, "Title").unwrap();
    tree.append_element(root, "div").unwrap();
    let p = tree.append_element(root, "p").unwrap();
    tree.append_text(p, "one ").unwrap();
    let span = tree.append_element(p, "span").unwrap();
    tree.append_text(span, "two").unwrap();
    tree.append_text(p, " three").unwrap();
    tree.append_element(root, "hr").unwrap();
    let group = tree.append_element(root, "div").unwrap();
    let end = tree.append_element(group, "p").unwrap();
    tree.append_text(end, "end").unwrap();
    (tree, root)
}

/// Text nodes under `root` with their current content, in document order.
pub fn text_nodes(tree: &NodeTree, root: NodeId) -> Vec<(NodeId, String)> {
    tree.descendants(root)
        .into_iter()
        .filter_map(|id| tree.text(id).map(|text| (id, text.to_string())))
        .collect()
}
