//! Reveal inventory: which nodes get typed, which only get shown, and in what order.

use std::collections::HashMap;

use crate::{ElementRole, NodeId, NodeKind, NodeTree, Visibility};

/// Ordered list of nodes scheduled for reveal, plus the original text of the
/// text-bearing ones.
///
/// Entries are in depth-first pre-order. An entry with an original-text record
/// is typed character by character; an entry without one is structural and is
/// simply made visible when the reveal reaches it.
#[derive(Debug, Clone, Default)]
pub struct Inventory {
    entries: Vec<NodeId>,
    originals: HashMap<NodeId, String>,
}

impl Inventory {
    /// Hide everything under `root` and record what has to come back.
    ///
    /// Non-empty text nodes are blanked and their text recorded. Empty text
    /// nodes, elements without any text, and grouping containers are marked
    /// hidden. `root` itself is left alone. A missing root yields an empty
    /// inventory and leaves the tree untouched.
    pub fn build(tree: &mut NodeTree, root: NodeId) -> Self {
        let mut inventory = Self::default();
        if tree.get(root).is_none_or(|node| node.is_text()) {
            return inventory;
        }

        let mut stack: Vec<NodeId> = tree.children(root).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            let Some(node) = tree.get(id) else {
                continue;
            };
            match node.kind() {
                NodeKind::Text { content } if !content.is_empty() => {
                    let original = content.clone();
                    tree.set_text(id, "");
                    inventory.push_text(id, original);
                }
                NodeKind::Text { .. } => inventory.push_hidden(tree, id),
                NodeKind::Element { role, .. } => {
                    if *role == ElementRole::Group || !tree.has_text_content(id) {
                        inventory.push_hidden(tree, id);
                    }
                    stack.extend(tree.children(id).iter().rev());
                }
            }
        }
        inventory
    }

    fn push_text(&mut self, id: NodeId, original: String) {
        self.originals.insert(id, original);
        self.entries.push(id);
    }

    fn push_hidden(&mut self, tree: &mut NodeTree, id: NodeId) {
        tree.set_visibility(id, Visibility::Hidden);
        self.entries.push(id);
    }

    #[must_use]
    pub fn entries(&self) -> &[NodeId] {
        &self.entries
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<NodeId> {
        self.entries.get(index).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn original_text(&self, id: NodeId) -> Option<&str> {
        self.originals.get(&id).map(String::as_str)
    }

    #[must_use]
    pub fn is_text_bearing(&self, id: NodeId) -> bool {
        self.originals.contains_key(&id)
    }

    /// Number of text-bearing entries.
    #[must_use]
    pub fn text_entries(&self) -> usize {
        self.originals.len()
    }

    /// Characters the reveal will type in total.
    #[must_use]
    pub fn char_count(&self) -> usize {
        self.originals.values().map(|text| text.chars().count()).sum()
    }
}
