//! Cursor placement.
//!
//! The cursor is not a tree node. It is an anchor naming one position in the
//! tree, and the renderer draws the cursor glyph there. Holding the anchor in a
//! single `Option` is what keeps the cursor in at most one place.

use crate::{ElementRole, Inventory, NodeId, NodeTree};

/// A position inside `container`: right after the child `after`, or at the
/// end of `container` when `after` is `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorAnchor {
    container: NodeId,
    after: Option<NodeId>,
}

impl CursorAnchor {
    #[must_use]
    pub fn at_end(container: NodeId) -> Self {
        Self {
            container,
            after: None,
        }
    }

    #[must_use]
    pub fn after(container: NodeId, child: NodeId) -> Self {
        Self {
            container,
            after: Some(child),
        }
    }

    #[must_use]
    pub fn container(self) -> NodeId {
        self.container
    }

    /// Child the cursor follows. `None` means the end of the container.
    #[must_use]
    pub fn follows(self) -> Option<NodeId> {
        self.after
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CursorState {
    anchor: Option<CursorAnchor>,
    visible: bool,
    typing: bool,
}

impl CursorState {
    #[must_use]
    pub fn anchor(&self) -> Option<CursorAnchor> {
        self.anchor
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Whether characters are actively being typed (renderers keep the
    /// cursor solid while this holds).
    #[must_use]
    pub fn is_typing(&self) -> bool {
        self.typing
    }

    pub(crate) fn attach(&mut self, anchor: CursorAnchor) {
        self.anchor = Some(anchor);
    }

    /// Detaching an already detached cursor is a no-op.
    pub(crate) fn detach(&mut self) {
        self.anchor = None;
    }

    pub(crate) fn show(&mut self) {
        self.visible = true;
    }

    pub(crate) fn set_typing(&mut self, typing: bool) {
        self.typing = typing;
    }
}

/// End of the parent of the inventory entry at `index`.
#[must_use]
pub fn anchor_for(tree: &NodeTree, inventory: &Inventory, index: usize) -> Option<CursorAnchor> {
    let entry = inventory.get(index)?;
    tree.parent(entry).map(CursorAnchor::at_end)
}

/// Position right after `node`: inside it when it is an inline span,
/// otherwise in its parent immediately following it.
#[must_use]
pub fn anchor_after(tree: &NodeTree, node: NodeId) -> Option<CursorAnchor> {
    let current = tree.get(node)?;
    if current.role() == Some(ElementRole::Inline) {
        return Some(CursorAnchor::at_end(node));
    }
    current
        .parent()
        .map(|parent| CursorAnchor::after(parent, node))
}
