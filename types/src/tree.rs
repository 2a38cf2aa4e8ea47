//! Arena-backed document tree.
//!
//! The tree is owned by the host. Typing sessions only hold [`NodeId`]s into it
//! and borrow the tree for the duration of a single step. Nodes are never
//! removed, so an id stays valid for the lifetime of the tree that issued it.

use serde::{Deserialize, Serialize};

use crate::NodeId;

/// How an element takes part in the reveal.
///
/// Spelled out explicitly instead of inferred from tag names at reveal time:
/// a `Group` is hidden until the reveal reaches it even when it holds text,
/// while `Block` and `Inline` elements are only hidden when they hold no text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementRole {
    /// Generic grouping container.
    Group,
    /// Inline span. The cursor attaches inside it.
    Inline,
    #[default]
    Block,
}

impl ElementRole {
    /// Role implied by a tag name when none is given.
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "div" => Self::Group,
            "span" => Self::Inline,
            _ => Self::Block,
        }
    }
}

/// Presentation-only visibility flag.
///
/// Hidden nodes keep their place in the layout. An explicit flag on a node
/// overrides whatever its ancestors say, so a `Visible` child shows inside a
/// `Hidden` parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Inherit,
    Hidden,
    Visible,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Element { tag: String, role: ElementRole },
    Text { content: String },
}

#[derive(Debug, Clone)]
pub struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    visibility: Visibility,
}

impl Node {
    #[must_use]
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    #[must_use]
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    #[must_use]
    pub fn is_text(&self) -> bool {
        matches!(self.kind, NodeKind::Text { .. })
    }

    /// Displayed content of a text node. `None` for elements.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Text { content } => Some(content),
            NodeKind::Element { .. } => None,
        }
    }

    #[must_use]
    pub fn role(&self) -> Option<ElementRole> {
        match self.kind {
            NodeKind::Element { role, .. } => Some(role),
            NodeKind::Text { .. } => None,
        }
    }

    #[must_use]
    pub fn tag(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Element { tag, .. } => Some(tag),
            NodeKind::Text { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct NodeTree {
    nodes: Vec<Node>,
}

impl NodeTree {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parentless element, typically the wrapper a session runs in.
    pub fn add_root(&mut self, tag: impl Into<String>) -> NodeId {
        let tag = tag.into();
        let role = ElementRole::from_tag(&tag);
        self.push(NodeKind::Element { tag, role }, None)
    }

    /// Append an element whose role is derived from its tag.
    ///
    /// Returns `None` when `parent` does not exist or is a text node.
    pub fn append_element(&mut self, parent: NodeId, tag: impl Into<String>) -> Option<NodeId> {
        let tag = tag.into();
        let role = ElementRole::from_tag(&tag);
        self.append_element_as(parent, tag, role)
    }

    /// Append an element with an explicit role.
    pub fn append_element_as(
        &mut self,
        parent: NodeId,
        tag: impl Into<String>,
        role: ElementRole,
    ) -> Option<NodeId> {
        if !self.is_container(parent) {
            return None;
        }
        let tag = tag.into();
        Some(self.push(NodeKind::Element { tag, role }, Some(parent)))
    }

    /// Append a text node. Returns `None` when `parent` cannot hold children.
    pub fn append_text(&mut self, parent: NodeId, text: impl Into<String>) -> Option<NodeId> {
        if !self.is_container(parent) {
            return None;
        }
        let content = text.into();
        Some(self.push(NodeKind::Text { content }, Some(parent)))
    }

    fn push(&mut self, kind: NodeKind, parent: Option<NodeId>) -> NodeId {
        let id = NodeId::from_index(self.nodes.len());
        self.nodes.push(Node {
            kind,
            parent,
            children: Vec::new(),
            visibility: Visibility::Inherit,
        });
        if let Some(parent) = parent
            && let Some(node) = self.nodes.get_mut(parent.index())
        {
            node.children.push(id);
        }
        id
    }

    fn is_container(&self, id: NodeId) -> bool {
        self.get(id).is_some_and(|node| !node.is_text())
    }

    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.nodes.len()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(Node::parent)
    }

    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        match self.get(id) {
            Some(node) => &node.children,
            None => &[],
        }
    }

    #[must_use]
    pub fn text(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(Node::text)
    }

    /// Replace the content of a text node. Ignored for elements and unknown ids.
    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) {
        if let Some(Node {
            kind: NodeKind::Text { content },
            ..
        }) = self.nodes.get_mut(id.index())
        {
            *content = text.into();
        }
    }

    /// Append one character to a text node.
    pub fn push_char(&mut self, id: NodeId, ch: char) {
        if let Some(Node {
            kind: NodeKind::Text { content },
            ..
        }) = self.nodes.get_mut(id.index())
        {
            content.push(ch);
        }
    }

    #[must_use]
    pub fn visibility(&self, id: NodeId) -> Visibility {
        self.get(id).map_or(Visibility::Inherit, Node::visibility)
    }

    pub fn set_visibility(&mut self, id: NodeId, visibility: Visibility) {
        if let Some(node) = self.nodes.get_mut(id.index()) {
            node.visibility = visibility;
        }
    }

    /// Effective visibility: the nearest explicit flag on the node or its
    /// ancestors wins. Nodes with no explicit flag anywhere are visible.
    #[must_use]
    pub fn is_visible(&self, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current.and_then(|id| self.get(id)) {
            match node.visibility {
                Visibility::Visible => return true,
                Visibility::Hidden => return false,
                Visibility::Inherit => current = node.parent,
            }
        }
        true
    }

    /// Concatenated text of every text node under `id`, in document order.
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            let Some(node) = self.get(next) else {
                continue;
            };
            match &node.kind {
                NodeKind::Text { content } => out.push_str(content),
                NodeKind::Element { .. } => stack.extend(node.children.iter().rev()),
            }
        }
        out
    }

    /// Whether any text node under `id` (or `id` itself) has content.
    #[must_use]
    pub fn has_text_content(&self, id: NodeId) -> bool {
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            let Some(node) = self.get(next) else {
                continue;
            };
            match &node.kind {
                NodeKind::Text { content } if !content.is_empty() => return true,
                NodeKind::Text { .. } => {}
                NodeKind::Element { .. } => stack.extend(node.children.iter()),
            }
        }
        false
    }

    /// Every node under `id` in depth-first pre-order, `id` excluded.
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev());
        }
        out
    }
}
