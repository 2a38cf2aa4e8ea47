//! Serializable description of a subtree.
//!
//! Hosts use fragments to hand a session its children without building the
//! tree node by node. A fragment is structure only: nothing here interprets
//! markup.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{ElementRole, NodeId, NodeTree};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Fragment {
    Element {
        tag: String,
        /// Explicit role. Derived from `tag` when absent.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        role: Option<ElementRole>,
        #[serde(default)]
        children: Vec<Fragment>,
    },
    Text {
        text: String,
    },
}

#[derive(Debug, Error)]
pub enum FragmentError {
    #[error("invalid fragment: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("cannot attach fragment to {0}: node is missing or holds text")]
    InvalidParent(NodeId),
}

/// One fragment or a list of them, as found at the top of a fragment file.
#[derive(Deserialize)]
#[serde(untagged)]
enum FragmentList {
    Many(Vec<Fragment>),
    One(Fragment),
}

impl Fragment {
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    #[must_use]
    pub fn element(tag: impl Into<String>, children: Vec<Fragment>) -> Self {
        Self::Element {
            tag: tag.into(),
            role: None,
            children,
        }
    }

    /// Override the derived role. No effect on text fragments.
    #[must_use]
    pub fn with_role(self, role: ElementRole) -> Self {
        match self {
            Self::Element { tag, children, .. } => Self::Element {
                tag,
                role: Some(role),
                children,
            },
            text @ Self::Text { .. } => text,
        }
    }

    /// Parse a single fragment or a JSON array of fragments.
    pub fn parse_list(json: &str) -> Result<Vec<Self>, FragmentError> {
        let list: FragmentList = serde_json::from_str(json)?;
        Ok(match list {
            FragmentList::Many(fragments) => fragments,
            FragmentList::One(fragment) => vec![fragment],
        })
    }
}

impl NodeTree {
    /// Build `fragment` under `parent` and return the id of its top node.
    pub fn append_fragment(
        &mut self,
        parent: NodeId,
        fragment: &Fragment,
    ) -> Result<NodeId, FragmentError> {
        let top = self
            .append_fragment_node(parent, fragment)
            .ok_or(FragmentError::InvalidParent(parent))?;

        // (fragment, id) pairs whose children still need building
        let mut pending = vec![(fragment, top)];
        while let Some((fragment, id)) = pending.pop() {
            if let Fragment::Element { children, .. } = fragment {
                for child in children {
                    let child_id = self
                        .append_fragment_node(id, child)
                        .ok_or(FragmentError::InvalidParent(id))?;
                    pending.push((child, child_id));
                }
            }
        }
        Ok(top)
    }

    fn append_fragment_node(&mut self, parent: NodeId, fragment: &Fragment) -> Option<NodeId> {
        match fragment {
            Fragment::Element { tag, role, .. } => {
                let role = role.unwrap_or_else(|| ElementRole::from_tag(tag));
                self.append_element_as(parent, tag.clone(), role)
            }
            Fragment::Text { text } => self.append_text(parent, text.clone()),
        }
    }

    /// Append every fragment in order under `parent`.
    pub fn append_fragments(
        &mut self,
        parent: NodeId,
        fragments: &[Fragment],
    ) -> Result<Vec<NodeId>, FragmentError> {
        fragments
            .iter()
            .map(|fragment| self.append_fragment(parent, fragment))
            .collect()
    }
}
