//! Core domain types for Quill.
//!
//! This crate contains the pure reveal core: the document tree the effect runs
//! over, the inventory built from it, the cursor anchor, and the typing session
//! state machine. No IO, no async, no timers of its own. Hosts drive a session
//! by calling [`TypingSession::advance`] once per scheduler turn.

// Pedantic lint configuration - these are intentional design choices
#![allow(clippy::missing_errors_doc)] // Result-returning functions are self-explanatory
#![allow(clippy::missing_panics_doc)] // Panics are documented in assertions

mod cursor;
mod fragment;
mod ids;
mod inventory;
mod sanitize;
mod session;
mod timer;
mod tree;
pub mod ui;

pub use cursor::{CursorAnchor, CursorState, anchor_after, anchor_for};
pub use fragment::{Fragment, FragmentError};
pub use ids::NodeId;
pub use inventory::Inventory;
pub use sanitize::sanitize_terminal_text;
pub use session::{DEFAULT_DELAY, SessionOptions, SessionPhase, TypingSession};
pub use tree::{ElementRole, Node, NodeKind, NodeTree, Visibility};
