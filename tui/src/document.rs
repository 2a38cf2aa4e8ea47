//! Document rendering: turns the node tree into ratatui lines.
//!
//! Block and group elements start on a fresh line; inline elements and text
//! flow on the current one. Hidden text is laid out as blank cells of the same
//! width so that revealing it never reflows the document. The cursor is drawn
//! at its anchor, either right after the child it follows or at the end of
//! its container.

use std::mem;

use ratatui::style::Style;
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthStr;

use quill_types::{CursorState, ElementRole, NodeId, NodeKind, NodeTree, sanitize_terminal_text};

use crate::theme::{Glyphs, Palette, styles};

const TAB: &str = "    ";

/// Render the subtree under `root`.
///
/// `blink_on` is the blink phase of the cursor; when off, the cursor cell is
/// left blank but still occupies its column.
#[must_use]
pub fn render_document(
    tree: &NodeTree,
    root: NodeId,
    cursor: CursorState,
    palette: &Palette,
    glyphs: &Glyphs,
    blink_on: bool,
) -> Vec<Line<'static>> {
    let mut writer = LineWriter::new(styles::document_text(palette));
    let cursor = Cursor {
        state: cursor,
        glyph: glyphs.cursor,
        style: styles::cursor(palette),
        blink_on,
    };
    if tree.contains(root) {
        walk(tree, root, &cursor, &mut writer);
    }
    writer.finish()
}

struct Cursor {
    state: CursorState,
    glyph: &'static str,
    style: Style,
    blink_on: bool,
}

impl Cursor {
    /// Whether the cursor sits at the end of `container`.
    fn ends(&self, container: NodeId) -> bool {
        self.state
            .anchor()
            .is_some_and(|anchor| anchor.container() == container && anchor.follows().is_none())
    }

    /// Whether the cursor sits right after `child` of `container`.
    fn follows(&self, container: NodeId, child: NodeId) -> bool {
        self.state
            .anchor()
            .is_some_and(|anchor| anchor.container() == container && anchor.follows() == Some(child))
    }

    fn draw(&self, tree: &NodeTree, container: NodeId, writer: &mut LineWriter) {
        let shown = self.state.is_visible() && self.blink_on && tree.is_visible(container);
        if shown {
            writer.push(self.glyph.to_string(), self.style);
        } else {
            writer.push(" ".repeat(self.glyph.width()), self.style);
        }
    }
}

#[derive(Default)]
struct LineWriter {
    lines: Vec<Line<'static>>,
    current: Vec<Span<'static>>,
    text_style: Style,
}

impl LineWriter {
    fn new(text_style: Style) -> Self {
        Self {
            text_style,
            ..Self::default()
        }
    }

    fn push(&mut self, content: String, style: Style) {
        if !content.is_empty() {
            self.current.push(Span::styled(content, style));
        }
    }

    /// Push text that may contain newlines.
    fn push_text(&mut self, text: &str, visible: bool) {
        let style = self.text_style;
        for (i, segment) in text.split('\n').enumerate() {
            if i > 0 {
                self.newline();
            }
            let segment = segment.replace('\t', TAB).replace('\r', "");
            if visible {
                self.push(segment, style);
            } else {
                self.push(" ".repeat(segment.width()), style);
            }
        }
    }

    fn newline(&mut self) {
        self.lines.push(Line::from(mem::take(&mut self.current)));
    }

    /// Start a fresh line unless the current one is still empty.
    fn break_line(&mut self) {
        if !self.current.is_empty() {
            self.newline();
        }
    }

    fn finish(mut self) -> Vec<Line<'static>> {
        self.break_line();
        self.lines
    }
}

fn walk(tree: &NodeTree, node: NodeId, cursor: &Cursor, writer: &mut LineWriter) {
    let Some(current) = tree.get(node) else {
        return;
    };
    match current.kind() {
        NodeKind::Text { content } => {
            let text = sanitize_terminal_text(content);
            writer.push_text(&text, tree.is_visible(node));
        }
        NodeKind::Element { role, .. } => {
            let block = *role != ElementRole::Inline;
            if block {
                writer.break_line();
            }
            for &child in current.children() {
                walk(tree, child, cursor, writer);
                if cursor.follows(node, child) {
                    cursor.draw(tree, node, writer);
                }
            }
            if cursor.ends(node) {
                cursor.draw(tree, node, writer);
            }
            if block {
                writer.break_line();
            }
        }
    }
}
