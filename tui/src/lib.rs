//! TUI rendering for Quill using ratatui.

mod document;
mod input;
mod theme;

pub use document::render_document;
pub use input::{InputPump, handle_events};
pub use theme::{Glyphs, Palette, cursor_blink_on, glyphs, palette, spinner_frame, styles};

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Padding, Paragraph, Wrap},
};

use quill_engine::{App, SessionPhase};

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let options = app.ui_options();
    let palette = palette(options);
    let glyphs = glyphs(options);
    // Clear with background color
    let bg_block = Block::default().style(Style::default().bg(palette.bg_dark));
    frame.render_widget(bg_block, frame.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),    // Document
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    draw_document(frame, app, chunks[0], &palette, &glyphs);
    draw_status_bar(frame, app, chunks[1], &palette, &glyphs);
}

fn draw_document(frame: &mut Frame, app: &App, area: Rect, palette: &Palette, glyphs: &Glyphs) {
    let cursor = app.cursor();
    let blink_on = cursor_blink_on(app.elapsed(), app.ui_options(), cursor.is_typing());
    let lines = render_document(app.tree(), app.root(), cursor, palette, glyphs, blink_on);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(styles::border(palette))
        .title(Span::styled(" quill ", styles::title(palette)))
        .padding(Padding::horizontal(1));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

pub(crate) fn draw_status_bar(
    frame: &mut Frame,
    app: &App,
    area: Rect,
    palette: &Palette,
    glyphs: &Glyphs,
) {
    let options = app.ui_options();
    let phase = app.phase();
    let (icon, color) = match phase {
        SessionPhase::Idle | SessionPhase::Hiding => (glyphs.waiting, palette.text_secondary),
        SessionPhase::Typing { .. } => (spinner_frame(app.tick_count(), options), palette.primary),
        SessionPhase::Done => (glyphs.done, palette.success),
        SessionPhase::Cancelled => (glyphs.cancelled, palette.warning),
    };
    let (typed, total) = app.progress();
    let sep = format!(" {} ", glyphs.separator);

    let status = Paragraph::new(Line::from(vec![
        Span::raw(" "),
        Span::styled(format!("{icon} {}", phase.as_str()), Style::default().fg(color)),
        Span::styled(sep.clone(), styles::key_hint(palette)),
        Span::styled(format!("{typed}/{total}"), Style::default().fg(palette.text_primary)),
        Span::styled(sep, styles::key_hint(palette)),
        Span::styled("r", styles::key_highlight(palette)),
        Span::styled(" restart  ", styles::key_hint(palette)),
        Span::styled("q", styles::key_highlight(palette)),
        Span::styled(" quit", styles::key_hint(palette)),
    ]));
    frame.render_widget(status, area);
}
