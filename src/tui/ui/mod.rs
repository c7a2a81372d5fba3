mod activity_panel;
mod footer;
mod groups_panel;
mod header;
mod symbols_panel;

use ratatui::prelude::*;
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use crate::tui::app::App;

pub fn draw_ui(frame: &mut Frame, app: &App) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),  // Compact header
            Constraint::Length(4),  // Group tabs + preset selector
            Constraint::Min(6),     // Symbol fields
            Constraint::Length(3),  // Preview
            Constraint::Length(8),  // Activity log
            Constraint::Length(2),  // Footer
        ])
        .split(frame.area());

    header::render(frame, app, root[0]);
    groups_panel::render(frame, app, root[1]);
    symbols_panel::render(frame, app, root[2]);
    render_preview(frame, app, root[3]);
    activity_panel::render(frame, app, root[4]);
    footer::render(frame, app, root[5]);
}

fn render_preview(frame: &mut Frame, app: &App, area: Rect) {
    let t = crate::tui::theme::theme();

    let block = Block::default()
        .title(t.panel_title("PREVIEW", false))
        .borders(Borders::ALL)
        .border_style(t.panel_border(false))
        .border_type(BorderType::Plain);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let preview = app.preview();
    let line = if preview.is_empty() {
        Line::styled("(nothing would be shown)", t.text_muted())
    } else {
        Line::from(vec![
            Span::styled(preview, t.preview_text()),
            Span::styled("   all held, Shift latched, Caps Lock locked", t.text_muted()),
        ])
    };
    frame.render_widget(Paragraph::new(line), inner);
}
