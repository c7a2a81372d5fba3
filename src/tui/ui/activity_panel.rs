use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::tui::app::App;
use crate::tui::theme::theme;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let t = theme();

    let block = Block::default()
        .title(t.panel_title("ACTIVITY", false))
        .borders(Borders::ALL)
        .border_style(t.panel_border(false))
        .border_type(BorderType::Plain);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if app.activity.is_empty() {
        let empty = Paragraph::new(Line::styled(
            "No changes yet. Writes and outside edits show up here.",
            t.text_muted(),
        ));
        frame.render_widget(empty, inner);
        return;
    }

    // Newest lines at the bottom
    let visible = inner.height as usize;
    let start = app.activity.len().saturating_sub(visible);
    let lines: Vec<Line> = app.activity[start..]
        .iter()
        .map(|l| {
            if l.contains("error") {
                Line::styled(l.clone(), t.error_text())
            } else {
                Line::styled(l.clone(), t.output_text())
            }
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}
