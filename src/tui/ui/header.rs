use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::tui::app::App;
use crate::tui::theme::theme;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let t = theme();

    let display_path = app.store.path().display().to_string();
    let path_display = if display_path.chars().count() > 45 {
        let tail: String = display_path
            .chars()
            .rev()
            .take(42)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        format!("...{}", tail)
    } else {
        display_path
    };

    let diverged = app.status_of(app.group()).diverged;
    let badge = if diverged { "UNSAVED" } else { "SAVED" };

    let line = Line::from(vec![
        Span::styled("keymods-prefs ", t.text_primary().add_modifier(Modifier::BOLD)),
        Span::styled(format!("[{}] ", badge), t.status_badge(diverged)),
        Span::styled(path_display, t.text_muted()),
        Span::raw(" "),
        Span::styled("q:quit", t.key_hint()),
    ]);

    frame.render_widget(Paragraph::new(line).alignment(Alignment::Left), area);
}
