use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::tui::app::App;
use crate::tui::theme::theme;

const LABEL_WIDTH: usize = 16;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let t = theme();
    let group = app.group();

    let block = Block::default()
        .title(t.panel_title(group.title(), true))
        .borders(Borders::ALL)
        .border_style(t.panel_border(true))
        .border_type(BorderType::Thick);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let snapshot = app.sync.reconciler(group).snapshot();
    let mut lines: Vec<Line<'static>> = Vec::new();

    for (row, key) in group.keys().iter().enumerate() {
        let selected = row == app.row;
        let editing = selected && app.is_editing();

        let value = match (&app.edit_buffer, editing) {
            (Some(buffer), true) => format!("{}_", buffer),
            _ => app.sync.value(*key),
        };
        let saved = snapshot.get(key.name()).map(String::as_str).unwrap_or("");
        let differs = !editing && !snapshot.is_empty() && app.sync.value(*key) != saved;

        let prefix = if selected { ">" } else { " " };
        let label = format!(" {:<width$}", key.label(), width = LABEL_WIDTH);

        let value_style = if editing {
            t.editing()
        } else if selected {
            t.selected()
        } else {
            t.setting_value(!value.is_empty())
        };

        let mut spans = vec![
            Span::styled(prefix.to_string(), t.row_prefix(selected)),
            Span::styled(label, t.text_secondary()),
            Span::styled(format!("[{}]", value), value_style),
        ];
        if differs {
            spans.push(Span::styled(format!("  saved: [{}]", saved), t.text_muted()));
        }
        lines.push(Line::from(spans));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}
