use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::tui::app::App;
use crate::tui::theme::{theme, Theme};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let t = theme();

    let line1 = Line::styled(format!("Status: {}", app.status), t.status_message());
    let line2 = if app.is_editing() {
        edit_hints(t)
    } else {
        browse_hints(t)
    };

    frame.render_widget(Paragraph::new(vec![line1, line2]), area);
}

fn hint<'a>(t: &Theme, key: &'a str, action: &'a str) -> [Span<'a>; 2] {
    [
        Span::styled(key, t.key_hint()),
        Span::styled(action, t.text_muted()),
    ]
}

fn edit_hints(t: &Theme) -> Line<'static> {
    let mut spans = vec![Span::styled("Editing ~ ", t.confirm_prompt())];
    spans.extend(hint(t, "Enter", ":apply  "));
    spans.extend(hint(t, "Esc", ":cancel  "));
    spans.extend(hint(t, "Backspace", ":delete"));
    Line::from(spans)
}

fn browse_hints(t: &Theme) -> Line<'static> {
    let mut spans = vec![];
    spans.extend(hint(t, "Tab", ":group  "));
    spans.extend(hint(t, "arrows", ":row/preset  "));
    spans.extend(hint(t, "Enter", ":edit  "));
    spans.extend(hint(t, "s", ":save  "));
    spans.extend(hint(t, "d", ":default  "));
    spans.extend(hint(t, "r", ":reload  "));
    spans.extend(hint(t, "q", ":quit"));
    Line::from(spans)
}
