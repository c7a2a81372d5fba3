use keymods_core::PresetMatch;
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::tui::app::{App, SelectorEntry};
use crate::tui::theme::theme;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let t = theme();

    let block = Block::default()
        .title(t.panel_title("PRESETS", true))
        .borders(Borders::ALL)
        .border_style(t.panel_border(true))
        .border_type(BorderType::Thick);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    // Row 1: group tabs, row 2: selector of the focused group
    let mut tabs = vec![];
    for (i, group) in app.groups.iter().enumerate() {
        let style = if i == app.group_index {
            t.selected()
        } else {
            t.text_secondary()
        };
        let marker = if app.status_of(*group).diverged { "*" } else { "" };
        tabs.push(Span::styled(format!(" {}{} ", group.title(), marker), style));
        tabs.push(Span::raw("  "));
    }

    let group = app.group();
    let selection = app.status_of(group).selection;
    let mut selector = vec![Span::styled("Preset: ", t.text_muted())];
    for entry in app.selector_entries(group) {
        let active = match (entry, selection) {
            (SelectorEntry::Preset(a), PresetMatch::Preset(b)) => a == b,
            (SelectorEntry::Saved, PresetMatch::Saved) => true,
            _ => false,
        };
        let label = format!("[{}]", app.selector_label(group, entry));
        let style = if active { t.selected() } else { t.text_secondary() };
        selector.push(Span::styled(label, style));
        selector.push(Span::raw(" "));
    }
    if selection == PresetMatch::Custom {
        selector.push(Span::styled("[Custom]", t.selected()));
    }

    let para = Paragraph::new(vec![Line::from(tabs), Line::from(selector)]);
    frame.render_widget(para, inner);
}
