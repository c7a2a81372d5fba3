mod palette;

use ratatui::prelude::*;

pub use palette::Palette;

pub struct Theme {
    pub palette: Palette,
}

impl Default for Theme {
    fn default() -> Self {
        Self::new()
    }
}

impl Theme {
    pub fn new() -> Self {
        Self {
            palette: Palette::new(),
        }
    }

    // Panel border style
    pub fn panel_border(&self, focused: bool) -> Style {
        if focused {
            Style::default()
                .fg(self.palette.border_focused)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.palette.border_default)
        }
    }

    // Badge for the saved/unsaved state of the focused group
    pub fn status_badge(&self, diverged: bool) -> Style {
        let bg = if diverged {
            self.palette.bg_unsaved
        } else {
            self.palette.bg_saved
        };
        Style::default()
            .fg(Color::Black)
            .bg(bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn text_primary(&self) -> Style {
        Style::default().fg(self.palette.text_primary)
    }

    pub fn text_secondary(&self) -> Style {
        Style::default().fg(self.palette.text_secondary)
    }

    // Muted text (hints, labels)
    pub fn text_muted(&self) -> Style {
        Style::default().fg(self.palette.text_muted)
    }

    pub fn title_focused(&self) -> Style {
        Style::default()
            .fg(self.palette.accent_primary)
            .add_modifier(Modifier::BOLD)
    }

    pub fn title_unfocused(&self) -> Style {
        Style::default().fg(self.palette.text_muted)
    }

    // Highlighted selector entry or field
    pub fn selected(&self) -> Style {
        Style::default()
            .fg(self.palette.selection_fg)
            .bg(self.palette.selection_bg)
            .add_modifier(Modifier::BOLD)
    }

    // Field currently being typed into
    pub fn editing(&self) -> Style {
        Style::default()
            .fg(self.palette.accent_warning)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
    }

    pub fn row_prefix(&self, selected: bool) -> Style {
        Style::default().fg(if selected {
            self.palette.accent_primary
        } else {
            self.palette.text_muted
        })
    }

    pub fn preview_text(&self) -> Style {
        Style::default()
            .fg(self.palette.text_primary)
            .add_modifier(Modifier::BOLD)
    }

    pub fn output_text(&self) -> Style {
        Style::default().fg(self.palette.text_primary)
    }

    pub fn error_text(&self) -> Style {
        Style::default().fg(self.palette.accent_danger)
    }

    // Key hint style (the key part like "Tab")
    pub fn key_hint(&self) -> Style {
        Style::default()
            .fg(self.palette.accent_primary)
            .add_modifier(Modifier::BOLD)
    }

    pub fn confirm_prompt(&self) -> Style {
        Style::default()
            .fg(self.palette.accent_danger)
            .add_modifier(Modifier::BOLD)
    }

    pub fn status_message(&self) -> Style {
        Style::default().fg(self.palette.accent_warning)
    }

    // Symbol value; empty symbols are dimmed
    pub fn setting_value(&self, non_empty: bool) -> Style {
        if non_empty {
            Style::default().fg(self.palette.accent_success)
        } else {
            Style::default().fg(self.palette.text_muted)
        }
    }

    // Panel title with optional focus indicator
    pub fn panel_title(&self, title: &str, focused: bool) -> Line<'_> {
        if focused {
            Line::styled(format!(" {} ", title), self.title_focused())
        } else {
            Line::styled(format!(" {} ", title), self.title_unfocused())
        }
    }
}

/// Global theme instance
pub static THEME: std::sync::OnceLock<Theme> = std::sync::OnceLock::new();

pub fn theme() -> &'static Theme {
    THEME.get_or_init(Theme::new)
}
