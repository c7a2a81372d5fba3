use std::io;

use crossterm::event::KeyCode;

use crate::tui::app::App;

/// Handle input and return true if the app should quit
pub fn handle_input(app: &mut App, key: KeyCode) -> io::Result<bool> {
    if app.is_editing() {
        handle_edit_input(app, key);
        return Ok(false);
    }

    match key {
        KeyCode::Char('q') => return Ok(true),
        KeyCode::Tab => app.next_group(),
        KeyCode::BackTab => app.previous_group(),
        KeyCode::Up | KeyCode::Char('k') => app.move_row(false),
        KeyCode::Down | KeyCode::Char('j') => app.move_row(true),
        KeyCode::Left | KeyCode::Char('h') => app.cycle_preset(false),
        KeyCode::Right | KeyCode::Char('l') => app.cycle_preset(true),
        KeyCode::Enter => app.start_edit(),
        KeyCode::Char('s') => app.save_group(),
        KeyCode::Char('d') => app.restore_default(),
        KeyCode::Char('r') => app.reload(true),
        _ => {}
    }
    Ok(false)
}

fn handle_edit_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Enter => app.commit_edit(),
        KeyCode::Esc => app.cancel_edit(),
        KeyCode::Backspace => app.backspace(),
        KeyCode::Char(c) => app.type_char(c),
        _ => {}
    }
}
