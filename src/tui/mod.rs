mod app;
mod handlers;
mod theme;
mod ui;

use std::io;
use std::path::{Path, PathBuf};

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use keymods_core::TomlStore;
use ratatui::prelude::*;

use app::App;
use handlers::handle_input;
use ui::draw_ui;

fn open_store(settings: Option<PathBuf>) -> io::Result<TomlStore> {
    match settings {
        Some(path) => TomlStore::open(path),
        None => TomlStore::open_default(),
    }
    .map_err(|e| io::Error::new(io::ErrorKind::Other, e))
}

/// Apply a mapping file without starting the editor
pub fn import(settings: Option<PathBuf>, file: &Path) -> io::Result<()> {
    let text = std::fs::read_to_string(file)?;
    let mut app = App::open(open_store(settings)?);
    app.import_mapping(&text);
    for line in &app.activity {
        eprintln!("{}", line);
    }
    println!("{}", app.status);
    Ok(())
}

pub fn run(settings: Option<PathBuf>) -> io::Result<()> {
    let mut app = App::open(open_store(settings)?);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result = loop {
        app.reload(false);

        if let Err(err) = terminal.draw(|f| draw_ui(f, &app)) {
            break Err(err);
        }

        if !event::poll(std::time::Duration::from_millis(200))? {
            continue;
        }

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        if handle_input(&mut app, key.code)? {
            break Ok(());
        }
    };

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    run_result
}
