// Keymods Preferences
// Terminal editor for the indicator symbols and presets

#[cfg(feature = "pure-rust")]
#[path = "../tui/mod.rs"]
mod tui;

#[cfg(feature = "pure-rust")]
use clap::Parser;

/// Edit the symbols shown by keymods
#[cfg(feature = "pure-rust")]
#[derive(Parser, Debug)]
#[command(name = "keymods-prefs")]
#[command(version)]
#[command(about = "Edit keymods symbols and presets", long_about = None)]
struct Args {
    /// Settings file (default: ~/.config/keymods/settings.toml)
    #[arg(short, long, value_name = "PATH")]
    settings: Option<std::path::PathBuf>,

    /// Apply a `key=value` mapping file (see `keymods --print-symbols`) and exit
    #[arg(long, value_name = "FILE")]
    import: Option<std::path::PathBuf>,
}

#[cfg(feature = "pure-rust")]
fn main() -> std::io::Result<()> {
    let args = Args::parse();
    // Logs would corrupt the alternate screen; only errors go to stderr
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("error")).init();
    match args.import {
        Some(file) => tui::import(args.settings, &file),
        None => tui::run(args.settings),
    }
}

#[cfg(not(feature = "pure-rust"))]
fn main() {
    eprintln!("Error: keymods-prefs requires the 'pure-rust' feature to be enabled.");
    eprintln!("Please build with: cargo build --release --features pure-rust --bin keymods-prefs");
    std::process::exit(1);
}
