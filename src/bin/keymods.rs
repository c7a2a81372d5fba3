// Keymods Panel Indicator
// Prints the active keyboard modifiers whenever they change

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[cfg(feature = "pure-rust")]
use clap::Parser;

#[cfg(feature = "pure-rust")]
use keymods_core::{EvdevSource, Indicator, MaskLayout, TomlStore};

/// Keyboard modifier indicator
#[cfg(feature = "pure-rust")]
#[derive(Parser, Debug)]
#[command(name = "keymods")]
#[command(version)]
#[command(about = "Shows active keyboard modifiers", long_about = None)]
struct Args {
    /// Settings file (default: ~/.config/keymods/settings.toml)
    #[arg(short, long, value_name = "PATH")]
    settings: Option<PathBuf>,

    /// Read only these devices, by path or name (can be used multiple times)
    #[arg(short, long, value_name = "DEVICE")]
    devices: Vec<String>,

    /// Polling interval in milliseconds
    #[arg(long, value_name = "N", default_value_t = 100)]
    interval_ms: u64,

    /// Print the current state once and exit
    #[arg(long)]
    once: bool,

    /// Print the configured symbols as key=value lines and exit
    #[arg(long)]
    print_symbols: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

/// How often the settings file is re-read for external edits
#[cfg(feature = "pure-rust")]
const RELOAD_INTERVAL: Duration = Duration::from_secs(1);

#[cfg(feature = "pure-rust")]
struct Application {
    args: Args,
    store: TomlStore,
    running: Arc<AtomicBool>,
}

#[cfg(feature = "pure-rust")]
impl Application {
    fn new(args: Args) -> Result<Self, Box<dyn std::error::Error>> {
        let store = match &args.settings {
            Some(path) => TomlStore::open(path)?,
            None => TomlStore::open_default()?,
        };
        log::debug!("settings: {}", store.path().display());
        Ok(Self {
            args,
            store,
            running: Arc::new(AtomicBool::new(true)),
        })
    }

    fn print_symbols(&mut self) {
        let indicator = Indicator::activate(&mut self.store, MaskLayout::X11);
        print!("{}", indicator.symbols().to_mapping_lines());
        indicator.deactivate(&mut self.store);
    }

    fn install_signal_handler(&self) {
        use signal_hook::iterator::Signals;
        let running = self.running.clone();

        std::thread::spawn(move || {
            if let Ok(mut signals) =
                Signals::new([signal_hook::consts::SIGINT, signal_hook::consts::SIGTERM])
            {
                if signals.forever().next().is_some() {
                    log::info!("received signal, shutting down");
                    running.store(false, Ordering::SeqCst);
                }
            }
        });
    }

    fn run(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        let layout = MaskLayout::X11;
        let mut source = EvdevSource::open(layout, &self.args.devices)?;
        log::info!(
            "reading {} keyboard(s); no sticky-keys signal, latch and lock stay clear",
            source.device_names().count()
        );

        let mut indicator = Indicator::activate(&mut self.store, layout);
        if let Some(text) = indicator.poll(&mut source) {
            println!("{}", text);
        }
        if self.args.once {
            indicator.deactivate(&mut self.store);
            return Ok(());
        }

        self.install_signal_handler();
        let interval = Duration::from_millis(self.args.interval_ms.max(1));
        let mut last_reload = Instant::now();

        while self.running.load(Ordering::SeqCst) {
            std::thread::sleep(interval);

            if last_reload.elapsed() >= RELOAD_INTERVAL {
                last_reload = Instant::now();
                match self.store.reload() {
                    Ok(0) => {}
                    Ok(changed) => log::debug!("{} setting(s) changed on disk", changed),
                    Err(err) => log::warn!("cannot reload settings: {}", err),
                }
            }

            if let Some(text) = indicator.poll(&mut source) {
                println!("{}", text);
            }
        }

        indicator.deactivate(&mut self.store);
        Ok(())
    }
}

#[cfg(feature = "pure-rust")]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(if args.verbose {
        "debug"
    } else {
        "warn"
    }))
    .init();

    let mut app = Application::new(args)?;
    if app.args.print_symbols {
        app.print_symbols();
        return Ok(());
    }
    app.run()
}

// Stub for when pure-rust feature is not enabled
#[cfg(not(feature = "pure-rust"))]
fn main() {
    eprintln!("Error: keymods binary requires the 'pure-rust' feature to be enabled.");
    eprintln!("Please build with: cargo build --release --features pure-rust --bin keymods");
    std::process::exit(1);
}
