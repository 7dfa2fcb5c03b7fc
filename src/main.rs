use std::path::PathBuf;

use clap::{Parser, Subcommand};
use flipdeck_core::{config::Config, Store};

#[derive(Parser)]
#[command(name = "flipdeck", about = "flipdeck — terminal dashboard for a resale operation")]
struct Cli {
    /// Write debug logs to /tmp/flipdeck-debug.log (tail -f to inspect).
    #[arg(long)]
    debug: bool,

    /// Override the data directory (snapshot + drop directory).
    #[arg(long)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Merge a JSON file of log entries into the store and exit.
    Import {
        /// Path to a JSON array of log entries.
        file: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.debug {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open("/tmp/flipdeck-debug.log")?;
        tracing_subscriber::fmt()
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
            )
            .init();
        tracing::info!("flipdeck debug log started — tail -f /tmp/flipdeck-debug.log");
    }

    let mut config = Config::load().unwrap_or_else(|_| Config::defaults());
    if cli.data_dir.is_some() {
        config.storage.data_dir = cli.data_dir;
    }

    match cli.command {
        Some(Command::Import { file }) => import(&config, &file),
        None => dashboard(config),
    }
}

/// One-shot headless ingest: merge a dropped batch without starting the UI.
///
/// The merge itself reports nothing about duplicates, so the survivor count
/// shown here is computed locally by diffing the log count.
fn import(config: &Config, file: &std::path::Path) -> anyhow::Result<()> {
    let batch = flipdeck_ingest::watch::parse_batch(file)?;
    let pushed = batch.len();

    let mut store = Store::open(config.data_dir());
    let before = store.logs().len();
    store.add_logs(batch)?;
    let added = store.logs().len() - before;

    println!("{added} of {pushed} log(s) merged ({} duplicates)", pushed - added);
    Ok(())
}

fn dashboard(config: Config) -> anyhow::Result<()> {
    let store = Store::open(config.data_dir());
    let (sink, drain) = flipdeck_ingest::channel();

    // The watcher lives on its own notify thread; keep the handle so it
    // outlives the UI loop.
    let _watcher = flipdeck_ingest::watch::spawn(config.watch_dir(), sink)?;

    flipdeck_tui::run(store, drain, config)
}
