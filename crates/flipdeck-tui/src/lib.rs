//! flipdeck TUI — ratatui dashboard shell.
//!
//! The shell consumes read-only slices from the store and mutates only
//! through its operation set; log batches arrive via the ingest drain and
//! are merged once per tick on this thread.

pub mod app;
pub mod event;
pub mod theme;
pub mod widgets;

pub use app::App;

use flipdeck_core::{config::Config, Store};
use flipdeck_ingest::LogDrain;

/// Start the dashboard over an opened store and a connected ingest drain.
pub fn run(store: Store, drain: LogDrain, config: Config) -> anyhow::Result<()> {
    let theme = theme::Theme::load_default();
    App::new(store, drain, config, theme).run()
}
