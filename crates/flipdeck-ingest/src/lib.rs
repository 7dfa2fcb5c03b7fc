//! flipdeck-ingest — the external write surface of flipdeck.
//!
//! Outside agents push [`flipdeck_core::EmailLog`] batches through a
//! [`sink::LogSink`]; the UI drains them once per tick and hands each batch
//! to the store's merge. [`watch`] adds a file-based way in: drop a JSON
//! array into a watched directory.

pub mod sink;
pub mod watch;

pub use sink::{channel, LogDrain, LogSink};
pub use watch::DropWatcher;
