//! flipdeck-core — persisted store and mutation API for flipdeck.
//!
//! # Architecture
//!
//! ```text
//! Ingest port ──► Store ──► TUI
//!                   │
//!                   └──► Snapshot (state_v7.json)
//! ```
//!
//! The [`store::Store`] is the single source of truth: the TUI reads
//! slices from it and mutates through its fixed operation set; the ingest
//! port feeds log batches into the same merge operation. Every mutation
//! synchronously rewrites the whole snapshot.

pub mod config;
pub mod snapshot;
pub mod state;
pub mod store;
pub mod types;

pub use snapshot::{Snapshot, SnapshotError, SNAPSHOT_FILE};
pub use store::Store;
pub use types::{
    AppState, EmailAccount, EmailLog, EmailStep, InventoryItem, ItemStatus, PaymentCard, UnknownTag,
};
