//! Persisted store — the single source of truth for all four collections.
//!
//! The UI and the ingest port read from and write through the store, never
//! around it. Every mutation applies a pure [`AppState`] operation and then
//! synchronously rewrites the whole snapshot — no debouncing, no partial
//! writes. A failed write is returned to the caller while the in-memory
//! change is kept, so nothing the user just did evaporates because the disk
//! was full.

use std::path::Path;

use crate::snapshot::{Snapshot, SnapshotError};
use crate::types::{AppState, EmailAccount, EmailLog, InventoryItem, PaymentCard};

pub struct Store {
    state: AppState,
    snapshot: Snapshot,
}

impl Store {
    /// Open the store backed by `dir`/`state_v7.json`.
    ///
    /// A missing snapshot starts empty. A malformed snapshot also starts
    /// empty, with a warning — startup never aborts over a bad blob. The
    /// bad file is left in place untouched until the first mutation
    /// overwrites it.
    pub fn open(dir: impl AsRef<Path>) -> Self {
        Self::with_snapshot(Snapshot::in_dir(dir))
    }

    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        let state = match snapshot.load() {
            Ok(Some(state)) => state,
            Ok(None) => AppState::default(),
            Err(err) => {
                tracing::warn!(
                    path = %snapshot.path().display(),
                    error = %err,
                    "snapshot unreadable, starting from empty state"
                );
                AppState::default()
            }
        };
        Self { state, snapshot }
    }

    /// An in-memory store with no backing file. Mutations succeed and the
    /// persist step is skipped entirely. For tests and dry runs; prefer
    /// [`Store::open`] everywhere else.
    pub fn in_memory() -> Self {
        Self { state: AppState::default(), snapshot: Snapshot::at_path("") }
    }

    // ── Read access ────────────────────────────────────────────────────────
    //
    // Slices only. Callers never mutate collections in place.

    pub fn inventory(&self) -> &[InventoryItem] {
        &self.state.inventory
    }

    pub fn payments(&self) -> &[PaymentCard] {
        &self.state.payments
    }

    pub fn emails(&self) -> &[EmailAccount] {
        &self.state.emails
    }

    pub fn logs(&self) -> &[EmailLog] {
        &self.state.logs
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    // ── Mutation API ───────────────────────────────────────────────────────

    pub fn add_inventory(&mut self, item: InventoryItem) -> Result<(), SnapshotError> {
        self.state.add_inventory(item);
        self.persist()
    }

    pub fn delete_inventory(&mut self, id: &str) -> Result<(), SnapshotError> {
        self.state.delete_inventory(id);
        self.persist()
    }

    pub fn add_payment(&mut self, card: PaymentCard) -> Result<(), SnapshotError> {
        self.state.add_payment(card);
        self.persist()
    }

    pub fn delete_payment(&mut self, id: &str) -> Result<(), SnapshotError> {
        self.state.delete_payment(id);
        self.persist()
    }

    pub fn add_email(&mut self, account: EmailAccount) -> Result<(), SnapshotError> {
        self.state.add_email(account);
        self.persist()
    }

    pub fn update_email(&mut self, account: EmailAccount) -> Result<(), SnapshotError> {
        self.state.update_email(account);
        self.persist()
    }

    pub fn delete_email(&mut self, id: &str) -> Result<(), SnapshotError> {
        self.state.delete_email(id);
        self.persist()
    }

    /// Merge a batch of logs (dedup + re-sort, see
    /// [`AppState::merge_logs`]) and persist. Reports nothing about how
    /// many entries the dedup dropped.
    pub fn add_logs(&mut self, batch: Vec<EmailLog>) -> Result<(), SnapshotError> {
        self.state.merge_logs(batch);
        self.persist()
    }

    fn persist(&self) -> Result<(), SnapshotError> {
        if self.snapshot.path().as_os_str().is_empty() {
            return Ok(());
        }
        self.snapshot.save(&self.state)
    }
}
