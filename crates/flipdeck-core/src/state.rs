//! Pure mutation API over [`AppState`].
//!
//! Every operation here is a plain in-memory transformation — no I/O. The
//! [`Store`](crate::store::Store) wraps each of these with a snapshot write;
//! nothing else in the codebase may mutate the collections.
//!
//! Conventions shared by all operations:
//!
//! - adds prepend, so each collection reads newest-first;
//! - deletes are idempotent: a nonexistent id is a silent no-op, never an
//!   error;
//! - updates replace the whole record and preserve its position.

use std::collections::HashSet;

use crate::types::{AppState, EmailAccount, EmailLog, InventoryItem, LogKey, PaymentCard};

impl AppState {
    // ── Inventory ──────────────────────────────────────────────────────────

    pub fn add_inventory(&mut self, item: InventoryItem) {
        self.inventory.insert(0, item);
    }

    pub fn delete_inventory(&mut self, id: &str) {
        self.inventory.retain(|i| i.id != id);
    }

    // ── Payments ───────────────────────────────────────────────────────────

    pub fn add_payment(&mut self, card: PaymentCard) {
        self.payments.insert(0, card);
    }

    pub fn delete_payment(&mut self, id: &str) {
        self.payments.retain(|p| p.id != id);
    }

    // ── Emails ─────────────────────────────────────────────────────────────

    pub fn add_email(&mut self, account: EmailAccount) {
        self.emails.insert(0, account);
    }

    /// Replace the account whose id matches `account.id`, keeping its
    /// position in the sequence. Silent no-op when no id matches.
    pub fn update_email(&mut self, account: EmailAccount) {
        if let Some(slot) = self.emails.iter_mut().find(|e| e.id == account.id) {
            *slot = account;
        }
    }

    pub fn delete_email(&mut self, id: &str) {
        self.emails.retain(|e| e.id != id);
    }

    // ── Logs ───────────────────────────────────────────────────────────────

    /// Merge a batch of incoming logs into the log collection.
    ///
    /// Incoming entries whose [`LogKey`] already exists among the *current*
    /// logs are dropped — first write wins, a duplicate with a different
    /// snippet or OTP code never overwrites the original, and no count of
    /// dropped entries is reported. Survivors are prepended and the whole
    /// sequence is then re-sorted descending by `created_at` (stable, so
    /// ties keep their prior relative order).
    ///
    /// Entries are filtered only against existing logs, not against each
    /// other: duplicates within one batch all survive this merge. Long-
    /// standing behavior, kept as is.
    pub fn merge_logs(&mut self, batch: Vec<EmailLog>) {
        let existing: HashSet<LogKey> = self.logs.iter().map(EmailLog::dedup_key).collect();

        let mut merged: Vec<EmailLog> = batch
            .into_iter()
            .filter(|log| !existing.contains(&log.dedup_key()))
            .collect();
        merged.append(&mut self.logs);

        merged.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        self.logs = merged;
    }
}
