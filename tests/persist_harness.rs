#![allow(unused)]
//! Persistence boundary integration harness.
//!
//! # What this covers
//!
//! - **Round trip**: serializing a populated state and loading it back
//!   reproduces a field-for-field equal state.
//! - **Cold start**: a missing snapshot opens as the empty state.
//! - **Malformed snapshot**: invalid JSON opens as the empty state instead
//!   of aborting, and the bad file is left in place until the first write.
//! - **Write-through**: every mutation rewrites the snapshot, so killing
//!   the process after any operation loses nothing.
//! - **Write failure**: a failing snapshot write surfaces an error while
//!   the in-memory state keeps the change.
//! - **Wire format**: the snapshot is one JSON object with the four
//!   collections and the hyphenated enum names old snapshots use.
//!
//! # Running
//!
//! ```sh
//! cargo test --test persist_harness
//! ```

mod common;
use common::*;

use flipdeck_core::{ItemStatus, Snapshot, Store, SNAPSHOT_FILE};
use pretty_assertions::assert_eq;

// ---------------------------------------------------------------------------
// Round trip
// ---------------------------------------------------------------------------

#[test]
fn populated_state_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let original = {
        let mut store = Store::open(dir.path());
        store.add_inventory(sold_item("i1", 4.0, 9.5)).unwrap();
        store.add_payment(card("c1")).unwrap();
        store.add_email(account("e1")).unwrap();
        store
            .add_logs(vec![LogBuilder::new("l1")
                .account("e1")
                .subject("Your code")
                .at("2024-05-01T10:00:00Z")
                .otp("482913")
                .body_html("<b>482913</b>")
                .build()])
            .unwrap();
        store.state().clone()
    };

    let reopened = Store::open(dir.path());
    assert_eq!(reopened.state(), &original);
}

// ---------------------------------------------------------------------------
// Cold start and fallbacks
// ---------------------------------------------------------------------------

#[test]
fn missing_snapshot_opens_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = Store::open(dir.path());
    assert!(store.inventory().is_empty());
    assert!(store.payments().is_empty());
    assert!(store.emails().is_empty());
    assert!(store.logs().is_empty());
}

#[test]
fn malformed_snapshot_opens_empty_and_is_kept_until_first_write() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(SNAPSHOT_FILE);
    std::fs::write(&path, b"{\"inventory\": [\"not an item\"").unwrap();

    let mut store = Store::open(dir.path());
    assert!(store.inventory().is_empty());
    // The bad blob is untouched until a mutation overwrites it.
    assert_eq!(std::fs::read(&path).unwrap(), b"{\"inventory\": [\"not an item\"");

    store.add_payment(card("c1")).unwrap();
    let reopened = Store::open(dir.path());
    assert_eq!(reopened.payments().len(), 1);
}

#[test]
fn snapshot_with_unknown_status_opens_empty() {
    // Serde-level validation is all there is; an unknown tag fails the parse
    // and the store degrades to empty rather than aborting.
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join(SNAPSHOT_FILE),
        r#"{
            "inventory": [{
                "id": "i1", "account_user": "u", "account_pass": "p",
                "status": "Exploded", "cost": 1.0, "price": 2.0,
                "units": 1.0, "updated_at": "2024-05-01T10:00:00Z"
            }],
            "payments": [], "emails": [], "logs": []
        }"#,
    )
    .unwrap();
    let store = Store::open(dir.path());
    assert!(store.inventory().is_empty());
}

// ---------------------------------------------------------------------------
// Write-through
// ---------------------------------------------------------------------------

#[test]
fn every_mutation_reaches_disk_immediately() {
    let dir = tempfile::tempdir().unwrap();
    let snapshot = Snapshot::in_dir(dir.path());

    let mut store = Store::open(dir.path());
    store.add_email(account("e1")).unwrap();
    assert_eq!(snapshot.load().unwrap().unwrap().emails.len(), 1);

    store.delete_email("e1").unwrap();
    assert!(snapshot.load().unwrap().unwrap().emails.is_empty());
}

#[test]
fn failed_write_returns_err_and_keeps_memory_state() {
    // Parent of the snapshot path is a regular file, so saves always fail.
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, b"").unwrap();

    let mut store = Store::with_snapshot(Snapshot::at_path(blocker.join(SNAPSHOT_FILE)));
    assert!(store.add_payment(card("c1")).is_err());
    assert_eq!(store.payments().len(), 1);
}

// ---------------------------------------------------------------------------
// Wire format
// ---------------------------------------------------------------------------

#[test]
fn snapshot_is_one_json_object_with_hyphenated_enum_names() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = Store::open(dir.path());
    let mut pending = item("i1");
    pending.status = ItemStatus::PendingRefund;
    store.add_inventory(pending).unwrap();

    let raw = std::fs::read_to_string(dir.path().join(SNAPSHOT_FILE)).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert!(value.get("inventory").is_some());
    assert!(value.get("payments").is_some());
    assert!(value.get("emails").is_some());
    assert!(value.get("logs").is_some());
    assert_eq!(value["inventory"][0]["status"], "Pending-Refund");
}
