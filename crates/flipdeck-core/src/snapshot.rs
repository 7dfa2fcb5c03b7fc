//! Snapshot file — the persistence boundary of the store.
//!
//! The whole [`AppState`] is serialized as one JSON object to a
//! version-suffixed filename. There is no schema migration: changing the
//! shape means bumping [`SNAPSHOT_FILE`]'s version suffix, which simply
//! orphans old snapshots. Loads do no field-level validation beyond what
//! serde needs to build the structs.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::types::AppState;

/// Snapshot filename. The `_v7` suffix is the schema version; bumping it is
/// the only supported way to invalidate previously persisted data.
pub const SNAPSHOT_FILE: &str = "state_v7.json";

/// Errors at the persistence boundary.
///
/// A failed write leaves the in-memory state untouched — callers surface the
/// error and keep going.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("snapshot io: {0}")]
    Io(#[from] io::Error),
    #[error("snapshot serialization: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Handle on the snapshot file backing one store.
#[derive(Debug, Clone)]
pub struct Snapshot {
    path: PathBuf,
}

impl Snapshot {
    /// A snapshot stored at `dir`/[`SNAPSHOT_FILE`].
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self { path: dir.as_ref().join(SNAPSHOT_FILE) }
    }

    /// A snapshot at an explicit file path (tests, `--data-dir` overrides).
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted state, if any.
    ///
    /// Returns `Ok(None)` when the file does not exist; a malformed blob
    /// comes back as `Err` so the caller can decide how to degrade (the
    /// store falls back to the empty state with a warning).
    pub fn load(&self) -> Result<Option<AppState>, SnapshotError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    /// Serialize the whole state and write it, synchronously.
    ///
    /// The write goes through a sibling temp file and a rename so a crash
    /// mid-write can never leave a truncated snapshot behind. Last write
    /// wins; nothing is versioned or journaled.
    pub fn save(&self, state: &AppState) -> Result<(), SnapshotError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_vec_pretty(state)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = Snapshot::in_dir(dir.path());
        assert!(snapshot.load().unwrap().is_none());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = Snapshot::in_dir(dir.path());

        let mut state = AppState::default();
        state.merge_logs(vec![crate::types::EmailLog {
            id: "l1".into(),
            created_at: "2024-05-01T10:00:00Z".parse().unwrap(),
            subject: "Welcome".into(),
            snippet: "hi".into(),
            status: "read".into(),
            account_id: "e1".into(),
            otp_code: Some("482913".into()),
            body_html: None,
        }]);

        snapshot.save(&state).unwrap();
        let loaded = snapshot.load().unwrap().unwrap();
        assert_eq!(loaded, state);
    }

    #[test]
    fn malformed_blob_is_an_error_not_a_panic() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = Snapshot::in_dir(dir.path());
        fs::write(snapshot.path(), b"{not json").unwrap();
        assert!(matches!(
            snapshot.load(),
            Err(SnapshotError::Serialize(_))
        ));
    }

    #[test]
    fn no_temp_file_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = Snapshot::in_dir(dir.path());
        snapshot.save(&AppState::default()).unwrap();
        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .filter(|n| n.to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }
}
