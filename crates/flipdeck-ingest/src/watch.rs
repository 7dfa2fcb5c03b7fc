//! Drop-directory watcher — file-based entry to the ingest port.
//!
//! An external agent (a fetch script, a browser extension bridge, anything
//! that can write a file) drops a `*.json` file containing an array of
//! [`EmailLog`] objects into the watch directory. The watcher parses the
//! file and pushes the batch through the [`LogSink`]; the merge then runs on
//! the UI thread like every other mutation.
//!
//! Agents must write the file elsewhere and move it into the directory
//! (renames are atomic and arrive as a single create event); the watcher
//! deliberately ignores modify events so it never reads half-written files.
//! Unparseable files are logged at `warn` and skipped — the contract has no
//! acknowledgment either way.

use std::fs;
use std::path::{Path, PathBuf};

use flipdeck_core::EmailLog;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use crate::sink::LogSink;

/// Keeps the underlying filesystem watcher alive. Dropping it stops the
/// watch.
pub struct DropWatcher {
    _watcher: RecommendedWatcher,
    dir: PathBuf,
}

impl DropWatcher {
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

/// Watch `dir` (created if missing) and push every parseable dropped batch
/// into `sink`.
pub fn spawn(dir: impl Into<PathBuf>, sink: LogSink) -> anyhow::Result<DropWatcher> {
    let dir = dir.into();
    fs::create_dir_all(&dir)?;

    let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
        let event = match res {
            Ok(event) => event,
            Err(err) => {
                tracing::warn!(error = %err, "drop watcher event error");
                return;
            }
        };
        if !matches!(event.kind, EventKind::Create(_)) {
            return;
        }
        for path in &event.paths {
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match parse_batch(path) {
                Ok(batch) => {
                    tracing::info!(
                        path = %path.display(),
                        logs = batch.len(),
                        "ingesting dropped log batch"
                    );
                    sink.push(batch);
                }
                Err(err) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %err,
                        "skipping unparseable log batch"
                    );
                }
            }
        }
    })?;
    watcher.watch(&dir, RecursiveMode::NonRecursive)?;

    tracing::info!(dir = %dir.display(), "watching for dropped log batches");
    Ok(DropWatcher { _watcher: watcher, dir })
}

/// Parse one dropped file: a JSON array of [`EmailLog`] objects.
pub fn parse_batch(path: &Path) -> anyhow::Result<Vec<EmailLog>> {
    let bytes = fs::read(path)?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_batch_reads_a_json_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("batch.json");
        fs::write(
            &path,
            r#"[{
                "id": "l1",
                "created_at": "2024-05-01T10:00:00Z",
                "subject": "Welcome",
                "snippet": "",
                "status": "unread",
                "account_id": "e1"
            }]"#,
        )
        .unwrap();

        let batch = parse_batch(&path).unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].account_id, "e1");
    }

    #[test]
    fn parse_batch_rejects_a_non_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("batch.json");
        fs::write(&path, r#"{"id": "l1"}"#).unwrap();
        assert!(parse_batch(&path).is_err());
    }
}
