//! Configuration types for flipdeck.
//!
//! [`Config::load`] reads `~/.config/flipdeck/config.toml`, creating it with
//! hardcoded defaults if it does not yet exist. [`Config::defaults`] returns
//! the same defaults without touching the filesystem (useful in tests).

use serde::Deserialize;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
[storage]
# data_dir  = "/some/override"       # defaults to XDG data home / flipdeck
# watch_dir = "/some/drop/directory" # defaults to <data_dir>/incoming

[ui]
show_snippets    = true
timestamp_format = "%Y-%m-%d %H:%M"
"#;

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// Top-level application configuration, loaded from
/// `~/.config/flipdeck/config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

/// `[storage]` section of `config.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorageConfig {
    /// Where the persisted snapshot lives. Defaults to the XDG data home.
    pub data_dir: Option<PathBuf>,
    /// Drop directory watched for incoming log batches. Defaults to
    /// `<data_dir>/incoming`.
    pub watch_dir: Option<PathBuf>,
}

/// `[ui]` section of `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_show_snippets")]
    pub show_snippets: bool,
    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,
}

fn default_show_snippets() -> bool { true }
fn default_timestamp_format() -> String { "%Y-%m-%d %H:%M".to_string() }

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            show_snippets: default_show_snippets(),
            timestamp_format: default_timestamp_format(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Config {
    /// Load from `~/.config/flipdeck/config.toml`, layered on top of the
    /// built-in defaults. Creates the file with defaults if it does not exist.
    pub fn load() -> anyhow::Result<Self> {
        let path = config_path();

        if !path.exists() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, DEFAULT_CONFIG.trim_start())?;
        }

        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(config::File::from(path.as_path()).required(false))
            .build()?
            .try_deserialize()
            .map_err(Into::into)
    }

    /// Return the built-in defaults without touching the filesystem.
    pub fn defaults() -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .expect("built-in default config must be valid TOML")
            .try_deserialize()
            .expect("built-in default config must deserialize correctly")
    }

    /// Directory holding the snapshot (and, by default, the drop directory).
    pub fn data_dir(&self) -> PathBuf {
        self.storage
            .data_dir
            .clone()
            .unwrap_or_else(default_data_dir)
    }

    /// Drop directory watched for incoming log batches.
    pub fn watch_dir(&self) -> PathBuf {
        self.storage
            .watch_dir
            .clone()
            .unwrap_or_else(|| self.data_dir().join("incoming"))
    }
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

fn config_path() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
                .join(".config")
        })
        .join("flipdeck")
        .join("config.toml")
}

fn default_data_dir() -> PathBuf {
    std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
                .join(".local")
                .join("share")
        })
        .join("flipdeck")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_load() {
        let cfg = Config::defaults();
        assert!(cfg.ui.show_snippets);
        assert_eq!(cfg.ui.timestamp_format, "%Y-%m-%d %H:%M");
        assert!(cfg.storage.data_dir.is_none());
    }

    #[test]
    fn watch_dir_defaults_under_data_dir() {
        let mut cfg = Config::defaults();
        cfg.storage.data_dir = Some(PathBuf::from("/tmp/flipdeck-test"));
        assert_eq!(cfg.watch_dir(), PathBuf::from("/tmp/flipdeck-test/incoming"));
    }
}
