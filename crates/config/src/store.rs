//! Config store (C1, spec §4.1).
//!
//! Readers take the current snapshot `Arc` under a brief read lock and never
//! contend with writers beyond that clone; `set`/`reload` rewrite the file
//! atomically (temp file + rename) before swapping the in-memory pointer.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use tap_core::config::{ConfigData, Mode};
use tokio::sync::watch;
use tracing::info;

use crate::error::ConfigError;
use crate::parser;
use crate::typed;

pub type Snapshot = Arc<ConfigData>;

pub struct ConfigStore {
    path: PathBuf,
    current: RwLock<Snapshot>,
    /// Notified with the new mode whenever `set`/`reload` changes it
    /// (spec §4.1: "a change to `mode` additionally notifies C7").
    mode_tx: watch::Sender<Mode>,
}

impl ConfigStore {
    /// Load the store from disk. Fails with `ConfigError` if the file is
    /// missing, malformed, or fails typed validation.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let text = std::fs::read_to_string(&path)?;
        let raw = parser::parse(&text)?;
        let data = typed::from_raw(&raw).map_err(ConfigError::InvalidConfig)?;
        let (mode_tx, _) = watch::channel(data.mode);
        Ok(Self { path, current: RwLock::new(Arc::new(data)), mode_tx })
    }

    /// Never blocks on writers: clones the current `Arc` under a short read
    /// lock (spec §4.1 contract).
    pub fn get(&self) -> Snapshot {
        self.current.read().clone()
    }

    /// Subscribe to mode changes (consumed by the mode controller).
    pub fn watch_mode(&self) -> watch::Receiver<Mode> {
        self.mode_tx.subscribe()
    }

    /// Apply a patch function to the current snapshot, producing a new
    /// snapshot. Validates before writing; on failure the on-disk file and
    /// in-memory snapshot are unchanged (spec §8 invariant 1).
    pub fn set(
        &self,
        patch: impl FnOnce(&mut ConfigData),
    ) -> Result<Snapshot, ConfigError> {
        let before = self.current.read().clone();
        let mut candidate = (*before).clone();
        patch(&mut candidate);

        // Round-trip through the raw map so validation rules (which operate
        // on raw strings) apply uniformly to programmatic patches too.
        let raw = typed::to_raw(&candidate);
        let revalidated = typed::from_raw(&raw).map_err(ConfigError::InvalidConfig)?;

        write_atomic(&self.path, &parser::serialize(&raw))?;

        let new_mode = revalidated.mode;
        let new_snapshot = Arc::new(revalidated);
        *self.current.write() = new_snapshot.clone();
        if new_mode != before.mode {
            let _ = self.mode_tx.send(new_mode);
            info!(from = before.mode.as_str(), to = new_mode.as_str(), "config mode changed");
        }
        Ok(new_snapshot)
    }

    /// Re-read from disk. Any snapshot `Arc` already handed out remains
    /// valid (it's independently reference-counted) until dropped.
    pub fn reload(&self) -> Result<Snapshot, ConfigError> {
        let text = std::fs::read_to_string(&self.path)?;
        let raw = parser::parse(&text)?;
        let data = typed::from_raw(&raw).map_err(ConfigError::InvalidConfig)?;
        let before_mode = self.current.read().mode;
        let snapshot = Arc::new(data);
        *self.current.write() = snapshot.clone();
        if snapshot.mode != before_mode {
            let _ = self.mode_tx.send(snapshot.mode);
        }
        Ok(snapshot)
    }
}

fn write_atomic(path: &Path, contents: &str) -> std::io::Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let tmp_path = dir.join(format!(
        ".{}.tmp-{}",
        path.file_name().and_then(|n| n.to_str()).unwrap_or("config"),
        std::process::id()
    ));
    std::fs::write(&tmp_path, contents)?;
    std::fs::rename(&tmp_path, path)?;
    Ok(())
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
