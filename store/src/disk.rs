//! Persist snapshots to a file.
//!
//! [Disk] is a persistence adapter: it consumes exactly what
//! [crate::store::Store::snapshot] produces and yields exactly what
//! [crate::store::Store::restore] consumes, with JSON as the medium. The
//! engine defines the schema; this module only owns the file.
//!
//! # Atomic Saves
//!
//! File writes are not atomic and may complete partially, so [Disk::save]
//! writes the new snapshot to a sibling temporary file, syncs it, and only
//! then renames it over the target. A crash mid-save leaves the previous
//! snapshot intact.
//!
//! # Example
//!
//! ```rust
//! use prometheus_client::registry::Registry;
//! use wordstore::{disk::Disk, index::Trie, store::Store};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let disk = Disk::new(dir.path().join("words.json"));
//!
//! let mut registry = Registry::default();
//! let mut store = Store::init(&mut registry, Trie::new());
//! store.insert("bat").unwrap();
//! disk.save(&store.snapshot()).unwrap();
//!
//! let mut registry = Registry::default();
//! let mut restored = Store::init(&mut registry, Trie::new());
//! restored.restore(disk.load().unwrap().unwrap()).unwrap();
//! assert_eq!(restored.len(), 1);
//! ```

use crate::snapshot::Snapshot;
use std::{
    fs,
    io::{self, Write},
    path::PathBuf,
};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur when saving or loading snapshots.
#[derive(Debug, Error)]
pub enum Error {
    #[error("io failure: {0}")]
    Io(#[from] io::Error),
    #[error("corrupt snapshot file: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// A file-backed snapshot medium.
pub struct Disk {
    path: PathBuf,
}

impl Disk {
    /// Create an adapter writing to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Write `snapshot` to the file, atomically replacing any previous one.
    pub fn save(&self, snapshot: &Snapshot) -> Result<(), Error> {
        let encoded = serde_json::to_vec_pretty(snapshot)?;
        let staged = self.path.with_extension("tmp");
        let mut file = fs::File::create(&staged)?;
        file.write_all(&encoded)?;
        file.sync_all()?;
        fs::rename(&staged, &self.path)?;
        debug!(path = ?self.path, bytes = encoded.len(), "saved snapshot");
        Ok(())
    }

    /// Read the snapshot back, or `None` when no file exists yet.
    pub fn load(&self) -> Result<Option<Snapshot>, Error> {
        let encoded = match fs::read(&self.path) {
            Ok(encoded) => encoded,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let snapshot = serde_json::from_slice(&encoded)?;
        debug!(path = ?self.path, "loaded snapshot");
        Ok(Some(snapshot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        index::{Flat, Index},
        store::Store,
    };
    use prometheus_client::registry::Registry;

    fn populated<I: Index>(index: I) -> Store<I> {
        let mut registry = Registry::default();
        let mut store = Store::init(&mut registry, index);
        store.insert("bat").unwrap();
        store.insert("bath").unwrap();
        store.insert("dog").unwrap();
        store
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let disk = Disk::new(dir.path().join("words.json"));
        let store = populated(Flat::<2>::new());

        let snapshot = store.snapshot();
        disk.save(&snapshot).unwrap();
        assert_eq!(disk.load().unwrap().unwrap(), snapshot);

        // No staging file is left behind.
        assert!(!dir.path().join("words.tmp").exists());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let disk = Disk::new(dir.path().join("words.json"));
        assert!(disk.load().unwrap().is_none());
    }

    #[test]
    fn test_save_replaces_previous() {
        let dir = tempfile::tempdir().unwrap();
        let disk = Disk::new(dir.path().join("words.json"));
        let mut store = populated(Flat::<2>::new());

        disk.save(&store.snapshot()).unwrap();
        store.insert("cat").unwrap();
        disk.save(&store.snapshot()).unwrap();

        let loaded = disk.load().unwrap().unwrap();
        assert_eq!(loaded, store.snapshot());
    }

    #[test]
    fn test_load_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("words.json");
        fs::write(&path, b"{ not json").unwrap();

        let disk = Disk::new(path);
        assert!(matches!(disk.load(), Err(Error::Corrupt(_))));
    }
}
