//! # Storage Backend
//!
//! The persisted key-value slot behind the cart, as an injectable
//! trait. One key, one serialized value; the cart never touches
//! storage except through this seam.
//!
//! ## Implementations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      StorageBackend Implementations                     │
//! │                                                                         │
//! │  MemoryBackend                      FileBackend                         │
//! │  ─────────────                      ───────────                         │
//! │  • Mutex<HashMap>                   • one file per key under a dir      │
//! │  • test double                      • default dir via ProjectDirs      │
//! │  • two stores sharing one           • missing file reads as None        │
//! │    backend model two tabs                                               │
//! │    sharing the same storage                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing::debug;

use crate::error::{StoreError, StoreResult};

// =============================================================================
// Trait
// =============================================================================

/// A persistent key-value slot scoped to one "browsing context" group.
///
/// Contexts that share a backend observe each other's writes, exactly
/// like tabs sharing browser-local storage.
pub trait StorageBackend: Send + Sync {
    /// Reads the raw serialized value under `key`, `None` when the key
    /// has never been written.
    fn read(&self, key: &str) -> StoreResult<Option<String>>;

    /// Replaces the value under `key` wholesale.
    fn write(&self, key: &str, value: &str) -> StoreResult<()>;
}

// =============================================================================
// Memory Backend
// =============================================================================

/// In-memory backend: the test double and the sibling-context vehicle.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    slots: Mutex<HashMap<String, String>>,
}

impl MemoryBackend {
    /// Creates an empty in-memory backend.
    pub fn new() -> Self {
        MemoryBackend::default()
    }
}

impl StorageBackend for MemoryBackend {
    fn read(&self, key: &str) -> StoreResult<Option<String>> {
        let slots = self.slots.lock().expect("backend mutex poisoned");
        Ok(slots.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut slots = self.slots.lock().expect("backend mutex poisoned");
        slots.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// =============================================================================
// File Backend
// =============================================================================

/// File-system backend: each key is a `<key>.json` file in a directory.
///
/// Writes are whole-file replacements, matching the slot's last-write-
/// wins semantics. No locking across processes.
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    /// Creates a backend rooted at `dir`. The directory is created on
    /// first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileBackend { dir: dir.into() }
    }

    /// Creates a backend at the platform data directory
    /// (e.g. `~/.local/share/gikomba-cart` on Linux).
    pub fn at_default_dir() -> StoreResult<Self> {
        let dirs = directories::ProjectDirs::from("online", "gikomba", "gikomba-cart")
            .ok_or(StoreError::NoStorageDir)?;
        Ok(FileBackend::new(dirs.data_dir()))
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl StorageBackend for FileBackend {
    fn read(&self, key: &str) -> StoreResult<Option<String>> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, key: &str, value: &str) -> StoreResult<()> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        debug!(?path, "writing storage slot");
        std::fs::write(path, value)?;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
