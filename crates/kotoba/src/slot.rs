//! Durable key-value slots the word store persists into.
//!
//! A slot holds whole string values under string keys. The store writes the
//! complete collection on every change; there is no partial update.
//!
//! ```text
//! ~/.local/share/kotoba/
//! ├── kotoba_log_words      # JSON array of words
//! └── deepseek_api_key      # optional provider credential
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::error::{KotobaError, Result};

/// Key holding the serialized word collection.
pub const WORDS_KEY: &str = "kotoba_log_words";

/// Key holding the DeepSeek credential.
pub const CREDENTIAL_KEY: &str = "deepseek_api_key";

/// A durable key-value slot.
///
/// Implementations must be thread-safe so a store can live behind a lock in
/// the server.
pub trait DurableSlot: Send + Sync {
    /// Read a value. A missing key is `Ok(None)`.
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value under `key`.
    fn write(&self, key: &str, value: &str) -> Result<()>;

    /// Delete the value under `key`. Missing keys are not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

/// Slot backed by one file per key in a directory.
#[derive(Debug, Clone)]
pub struct FileSlot {
    dir: PathBuf,
}

impl FileSlot {
    /// Create a slot rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

impl DurableSlot for FileSlot {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(KotobaError::Io { path, source }),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir).map_err(|source| KotobaError::Io {
                path: self.dir.clone(),
                source,
            })?;
        }

        // Write beside the target and rename, so a failed write leaves the
        // previous snapshot intact.
        let path = self.path_for(key);
        let tmp = self.dir.join(format!(".{}.tmp", key));
        fs::write(&tmp, value).map_err(|source| KotobaError::Io {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &path).map_err(|source| KotobaError::Io { path, source })
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(KotobaError::Io { path, source }),
        }
    }
}

/// In-memory slot. Clones share the same storage.
#[derive(Debug, Clone, Default)]
pub struct MemorySlot {
    values: Arc<Mutex<HashMap<String, String>>>,
    reject_writes: Arc<AtomicBool>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a slot pre-populated with one value.
    pub fn with_value(key: impl Into<String>, value: impl Into<String>) -> Self {
        let slot = Self::new();
        if let Ok(mut values) = slot.values.lock() {
            values.insert(key.into(), value.into());
        }
        slot
    }

    /// Make every subsequent write fail (for exercising error paths).
    pub fn set_reject_writes(&self, reject: bool) {
        self.reject_writes.store(reject, Ordering::SeqCst);
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.values
            .lock()
            .map_err(|_| KotobaError::Persistence("memory slot lock poisoned".to_string()))
    }
}

impl DurableSlot for MemorySlot {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        if self.reject_writes.load(Ordering::SeqCst) {
            return Err(KotobaError::Persistence(format!(
                "write to '{}' rejected",
                key
            )));
        }
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_slot_roundtrip() {
        let dir = TempDir::new().unwrap();
        let slot = FileSlot::new(dir.path().join("data"));

        assert_eq!(slot.read(WORDS_KEY).unwrap(), None);

        slot.write(WORDS_KEY, "[]").unwrap();
        assert_eq!(slot.read(WORDS_KEY).unwrap().as_deref(), Some("[]"));

        slot.write(WORDS_KEY, "[1]").unwrap();
        assert_eq!(slot.read(WORDS_KEY).unwrap().as_deref(), Some("[1]"));
        assert!(!dir.path().join("data").join(".kotoba_log_words.tmp").exists());
    }

    #[test]
    fn test_file_slot_remove_missing_is_ok() {
        let dir = TempDir::new().unwrap();
        let slot = FileSlot::new(dir.path());

        slot.remove(CREDENTIAL_KEY).unwrap();
        slot.write(CREDENTIAL_KEY, "sk-test").unwrap();
        slot.remove(CREDENTIAL_KEY).unwrap();
        assert_eq!(slot.read(CREDENTIAL_KEY).unwrap(), None);
    }

    #[test]
    fn test_memory_slot_clones_share_state() {
        let slot = MemorySlot::new();
        let view = slot.clone();

        slot.write("k", "v").unwrap();
        assert_eq!(view.read("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn test_memory_slot_rejecting_writes() {
        let slot = MemorySlot::with_value("k", "old");
        slot.set_reject_writes(true);

        assert!(slot.write("k", "new").is_err());
        assert_eq!(slot.read("k").unwrap().as_deref(), Some("old"));
    }
}
