//! Persistence media for the local cache slot.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::error::{Error, Result};

/// Name of the single cache slot (file name for [`FileSlot`]).
pub const CACHE_SLOT_NAME: &str = "dct_bookings_offline.json";

/// A named slot holding one serialized payload.
pub trait CacheSlot: Send + Sync {
    /// Current payload, or `None` when nothing has been stored yet.
    fn read(&self) -> Result<Option<String>>;

    /// Overwrite the payload.
    fn write(&self, payload: &str) -> Result<()>;

    /// Human-readable location for log lines.
    fn describe(&self) -> String;
}

/// Default on-disk location of the cache slot.
pub fn default_cache_path() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join("dct").join(CACHE_SLOT_NAME))
}

/// Cache slot backed by a JSON file.
#[derive(Debug, Clone)]
pub struct FileSlot {
    path: PathBuf,
}

impl FileSlot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CacheSlot for FileSlot {
    fn read(&self) -> Result<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => Ok(Some(raw)),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    fn write(&self, payload: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, payload)?;
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Volatile in-process slot. Clones share the same payload.
#[derive(Debug, Clone, Default)]
pub struct MemorySlot {
    payload: Arc<Mutex<Option<String>>>,
    reject_writes: Arc<AtomicBool>,
}

impl MemorySlot {
    pub fn with_payload(raw: &str) -> Self {
        let slot = Self::default();
        slot.set_payload(Some(raw.to_string()));
        slot
    }

    /// Replace the raw payload, bypassing serialization.
    pub fn set_payload(&self, raw: Option<String>) {
        let mut guard = self
            .payload
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        *guard = raw;
    }

    pub fn payload(&self) -> Option<String> {
        self.payload
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    /// Make subsequent writes fail, like a storage quota being exceeded.
    pub fn reject_writes(&self, reject: bool) {
        self.reject_writes.store(reject, Ordering::SeqCst);
    }
}

impl CacheSlot for MemorySlot {
    fn read(&self) -> Result<Option<String>> {
        Ok(self.payload())
    }

    fn write(&self, payload: &str) -> Result<()> {
        if self.reject_writes.load(Ordering::SeqCst) {
            return Err(Error::Io(std::io::Error::other(
                "memory slot is rejecting writes",
            )));
        }
        self.set_payload(Some(payload.to_string()));
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
