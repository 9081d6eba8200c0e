//! Named-blob storage backing the save slots.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use pv_core::SlotIndex;
use tempfile::NamedTempFile;

use crate::config::SaveConfig;
use crate::error::SaveResult;

/// Read/write access to named blobs grouped by save slot.
///
/// Reads never fail: a blob that is missing, empty or unreadable is absent.
/// Writes replace the whole blob or leave the previous contents in place.
pub trait Storage: std::fmt::Debug {
    /// Read a blob. Missing, empty and unreadable blobs are `None`.
    fn read_blob(&self, slot: SlotIndex, name: &str) -> Option<Vec<u8>>;

    /// Replace a blob with `bytes`, creating the slot if necessary.
    fn write_blob(&mut self, slot: SlotIndex, name: &str, bytes: &[u8]) -> SaveResult<()>;

    /// Names of all blobs directly inside the slot, sorted.
    fn blob_names(&self, slot: SlotIndex) -> Vec<String>;

    /// Empty a blob without removing it.
    fn truncate_blob(&mut self, slot: SlotIndex, name: &str) -> SaveResult<()>;

    /// Size of a blob in bytes, 0 when absent.
    fn blob_size(&self, slot: SlotIndex, name: &str) -> u64 {
        self.read_blob(slot, name)
            .map_or(0, |bytes| bytes.len() as u64)
    }
}

/// Storage on the local filesystem, one directory per slot.
#[derive(Debug, Clone)]
pub struct FsStorage {
    config: SaveConfig,
}

impl FsStorage {
    /// Storage rooted as described by `config`.
    pub fn new(config: SaveConfig) -> Self {
        Self { config }
    }

    /// Where the slots live.
    pub fn config(&self) -> &SaveConfig {
        &self.config
    }

    fn blob_path(&self, slot: SlotIndex, name: &str) -> PathBuf {
        self.config.slot_dir(slot.0).join(name)
    }
}

impl Storage for FsStorage {
    fn read_blob(&self, slot: SlotIndex, name: &str) -> Option<Vec<u8>> {
        let path = self.blob_path(slot, name);
        match fs::read(&path) {
            Ok(bytes) if bytes.is_empty() => None,
            Ok(bytes) => {
                tracing::info!(path = %path.display(), "Reading save-file");
                Some(bytes)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read save-file");
                None
            }
        }
    }

    fn write_blob(&mut self, slot: SlotIndex, name: &str, bytes: &[u8]) -> SaveResult<()> {
        let dir = self.config.slot_dir(slot.0);
        fs::create_dir_all(&dir)?;

        let path = dir.join(name);
        tracing::info!(path = %path.display(), "Writing save-file");

        // Staged next to the target so the final rename stays on one filesystem.
        let mut staged = NamedTempFile::new_in(&dir)?;
        staged.write_all(bytes)?;
        staged.flush()?;
        staged.persist(&path).map_err(|e| e.error)?;
        Ok(())
    }

    fn blob_names(&self, slot: SlotIndex) -> Vec<String> {
        let Ok(entries) = fs::read_dir(self.config.slot_dir(slot.0)) else {
            return Vec::new();
        };
        let mut names: Vec<String> = entries
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_ok_and(|t| t.is_file()))
            .filter_map(|e| e.file_name().into_string().ok())
            .collect();
        names.sort();
        names
    }

    fn truncate_blob(&mut self, slot: SlotIndex, name: &str) -> SaveResult<()> {
        let path = self.blob_path(slot, name);
        fs::OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(&path)?;
        Ok(())
    }

    fn blob_size(&self, slot: SlotIndex, name: &str) -> u64 {
        fs::metadata(self.blob_path(slot, name)).map_or(0, |m| m.len())
    }
}

/// In-memory storage, used by tests and tools that never touch the disk.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    blobs: BTreeMap<(SlotIndex, String), Vec<u8>>,
    read_only: bool,
}

impl MemoryStorage {
    /// Empty, writable storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every write with a permission error, as an unwritable disk would.
    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    fn check_writable(&self) -> SaveResult<()> {
        if self.read_only {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "storage is read-only").into());
        }
        Ok(())
    }
}

impl Storage for MemoryStorage {
    fn read_blob(&self, slot: SlotIndex, name: &str) -> Option<Vec<u8>> {
        self.blobs
            .get(&(slot, name.to_string()))
            .filter(|bytes| !bytes.is_empty())
            .cloned()
    }

    fn write_blob(&mut self, slot: SlotIndex, name: &str, bytes: &[u8]) -> SaveResult<()> {
        self.check_writable()?;
        self.blobs.insert((slot, name.to_string()), bytes.to_vec());
        Ok(())
    }

    fn blob_names(&self, slot: SlotIndex) -> Vec<String> {
        self.blobs
            .keys()
            .filter(|(s, _)| *s == slot)
            .map(|(_, name)| name.clone())
            .collect()
    }

    fn truncate_blob(&mut self, slot: SlotIndex, name: &str) -> SaveResult<()> {
        self.check_writable()?;
        match self.blobs.get_mut(&(slot, name.to_string())) {
            Some(bytes) => {
                bytes.clear();
                Ok(())
            }
            None => Err(io::Error::new(io::ErrorKind::NotFound, name.to_string()).into()),
        }
    }
}
