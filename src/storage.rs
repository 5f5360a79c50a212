// Persistence backends for committed entries.
//
// ⚠️ VERSION BUMP REQUIRED:
// Changes to the Entry struct or its nested types (AutoAction, enums) require
// incrementing ENTRY_STORAGE_VERSION below.
use crate::context::AppContext;
use crate::model::Entry;
use anyhow::{Context, Result};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

// Version history:
// - v1: Initial entry format
const ENTRY_STORAGE_VERSION: u32 = 1;

/// Versioned on-disk document.
#[derive(Serialize, Deserialize)]
struct EntryStorageData {
    #[serde(default)]
    version: u32,
    entries: Vec<Entry>,
}

/// Save/load seam the entry store is written against.
pub trait StorageBackend {
    fn load(&self) -> Result<Vec<Entry>>;
    fn save(&self, entries: &[Entry]) -> Result<()>;
}

/// Volatile backend for tests and one-shot runs.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: Mutex<Vec<Entry>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryBackend {
    fn load(&self) -> Result<Vec<Entry>> {
        let guard = self
            .entries
            .lock()
            .map_err(|_| anyhow::anyhow!("Memory backend lock poisoned"))?;
        Ok(guard.clone())
    }

    fn save(&self, entries: &[Entry]) -> Result<()> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|_| anyhow::anyhow!("Memory backend lock poisoned"))?;
        *guard = entries.to_vec();
        Ok(())
    }
}

/// File helpers shared by every on-disk document (entries, config).
pub struct LocalStorage;

impl LocalStorage {
    /// `entries.json` -> `entries.json.<suffix>`, next to the original.
    fn sibling(path: &Path, suffix: &str) -> PathBuf {
        let mut name = path.as_os_str().to_os_string();
        name.push(".");
        name.push(suffix);
        PathBuf::from(name)
    }

    /// Run `f` while holding an exclusive lock on `<file>.lock`.
    pub fn with_lock<T>(path: &Path, f: impl FnOnce() -> Result<T>) -> Result<T> {
        let lock_path = Self::sibling(path, "lock");
        let lock = fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .with_context(|| format!("Failed to open lock file '{}'", lock_path.display()))?;
        lock.lock_exclusive()
            .with_context(|| format!("Failed to lock '{}'", lock_path.display()))?;
        let result = f();
        FileExt::unlock(&lock)?;
        result
    }

    /// Replace `path` in one step: write and sync `<file>.tmp`, then rename.
    pub fn atomic_write(path: &Path, contents: impl AsRef<[u8]>) -> Result<()> {
        let tmp_path = Self::sibling(path, "tmp");
        let mut tmp = fs::File::create(&tmp_path)
            .with_context(|| format!("Failed to create '{}'", tmp_path.display()))?;
        tmp.write_all(contents.as_ref())?;
        tmp.sync_all()?;
        fs::rename(&tmp_path, path)
            .with_context(|| format!("Failed to replace '{}'", path.display()))?;
        Ok(())
    }
}

/// JSON file backend with an exclusive lock file and atomic replace.
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backend at the context's default entries location.
    pub fn from_context(ctx: &dyn AppContext) -> Result<Self> {
        Ok(Self::new(ctx.entries_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(path: &Path) -> Result<Vec<Entry>> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read entries file '{}'", path.display()))?;
        let data: EntryStorageData = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse entries file '{}'", path.display()))?;
        if data.version > ENTRY_STORAGE_VERSION {
            anyhow::bail!(
                "Entries file '{}' has version {}, newer than supported v{}",
                path.display(),
                data.version,
                ENTRY_STORAGE_VERSION
            );
        }
        Ok(data.entries)
    }
}

impl StorageBackend for JsonFileBackend {
    fn load(&self) -> Result<Vec<Entry>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        LocalStorage::with_lock(&self.path, || Self::read_document(&self.path))
    }

    fn save(&self, entries: &[Entry]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        LocalStorage::with_lock(&self.path, || {
            // Never clobber a document written by a newer version.
            if self.path.exists() {
                Self::read_document(&self.path)?;
            }
            let data = EntryStorageData {
                version: ENTRY_STORAGE_VERSION,
                entries: entries.to_vec(),
            };
            let json = serde_json::to_string_pretty(&data)?;
            LocalStorage::atomic_write(&self.path, json)?;
            Ok(())
        })?;
        log::info!("Saved {} entries to {}", entries.len(), self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::TestContext;
    use crate::pipeline::Pipeline;
    use std::sync::Arc;
    use std::thread;

    fn sample_entries() -> Vec<Entry> {
        Pipeline::new()
            .capture("Buy milk. Call mom. Pay rent.")
            .entries
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let ctx = TestContext::new();
        let backend = JsonFileBackend::from_context(&ctx).unwrap();
        assert!(backend.load().unwrap().is_empty());
    }

    #[test]
    fn test_save_and_load() {
        let ctx = TestContext::new();
        let backend = JsonFileBackend::from_context(&ctx).unwrap();
        let entries = sample_entries();

        backend.save(&entries).unwrap();
        let loaded = backend.load().unwrap();

        assert_eq!(loaded, entries);
        assert!(!LocalStorage::sibling(backend.path(), "tmp").exists());
        assert!(LocalStorage::sibling(backend.path(), "lock").exists());
    }

    #[test]
    fn test_refuses_newer_version() {
        let ctx = TestContext::new();
        let backend = JsonFileBackend::from_context(&ctx).unwrap();
        fs::write(backend.path(), r#"{"version": 99, "entries": []}"#).unwrap();

        assert!(backend.load().is_err());
        assert!(backend.save(&sample_entries()).is_err());

        // The newer document is left untouched.
        let raw = fs::read_to_string(backend.path()).unwrap();
        assert!(raw.contains("99"));
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let ctx = TestContext::new();
        let backend = JsonFileBackend::from_context(&ctx).unwrap();
        fs::write(backend.path(), "not json").unwrap();
        assert!(backend.load().is_err());
    }

    #[test]
    fn test_locking_concurrency() {
        let ctx = TestContext::new();
        let file_path = ctx.data_dir().unwrap().join("counter.txt");
        fs::write(&file_path, "0").unwrap();
        let file_path = Arc::new(file_path);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let path = Arc::clone(&file_path);
                thread::spawn(move || {
                    LocalStorage::with_lock(&path, || {
                        let n: u32 = fs::read_to_string(&*path)?.trim().parse()?;
                        LocalStorage::atomic_write(&path, (n + 1).to_string())?;
                        Ok(())
                    })
                    .unwrap();
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(fs::read_to_string(&*file_path).unwrap(), "8");
    }

    #[test]
    fn test_memory_backend_roundtrip() {
        let backend = MemoryBackend::new();
        assert!(backend.load().unwrap().is_empty());
        let entries = sample_entries();
        backend.save(&entries).unwrap();
        assert_eq!(backend.load().unwrap().len(), 3);
    }
}
