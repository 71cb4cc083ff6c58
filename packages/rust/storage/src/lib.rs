//! Persisted key-value storage for page state (the chosen theme).
//!
//! The [`KeyValueStore`] trait is the only thing the pipeline sees. Two
//! implementations ship with Folio:
//! - [`JsonFileStore`]: a flat JSON object on disk, the CLI default
//! - [`MemoryStore`]: an in-process map for tests and embedding
//!
//! **Access rules:**
//! - `folio render`: read-write via [`JsonFileStore::open`]
//! - `folio theme show`: read-only via [`JsonFileStore::open_readonly`]

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use folio_shared::{FolioError, Result};
use tracing::debug;

/// A string-to-string store. Absence of a key is a valid state.
pub trait KeyValueStore {
    /// Read the value stored under `key`.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

/// In-memory store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with one entry.
    pub fn with_entry(key: &str, value: &str) -> Self {
        let mut store = Self::new();
        store.values.insert(key.to_string(), value.to_string());
        store
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// JsonFileStore
// ---------------------------------------------------------------------------

/// Store backed by a JSON object file (`{"key": "value", ...}`).
///
/// The file is read on every access and rewritten on every write, so several
/// processes sharing one file see each other's values.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    readonly: bool,
}

impl JsonFileStore {
    /// Open (or lazily create) the store at `path` in read-write mode.
    pub fn open(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            readonly: false,
        }
    }

    /// Open the store at `path` in read-only mode.
    pub fn open_readonly(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            readonly: true,
        }
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let content =
            std::fs::read_to_string(&self.path).map_err(|e| FolioError::io(&self.path, e))?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&content).map_err(|e| {
            FolioError::Storage(format!("{} is not a JSON string map: {e}", self.path.display()))
        })
    }

    /// Ensure we're in read-write mode before writing.
    fn check_writable(&self) -> Result<()> {
        if self.readonly {
            return Err(FolioError::Storage(format!(
                "{} is opened in read-only mode",
                self.path.display()
            )));
        }
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.check_writable()?;

        let mut values = self.read_all()?;
        values.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| FolioError::io(parent, e))?;
        }
        let content = serde_json::to_string_pretty(&values)
            .map_err(|e| FolioError::Storage(e.to_string()))?;
        std::fs::write(&self.path, content).map_err(|e| FolioError::io(&self.path, e))?;

        debug!(path = ?self.path, key, "persisted value");
        Ok(())
    }
}
