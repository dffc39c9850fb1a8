//! Key-value persistence for filters and settings.
//!
//! The core needs only `get` and `set` from its storage collaborator. Two
//! implementations are provided:
//! - [`JsonFileStore`] keeps every key in one JSON object on disk, under the
//!   XDG data directory (`~/.local/share/mf/store.json` on Linux)
//! - [`MemoryStore`] keeps them in process memory
//!
//! Failures are reported as they happen; nothing is retried and there is no
//! fallback to another store.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use directories::ProjectDirs;
use serde_json::{Map, Value};
use thiserror::Error;

/// Default store filename.
const STORE_FILENAME: &str = "store.json";

/// Application qualifier (for XDG paths).
const QUALIFIER: &str = "";

/// Application organization (for XDG paths).
const ORGANIZATION: &str = "";

/// Application name (for XDG paths).
const APPLICATION: &str = "mf";

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to determine the XDG data directory.
    #[error("failed to determine data directory: no valid home directory found")]
    NoDataDir,

    /// I/O error during file read.
    #[error("failed to read store file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// I/O error during file write.
    #[error("failed to write store file '{path}': {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// I/O error during directory creation.
    #[error("failed to create data directory '{path}': {source}")]
    CreateDirError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The store file is valid JSON but not an object.
    #[error("store file '{path}' does not contain a JSON object")]
    InvalidFormat { path: PathBuf },

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// The storage collaborator: `get` and `set` by string key.
#[allow(async_fn_in_trait)]
pub trait KeyValueStore {
    /// Returns the value stored under `key`, or `None` if absent.
    async fn get(&self, key: &str) -> StoreResult<Option<Value>>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: Value) -> StoreResult<()>;
}

/// A store backed by a single JSON file.
///
/// Every `set` rewrites the whole file atomically (temp file + rename).
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Creates a store at the default XDG data path.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NoDataDir` if the home directory cannot be determined.
    pub fn new() -> StoreResult<Self> {
        Ok(Self {
            path: Self::default_path()?,
        })
    }

    /// Creates a store at a custom path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the default XDG data path for the store file.
    pub fn default_path() -> StoreResult<PathBuf> {
        let project_dirs = ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
            .ok_or(StoreError::NoDataDir)?;
        Ok(project_dirs.data_dir().join(STORE_FILENAME))
    }

    /// Returns the path to the store file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the whole store; a missing file is an empty store.
    async fn read_all(&self) -> StoreResult<Map<String, Value>> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => {
                return Err(StoreError::ReadError {
                    path: self.path.clone(),
                    source: e,
                })
            }
        };

        if contents.trim().is_empty() {
            return Ok(Map::new());
        }

        match serde_json::from_str(&contents)? {
            Value::Object(map) => Ok(map),
            _ => Err(StoreError::InvalidFormat {
                path: self.path.clone(),
            }),
        }
    }

    async fn write_all(&self, map: &Map<String, Value>) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| StoreError::CreateDirError {
                        path: parent.to_path_buf(),
                        source: e,
                    })?;
            }
        }

        let json = serde_json::to_string_pretty(map)?;

        let temp_path = self.path.with_extension("tmp");
        tokio::fs::write(&temp_path, &json)
            .await
            .map_err(|e| StoreError::WriteError {
                path: temp_path.clone(),
                source: e,
            })?;
        tokio::fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| StoreError::WriteError {
                path: self.path.clone(),
                source: e,
            })?;

        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    async fn get(&self, key: &str) -> StoreResult<Option<Value>> {
        let mut map = self.read_all().await?;
        Ok(map.remove(key))
    }

    async fn set(&self, key: &str, value: Value) -> StoreResult<()> {
        let mut map = self.read_all().await?;
        map.insert(key.to_string(), value);
        self.write_all(&map).await
    }
}

/// An in-memory store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored keys.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Value>> {
        // A poisoned map is still a consistent map: every write is a single insert.
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> StoreResult<Option<Value>> {
        Ok(self.lock().get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> StoreResult<()> {
        self.lock().insert(key.to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_default_path_returns_xdg_path() {
        let path = JsonFileStore::default_path().expect("should get default path");
        let path_str = path.to_string_lossy();

        assert!(path_str.ends_with(STORE_FILENAME), "path: {}", path_str);
        assert!(path_str.contains("mf"), "path: {}", path_str);
        assert!(path.is_absolute(), "path should be absolute: {:?}", path);
    }

    #[test]
    fn test_with_custom_path() {
        let store = JsonFileStore::with_path("/tmp/test/store.json");
        assert_eq!(store.path(), Path::new("/tmp/test/store.json"));
    }

    #[tokio::test]
    async fn test_missing_file_reads_as_empty() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonFileStore::with_path(temp_dir.path().join("store.json"));

        assert_eq!(store.get("filters").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_then_get() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("store.json");
        let store = JsonFileStore::with_path(&path);

        store.set("filters", json!([{"id": "1"}])).await.unwrap();
        store.set("appSettings", json!({"enableDeleteAction": true})).await.unwrap();

        assert!(path.exists());
        assert!(!path.with_extension("tmp").exists());
        assert_eq!(
            store.get("filters").await.unwrap(),
            Some(json!([{"id": "1"}]))
        );
        assert_eq!(
            store.get("appSettings").await.unwrap(),
            Some(json!({"enableDeleteAction": true}))
        );
    }

    #[tokio::test]
    async fn test_invalid_json_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("store.json");
        std::fs::write(&path, "{ not json").unwrap();

        let result = JsonFileStore::with_path(&path).get("filters").await;
        assert!(matches!(result, Err(StoreError::Json(_))));
    }

    #[tokio::test]
    async fn test_non_object_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("store.json");
        std::fs::write(&path, "[1, 2]").unwrap();

        let result = JsonFileStore::with_path(&path).get("filters").await;
        assert!(matches!(result, Err(StoreError::InvalidFormat { .. })));
    }

    #[tokio::test]
    async fn test_read_error_includes_file_path() {
        let temp_dir = TempDir::new().unwrap();
        // A directory cannot be read as a file.
        let store = JsonFileStore::with_path(temp_dir.path());

        let error = store.get("filters").await.unwrap_err();
        assert!(error.to_string().contains(&temp_dir.path().display().to_string()));
    }

    #[tokio::test]
    async fn test_memory_store() {
        let store = MemoryStore::new();
        assert!(store.is_empty());

        store.set("k", json!(1)).await.unwrap();
        store.set("k", json!(2)).await.unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("k").await.unwrap(), Some(json!(2)));
        assert_eq!(store.get("missing").await.unwrap(), None);
    }
}
