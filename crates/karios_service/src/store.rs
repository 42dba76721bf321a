//! Flat JSON key-value store.
//!
//! The whole file is loaded into memory once and rewritten on every mutation.
//! Writes go to a sibling temp file that is renamed over the target, on the
//! blocking pool so readers are never stalled behind disk I/O.

use crate::error::{Error, Result};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use tokio::sync::Mutex;
use tracing::{debug, info};

/// String -> string mapping persisted as a single JSON object.
#[derive(Debug)]
pub struct JsonStore {
    path: PathBuf,
    entries: RwLock<HashMap<String, String>>,
    /// Serializes mutations; held across the persist step.
    writer: Mutex<()>,
}

impl JsonStore {
    /// Open the store at `path`, creating it with `seed` if the file is absent.
    ///
    /// Fails if the existing file is not a JSON object of strings.
    pub fn open(path: impl Into<PathBuf>, seed: &[(&str, &str)]) -> Result<Self> {
        let path = path.into();

        if !path.exists() {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            let seed: HashMap<String, String> = seed
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect();
            Self::save_all(&path, &seed)?;
            info!("Created {} with {} entries", path.display(), seed.len());
        }

        let entries = Self::load(&path)?;
        info!("Loaded {} entries from {}", entries.len(), path.display());

        Ok(Self {
            path,
            entries: RwLock::new(entries),
            writer: Mutex::new(()),
        })
    }

    /// Read the whole file into a mapping.
    pub fn load(path: &Path) -> Result<HashMap<String, String>> {
        let json = fs::read_to_string(path)?;
        let entries = serde_json::from_str(&json)?;
        Ok(entries)
    }

    /// Overwrite the file with `entries`.
    pub fn save_all(path: &Path, entries: &HashMap<String, String>) -> Result<()> {
        let json = serde_json::to_vec(entries)?;
        let tmp = temp_path(path);

        fs::write(&tmp, json)?;
        fs::rename(&tmp, path)?;
        debug!("Wrote {} entries to {}", entries.len(), path.display());

        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.read().get(key).cloned()
    }

    /// All keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.read().keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Insert or overwrite `key`, then persist.
    ///
    /// The in-memory map is left untouched if the write fails.
    pub async fn insert(&self, key: &str, value: &str) -> Result<()> {
        let _writer = self.writer.lock().await;

        let mut next = self.read().clone();
        next.insert(key.to_string(), value.to_string());

        let next = self.persist(next).await?;
        *self.write() = next;
        Ok(())
    }

    /// Insert `key` only if absent, then persist. Returns whether it was inserted.
    pub async fn insert_new(&self, key: &str, value: &str) -> Result<bool> {
        let _writer = self.writer.lock().await;

        if self.read().contains_key(key) {
            return Ok(false);
        }
        let mut next = self.read().clone();
        next.insert(key.to_string(), value.to_string());

        let next = self.persist(next).await?;
        *self.write() = next;
        Ok(true)
    }

    /// Write `entries` to disk on the blocking pool and hand them back.
    async fn persist(&self, entries: HashMap<String, String>) -> Result<HashMap<String, String>> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || {
            Self::save_all(&path, &entries)?;
            Ok(entries)
        })
        .await
        .map_err(|e| Error::Internal(format!("persist task failed: {}", e)))?
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, String>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<String, String>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// `dir/name.json` -> `dir/.name.json.tmp`
fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{}.tmp", name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use tempfile::TempDir;

    #[test]
    fn test_open_creates_seeded_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("brain.json");

        let store = JsonStore::open(&path, &[("a", "1"), ("b", "2")]).unwrap();
        assert!(path.exists());
        assert_eq!(store.len(), 2);
        assert_eq!(store.get("a"), Some("1".to_string()));

        let on_disk = JsonStore::load(&path).unwrap();
        assert_eq!(on_disk.get("b"), Some(&"2".to_string()));
    }

    #[test]
    fn test_open_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("users.json");

        let store = JsonStore::open(&path, &[]).unwrap();
        assert!(store.is_empty());
        assert!(path.exists());
    }

    #[test]
    fn test_open_keeps_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("brain.json");
        fs::write(&path, r#"{"x": "y"}"#).unwrap();

        let store = JsonStore::open(&path, &[("a", "1")]).unwrap();
        assert_eq!(store.keys(), vec!["x"]);
    }

    #[test]
    fn test_open_corrupt_file_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("brain.json");
        fs::write(&path, "{not json").unwrap();

        let err = JsonStore::open(&path, &[]).unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[tokio::test]
    async fn test_insert_persists() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("brain.json");

        let store = JsonStore::open(&path, &[]).unwrap();
        store.insert("foo", "bar").await.unwrap();
        store.insert("foo", "baz").await.unwrap();
        drop(store);

        let reopened = JsonStore::open(&path, &[]).unwrap();
        assert_eq!(reopened.get("foo"), Some("baz".to_string()));
        assert!(!dir.path().join(".brain.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_insert_new_rejects_existing() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::open(dir.path().join("users.json"), &[]).unwrap();

        assert!(store.insert_new("alice", "pw1").await.unwrap());
        assert!(!store.insert_new("alice", "pw2").await.unwrap());
        assert_eq!(store.get("alice"), Some("pw1".to_string()));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_inserts_all_persist() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("users.json");
        let store = std::sync::Arc::new(JsonStore::open(&path, &[]).unwrap());

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move {
                    store.insert_new(&format!("user{}", i), "pw").await.unwrap()
                })
            })
            .collect();
        for handle in handles {
            assert!(handle.await.unwrap());
        }

        assert_eq!(store.len(), 16);
        assert_eq!(JsonStore::load(&path).unwrap().len(), 16);
    }

    #[test]
    fn test_keys_sorted() {
        let dir = TempDir::new().unwrap();
        let store =
            JsonStore::open(dir.path().join("b.json"), &[("c", ""), ("a", ""), ("b", "")]).unwrap();
        assert_eq!(store.keys(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_temp_path() {
        assert_eq!(
            temp_path(Path::new("/data/users.json")),
            PathBuf::from("/data/.users.json.tmp")
        );
    }
}
