//! Opaque string key/value persistence.
//!
//! The engine never assumes anything about how the store is backed beyond
//! get/set/remove on string keys; the file-backed implementation survives
//! process restarts.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

/// Raw element-set text as last fetched.
pub const TLE_TEXT_KEY: &str = "iridium_tle_data";
/// Fetch epoch of the element text, decimal milliseconds.
pub const TLE_FETCHED_AT_KEY: &str = "iridium_tle_time";
/// Persisted ground location, JSON `{latitude, longitude}`.
pub const USER_LOCATION_KEY: &str = "user_location";

#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Option<String>;
    async fn set(&self, key: &str, value: &str) -> Result<()>;
    async fn remove(&self, key: &str) -> Result<()>;
}

/// In-process store, used by tests and as a throwaway default.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn get(&self, key: &str) -> Option<String> {
        self.entries.read().await.get(key).cloned()
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}

const STORE_FILE: &str = "tracker_cache.json";

/// File-backed store: one JSON object per cache directory.
pub struct FileStore {
    cache_dir: PathBuf,
    // set/remove do read-modify-write on the backing file
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new<P: AsRef<Path>>(cache_dir: P) -> Self {
        Self {
            cache_dir: cache_dir.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    async fn ensure_cache_dir(&self) -> Result<()> {
        if !self.cache_dir.exists() {
            fs::create_dir_all(&self.cache_dir)
                .await
                .context("Failed to create cache directory")?;
            info!("Created cache directory: {:?}", self.cache_dir);
        }
        Ok(())
    }

    fn store_path(&self) -> PathBuf {
        self.cache_dir.join(STORE_FILE)
    }

    async fn load_entries(&self) -> Result<HashMap<String, String>> {
        let path = self.store_path();
        if !path.exists() {
            debug!("Store file does not exist yet: {:?}", path);
            return Ok(HashMap::new());
        }
        let content = fs::read_to_string(&path)
            .await
            .context("Failed to read store file")?;
        serde_json::from_str(&content).context("Failed to parse store file")
    }

    async fn save_entries(&self, entries: &HashMap<String, String>) -> Result<()> {
        self.ensure_cache_dir().await?;
        let content =
            serde_json::to_string_pretty(entries).context("Failed to serialize store")?;
        fs::write(self.store_path(), content)
            .await
            .context("Failed to write store file")?;
        Ok(())
    }
}

#[async_trait]
impl CacheStore for FileStore {
    async fn get(&self, key: &str) -> Option<String> {
        match self.load_entries().await {
            Ok(entries) => entries.get(key).cloned(),
            Err(e) => {
                debug!("Store read failed for '{}': {}", key, e);
                None
            }
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.load_entries().await.unwrap_or_default();
        entries.insert(key.to_string(), value.to_string());
        self.save_entries(&entries).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.load_entries().await.unwrap_or_default();
        if entries.remove(key).is_some() {
            self.save_entries(&entries).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn memory_store_round_trip() {
        let store = MemoryStore::new();
        assert_eq!(store.get("k").await, None);
        store.set("k", "v").await.unwrap();
        assert_eq!(store.get("k").await.as_deref(), Some("v"));
        store.remove("k").await.unwrap();
        assert_eq!(store.get("k").await, None);
    }

    #[tokio::test]
    async fn file_store_persists_across_instances() {
        let temp_dir = TempDir::new().unwrap();
        {
            let store = FileStore::new(temp_dir.path());
            store.set(TLE_TEXT_KEY, "three lines").await.unwrap();
            store.set(TLE_FETCHED_AT_KEY, "1700000000000").await.unwrap();
        }

        let reopened = FileStore::new(temp_dir.path());
        assert_eq!(reopened.get(TLE_TEXT_KEY).await.as_deref(), Some("three lines"));
        assert_eq!(
            reopened.get(TLE_FETCHED_AT_KEY).await.as_deref(),
            Some("1700000000000")
        );
    }

    #[tokio::test]
    async fn file_store_overwrites_and_removes() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path());

        store.set("key", "old").await.unwrap();
        store.set("key", "new").await.unwrap();
        assert_eq!(store.get("key").await.as_deref(), Some("new"));

        store.remove("key").await.unwrap();
        assert_eq!(store.get("key").await, None);
    }
}
