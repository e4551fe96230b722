//! In-memory token storage.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::TokenStorage;
use crate::error::Result;

/// In-memory key/value storage, for tests and sessions that should not
/// outlive the process.
pub struct MemoryTokenStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryTokenStorage {
    /// Create a new empty in-memory storage.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Create storage pre-populated with entries.
    pub fn with_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            entries: RwLock::new(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            ),
        }
    }
}

impl Default for MemoryTokenStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenStorage for MemoryTokenStorage {
    async fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn save(&self, key: &str, value: &str) -> Result<()> {
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

    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.entries.read().await.contains_key(key))
    }

    async fn save_all(&self, entries: &[(&str, &str)]) -> Result<()> {
        let mut map = self.entries.write().await;
        for (key, value) in entries {
            map.insert(key.to_string(), value.to_string());
        }
        Ok(())
    }

    async fn remove_all(&self, keys: &[&str]) -> Result<()> {
        let mut map = self.entries.write().await;
        for key in keys {
            map.remove(*key);
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_storage() {
        let storage = MemoryTokenStorage::new();

        assert!(storage.load("access_token").await.unwrap().is_none());
        assert!(!storage.exists("access_token").await.unwrap());

        storage.save("access_token", "T1").await.unwrap();

        assert!(storage.exists("access_token").await.unwrap());
        assert_eq!(storage.load("access_token").await.unwrap().as_deref(), Some("T1"));

        storage.remove("access_token").await.unwrap();
        assert!(!storage.exists("access_token").await.unwrap());
    }

    #[tokio::test]
    async fn test_save_all_and_remove_all() {
        let storage = MemoryTokenStorage::with_entries([("other", "keep")]);
        storage
            .save_all(&[("access_token", "T2"), ("refresh_token", "R2")])
            .await
            .unwrap();
        assert_eq!(storage.load("refresh_token").await.unwrap().as_deref(), Some("R2"));

        storage
            .remove_all(&["access_token", "refresh_token"])
            .await
            .unwrap();
        assert!(!storage.exists("access_token").await.unwrap());
        assert!(storage.exists("other").await.unwrap());
    }
}
