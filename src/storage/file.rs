//! File-based token storage with secure permissions.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::TokenStorage;
use crate::error::{Error, Result};

/// File-based key/value storage: one JSON object, written with 0600
/// permissions via a temp file and rename so a crash never leaves a
/// half-written session behind.
pub struct FileTokenStorage {
    path: PathBuf,
}

impl FileTokenStorage {
    /// Create storage at the specified path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Create storage at the default path: `~/.config/projectdesk/session.json`
    pub fn default_path() -> Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| Error::Config("Cannot determine config directory".into()))?;
        let path = config_dir.join("projectdesk").join("session.json");
        Ok(Self::new(path))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| Error::storage_io(&self.path, e.to_string()))?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&content).map_err(|e| Error::StorageSerialization(e.to_string()))
    }

    /// Current contents for a read-modify-write. An undecodable file is
    /// replaced rather than blocking every later write.
    fn read_for_update(&self) -> Result<BTreeMap<String, String>> {
        match self.read_all() {
            Err(Error::StorageSerialization(e)) => {
                warn!(path = %self.path.display(), "Overwriting unreadable session file: {}", e);
                Ok(BTreeMap::new())
            }
            other => other,
        }
    }

    fn write_all(&self, data: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::storage_io(parent, e.to_string()))?;
        }

        let content = serde_json::to_string_pretty(data)
            .map_err(|e| Error::StorageSerialization(e.to_string()))?;

        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, &content).map_err(|e| Error::storage_io(&tmp, e.to_string()))?;

        // Set 0600 permissions on Unix before the file becomes visible
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&tmp, perms)
                .map_err(|e| Error::storage_io(&tmp, format!("chmod: {}", e)))?;
        }

        std::fs::rename(&tmp, &self.path)
            .map_err(|e| Error::storage_io(&self.path, format!("rename: {}", e)))?;

        debug!(path = %self.path.display(), "Session file written");
        Ok(())
    }
}

#[async_trait]
impl TokenStorage for FileTokenStorage {
    async fn load(&self, key: &str) -> Result<Option<String>> {
        let data = self.read_all()?;
        Ok(data.get(key).cloned())
    }

    async fn save(&self, key: &str, value: &str) -> Result<()> {
        self.save_all(&[(key, value)]).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.remove_all(&[key]).await
    }

    async fn save_all(&self, entries: &[(&str, &str)]) -> Result<()> {
        let mut data = self.read_for_update()?;
        for (key, value) in entries {
            data.insert(key.to_string(), value.to_string());
        }
        self.write_all(&data)
    }

    async fn remove_all(&self, keys: &[&str]) -> Result<()> {
        if !self.path.exists() {
            return Ok(());
        }
        let mut data = self.read_for_update()?;
        for key in keys {
            data.remove(*key);
        }
        self.write_all(&data)
    }

    fn name(&self) -> &str {
        "file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_file_storage_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileTokenStorage::new(dir.path().join("nested").join("session.json"));

        assert!(storage.load("access_token").await.unwrap().is_none());

        storage
            .save_all(&[("access_token", "T1"), ("refresh_token", "R1")])
            .await
            .unwrap();

        // A fresh handle sees the persisted values
        let reopened = FileTokenStorage::new(storage.path());
        assert_eq!(reopened.load("access_token").await.unwrap().as_deref(), Some("T1"));
        assert_eq!(reopened.load("refresh_token").await.unwrap().as_deref(), Some("R1"));

        reopened
            .remove_all(&["access_token", "refresh_token"])
            .await
            .unwrap();
        assert!(!storage.exists("refresh_token").await.unwrap());
        assert!(!storage.path().with_extension("json.tmp").exists());
    }

    #[tokio::test]
    async fn test_remove_without_file_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileTokenStorage::new(dir.path().join("missing.json"));
        storage.remove("access_token").await.unwrap();
        assert!(!storage.path().exists());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_a_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{not json").unwrap();

        let storage = FileTokenStorage::new(&path);
        assert!(matches!(
            storage.load("access_token").await,
            Err(Error::StorageSerialization(_))
        ));
    }

    #[tokio::test]
    async fn test_corrupt_file_is_replaced_on_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{not json").unwrap();
        let storage = FileTokenStorage::new(&path);

        storage
            .remove_all(&["access_token", "refresh_token"])
            .await
            .unwrap();
        assert!(storage.load("access_token").await.unwrap().is_none());

        std::fs::write(&path, "{not json").unwrap();
        storage.save("access_token", "T2").await.unwrap();
        assert_eq!(storage.load("access_token").await.unwrap().as_deref(), Some("T2"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_file_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let storage = FileTokenStorage::new(dir.path().join("session.json"));
        storage.save("access_token", "T1").await.unwrap();

        let mode = std::fs::metadata(storage.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
