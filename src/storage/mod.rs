//! Durable key/value storage for session tokens.
//!
//! Provides the [`TokenStorage`] trait and implementations:
//! - [`FileTokenStorage`] - JSON file with 0600 permissions
//! - [`MemoryTokenStorage`] - In-memory (testing, ephemeral sessions)
//! - [`CallbackStorage`] - User-provided callbacks
//! - [`KeyringTokenStorage`] - System keyring (feature-gated)

mod callback;
mod file;
mod memory;

#[cfg(feature = "keyring")]
mod keyring;

use async_trait::async_trait;

pub use callback::CallbackStorage;
pub use file::FileTokenStorage;
pub use memory::MemoryTokenStorage;

#[cfg(feature = "keyring")]
pub use keyring::KeyringTokenStorage;

use std::sync::Arc;

use crate::config::{StorageBackend, StorageConfig};
use crate::error::Result;

/// Trait for string key/value storage backends.
///
/// The session store keeps its tokens under the `access_token` and
/// `refresh_token` keys. Backends that can write several keys at once
/// should override [`save_all`](TokenStorage::save_all) and
/// [`remove_all`](TokenStorage::remove_all).
#[async_trait]
pub trait TokenStorage: Send + Sync {
    /// Load the value stored under `key`.
    async fn load(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    async fn save(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<()>;

    /// Check if a value exists for `key`.
    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.load(key).await?.is_some())
    }

    /// Store several entries.
    async fn save_all(&self, entries: &[(&str, &str)]) -> Result<()> {
        for (key, value) in entries {
            self.save(key, value).await?;
        }
        Ok(())
    }

    /// Remove several keys.
    async fn remove_all(&self, keys: &[&str]) -> Result<()> {
        for key in keys {
            self.remove(key).await?;
        }
        Ok(())
    }

    /// Name of this storage backend.
    fn name(&self) -> &str {
        "unknown"
    }
}

/// Blanket impl for `Arc<T>`.
#[async_trait]
impl<T: TokenStorage + ?Sized> TokenStorage for Arc<T> {
    async fn load(&self, key: &str) -> Result<Option<String>> {
        (**self).load(key).await
    }
    async fn save(&self, key: &str, value: &str) -> Result<()> {
        (**self).save(key, value).await
    }
    async fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key).await
    }
    async fn exists(&self, key: &str) -> Result<bool> {
        (**self).exists(key).await
    }
    async fn save_all(&self, entries: &[(&str, &str)]) -> Result<()> {
        (**self).save_all(entries).await
    }
    async fn remove_all(&self, keys: &[&str]) -> Result<()> {
        (**self).remove_all(keys).await
    }
    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Blanket impl for `Box<T>`.
#[async_trait]
impl<T: TokenStorage + ?Sized> TokenStorage for Box<T> {
    async fn load(&self, key: &str) -> Result<Option<String>> {
        (**self).load(key).await
    }
    async fn save(&self, key: &str, value: &str) -> Result<()> {
        (**self).save(key, value).await
    }
    async fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key).await
    }
    async fn exists(&self, key: &str) -> Result<bool> {
        (**self).exists(key).await
    }
    async fn save_all(&self, entries: &[(&str, &str)]) -> Result<()> {
        (**self).save_all(entries).await
    }
    async fn remove_all(&self, keys: &[&str]) -> Result<()> {
        (**self).remove_all(keys).await
    }
    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Open the backend described by `config`.
pub fn from_config(config: &StorageConfig) -> Result<Arc<dyn TokenStorage>> {
    match config.backend {
        StorageBackend::Memory => Ok(Arc::new(MemoryTokenStorage::new())),
        StorageBackend::File => {
            let storage = match &config.path {
                Some(path) => FileTokenStorage::new(path),
                None => FileTokenStorage::default_path()?,
            };
            Ok(Arc::new(storage))
        }
        #[cfg(feature = "keyring")]
        StorageBackend::Keyring => Ok(Arc::new(KeyringTokenStorage::new())),
        #[cfg(not(feature = "keyring"))]
        StorageBackend::Keyring => Err(crate::error::Error::Config(
            "keyring storage requires the `keyring` feature".into(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_selects_backend() {
        let memory = from_config(&StorageConfig {
            backend: StorageBackend::Memory,
            path: None,
        })
        .unwrap();
        assert_eq!(memory.name(), "memory");

        let dir = tempfile::tempdir().unwrap();
        let file = from_config(&StorageConfig {
            backend: StorageBackend::File,
            path: Some(dir.path().join("session.json")),
        })
        .unwrap();
        assert_eq!(file.name(), "file");
    }
}
