//! System keyring-based token storage (feature-gated).

use async_trait::async_trait;
use tracing::debug;

use super::TokenStorage;
use crate::error::{Error, Result};

const SERVICE_NAME: &str = "projectdesk";

/// Token storage using the system keyring (Secret Service / Keychain /
/// Credential Manager). Each key becomes one keyring entry.
pub struct KeyringTokenStorage {
    service: String,
}

impl KeyringTokenStorage {
    /// Create a new keyring storage under the default service name.
    pub fn new() -> Self {
        Self::with_service(SERVICE_NAME)
    }

    /// Use a custom service name, e.g. one per API deployment.
    pub fn with_service(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    fn entry(&self, key: &str) -> Result<keyring::Entry> {
        keyring::Entry::new(&self.service, key).map_err(|e| Error::Keyring(e.to_string()))
    }
}

impl Default for KeyringTokenStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenStorage for KeyringTokenStorage {
    async fn load(&self, key: &str) -> Result<Option<String>> {
        match self.entry(key)?.get_password() {
            Ok(value) => {
                debug!(key, "Loaded from keyring");
                Ok(Some(value))
            }
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(Error::Keyring(e.to_string())),
        }
    }

    async fn save(&self, key: &str, value: &str) -> Result<()> {
        self.entry(key)?
            .set_password(value)
            .map_err(|e| Error::Keyring(e.to_string()))?;
        debug!(key, "Saved to keyring");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        match self.entry(key)?.delete_credential() {
            Ok(()) => {
                debug!(key, "Removed from keyring");
                Ok(())
            }
            Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(Error::Keyring(e.to_string())),
        }
    }

    fn name(&self) -> &str {
        "keyring"
    }
}
