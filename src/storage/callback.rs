//! Callback-based token storage for user-provided persistence.

use async_trait::async_trait;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use super::TokenStorage;
use crate::error::Result;

type BoxFuture<T> = Pin<Box<dyn Future<Output = Result<T>> + Send>>;

type LoadFn = dyn Fn(String) -> BoxFuture<Option<String>> + Send + Sync;
type SaveFn = dyn Fn(String, String) -> BoxFuture<()> + Send + Sync;
type RemoveFn = dyn Fn(String) -> BoxFuture<()> + Send + Sync;

/// Storage backed by user-provided async callbacks.
///
/// Useful when the embedding application already owns a settings store.
pub struct CallbackStorage {
    load_fn: Arc<LoadFn>,
    save_fn: Arc<SaveFn>,
    remove_fn: Arc<RemoveFn>,
}

impl CallbackStorage {
    /// Create from async closures.
    pub fn new<L, S, R>(load: L, save: S, remove: R) -> Self
    where
        L: Fn(String) -> BoxFuture<Option<String>> + Send + Sync + 'static,
        S: Fn(String, String) -> BoxFuture<()> + Send + Sync + 'static,
        R: Fn(String) -> BoxFuture<()> + Send + Sync + 'static,
    {
        Self {
            load_fn: Arc::new(load),
            save_fn: Arc::new(save),
            remove_fn: Arc::new(remove),
        }
    }
}

#[async_trait]
impl TokenStorage for CallbackStorage {
    async fn load(&self, key: &str) -> Result<Option<String>> {
        (self.load_fn)(key.to_string()).await
    }

    async fn save(&self, key: &str, value: &str) -> Result<()> {
        (self.save_fn)(key.to_string(), value.to_string()).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        (self.remove_fn)(key.to_string()).await
    }

    fn name(&self) -> &str {
        "callback"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[tokio::test]
    async fn test_callbacks_are_invoked() {
        let map: Arc<Mutex<HashMap<String, String>>> = Arc::default();

        let load_map = map.clone();
        let save_map = map.clone();
        let remove_map = map.clone();
        let storage = CallbackStorage::new(
            move |key| {
                let value = load_map.lock().unwrap().get(&key).cloned();
                Box::pin(async move { Ok(value) })
            },
            move |key, value| {
                save_map.lock().unwrap().insert(key, value);
                Box::pin(async { Ok(()) })
            },
            move |key| {
                remove_map.lock().unwrap().remove(&key);
                Box::pin(async { Ok(()) })
            },
        );

        storage
            .save_all(&[("access_token", "T1"), ("refresh_token", "R1")])
            .await
            .unwrap();
        assert_eq!(map.lock().unwrap().len(), 2);
        assert_eq!(storage.load("access_token").await.unwrap().as_deref(), Some("T1"));

        storage.remove("access_token").await.unwrap();
        assert!(!storage.exists("access_token").await.unwrap());
        assert_eq!(storage.name(), "callback");
    }
}
