//! The session store.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::{Credentials, SessionCookieJar, SessionMode, TokenPair};
use crate::config::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, SESSION_COOKIES_KEY};
use crate::storage::{MemoryTokenStorage, TokenStorage};

/// Holds the active session and persists it.
///
/// Thread-safe: shared as `Arc<SessionStore>` between the executor, the
/// refresh coordinator, and the presence oracle. None of its methods fail:
/// storage errors are logged and the in-memory copy stays authoritative for
/// the life of the process.
pub struct SessionStore {
    mode: SessionMode,
    /// In-memory copy of the token pair (Token mode only).
    tokens: RwLock<Option<TokenPair>>,
    /// Cookie jar handed to the HTTP client (Cookie mode only).
    cookies: Option<Arc<SessionCookieJar>>,
    /// Durable storage backend.
    storage: Arc<dyn TokenStorage>,
    /// Advances on every save/clear.
    epoch: AtomicU64,
}

impl SessionStore {
    /// Create a store for the given mode backed by `storage`.
    pub fn new(mode: SessionMode, storage: Arc<dyn TokenStorage>) -> Self {
        Self {
            mode,
            tokens: RwLock::new(None),
            cookies: (mode == SessionMode::Cookie).then(|| Arc::new(SessionCookieJar::new())),
            storage,
            epoch: AtomicU64::new(0),
        }
    }

    /// Create a store backed by process memory.
    pub fn in_memory(mode: SessionMode) -> Self {
        Self::new(mode, Arc::new(MemoryTokenStorage::new()))
    }

    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    /// Name of the durable storage backend.
    pub fn storage_name(&self) -> &str {
        self.storage.name()
    }

    /// The cookie jar the HTTP client must use in Cookie mode.
    pub fn cookie_jar(&self) -> Option<Arc<SessionCookieJar>> {
        self.cookies.clone()
    }

    /// Current session epoch.
    pub fn epoch(&self) -> u64 {
        self.epoch.load(Ordering::SeqCst)
    }

    /// Restore a persisted session. Returns true if one was found.
    ///
    /// A stored access token without a refresh token is discarded.
    pub async fn load(&self) -> bool {
        if let Some(jar) = &self.cookies {
            return self.load_cookies(jar).await;
        }

        let access = self.read_key(ACCESS_TOKEN_KEY).await;
        let refresh = self.read_key(REFRESH_TOKEN_KEY).await;

        let pair = match (access, refresh) {
            (Some(access), Some(refresh)) => TokenPair::new(access, refresh).ok(),
            (Some(_), None) => {
                warn!(source = self.storage.name(), "Stored access token has no refresh token, ignoring");
                None
            }
            _ => None,
        };

        let found = pair.is_some();
        let mut tokens = self.tokens.write().await;
        *tokens = pair;
        self.epoch.fetch_add(1, Ordering::SeqCst);
        if found {
            info!(source = self.storage.name(), "Loaded session from storage");
        }
        found
    }

    /// Persist new credentials.
    ///
    /// Token mode writes both keys in one backend call before swapping the
    /// in-memory pair, so readers see either the old pair or the new one.
    /// Credentials for the other mode are ignored.
    pub async fn save(&self, credentials: Credentials) {
        match (self.mode, credentials) {
            (SessionMode::Token, Credentials::Token(pair)) => {
                let mut tokens = self.tokens.write().await;
                let entries = [
                    (ACCESS_TOKEN_KEY, pair.access_token()),
                    (REFRESH_TOKEN_KEY, pair.refresh_token()),
                ];
                if let Err(e) = self.storage.save_all(&entries).await {
                    warn!(source = self.storage.name(), "Failed to persist session: {}", e);
                }
                *tokens = Some(pair);
                self.epoch.fetch_add(1, Ordering::SeqCst);
                debug!("Session saved");
            }
            (SessionMode::Cookie, Credentials::Cookie) => {
                // The server already rewrote the jar; persist what it holds
                let _tokens = self.tokens.write().await;
                self.persist_cookies().await;
                self.epoch.fetch_add(1, Ordering::SeqCst);
                debug!("Cookie session saved");
            }
            (mode, other) => {
                warn!(%mode, provided = %other.mode(), "Ignoring credentials for the inactive session mode");
            }
        }
    }

    /// Destroy all session state, in memory and in durable storage.
    pub async fn clear(&self) {
        let mut tokens = self.tokens.write().await;
        *tokens = None;
        let keys: &[&str] = match &self.cookies {
            Some(jar) => {
                jar.clear();
                &[SESSION_COOKIES_KEY]
            }
            None => &[ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY],
        };
        if let Err(e) = self.storage.remove_all(keys).await {
            warn!(source = self.storage.name(), "Failed to remove stored session: {}", e);
        }
        self.epoch.fetch_add(1, Ordering::SeqCst);
        info!("Session cleared");
    }

    /// Active credential material.
    ///
    /// Cookie mode reports [`Credentials::Cookie`] while the jar holds any
    /// cookie; the cookies themselves travel through the HTTP client.
    pub async fn current(&self) -> Option<Credentials> {
        self.snapshot().await.0
    }

    /// Credentials together with the epoch they belong to.
    ///
    /// Both are read under the same lock, so a request sent with these
    /// credentials can tell later whether the session has moved on.
    pub async fn snapshot(&self) -> (Option<Credentials>, u64) {
        let tokens = self.tokens.read().await;
        let credentials = match &self.cookies {
            Some(jar) => (!jar.is_empty()).then_some(Credentials::Cookie),
            None => tokens.clone().map(Credentials::Token),
        };
        (credentials, self.epoch())
    }

    /// Current refresh token (Token mode).
    pub async fn refresh_token(&self) -> Option<String> {
        self.tokens
            .read()
            .await
            .as_ref()
            .map(|pair| pair.refresh_token().to_string())
    }

    /// Local authentication check.
    ///
    /// `Some(true)` iff an access token is held (Token mode). In Cookie
    /// mode an empty jar is `Some(false)`; otherwise `None`, since only the
    /// server can tell whether the cookies are still good.
    pub async fn is_authenticated(&self) -> Option<bool> {
        match &self.cookies {
            Some(jar) if jar.is_empty() => Some(false),
            Some(_) => None,
            None => Some(self.tokens.read().await.is_some()),
        }
    }

    async fn load_cookies(&self, jar: &SessionCookieJar) -> bool {
        let restored = match self.read_key(SESSION_COOKIES_KEY).await {
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(cookies) => cookies,
                Err(e) => {
                    warn!(source = self.storage.name(), "Ignoring unreadable stored cookies: {}", e);
                    Default::default()
                }
            },
            None => Default::default(),
        };

        let _tokens = self.tokens.write().await;
        jar.restore(restored);
        self.epoch.fetch_add(1, Ordering::SeqCst);
        let found = !jar.is_empty();
        if found {
            info!(source = self.storage.name(), "Loaded session cookies from storage");
        }
        found
    }

    async fn persist_cookies(&self) {
        let Some(jar) = &self.cookies else {
            return;
        };
        let result = match serde_json::to_string(&jar.export()) {
            Ok(raw) => self.storage.save(SESSION_COOKIES_KEY, &raw).await,
            Err(e) => Err(e.into()),
        };
        if let Err(e) = result {
            warn!(source = self.storage.name(), "Failed to persist session cookies: {}", e);
        }
    }

    async fn read_key(&self, key: &str) -> Option<String> {
        match self.storage.load(key).await {
            Ok(value) => value.filter(|v| !v.is_empty()),
            Err(e) => {
                warn!(source = self.storage.name(), key, "Failed to read stored session: {}", e);
                None
            }
        }
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("mode", &self.mode)
            .field("storage", &self.storage.name())
            .field("epoch", &self.epoch())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, Result};
    use async_trait::async_trait;

    fn pair(access: &str, refresh: &str) -> TokenPair {
        TokenPair::new(access, refresh).unwrap()
    }

    #[tokio::test]
    async fn test_save_then_current_round_trip() {
        let store = SessionStore::in_memory(SessionMode::Token);
        assert_eq!(store.current().await, None);
        assert_eq!(store.is_authenticated().await, Some(false));

        store.save(Credentials::Token(pair("T1", "R1"))).await;

        assert_eq!(store.current().await, Some(Credentials::Token(pair("T1", "R1"))));
        assert_eq!(store.is_authenticated().await, Some(true));
        assert_eq!(store.refresh_token().await.as_deref(), Some("R1"));
    }

    #[tokio::test]
    async fn test_clear_removes_durable_entries() {
        let storage = Arc::new(MemoryTokenStorage::new());
        let store = SessionStore::new(SessionMode::Token, storage.clone());
        store.save(Credentials::Token(pair("T1", "R1"))).await;
        assert_eq!(storage.load(ACCESS_TOKEN_KEY).await.unwrap().as_deref(), Some("T1"));

        store.clear().await;

        assert_eq!(store.is_authenticated().await, Some(false));
        assert!(!storage.exists(ACCESS_TOKEN_KEY).await.unwrap());
        assert!(!storage.exists(REFRESH_TOKEN_KEY).await.unwrap());
    }

    #[tokio::test]
    async fn test_load_restores_persisted_pair() {
        let storage = Arc::new(MemoryTokenStorage::new());
        storage.save(ACCESS_TOKEN_KEY, "T9").await.unwrap();
        storage.save(REFRESH_TOKEN_KEY, "R9").await.unwrap();

        let store = SessionStore::new(SessionMode::Token, storage);
        assert!(store.load().await);
        assert_eq!(store.current().await, Some(Credentials::Token(pair("T9", "R9"))));
    }

    #[tokio::test]
    async fn test_load_rejects_access_without_refresh() {
        let storage = Arc::new(MemoryTokenStorage::new());
        storage.save(ACCESS_TOKEN_KEY, "T9").await.unwrap();

        let store = SessionStore::new(SessionMode::Token, storage);
        assert!(!store.load().await);
        assert_eq!(store.is_authenticated().await, Some(false));
    }

    #[tokio::test]
    async fn test_epoch_advances_on_save_and_clear() {
        let store = SessionStore::in_memory(SessionMode::Token);
        let start = store.epoch();
        store.save(Credentials::Token(pair("T1", "R1"))).await;
        assert_eq!(store.epoch(), start + 1);
        store.clear().await;
        assert_eq!(store.epoch(), start + 2);
    }

    #[tokio::test]
    async fn test_cookie_mode_answers_locally_only_when_empty() {
        let store = SessionStore::in_memory(SessionMode::Cookie);
        assert_eq!(store.is_authenticated().await, Some(false));
        assert_eq!(store.current().await, None);

        let jar = store.cookie_jar().unwrap();
        jar.apply_set_cookie("access_token=C1; Path=/; HttpOnly");
        assert_eq!(store.is_authenticated().await, None);
        assert_eq!(store.current().await, Some(Credentials::Cookie));

        // Token material is never held in cookie mode
        store.save(Credentials::Token(pair("T1", "R1"))).await;
        assert_eq!(store.refresh_token().await, None);
    }

    #[tokio::test]
    async fn test_cookie_clear_empties_jar_and_storage() {
        let storage = Arc::new(MemoryTokenStorage::new());
        let store = SessionStore::new(SessionMode::Cookie, storage.clone());
        let jar = store.cookie_jar().unwrap();

        jar.apply_set_cookie("access_token=C1; Path=/; HttpOnly");
        store.save(Credentials::Cookie).await;
        assert!(storage.exists(SESSION_COOKIES_KEY).await.unwrap());

        store.clear().await;

        assert!(jar.is_empty());
        assert_eq!(store.is_authenticated().await, Some(false));
        assert!(!storage.exists(SESSION_COOKIES_KEY).await.unwrap());
    }

    #[tokio::test]
    async fn test_cookie_session_survives_reload() {
        let storage = Arc::new(MemoryTokenStorage::new());
        let first = SessionStore::new(SessionMode::Cookie, storage.clone());
        first
            .cookie_jar()
            .unwrap()
            .apply_set_cookie("access_token=C1; Path=/; HttpOnly");
        first.save(Credentials::Cookie).await;

        let second = SessionStore::new(SessionMode::Cookie, storage);
        assert!(second.load().await);
        assert_eq!(
            second.cookie_jar().unwrap().export().get("access_token").map(String::as_str),
            Some("C1")
        );
    }

    struct FailingStorage;

    #[async_trait]
    impl TokenStorage for FailingStorage {
        async fn load(&self, _key: &str) -> Result<Option<String>> {
            Err(Error::Storage("disk on fire".into()))
        }
        async fn save(&self, _key: &str, _value: &str) -> Result<()> {
            Err(Error::Storage("disk on fire".into()))
        }
        async fn remove(&self, _key: &str) -> Result<()> {
            Err(Error::Storage("disk on fire".into()))
        }
        fn name(&self) -> &str {
            "failing"
        }
    }

    #[tokio::test]
    async fn test_storage_failures_never_surface() {
        let store = SessionStore::new(SessionMode::Token, Arc::new(FailingStorage));
        assert!(!store.load().await);

        store.save(Credentials::Token(pair("T1", "R1"))).await;
        assert_eq!(store.is_authenticated().await, Some(true));

        store.clear().await;
        assert_eq!(store.is_authenticated().await, Some(false));
    }
}
