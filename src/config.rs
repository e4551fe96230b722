//! Configuration constants, URL construction, and client settings.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;
use url::Url;

use crate::error::{Error, Result};
use crate::session::SessionMode;

/// Default API base URL.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Path prefix for versioned API routes.
pub const API_PREFIX: &str = "/api/v1";

/// Connect timeout for HTTP requests.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default timeout for a single HTTP request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Storage key for the access token.
pub const ACCESS_TOKEN_KEY: &str = "access_token";

/// Storage key for the refresh token.
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";

/// Storage key for the cookie jar of a Cookie-mode session.
pub const SESSION_COOKIES_KEY: &str = "session_cookies";

/// Navigation target for unauthenticated users.
pub const LOGIN_ROUTE: &str = "/login";

/// Navigation target for authenticated users.
pub const DASHBOARD_ROUTE: &str = "/dashboard";

/// Navigation target for the admin dashboard.
pub const ADMIN_ROUTE: &str = "/admin";

/// Environment variable prefix for overrides.
pub const ENV_PREFIX: &str = "PROJECTDESK_";

/// Parse and validate an API base URL.
///
/// Only `http` and `https` are accepted. A trailing slash is dropped so paths
/// can be appended verbatim.
pub fn parse_api_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim().trim_end_matches('/'))?;
    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(Error::Config(format!(
                "Unsupported API URL scheme '{}' (expected http or https)",
                other
            )))
        }
    }
    if url.host_str().is_none() {
        return Err(Error::Config(format!("API URL '{}' has no host", raw)));
    }
    Ok(url)
}

/// Join a base URL and an absolute path without `Url::join`'s
/// last-segment replacement.
pub fn join_path(base: &Url, path: &str) -> Result<Url> {
    let root = base.as_str().trim_end_matches('/');
    Ok(Url::parse(&format!("{}{}", root, path))?)
}

/// Returns the URL of a versioned API route such as `/projects/`.
pub fn api_route(base: &Url, route: &str) -> Result<Url> {
    join_path(base, &format!("{}{}", API_PREFIX, route))
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Where Token-Backed sessions are persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// JSON file with 0600 permissions.
    #[default]
    File,
    /// Process memory only.
    Memory,
    /// System keyring (requires the `keyring` feature).
    Keyring,
}

impl std::fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File => write!(f, "file"),
            Self::Memory => write!(f, "memory"),
            Self::Keyring => write!(f, "keyring"),
        }
    }
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(Self::File),
            "memory" => Ok(Self::Memory),
            "keyring" => Ok(Self::Keyring),
            other => Err(format!("unknown storage backend: {other}")),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    /// Overrides the default session file location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

/// Client configuration.
///
/// Loaded from a TOML file and/or `PROJECTDESK_*` environment variables.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClientConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default)]
    pub session_mode: SessionMode,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            session_mode: SessionMode::default(),
            connect_timeout_secs: default_connect_timeout_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            storage: StorageConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

const fn default_connect_timeout_secs() -> u64 {
    CONNECT_TIMEOUT.as_secs()
}

const fn default_request_timeout_secs() -> u64 {
    REQUEST_TIMEOUT.as_secs()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl ClientConfig {
    /// Defaults plus environment overrides.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_overrides(|key| std::env::var(key).ok());
        config
    }

    /// Load configuration from a TOML file, then apply environment variable
    /// overrides. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
            toml::from_str(&content)
                .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?
        } else {
            warn!(path = %path.display(), "Config file not found, using defaults");
            Self::default()
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Validated API base URL.
    pub fn base_url(&self) -> Result<Url> {
        parse_api_url(&self.api_url)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Apply `PROJECTDESK_*` overrides using the given lookup.
    ///
    /// Values that fail to parse are ignored with a warning.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let var = |name: &str| lookup(&format!("{ENV_PREFIX}{name}"));

        if let Some(val) = var("API_URL") {
            self.api_url = val;
        }
        if let Some(val) = var("SESSION_MODE") {
            match val.parse() {
                Ok(mode) => self.session_mode = mode,
                Err(e) => warn!(value = %val, "Ignoring {ENV_PREFIX}SESSION_MODE: {}", e),
            }
        }
        if let Some(val) = var("STORAGE_BACKEND") {
            match val.parse() {
                Ok(backend) => self.storage.backend = backend,
                Err(e) => warn!(value = %val, "Ignoring {ENV_PREFIX}STORAGE_BACKEND: {}", e),
            }
        }
        if let Some(val) = var("STORAGE_PATH") {
            self.storage.path = Some(PathBuf::from(val));
        }
        if let Some(val) = var("REQUEST_TIMEOUT_SECS") {
            match val.parse() {
                Ok(secs) => self.request_timeout_secs = secs,
                Err(_) => warn!(value = %val, "Ignoring {ENV_PREFIX}REQUEST_TIMEOUT_SECS"),
            }
        }
        if let Some(val) = var("LOG_LEVEL") {
            self.logging.level = val;
        }
        if let Some(val) = var("LOG_JSON") {
            self.logging.json = matches!(val.as_str(), "1" | "true" | "yes");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_parse_api_url() {
        let url = parse_api_url("http://localhost:8000/").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/");
        assert!(parse_api_url("ftp://example.com").is_err());
        assert!(parse_api_url("not a url").is_err());
    }

    #[test]
    fn test_api_route_keeps_base_path() {
        let base = parse_api_url("https://example.com/backend").unwrap();
        let url = api_route(&base, "/projects/").unwrap();
        assert_eq!(url.as_str(), "https://example.com/backend/api/v1/projects/");

        let base = parse_api_url(DEFAULT_API_URL).unwrap();
        let url = api_route(&base, "/users/me").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/v1/users/me");
    }

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.session_mode, SessionMode::Token);
        assert_eq!(config.storage.backend, StorageBackend::File);
        assert_eq!(config.request_timeout(), REQUEST_TIMEOUT);
    }

    #[test]
    fn test_toml_with_partial_sections() {
        let config: ClientConfig = toml::from_str(
            r#"
            api_url = "https://pm.example.com"
            session_mode = "cookie"

            [logging]
            json = true
            "#,
        )
        .unwrap();
        assert_eq!(config.api_url, "https://pm.example.com");
        assert_eq!(config.session_mode, SessionMode::Cookie);
        assert!(config.logging.json);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("PROJECTDESK_API_URL", "https://api.example.com"),
            ("PROJECTDESK_SESSION_MODE", "cookie"),
            ("PROJECTDESK_STORAGE_BACKEND", "bogus"),
            ("PROJECTDESK_LOG_JSON", "true"),
        ]
        .into_iter()
        .collect();

        let mut config = ClientConfig::default();
        config.apply_overrides(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.api_url, "https://api.example.com");
        assert_eq!(config.session_mode, SessionMode::Cookie);
        // Unparseable value leaves the default in place
        assert_eq!(config.storage.backend, StorageBackend::File);
        assert!(config.logging.json);
    }

    #[test]
    fn test_storage_backend_from_str() {
        assert_eq!("FILE".parse::<StorageBackend>(), Ok(StorageBackend::File));
        assert_eq!("memory".parse::<StorageBackend>(), Ok(StorageBackend::Memory));
        assert!("redis".parse::<StorageBackend>().is_err());
        assert_eq!(StorageBackend::Keyring.to_string(), "keyring");
    }
}
