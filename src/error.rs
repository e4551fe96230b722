//! Error types for projectdesk.

use std::path::PathBuf;
use thiserror::Error;

/// Message used when an error response body cannot be decoded.
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred";

/// The main error type for projectdesk.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ───────────────────────────────────────────────────────
    /// No session is available for an operation that needs one.
    #[error("Not authenticated - log in first")]
    NotAuthenticated,

    /// Session renewal failed; the session has been cleared.
    #[error("Session expired. Please log in again.")]
    SessionExpired,

    /// The server rejected the credentials and no renewal was attempted
    /// (or the renewed credentials were rejected as well).
    #[error("{message}")]
    Unauthorized {
        /// Decoded `detail` from the response body.
        message: String,
    },

    /// Missing required credential field.
    #[error("Missing credential: {0}")]
    MissingCredential(String),

    // ── API ──────────────────────────────────────────────────────────────────
    /// API returned a non-2xx response.
    #[error("{message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Decoded `detail` from the response body.
        message: String,
    },

    /// A response body was required but the server returned none.
    #[error("Empty response from {0}")]
    EmptyResponse(String),

    /// A successful response body did not match the expected shape.
    #[error("Failed to decode response: {0}")]
    Decode(String),

    // ── Storage ──────────────────────────────────────────────────────────────
    /// Storage I/O error.
    #[error("Storage I/O error at {path}: {message}")]
    StorageIo {
        /// Path that caused the error.
        path: PathBuf,
        /// Error description.
        message: String,
    },

    /// Storage serialization error.
    #[error("Storage serialization error: {0}")]
    StorageSerialization(String),

    /// Keyring backend error.
    #[error("Keyring error: {0}")]
    Keyring(String),

    /// Generic storage error.
    #[error("Storage error: {0}")]
    Storage(String),

    // ── Infrastructure ───────────────────────────────────────────────────────
    /// Network/HTTP error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Request timeout.
    #[error("Request timed out")]
    Timeout,

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// General I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Returns true if the caller should route the user to a login surface.
    #[must_use]
    pub fn requires_reauth(&self) -> bool {
        matches!(
            self,
            Error::NotAuthenticated | Error::SessionExpired | Error::Unauthorized { .. }
        )
    }

    /// HTTP status carried by this error, if it came from a response.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            Error::Unauthorized { .. } => Some(401),
            _ => None,
        }
    }

    /// Classify a transport failure.
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Error::Timeout
        } else {
            Error::Network(err)
        }
    }

    /// Creates a storage I/O error.
    #[must_use]
    pub fn storage_io(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::StorageIo {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Convenience type alias.
pub type Result<T> = std::result::Result<T, Error>;
