//! Session state: the active credential material and its persistence.
//!
//! A deployment picks one [`SessionMode`]:
//! - [`SessionMode::Token`] keeps an access/refresh token pair on the client
//!   and persists it through a [`TokenStorage`](crate::storage::TokenStorage)
//!   backend under the `access_token` / `refresh_token` keys.
//! - [`SessionMode::Cookie`] leaves all session material in httpOnly cookies
//!   held in the session's [`SessionCookieJar`], which the HTTP client uses
//!   as its cookie store and which is persisted under `session_cookies`.

mod cookies;
mod store;

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::auth::TokenResponse;

pub use cookies::SessionCookieJar;
pub use store::SessionStore;

/// Session transport strategy, fixed at client construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionMode {
    /// Bearer tokens held and refreshed by the client.
    #[default]
    Token,
    /// httpOnly cookies managed by the server.
    Cookie,
}

impl std::fmt::Display for SessionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Token => write!(f, "token"),
            Self::Cookie => write!(f, "cookie"),
        }
    }
}

impl FromStr for SessionMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "token" | "bearer" => Ok(Self::Token),
            "cookie" | "cookies" => Ok(Self::Cookie),
            other => Err(format!("unknown session mode: {other}")),
        }
    }
}

/// An access/refresh token pair.
///
/// Both tokens are always present; construction rejects an empty refresh
/// token so a stored access token can never lack its refresh token.
#[derive(Clone, PartialEq, Eq)]
pub struct TokenPair {
    access_token: String,
    refresh_token: String,
}

impl TokenPair {
    /// Build a pair, rejecting empty tokens.
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Result<Self> {
        let access_token = access_token.into();
        let refresh_token = refresh_token.into();
        if access_token.is_empty() {
            return Err(Error::MissingCredential("access_token".into()));
        }
        if refresh_token.is_empty() {
            return Err(Error::MissingCredential("refresh_token".into()));
        }
        Ok(Self {
            access_token,
            refresh_token,
        })
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    pub fn refresh_token(&self) -> &str {
        &self.refresh_token
    }
}

impl TryFrom<&TokenResponse> for TokenPair {
    type Error = Error;

    fn try_from(response: &TokenResponse) -> Result<Self> {
        Self::new(response.access_token.clone(), response.refresh_token.clone())
    }
}

impl std::fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenPair")
            .field("access_token", &"[redacted]")
            .field("refresh_token", &"[redacted]")
            .finish()
    }
}

/// Credential material for the active session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Server-managed cookies; nothing client-visible.
    Cookie,
    /// Client-held bearer tokens.
    Token(TokenPair),
}

impl Credentials {
    pub fn mode(&self) -> SessionMode {
        match self {
            Self::Cookie => SessionMode::Cookie,
            Self::Token(_) => SessionMode::Token,
        }
    }

    /// Access token to send as `Authorization: Bearer`, if any.
    pub fn bearer(&self) -> Option<&str> {
        match self {
            Self::Cookie => None,
            Self::Token(pair) => Some(pair.access_token()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_pair_requires_refresh_token() {
        assert!(TokenPair::new("T1", "R1").is_ok());
        assert!(matches!(
            TokenPair::new("T1", ""),
            Err(Error::MissingCredential(field)) if field == "refresh_token"
        ));
        assert!(TokenPair::new("", "R1").is_err());
    }

    #[test]
    fn test_token_pair_debug_redacts() {
        let pair = TokenPair::new("secret-access", "secret-refresh").unwrap();
        let debug = format!("{:?}", pair);
        assert!(!debug.contains("secret"));
    }

    #[test]
    fn test_session_mode_from_str() {
        assert_eq!("token".parse::<SessionMode>(), Ok(SessionMode::Token));
        assert_eq!("Cookie".parse::<SessionMode>(), Ok(SessionMode::Cookie));
        assert!("jwt-in-url".parse::<SessionMode>().is_err());
        assert_eq!(SessionMode::Cookie.to_string(), "cookie");
    }

    #[test]
    fn test_credentials_bearer() {
        let pair = TokenPair::new("T1", "R1").unwrap();
        assert_eq!(Credentials::Token(pair).bearer(), Some("T1"));
        assert_eq!(Credentials::Cookie.bearer(), None);
        assert_eq!(Credentials::Cookie.mode(), SessionMode::Cookie);
    }
}
