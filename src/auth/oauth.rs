//! Google sign-in.
//!
//! The flow is a full-page redirect: the browser goes to
//! `/api/v1/auth/google/login`, the server finishes the exchange with the
//! provider, and redirects back to the front end's callback page with
//! either an `error` parameter or the new session.

use tracing::{info, warn};
use url::Url;

use crate::config::{self, DASHBOARD_ROUTE, LOGIN_ROUTE};
use crate::error::Result;
use crate::session::{Credentials, SessionMode, SessionStore, TokenPair};

/// URL the browser should be sent to. No request is issued.
pub fn google_login_url(base_url: &Url) -> Result<Url> {
    config::api_route(base_url, "/auth/google/login")
}

/// Result of landing on the OAuth callback page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackOutcome {
    Succeeded,
    Failed(String),
}

impl CallbackOutcome {
    /// Where the front end should navigate next.
    pub fn redirect(&self) -> &'static str {
        match self {
            CallbackOutcome::Succeeded => DASHBOARD_ROUTE,
            CallbackOutcome::Failed(_) => LOGIN_ROUTE,
        }
    }
}

/// Interpret the callback query string (with or without the leading `?`).
///
/// In Token mode, `access_token` and `refresh_token` parameters are saved
/// to the session. Cookie sessions arrive already set by the server.
pub async fn complete_callback(session: &SessionStore, query: &str) -> CallbackOutcome {
    let query = query.strip_prefix('?').unwrap_or(query);

    let mut error = None;
    let mut access = None;
    let mut refresh = None;
    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        match key.as_ref() {
            "error" => error = Some(value.into_owned()),
            "access_token" => access = Some(value.into_owned()),
            "refresh_token" => refresh = Some(value.into_owned()),
            _ => {}
        }
    }

    if let Some(message) = error {
        warn!(error = %message, "OAuth sign-in failed");
        return CallbackOutcome::Failed(message);
    }

    if session.mode() == SessionMode::Token {
        if let (Some(access), Some(refresh)) = (access, refresh) {
            match TokenPair::new(access, refresh) {
                Ok(pair) => session.save(Credentials::Token(pair)).await,
                Err(e) => warn!("Ignoring OAuth tokens: {}", e),
            }
        }
    }

    info!("OAuth sign-in completed");
    CallbackOutcome::Succeeded
}
