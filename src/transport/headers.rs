//! ProjectDesk API header construction.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tracing::warn;
use uuid::Uuid;

use crate::session::Credentials;

/// User-Agent sent with every request.
pub const USER_AGENT: &str = concat!("projectdesk-rs/", env!("CARGO_PKG_VERSION"));

/// Per-request correlation header.
pub const REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Headers every request starts from.
pub fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();

    headers.insert(
        reqwest::header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );

    headers.insert(
        reqwest::header::ACCEPT,
        HeaderValue::from_static("application/json"),
    );

    headers.insert(
        reqwest::header::USER_AGENT,
        HeaderValue::from_static(USER_AGENT),
    );

    headers
}

/// Build the headers for one API request.
///
/// Token sessions get `Authorization: Bearer <access_token>`. Cookie
/// sessions get nothing here; the client's cookie store supplies them.
pub fn api_headers(credentials: Option<&Credentials>) -> HeaderMap {
    let mut headers = default_headers();

    // Unique ID for request tracing
    if let Ok(id) = HeaderValue::from_str(&Uuid::new_v4().to_string()) {
        headers.insert(REQUEST_ID, id);
    }

    if let Some(token) = credentials.and_then(Credentials::bearer) {
        match bearer(token) {
            Some(value) => {
                headers.insert(reqwest::header::AUTHORIZATION, value);
            }
            None => warn!("Access token contains invalid header characters, sending without it"),
        }
    }

    headers
}

/// `Bearer <token>` header value, marked sensitive.
pub fn bearer(token: &str) -> Option<HeaderValue> {
    let mut value = HeaderValue::from_str(&format!("Bearer {}", token)).ok()?;
    value.set_sensitive(true);
    Some(value)
}
