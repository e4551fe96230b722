//! Cookie jar for Cookie-mode sessions.

use std::collections::BTreeMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use reqwest::cookie::CookieStore;
use reqwest::header::HeaderValue;
use tracing::{debug, warn};
use url::Url;

/// Cookie jar owned by the session.
///
/// The client talks to a single API host, so cookies are kept by name only;
/// domain and path attributes are ignored. The jar can be emptied on
/// logout and exported/restored so a session survives process restarts.
#[derive(Debug, Default)]
pub struct SessionCookieJar {
    cookies: RwLock<BTreeMap<String, String>>,
}

impl SessionCookieJar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one `Set-Cookie` header value.
    ///
    /// An empty value, `Max-Age<=0`, or an `Expires` in the past removes the
    /// cookie.
    pub fn apply_set_cookie(&self, header: &str) {
        let mut parts = header.split(';');
        let Some((name, value)) = parts.next().and_then(|nv| nv.split_once('=')) else {
            warn!("Ignoring malformed Set-Cookie header");
            return;
        };
        let name = name.trim();
        let value = value.trim().trim_matches('"');
        if name.is_empty() {
            return;
        }

        let expired = parts.any(|attr| {
            let Some((key, val)) = attr.split_once('=') else {
                return false;
            };
            let val = val.trim();
            match key.trim().to_ascii_lowercase().as_str() {
                "max-age" => val.parse::<i64>().map(|age| age <= 0).unwrap_or(false),
                "expires" => DateTime::parse_from_rfc2822(val)
                    .map(|at| at.with_timezone(&Utc) <= Utc::now())
                    .unwrap_or(false),
                _ => false,
            }
        });

        let mut cookies = self.write();
        if expired || value.is_empty() {
            cookies.remove(name);
            debug!(cookie = name, "Cookie removed");
        } else {
            cookies.insert(name.to_string(), value.to_string());
            debug!(cookie = name, "Cookie stored");
        }
    }

    /// Forget every cookie.
    pub fn clear(&self) {
        self.write().clear();
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Copy of the current cookies, by name.
    pub fn export(&self) -> BTreeMap<String, String> {
        self.read().clone()
    }

    /// Replace the jar's contents.
    pub fn restore(&self, cookies: BTreeMap<String, String>) {
        *self.write() = cookies;
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, BTreeMap<String, String>> {
        self.cookies.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, BTreeMap<String, String>> {
        self.cookies.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl CookieStore for SessionCookieJar {
    fn set_cookies(&self, cookie_headers: &mut dyn Iterator<Item = &HeaderValue>, _url: &Url) {
        for header in cookie_headers {
            match header.to_str() {
                Ok(value) => self.apply_set_cookie(value),
                Err(_) => warn!("Ignoring non-ASCII Set-Cookie header"),
            }
        }
    }

    fn cookies(&self, _url: &Url) -> Option<HeaderValue> {
        let cookies = self.read();
        if cookies.is_empty() {
            return None;
        }
        let joined = cookies
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect::<Vec<_>>()
            .join("; ");
        HeaderValue::from_str(&joined).ok()
    }
}
