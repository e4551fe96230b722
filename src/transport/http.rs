//! HTTP request executor for the ProjectDesk API.

use std::sync::Arc;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::auth::coordinator::{Attempt, RefreshCoordinator};
use crate::config::{self, ClientConfig};
use crate::error::{Error, Result, GENERIC_ERROR_MESSAGE};
use crate::session::{Credentials, SessionStore};
use crate::transport::headers;
use crate::transport::request::{RequestBody, RequestDescriptor};

/// Executes [`RequestDescriptor`]s: attaches credentials, renews the session
/// once on a 401, and classifies failures.
pub struct ApiHttpClient {
    client: reqwest::Client,
    base_url: Url,
    session: Arc<SessionStore>,
    coordinator: RefreshCoordinator,
}

impl ApiHttpClient {
    /// Create an executor with a reqwest client built from `config`.
    ///
    /// Cookie sessions use the session's jar as the cookie store, so
    /// server-set cookies are sent on every call (the refresh call included)
    /// and vanish when the session is cleared.
    pub fn new(config: &ClientConfig, session: Arc<SessionStore>) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout())
            .timeout(config.request_timeout());
        if let Some(jar) = session.cookie_jar() {
            builder = builder.cookie_provider(jar);
        }
        let client = builder.build().map_err(Error::Network)?;

        Self::with_client(client, config.base_url()?, session)
    }

    /// Create with a custom reqwest client.
    ///
    /// For Cookie sessions the client must be built with
    /// `.cookie_provider(session.cookie_jar())`, or logout cannot forget the
    /// cookies.
    pub fn with_client(
        client: reqwest::Client,
        base_url: Url,
        session: Arc<SessionStore>,
    ) -> Result<Self> {
        let coordinator = RefreshCoordinator::new(
            client.clone(),
            config::api_route(&base_url, "/auth/refresh")?,
            Arc::clone(&session),
        );
        Ok(Self {
            client,
            base_url,
            session,
            coordinator,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// Resolve a descriptor's path to a full URL.
    pub fn url_for(&self, request: &RequestDescriptor) -> Result<Url> {
        let mut url = if request.is_versioned() {
            config::api_route(&self.base_url, request.path())?
        } else {
            config::join_path(&self.base_url, request.path())?
        };
        if !request.query_pairs().is_empty() {
            url.query_pairs_mut().extend_pairs(request.query_pairs());
        }
        Ok(url)
    }

    /// Execute a request and decode its JSON body.
    ///
    /// Returns `Ok(None)` for 204 No Content.
    pub async fn execute<T: DeserializeOwned>(&self, request: &RequestDescriptor) -> Result<Option<T>> {
        match self.run(request).await? {
            None => Ok(None),
            Some(body) => serde_json::from_slice(&body)
                .map(Some)
                .map_err(|e| Error::Decode(format!("{}: {}", request, e))),
        }
    }

    /// Execute a request whose response must carry a body.
    pub async fn execute_required<T: DeserializeOwned>(&self, request: &RequestDescriptor) -> Result<T> {
        self.execute(request)
            .await?
            .ok_or_else(|| Error::EmptyResponse(request.to_string()))
    }

    /// Execute a request and discard any response body.
    pub async fn execute_discard(&self, request: &RequestDescriptor) -> Result<()> {
        self.run(request).await.map(|_| ())
    }

    /// Send with at most one renewal-and-replay.
    ///
    /// Returns the raw body of a 2xx response, or `None` for 204.
    async fn run(&self, request: &RequestDescriptor) -> Result<Option<Vec<u8>>> {
        let mut attempt = Attempt::Direct;

        loop {
            let (credentials, epoch) = self.session.snapshot().await;
            let response = self.dispatch(request, credentials.as_ref()).await?;

            if response.status() == StatusCode::UNAUTHORIZED && request.renews_on_unauthorized() {
                match attempt.on_unauthorized() {
                    Some(next) => {
                        debug!(request = %request, "Got 401 - renewing session");
                        self.coordinator.renew(epoch).await?;
                        attempt = next;
                        continue;
                    }
                    None => warn!(request = %request, "Got 401 after session renewal, giving up"),
                }
            }

            return read_response(response).await;
        }
    }

    async fn dispatch(
        &self,
        request: &RequestDescriptor,
        credentials: Option<&Credentials>,
    ) -> Result<reqwest::Response> {
        let url = self.url_for(request)?;

        let mut builder = self
            .client
            .request(request.method().clone(), url)
            .headers(headers::api_headers(credentials));

        builder = match request.body() {
            Some(RequestBody::Json(value)) => builder.json(value),
            Some(RequestBody::Form(fields)) => builder.form(fields),
            None => builder,
        };

        // Caller overrides win over defaults and body-implied headers
        builder = builder.headers(request.header_overrides().clone());

        let response = builder.send().await.map_err(|e| {
            warn!(request = %request, "Request failed: {}", e);
            Error::from_transport(e)
        })?;

        debug!(request = %request, status = response.status().as_u16(), "Response received");
        Ok(response)
    }
}

/// Turn a response into its body or a classified error.
pub(crate) async fn read_response(response: reqwest::Response) -> Result<Option<Vec<u8>>> {
    let status = response.status();

    if status == StatusCode::NO_CONTENT {
        return Ok(None);
    }

    if !status.is_success() {
        return Err(read_error(response).await);
    }

    let body = response.bytes().await.map_err(Error::from_transport)?;
    Ok(Some(body.to_vec()))
}

/// Decode a non-2xx response into an [`Error`].
pub(crate) async fn read_error(response: reqwest::Response) -> Error {
    let status = response.status().as_u16();
    let body = response.bytes().await.unwrap_or_default();
    let message = error_message(status, &body);

    if status == 401 {
        Error::Unauthorized { message }
    } else {
        Error::Api { status, message }
    }
}

/// Human-readable message from an error body.
///
/// Uses `detail` when it is a string, joins the `msg` fields when it is a
/// validation-error list, falls back to `HTTP <status>` when the body is JSON
/// without a usable `detail`, and to a generic message when it is not JSON.
pub fn error_message(status: u16, body: &[u8]) -> String {
    let value: serde_json::Value = match serde_json::from_slice(body) {
        Ok(value) => value,
        Err(_) => return GENERIC_ERROR_MESSAGE.to_string(),
    };

    match value.get("detail") {
        Some(serde_json::Value::String(detail)) if !detail.is_empty() => detail.clone(),
        Some(serde_json::Value::Array(items)) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(|m| m.as_str()))
                .collect();
            if messages.is_empty() {
                format!("HTTP {}", status)
            } else {
                messages.join("; ")
            }
        }
        _ => format!("HTTP {}", status),
    }
}

impl std::fmt::Debug for ApiHttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiHttpClient")
            .field("base_url", &self.base_url.as_str())
            .field("session", &self.session)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionMode;

    #[test]
    fn test_error_message_uses_detail() {
        assert_eq!(
            error_message(404, br#"{"detail":"Project not found"}"#),
            "Project not found"
        );
    }

    #[test]
    fn test_error_message_fallbacks() {
        assert_eq!(error_message(500, b"<html>oops</html>"), GENERIC_ERROR_MESSAGE);
        assert_eq!(error_message(502, b""), GENERIC_ERROR_MESSAGE);
        assert_eq!(error_message(418, br#"{"error":"teapot"}"#), "HTTP 418");
    }

    #[test]
    fn test_error_message_joins_validation_errors() {
        let body = br#"{"detail":[{"loc":["body","title"],"msg":"field required"},{"msg":"too short"}]}"#;
        assert_eq!(error_message(422, body), "field required; too short");
    }

    #[test]
    fn test_url_for_query_and_unversioned() {
        let session = Arc::new(SessionStore::in_memory(SessionMode::Token));
        let http = ApiHttpClient::with_client(
            reqwest::Client::new(),
            config::parse_api_url("http://localhost:8000").unwrap(),
            session,
        )
        .unwrap();

        let req = RequestDescriptor::get("/admin/users").query([
            ("skip".to_string(), "10".to_string()),
            ("limit".to_string(), "20".to_string()),
        ]);
        assert_eq!(
            http.url_for(&req).unwrap().as_str(),
            "http://localhost:8000/api/v1/admin/users?skip=10&limit=20"
        );

        let health = RequestDescriptor::get("/health").unversioned();
        assert_eq!(http.url_for(&health).unwrap().as_str(), "http://localhost:8000/health");
    }
}
