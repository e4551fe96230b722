//! Is there a usable session?

use tracing::debug;

use crate::models::User;
use crate::session::SessionMode;
use crate::transport::http::ApiHttpClient;
use crate::transport::request::RequestDescriptor;

/// Answer whether the client holds a session.
///
/// Token mode checks the session store without touching the network, as
/// does Cookie mode with an empty jar. Otherwise Cookie mode asks
/// `GET /users/me`, renewal included; any failure counts as unauthenticated.
pub async fn is_authenticated(http: &ApiHttpClient) -> bool {
    if let Some(local) = http.session().is_authenticated().await {
        return local;
    }

    debug_assert_eq!(http.session().mode(), SessionMode::Cookie);
    match http
        .execute_required::<User>(&RequestDescriptor::get("/users/me"))
        .await
    {
        Ok(_) => true,
        Err(e) => {
            debug!("Session probe failed: {}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config;
    use crate::session::{Credentials, SessionStore, TokenPair};

    #[tokio::test]
    async fn test_token_mode_answers_without_network() {
        let session = Arc::new(SessionStore::in_memory(SessionMode::Token));
        // Nothing listens here; a request would fail
        let http = ApiHttpClient::with_client(
            reqwest::Client::new(),
            config::parse_api_url("http://127.0.0.1:9").unwrap(),
            Arc::clone(&session),
        )
        .unwrap();

        assert!(!is_authenticated(&http).await);

        session
            .save(Credentials::Token(TokenPair::new("T1", "R1").unwrap()))
            .await;
        assert!(is_authenticated(&http).await);

        session.clear().await;
        assert!(!is_authenticated(&http).await);
    }
}
