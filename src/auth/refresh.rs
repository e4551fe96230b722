//! Session renewal against `POST /api/v1/auth/refresh`.

use tracing::debug;
use url::Url;

use crate::error::{Error, Result};
use crate::models::auth::{RefreshRequest, TokenResponse};
use crate::session::{Credentials, SessionMode, SessionStore, TokenPair};
use crate::transport::headers;
use crate::transport::http::read_error;

/// Renew the session and persist the outcome.
///
/// Token mode: body `{"refresh_token": "..."}`, response is a new token pair.
/// Cookie mode: no body; the server reads the refresh cookie and rewrites
/// the cookie pair in the session's jar, which is then persisted.
///
/// Without a refresh token there is no session to renew:
/// [`Error::NotAuthenticated`].
pub async fn renew_session(client: &reqwest::Client, url: &Url, session: &SessionStore) -> Result<()> {
    let builder = client.post(url.clone()).headers(headers::api_headers(None));

    match session.mode() {
        SessionMode::Token => {
            let refresh_token = session
                .refresh_token()
                .await
                .ok_or(Error::NotAuthenticated)?;

            debug!("Refreshing bearer tokens");
            let response = builder
                .json(&RefreshRequest {
                    refresh_token: &refresh_token,
                })
                .send()
                .await
                .map_err(Error::from_transport)?;

            if !response.status().is_success() {
                return Err(read_error(response).await);
            }

            let tokens: TokenResponse = response
                .json()
                .await
                .map_err(|e| Error::Decode(format!("refresh response: {}", e)))?;
            let pair = TokenPair::try_from(&tokens)?;
            session.save(Credentials::Token(pair)).await;
        }
        SessionMode::Cookie => {
            debug!("Refreshing session cookies");
            let response = builder.send().await.map_err(Error::from_transport)?;

            if !response.status().is_success() {
                return Err(read_error(response).await);
            }

            session.save(Credentials::Cookie).await;
        }
    }

    Ok(())
}
