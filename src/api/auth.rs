//! `/auth/*` endpoints.

use tracing::{debug, info, warn};

use crate::error::Result;
use crate::models::{AddPasswordRequest, LoginRequest, RegisterRequest, TokenResponse, User};
use crate::session::{Credentials, SessionMode, TokenPair};
use crate::transport::http::ApiHttpClient;
use crate::transport::request::RequestDescriptor;

/// Create an account. Does not sign in.
pub async fn register(http: &ApiHttpClient, request: &RegisterRequest) -> Result<User> {
    let descriptor = RequestDescriptor::post("/auth/register")
        .json(request)?
        .without_renewal();
    let user: User = http.execute_required(&descriptor).await?;
    info!(user_id = user.id, "Registered account");
    Ok(user)
}

/// Sign in with email and password.
///
/// The body is form-encoded (`username`, `password`). On success the new
/// session is saved: the token pair in Token mode, the server-set cookies in
/// Cookie mode.
pub async fn login(http: &ApiHttpClient, request: &LoginRequest) -> Result<TokenResponse> {
    let descriptor = RequestDescriptor::post("/auth/login")
        .form(request.form_fields())
        .without_renewal();
    let tokens: TokenResponse = http.execute_required(&descriptor).await?;

    let credentials = match http.session().mode() {
        SessionMode::Token => Credentials::Token(TokenPair::try_from(&tokens)?),
        SessionMode::Cookie => Credentials::Cookie,
    };
    http.session().save(credentials).await;

    info!(mode = %http.session().mode(), "Signed in");
    Ok(tokens)
}

/// Sign out.
///
/// The local session is cleared whether or not the server call succeeds;
/// the server's answer is still returned.
pub async fn logout(http: &ApiHttpClient) -> Result<()> {
    let result = http
        .execute_discard(&RequestDescriptor::post("/auth/logout").without_renewal())
        .await;

    if let Err(e) = &result {
        warn!("Logout request failed, clearing local session anyway: {}", e);
    }
    http.session().clear().await;
    debug!("Signed out");
    result
}

/// Set a password on an account that so far only signs in through Google.
pub async fn add_password(http: &ApiHttpClient, password: &str) -> Result<User> {
    let descriptor = RequestDescriptor::post("/auth/add-password").json(&AddPasswordRequest { password })?;
    http.execute_required(&descriptor).await
}
