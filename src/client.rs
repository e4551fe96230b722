//! Main client entry point.

use std::sync::Arc;

use tracing::info;
use url::Url;

use crate::api;
use crate::auth::{oauth, presence, CallbackOutcome};
use crate::config::{self, ClientConfig};
use crate::error::Result;
use crate::models::{
    HealthStatus, ListUsersQuery, LoginRequest, Project, ProjectCreate, ProjectUpdate,
    RegisterRequest, TokenResponse, User, UserRole, UserStats, UserUpdate,
};
use crate::session::{SessionMode, SessionStore};
use crate::storage::TokenStorage;
use crate::transport::http::ApiHttpClient;

/// ProjectDesk API client.
///
/// Every call attaches the session's credentials and, on a 401, renews the
/// session once and replays the call.
///
/// # Examples
///
/// ```rust,no_run
/// use projectdesk::{LoginRequest, ProjectCreate, ProjectDeskClient};
///
/// # async fn example() -> projectdesk::Result<()> {
/// let client = ProjectDeskClient::builder()
///     .base_url("http://localhost:8000")
///     .build()
///     .await?;
///
/// client.login(&LoginRequest::new("a@b.com", "secret")).await?;
/// let project = client
///     .create_project(&ProjectCreate::new("Roadmap").description("Q3 planning"))
///     .await?;
/// println!("created #{}", project.id);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ProjectDeskClient {
    session: Arc<SessionStore>,
    http: Arc<ApiHttpClient>,
}

impl ProjectDeskClient {
    /// Create a builder for configuring the client.
    pub fn builder() -> ProjectDeskClientBuilder {
        ProjectDeskClientBuilder::new()
    }

    // Authentication

    pub async fn register(&self, request: &RegisterRequest) -> Result<User> {
        api::auth::register(&self.http, request).await
    }

    /// Sign in and save the new session.
    pub async fn login(&self, request: &LoginRequest) -> Result<TokenResponse> {
        api::auth::login(&self.http, request).await
    }

    /// Sign out. The local session is cleared even if the server call fails.
    pub async fn logout(&self) -> Result<()> {
        api::auth::logout(&self.http).await
    }

    /// Where to send a browser to start Google sign-in.
    pub fn google_login_url(&self) -> Result<Url> {
        oauth::google_login_url(self.http.base_url())
    }

    /// Handle the redirect back from Google sign-in.
    pub async fn complete_oauth_callback(&self, query: &str) -> CallbackOutcome {
        oauth::complete_callback(&self.session, query).await
    }

    pub async fn add_password(&self, password: &str) -> Result<User> {
        api::auth::add_password(&self.http, password).await
    }

    /// Whether the client holds a usable session.
    ///
    /// Local in Token mode and for an empty cookie jar; otherwise a
    /// `GET /users/me` check in Cookie mode.
    pub async fn is_authenticated(&self) -> bool {
        presence::is_authenticated(&self.http).await
    }

    // Current user

    pub async fn current_user(&self) -> Result<User> {
        api::users::current_user(&self.http).await
    }

    pub async fn update_current_user(&self, update: &UserUpdate) -> Result<User> {
        api::users::update_current_user(&self.http, update).await
    }

    // Projects

    pub async fn list_projects(&self) -> Result<Vec<Project>> {
        api::projects::list_projects(&self.http).await
    }

    pub async fn get_project(&self, id: i64) -> Result<Project> {
        api::projects::get_project(&self.http, id).await
    }

    pub async fn create_project(&self, project: &ProjectCreate) -> Result<Project> {
        api::projects::create_project(&self.http, project).await
    }

    pub async fn update_project(&self, id: i64, update: &ProjectUpdate) -> Result<Project> {
        api::projects::update_project(&self.http, id, update).await
    }

    pub async fn delete_project(&self, id: i64) -> Result<()> {
        api::projects::delete_project(&self.http, id).await
    }

    // Administration

    pub async fn user_stats(&self) -> Result<UserStats> {
        api::admin::user_stats(&self.http).await
    }

    /// List accounts. `None` leaves paging to the server; deleted accounts
    /// are only included when asked for.
    pub async fn list_users(
        &self,
        skip: Option<u32>,
        limit: Option<u32>,
        include_deleted: bool,
    ) -> Result<Vec<User>> {
        let query = ListUsersQuery {
            skip,
            limit,
            include_deleted,
        };
        api::admin::list_users(&self.http, query).await
    }

    pub async fn activate_user(&self, user_id: i64) -> Result<User> {
        api::admin::activate_user(&self.http, user_id).await
    }

    pub async fn deactivate_user(&self, user_id: i64) -> Result<User> {
        api::admin::deactivate_user(&self.http, user_id).await
    }

    pub async fn change_user_role(&self, user_id: i64, role: UserRole) -> Result<User> {
        api::admin::change_user_role(&self.http, user_id, role).await
    }

    pub async fn delete_user(&self, user_id: i64) -> Result<User> {
        api::admin::delete_user(&self.http, user_id).await
    }

    // Misc

    pub async fn health(&self) -> Result<HealthStatus> {
        api::health::health(&self.http).await
    }

    /// The session store shared with the executor.
    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// The request executor, for endpoints without a typed method.
    pub fn http(&self) -> &ApiHttpClient {
        &self.http
    }
}

/// Builder for [`ProjectDeskClient`].
#[derive(Default)]
pub struct ProjectDeskClientBuilder {
    config: Option<ClientConfig>,
    base_url: Option<String>,
    session_mode: Option<SessionMode>,
    storage: Option<Arc<dyn TokenStorage>>,
    reqwest_client: Option<reqwest::Client>,
}

impl ProjectDeskClientBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a loaded configuration instead of the defaults.
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the API base URL (without the `/api/v1` prefix).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Choose bearer tokens or server-managed cookies.
    pub fn session_mode(mut self, mode: SessionMode) -> Self {
        self.session_mode = Some(mode);
        self
    }

    /// Set a token storage backend.
    pub fn storage(mut self, storage: Arc<dyn TokenStorage>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Set a custom reqwest client.
    ///
    /// Cookie sessions need a client built with
    /// `.cookie_provider(..)` set to the session's jar; see
    /// [`ApiHttpClient::with_client`].
    pub fn reqwest_client(mut self, client: reqwest::Client) -> Self {
        self.reqwest_client = Some(client);
        self
    }

    /// Build the client and restore any persisted session.
    ///
    /// Without an explicit storage the backend comes from the configuration
    /// (the session file under the user's config directory by default).
    pub async fn build(self) -> Result<ProjectDeskClient> {
        let mut config = self.config.unwrap_or_default();
        if let Some(url) = self.base_url {
            config.api_url = url;
        }
        if let Some(mode) = self.session_mode {
            config.session_mode = mode;
        }
        let base_url = config::parse_api_url(&config.api_url)?;

        let storage = match self.storage {
            Some(storage) => storage,
            None => crate::storage::from_config(&config.storage)?,
        };

        let session = Arc::new(SessionStore::new(config.session_mode, storage));
        session.load().await;

        let http = match self.reqwest_client {
            Some(client) => ApiHttpClient::with_client(client, base_url, Arc::clone(&session))?,
            None => ApiHttpClient::new(&config, Arc::clone(&session))?,
        };

        info!(
            api_url = %http.base_url(),
            mode = %session.mode(),
            storage = session.storage_name(),
            "ProjectDeskClient initialized"
        );
        Ok(ProjectDeskClient {
            session,
            http: Arc::new(http),
        })
    }
}
