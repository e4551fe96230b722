//! # projectdesk
//!
//! Rust client library for the ProjectDesk project-management API.
//!
//! Handles the session (bearer tokens or server-managed cookies), renews it
//! transparently when the server answers 401, and exposes every endpoint as
//! a typed method.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use projectdesk::{LoginRequest, ProjectDeskClient, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = ProjectDeskClient::builder()
//!         .base_url("http://localhost:8000")
//!         .build()
//!         .await?;
//!
//!     if !client.is_authenticated().await {
//!         client.login(&LoginRequest::new("a@b.com", "secret")).await?;
//!     }
//!
//!     for project in client.list_projects().await? {
//!         println!("#{} {}", project.id, project.title);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - `keyring` - Enable system keyring token storage
//! - `full` - Enable all optional features

pub mod api;
pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod session;
pub mod storage;
pub mod transport;

// Re-exports for ergonomic usage
pub use auth::{CallbackOutcome, RouteDecision, RouteRequirement};
pub use client::{ProjectDeskClient, ProjectDeskClientBuilder};
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use models::{
    HealthStatus, ListUsersQuery, LoginRequest, Project, ProjectCreate, ProjectUpdate,
    RegisterRequest, TokenResponse, User, UserRole, UserStats, UserUpdate,
};
pub use session::{Credentials, SessionMode, SessionStore, TokenPair};
pub use storage::TokenStorage;
