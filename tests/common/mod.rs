//! Shared helpers for the wiremock-backed integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use projectdesk::storage::MemoryTokenStorage;
use projectdesk::{Credentials, ProjectDeskClient, SessionMode, TokenPair};

/// Build a client against the mock server with in-memory storage.
pub async fn create_test_client(
    server: &MockServer,
    mode: SessionMode,
    storage: Arc<MemoryTokenStorage>,
) -> ProjectDeskClient {
    ProjectDeskClient::builder()
        .base_url(server.uri())
        .session_mode(mode)
        .storage(storage)
        .build()
        .await
        .expect("client should build")
}

/// Token-mode client already holding `access` / `refresh`.
pub async fn signed_in_client(
    server: &MockServer,
    access: &str,
    refresh: &str,
) -> (ProjectDeskClient, Arc<MemoryTokenStorage>) {
    let storage = Arc::new(MemoryTokenStorage::new());
    let client = create_test_client(server, SessionMode::Token, Arc::clone(&storage)).await;
    client
        .session()
        .save(Credentials::Token(TokenPair::new(access, refresh).unwrap()))
        .await;
    (client, storage)
}

pub fn token_body(access: &str, refresh: &str) -> serde_json::Value {
    json!({
        "access_token": access,
        "refresh_token": refresh,
        "token_type": "bearer"
    })
}

pub fn user_json(id: i64, email: &str, role: &str) -> serde_json::Value {
    json!({
        "id": id,
        "email": email,
        "full_name": "Test User",
        "role": role,
        "is_active": true,
        "is_verified": true,
        "created_at": "2024-05-01T09:30:00",
        "updated_at": "2024-05-02T10:00:00Z"
    })
}

pub fn project_json(id: i64, title: &str) -> serde_json::Value {
    json!({
        "id": id,
        "title": title,
        "description": null,
        "owner_id": 1,
        "created_at": "2024-05-01T09:30:00.123456",
        "updated_at": "2024-05-01T09:30:00.123456"
    })
}

pub fn detail(message: &str) -> serde_json::Value {
    json!({ "detail": message })
}

/// Mount a refresh endpoint that must be called exactly `times` times.
pub async fn mount_refresh(server: &MockServer, response: ResponseTemplate, times: u64) {
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/refresh"))
        .respond_with(response)
        .expect(times)
        .mount(server)
        .await;
}
