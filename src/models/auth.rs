//! Authentication-related types.

use serde::{Deserialize, Serialize};

/// Response from `/auth/login` and `/auth/refresh`.
#[derive(Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

impl std::fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenResponse")
            .field("access_token", &"[redacted]")
            .field("refresh_token", &"[redacted]")
            .field("token_type", &self.token_type)
            .finish()
    }
}

/// Password login credentials.
///
/// Sent form-encoded (`username`, `password`), not as JSON.
#[derive(Clone, Serialize)]
pub struct LoginRequest {
    /// The account email.
    pub username: String,
    pub password: String,
}

impl LoginRequest {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub(crate) fn form_fields(&self) -> Vec<(String, String)> {
        vec![
            ("username".to_string(), self.username.clone()),
            ("password".to_string(), self.password.clone()),
        ]
    }
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"[redacted]")
            .finish()
    }
}

/// Account registration payload.
#[derive(Clone, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
}

impl std::fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("email", &self.email)
            .field("password", &"[redacted]")
            .field("full_name", &self.full_name)
            .finish()
    }
}

/// Body of a Token-Backed refresh call.
#[derive(Serialize)]
pub struct RefreshRequest<'a> {
    pub refresh_token: &'a str,
}

/// Body of `/auth/add-password` for OAuth-only accounts.
#[derive(Serialize)]
pub struct AddPasswordRequest<'a> {
    pub password: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_response_defaults_type() {
        let resp: TokenResponse =
            serde_json::from_str(r#"{"access_token":"T1","refresh_token":"R1"}"#).unwrap();
        assert_eq!(resp.token_type, "bearer");
        assert!(!format!("{:?}", resp).contains("T1"));
    }

    #[test]
    fn test_register_request_omits_missing_name() {
        let req = RegisterRequest {
            email: "a@b.com".into(),
            password: "x".into(),
            full_name: None,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json, serde_json::json!({"email": "a@b.com", "password": "x"}));
    }
}
