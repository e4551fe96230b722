//! Request descriptors: one API call, before credentials are attached.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::Method;
use serde::Serialize;

use crate::error::Result;

/// Content type for the password login form.
pub const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// Request payload.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// Serialized JSON value.
    Json(serde_json::Value),
    /// `application/x-www-form-urlencoded` fields, in order.
    Form(Vec<(String, String)>),
}

/// An immutable description of one API call.
///
/// `path` is the route below the `/api/v1` prefix (e.g. `/projects/42`),
/// unless the descriptor is marked [`unversioned`](Self::unversioned).
/// The executor may send it twice, once directly and once after a session
/// renewal, with identical method, path, and body.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    body: Option<RequestBody>,
    headers: HeaderMap,
    versioned: bool,
    renewable: bool,
}

impl RequestDescriptor {
    /// A request with no body.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            headers: HeaderMap::new(),
            versioned: true,
            renewable: true,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Attach a JSON body.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self> {
        self.body = Some(RequestBody::Json(serde_json::to_value(body)?));
        Ok(self)
    }

    /// Attach a form-encoded body and the matching `Content-Type` override.
    pub fn form(mut self, fields: Vec<(String, String)>) -> Self {
        self.body = Some(RequestBody::Form(fields));
        self.headers
            .insert(CONTENT_TYPE, HeaderValue::from_static(FORM_URLENCODED));
        self
    }

    /// Append query parameters.
    pub fn query(mut self, pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        self.query.extend(pairs);
        self
    }

    /// Override a default header.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Address the path from the server root instead of `/api/v1`.
    pub fn unversioned(mut self) -> Self {
        self.versioned = false;
        self
    }

    /// Surface a 401 directly instead of renewing the session.
    ///
    /// Used for calls that establish a session (login, register), where a
    /// 401 means bad credentials rather than an expired session.
    pub fn without_renewal(mut self) -> Self {
        self.renewable = false;
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }

    pub fn body(&self) -> Option<&RequestBody> {
        self.body.as_ref()
    }

    pub fn header_overrides(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn is_versioned(&self) -> bool {
        self.versioned
    }

    /// Whether a 401 on this request may trigger a session renewal.
    pub fn renews_on_unauthorized(&self) -> bool {
        self.renewable
    }
}

impl std::fmt::Display for RequestDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_sets_content_type_override() {
        let req = RequestDescriptor::post("/auth/login").form(vec![
            ("username".into(), "a@b.com".into()),
            ("password".into(), "x".into()),
        ]);
        assert_eq!(
            req.header_overrides().get(CONTENT_TYPE).unwrap(),
            FORM_URLENCODED
        );
        assert!(matches!(req.body(), Some(RequestBody::Form(fields)) if fields.len() == 2));
    }

    #[test]
    fn test_json_body_and_defaults() {
        let req = RequestDescriptor::put("/projects/1")
            .json(&serde_json::json!({"title": "x"}))
            .unwrap();
        assert_eq!(req.method(), &Method::PUT);
        assert!(req.header_overrides().is_empty());
        assert!(req.is_versioned());
        assert!(req.renews_on_unauthorized());
        assert_eq!(req.to_string(), "PUT /projects/1");
    }

    #[test]
    fn test_clone_preserves_intent() {
        let req = RequestDescriptor::get("/admin/users")
            .query([("skip".to_string(), "10".to_string())])
            .without_renewal();
        let replay = req.clone();
        assert_eq!(replay.path(), req.path());
        assert_eq!(replay.query_pairs(), req.query_pairs());
        assert!(!replay.renews_on_unauthorized());
    }
}
