//! Liveness probe.

use crate::error::Result;
use crate::models::HealthStatus;
use crate::transport::http::ApiHttpClient;
use crate::transport::request::RequestDescriptor;

/// `GET /health`, outside the `/api/v1` prefix and unauthenticated.
pub async fn health(http: &ApiHttpClient) -> Result<HealthStatus> {
    let descriptor = RequestDescriptor::get("/health").unversioned().without_renewal();
    http.execute_required(&descriptor).await
}
