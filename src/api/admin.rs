//! `/admin/users/*` endpoints. The server rejects non-admin callers with 403.

use tracing::info;

use crate::error::Result;
use crate::models::{ListUsersQuery, RoleUpdate, User, UserRole, UserStats};
use crate::transport::http::ApiHttpClient;
use crate::transport::request::RequestDescriptor;

pub async fn user_stats(http: &ApiHttpClient) -> Result<UserStats> {
    http.execute_required(&RequestDescriptor::get("/admin/users/stats"))
        .await
}

/// List accounts. Unset paging fields are left to the server's defaults.
pub async fn list_users(http: &ApiHttpClient, query: ListUsersQuery) -> Result<Vec<User>> {
    let descriptor = RequestDescriptor::get("/admin/users").query(query.to_pairs());
    http.execute_required(&descriptor).await
}

pub async fn activate_user(http: &ApiHttpClient, user_id: i64) -> Result<User> {
    let user: User = http
        .execute_required(&RequestDescriptor::put(format!("/admin/users/{}/activate", user_id)))
        .await?;
    info!(user_id, "User activated");
    Ok(user)
}

pub async fn deactivate_user(http: &ApiHttpClient, user_id: i64) -> Result<User> {
    let user: User = http
        .execute_required(&RequestDescriptor::put(format!("/admin/users/{}/deactivate", user_id)))
        .await?;
    info!(user_id, "User deactivated");
    Ok(user)
}

pub async fn change_user_role(http: &ApiHttpClient, user_id: i64, role: UserRole) -> Result<User> {
    let descriptor = RequestDescriptor::put(format!("/admin/users/{}/role", user_id)).json(&RoleUpdate { role })?;
    let user: User = http.execute_required(&descriptor).await?;
    info!(user_id, %role, "User role changed");
    Ok(user)
}

/// Soft-delete an account. Returns the account as it now stands.
pub async fn delete_user(http: &ApiHttpClient, user_id: i64) -> Result<User> {
    let user: User = http
        .execute_required(&RequestDescriptor::delete(format!("/admin/users/{}", user_id)))
        .await?;
    info!(user_id, "User deleted");
    Ok(user)
}
