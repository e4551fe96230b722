//! `/users/me`.

use crate::error::Result;
use crate::models::{User, UserUpdate};
use crate::transport::http::ApiHttpClient;
use crate::transport::request::RequestDescriptor;

pub async fn current_user(http: &ApiHttpClient) -> Result<User> {
    http.execute_required(&RequestDescriptor::get("/users/me")).await
}

pub async fn update_current_user(http: &ApiHttpClient, update: &UserUpdate) -> Result<User> {
    let descriptor = RequestDescriptor::put("/users/me").json(update)?;
    http.execute_required(&descriptor).await
}
