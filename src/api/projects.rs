//! Project CRUD for the signed-in user.

use tracing::debug;

use crate::error::Result;
use crate::models::{Project, ProjectCreate, ProjectUpdate};
use crate::transport::http::ApiHttpClient;
use crate::transport::request::RequestDescriptor;

/// List the caller's projects.
pub async fn list_projects(http: &ApiHttpClient) -> Result<Vec<Project>> {
    let projects: Vec<Project> = http.execute_required(&RequestDescriptor::get("/projects/")).await?;
    debug!(count = projects.len(), "Projects fetched");
    Ok(projects)
}

pub async fn get_project(http: &ApiHttpClient, id: i64) -> Result<Project> {
    http.execute_required(&RequestDescriptor::get(format!("/projects/{}", id)))
        .await
}

pub async fn create_project(http: &ApiHttpClient, project: &ProjectCreate) -> Result<Project> {
    let descriptor = RequestDescriptor::post("/projects/").json(project)?;
    http.execute_required(&descriptor).await
}

pub async fn update_project(http: &ApiHttpClient, id: i64, update: &ProjectUpdate) -> Result<Project> {
    let descriptor = RequestDescriptor::put(format!("/projects/{}", id)).json(update)?;
    http.execute_required(&descriptor).await
}

/// Delete a project. The server answers 204 No Content.
pub async fn delete_project(http: &ApiHttpClient, id: i64) -> Result<()> {
    http.execute_discard(&RequestDescriptor::delete(format!("/projects/{}", id)))
        .await
}
