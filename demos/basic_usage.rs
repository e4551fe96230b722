//! Basic usage example: sign in, create a project, list projects.

use projectdesk::{LoginRequest, ProjectCreate, ProjectDeskClient, Result};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("projectdesk=info")
        .init();

    let email = std::env::var("PROJECTDESK_EMAIL").unwrap_or_else(|_| "a@b.com".to_string());
    let password = std::env::var("PROJECTDESK_PASSWORD").unwrap_or_default();

    // Session is restored from the default session file when present
    let client = ProjectDeskClient::builder()
        .base_url("http://localhost:8000")
        .build()
        .await?;

    if !client.is_authenticated().await {
        client.login(&LoginRequest::new(email, password)).await?;
    }

    let me = client.current_user().await?;
    println!("Signed in as {} ({})", me.email, me.role);

    let project = client
        .create_project(&ProjectCreate::new("Roadmap").description("Q3 planning"))
        .await?;
    println!("Created project #{}", project.id);

    for project in client.list_projects().await? {
        println!(
            "#{:<4} {:<30} {}",
            project.id,
            project.title,
            project.description.as_deref().unwrap_or("-")
        );
    }

    Ok(())
}
