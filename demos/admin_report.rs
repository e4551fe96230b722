//! Admin example: print account statistics and page through every user.

use std::sync::Arc;

use projectdesk::storage::MemoryTokenStorage;
use projectdesk::{LoginRequest, ProjectDeskClient, Result};

const PAGE_SIZE: u32 = 50;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("projectdesk=info")
        .init();

    let email = std::env::var("PROJECTDESK_EMAIL").unwrap_or_else(|_| "admin@example.com".to_string());
    let password = std::env::var("PROJECTDESK_PASSWORD").unwrap_or_default();

    // Keep this session out of the shared session file
    let client = ProjectDeskClient::builder()
        .storage(Arc::new(MemoryTokenStorage::new()))
        .build()
        .await?;
    client.login(&LoginRequest::new(email, password)).await?;

    let stats = client.user_stats().await?;
    println!(
        "{} users: {} active, {} inactive, {} admins, {} deleted",
        stats.total_users,
        stats.active_users,
        stats.inactive_users,
        stats.admin_users,
        stats.deleted_users
    );

    let mut skip = 0;
    loop {
        let page = client.list_users(Some(skip), Some(PAGE_SIZE), true).await?;
        for user in &page {
            let state = match (user.is_deleted, user.is_active) {
                (Some(true), _) => "deleted",
                (_, true) => "active",
                (_, false) => "inactive",
            };
            println!("#{:<5} {:<32} {:<6} {}", user.id, user.email, user.role, state);
        }
        if page.len() < PAGE_SIZE as usize {
            break;
        }
        skip += PAGE_SIZE;
    }

    client.logout().await?;
    Ok(())
}
