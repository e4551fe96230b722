//! projectdesk -- command-line client for the ProjectDesk API.
//!
//! Loads configuration, opens the session storage, and runs one command.
//! Results are printed to stdout as JSON; logs go to stderr.

mod cli;

use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use projectdesk::{
    ClientConfig, LoginRequest, ProjectCreate, ProjectDeskClient, ProjectUpdate, RegisterRequest,
};

use crate::cli::{AdminCommand, Cli, Command, ProjectCommand};

fn main() -> anyhow::Result<()> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to build Tokio runtime")?
        .block_on(async_main())
}

async fn async_main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = ClientConfig::load(&cli.config)?;
    if let Some(url) = &cli.api_url {
        config.api_url = url.clone();
    }
    if let Some(mode) = cli.mode {
        config.session_mode = mode;
    }
    if cli.json_logs {
        config.logging.json = true;
    }

    init_tracing(&config);

    tracing::debug!(
        version = env!("CARGO_PKG_VERSION"),
        config = %cli.config.display(),
        "Starting projectdesk"
    );

    let client = ProjectDeskClient::builder()
        .config(config)
        .build()
        .await
        .context("Failed to initialize client")?;

    run(&client, cli.command).await
}

async fn run(client: &ProjectDeskClient, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Login(creds) => {
            client
                .login(&LoginRequest::new(creds.email, creds.password))
                .await?;
            print_json(&serde_json::json!({ "authenticated": true }))
        }
        Command::Logout => {
            client.logout().await?;
            print_json(&serde_json::json!({ "authenticated": false }))
        }
        Command::Register {
            credentials,
            full_name,
        } => {
            let request = RegisterRequest {
                email: credentials.email,
                password: credentials.password,
                full_name,
            };
            print_json(&client.register(&request).await?)
        }
        Command::Whoami => print_json(&client.current_user().await?),
        Command::Status => {
            let authenticated = client.is_authenticated().await;
            print_json(&serde_json::json!({
                "authenticated": authenticated,
                "mode": client.session().mode(),
                "storage": client.session().storage_name(),
            }))
        }
        Command::Health => print_json(&client.health().await?),
        Command::OauthUrl => {
            println!("{}", client.google_login_url()?);
            Ok(())
        }
        Command::Projects(command) => run_projects(client, command).await,
        Command::Admin(command) => run_admin(client, command).await,
    }
}

async fn run_projects(client: &ProjectDeskClient, command: ProjectCommand) -> anyhow::Result<()> {
    match command {
        ProjectCommand::List => print_json(&client.list_projects().await?),
        ProjectCommand::Get { id } => print_json(&client.get_project(id).await?),
        ProjectCommand::Create { title, description } => {
            let mut project = ProjectCreate::new(title);
            if let Some(description) = description {
                project = project.description(description);
            }
            print_json(&client.create_project(&project).await?)
        }
        ProjectCommand::Update {
            id,
            title,
            description,
        } => {
            let update = ProjectUpdate { title, description };
            print_json(&client.update_project(id, &update).await?)
        }
        ProjectCommand::Delete { id } => {
            client.delete_project(id).await?;
            print_json(&serde_json::json!({ "deleted": id }))
        }
    }
}

async fn run_admin(client: &ProjectDeskClient, command: AdminCommand) -> anyhow::Result<()> {
    match command {
        AdminCommand::Stats => print_json(&client.user_stats().await?),
        AdminCommand::Users {
            skip,
            limit,
            include_deleted,
        } => print_json(&client.list_users(skip, limit, include_deleted).await?),
        AdminCommand::Activate { user_id } => print_json(&client.activate_user(user_id).await?),
        AdminCommand::Deactivate { user_id } => print_json(&client.deactivate_user(user_id).await?),
        AdminCommand::Role { user_id, role } => {
            print_json(&client.change_user_role(user_id, role).await?)
        }
        AdminCommand::Delete { user_id } => print_json(&client.delete_user(user_id).await?),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// Tracing
// ---------------------------------------------------------------------------

fn init_tracing(config: &ClientConfig) {
    // RUST_LOG env var takes precedence over config file
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = &config.logging.level;
        // Set projectdesk to the configured level, dependencies to warn
        EnvFilter::new(format!("projectdesk={level},warn"))
    });

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    if config.logging.json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}
