//! Command-line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use projectdesk::{SessionMode, UserRole};

#[derive(Debug, Parser)]
#[command(name = "projectdesk", version, about = "ProjectDesk API client")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, env = "PROJECTDESK_CONFIG", default_value = "projectdesk.toml")]
    pub config: PathBuf,

    /// API base URL (overrides the config file)
    #[arg(long)]
    pub api_url: Option<String>,

    /// Session mode: token or cookie
    #[arg(long)]
    pub mode: Option<SessionMode>,

    /// Emit logs as JSON
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in with email and password
    Login(Credentials),
    /// Sign out and forget the stored session
    Logout,
    /// Create an account
    Register {
        #[command(flatten)]
        credentials: Credentials,
        #[arg(long)]
        full_name: Option<String>,
    },
    /// Show the signed-in user
    Whoami,
    /// Report whether a session is held
    Status,
    /// Check the server is up
    Health,
    /// Print the Google sign-in URL
    OauthUrl,
    /// Manage projects
    #[command(subcommand)]
    Projects(ProjectCommand),
    /// Administer accounts (admin only)
    #[command(subcommand)]
    Admin(AdminCommand),
}

#[derive(Debug, Args)]
pub struct Credentials {
    #[arg(long)]
    pub email: String,
    #[arg(long, env = "PROJECTDESK_PASSWORD", hide_env_values = true)]
    pub password: String,
}

#[derive(Debug, Subcommand)]
pub enum ProjectCommand {
    List,
    Get {
        id: i64,
    },
    Create {
        title: String,
        #[arg(long)]
        description: Option<String>,
    },
    Update {
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    Delete {
        id: i64,
    },
}

#[derive(Debug, Subcommand)]
pub enum AdminCommand {
    Stats,
    Users {
        #[arg(long)]
        skip: Option<u32>,
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long)]
        include_deleted: bool,
    },
    Activate {
        user_id: i64,
    },
    Deactivate {
        user_id: i64,
    },
    Role {
        user_id: i64,
        role: UserRole,
    },
    Delete {
        user_id: i64,
    },
}
