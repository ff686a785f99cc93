//! CLI command definitions and dispatch.

pub mod notifications;
pub mod watch;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;
use finboard_core::config::AppConfig;
use finboard_core::error::AppError;
use finboard_sync::token::SessionToken;

/// Notification client for the Finboard dashboard
#[derive(Debug, Parser)]
#[command(name = "finboard", version, about, long_about = None)]
pub struct Cli {
    /// Configuration file name, without extension
    #[arg(short, long, default_value = "config/default")]
    pub config: String,

    /// Session token (falls back to the FINBOARD_TOKEN environment variable)
    #[arg(short, long)]
    pub token: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the synchronization engine and print alerts as they arrive
    Watch,
    /// List the current notification snapshot
    List,
    /// Show the unread notification count
    Unread,
    /// Mark a single notification as read
    MarkRead {
        /// Notification ID
        id: String,
    },
    /// Mark every notification as read
    MarkAllRead,
    /// Delete a notification
    Delete {
        /// Notification ID
        id: String,
        /// Skip confirmation
        #[arg(long)]
        force: bool,
    },
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: AppConfig) -> Result<(), AppError> {
        let token = self.resolve_token()?;

        match &self.command {
            Commands::Watch => watch::execute(config, token).await,
            Commands::List => notifications::list(&config, token, self.format).await,
            Commands::Unread => notifications::unread(&config, token).await,
            Commands::MarkRead { id } => notifications::mark_read(&config, token, id).await,
            Commands::MarkAllRead => notifications::mark_all_read(&config, token).await,
            Commands::Delete { id, force } => {
                notifications::delete(&config, token, id, *force).await
            }
        }
    }

    fn resolve_token(&self) -> Result<SessionToken, AppError> {
        let raw = match &self.token {
            Some(t) => t.clone(),
            None => std::env::var("FINBOARD_TOKEN").map_err(|_| {
                AppError::authentication(
                    "No session token; pass --token or set FINBOARD_TOKEN",
                )
            })?,
        };
        Ok(SessionToken::new(raw))
    }
}
