//! One-shot notification commands over the pull client.

use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use finboard_core::config::AppConfig;
use finboard_core::error::AppError;
use finboard_entity::Notification;
use finboard_sync::pull::{HttpPullClient, PullTransport};
use finboard_sync::token::SessionToken;

/// Notification display row
#[derive(Debug, Serialize, Tabled)]
struct NotificationRow {
    /// ID
    id: String,
    /// Event
    event: String,
    /// Title
    title: String,
    /// Read
    read: String,
    /// Critical
    critical: String,
    /// Created
    created: String,
}

impl From<&Notification> for NotificationRow {
    fn from(n: &Notification) -> Self {
        Self {
            id: n.id.clone(),
            event: n.event.as_str().to_string(),
            title: n.title.clone(),
            read: if n.is_read { "✓" } else { "✗" }.to_string(),
            critical: if n.is_critical { "!" } else { "" }.to_string(),
            created: n.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

fn client(config: &AppConfig, token: SessionToken) -> Result<HttpPullClient, AppError> {
    HttpPullClient::new(&config.api, &config.sync, token)
}

/// List the current snapshot
pub async fn list(
    config: &AppConfig,
    token: SessionToken,
    format: OutputFormat,
) -> Result<(), AppError> {
    let snapshot = client(config, token)?.fetch_snapshot().await?;
    let rows: Vec<NotificationRow> = snapshot.items.iter().map(NotificationRow::from).collect();
    output::print_list(&rows, format);
    println!("Unread: {}", snapshot.unread_count);
    Ok(())
}

/// Show the unread count
pub async fn unread(config: &AppConfig, token: SessionToken) -> Result<(), AppError> {
    let count = client(config, token)?.fetch_unread_count().await?;
    println!("{count}");
    Ok(())
}

/// Mark one notification as read
pub async fn mark_read(
    config: &AppConfig,
    token: SessionToken,
    id: &str,
) -> Result<(), AppError> {
    client(config, token)?.mark_read(id).await?;
    output::print_success(&format!("Marked {id} as read"));
    Ok(())
}

/// Mark every notification as read
pub async fn mark_all_read(config: &AppConfig, token: SessionToken) -> Result<(), AppError> {
    let count = client(config, token)?.mark_all_read().await?;
    output::print_success(&format!("Marked {count} notifications as read"));
    Ok(())
}

/// Delete a notification, confirming unless forced
pub async fn delete(
    config: &AppConfig,
    token: SessionToken,
    id: &str,
    force: bool,
) -> Result<(), AppError> {
    if !force {
        let confirmed = dialoguer::Confirm::new()
            .with_prompt(format!("Delete notification {id}?"))
            .default(false)
            .interact()
            .map_err(|e| AppError::internal(format!("Prompt failed: {e}")))?;
        if !confirmed {
            output::print_warning("Aborted");
            return Ok(());
        }
    }
    client(config, token)?.delete(id).await?;
    output::print_success(&format!("Deleted {id}"));
    Ok(())
}
