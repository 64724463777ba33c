//! Notification inbox CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use cardvault_core::error::AppError;
use cardvault_core::types::NotificationId;

/// Arguments for notification commands
#[derive(Debug, Args)]
pub struct NotificationsArgs {
    /// Notification subcommand
    #[command(subcommand)]
    pub command: NotificationsCommand,
}

/// Notification subcommands
#[derive(Debug, Subcommand)]
pub enum NotificationsCommand {
    /// List a user's notifications
    List {
        /// Recipient's user ID
        #[arg(long = "as")]
        acting_user: String,
        /// Only unread notifications
        #[arg(long)]
        unread: bool,
    },
    /// Mark a notification as read
    Read {
        /// Recipient's user ID
        #[arg(long = "as")]
        acting_user: String,
        /// Notification ID
        id: String,
    },
}

/// Notification display row
#[derive(Debug, Serialize, Tabled)]
struct NotificationRow {
    id: String,
    message: String,
    read: String,
    created_at: String,
}

/// Execute notification commands
pub async fn execute(
    args: &NotificationsArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        NotificationsCommand::List {
            acting_user,
            unread,
        } => {
            let ctx = super::acting_as(acting_user)?;
            let services = super::connect(config_path).await?;

            let notifications = services.notifications.list_for_user(&ctx, *unread).await?;
            match format {
                OutputFormat::Json => output::print_item(&notifications, format),
                OutputFormat::Table => {
                    let rows: Vec<NotificationRow> = notifications
                        .iter()
                        .map(|n| NotificationRow {
                            id: n.id.to_string(),
                            message: n.message.clone(),
                            read: output::yes_no(n.is_read),
                            created_at: n.created_at.format("%Y-%m-%d %H:%M").to_string(),
                        })
                        .collect();
                    output::print_list(&rows, format);
                }
            }
        }
        NotificationsCommand::Read { acting_user, id } => {
            let ctx = super::acting_as(acting_user)?;
            let id = NotificationId::parse(id)?;
            let services = super::connect(config_path).await?;

            services.notifications.mark_read(&ctx, id).await?;
            output::print_success("Notification marked as read");
        }
    }

    Ok(())
}
