//! Favorite CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use cardvault_core::error::AppError;
use cardvault_core::types::{ResourceId, UserId};

/// Arguments for favorite commands
#[derive(Debug, Args)]
pub struct FavoriteArgs {
    /// Favorite subcommand
    #[command(subcommand)]
    pub command: FavoriteCommand,
}

/// Favorite subcommands
#[derive(Debug, Subcommand)]
pub enum FavoriteCommand {
    /// Flip the favorite state of a resource
    Toggle {
        /// User ID
        #[arg(long)]
        user: String,
        /// Resource kind: card, voucher, or gift_card
        #[arg(long)]
        kind: String,
        /// Resource ID
        resource: String,
    },
    /// Show whether a resource is a favorite
    Status {
        /// User ID
        #[arg(long)]
        user: String,
        /// Resource kind: card, voucher, or gift_card
        #[arg(long)]
        kind: String,
        /// Resource ID
        resource: String,
    },
    /// List a user's favorites
    List {
        /// User ID
        #[arg(long)]
        user: String,
        /// Only this resource kind
        #[arg(long)]
        kind: Option<String>,
    },
}

/// Favorite display row
#[derive(Debug, Serialize, Tabled)]
struct FavoriteRow {
    kind: String,
    resource_id: String,
    since: String,
}

/// Execute favorite commands
pub async fn execute(
    args: &FavoriteArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        FavoriteCommand::Toggle {
            user,
            kind,
            resource,
        } => {
            let user_id = UserId::parse(user)?;
            let kind = super::parse_kind(kind)?;
            let resource_id = ResourceId::parse(resource)?;
            let services = super::connect(config_path).await?;

            let favorite = services.favorites.toggle(user_id, kind, resource_id).await?;
            if favorite.is_active() {
                output::print_success(&format!("{} added to favorites", kind.label()));
            } else {
                output::print_success(&format!("{} removed from favorites", kind.label()));
            }
        }
        FavoriteCommand::Status {
            user,
            kind,
            resource,
        } => {
            let user_id = UserId::parse(user)?;
            let kind = super::parse_kind(kind)?;
            let resource_id = ResourceId::parse(resource)?;
            let services = super::connect(config_path).await?;

            let favorite = services
                .favorites
                .is_favorite(user_id, kind, resource_id)
                .await?;
            output::print_kv("Favorite", &output::yes_no(favorite));
        }
        FavoriteCommand::List { user, kind } => {
            let user_id = UserId::parse(user)?;
            let kind = kind.as_deref().map(super::parse_kind).transpose()?;
            let services = super::connect(config_path).await?;

            let favorites = services.favorites.get_user_favorites(user_id, kind).await?;
            let rows: Vec<FavoriteRow> = favorites
                .iter()
                .map(|f| FavoriteRow {
                    kind: f.resource_type.to_string(),
                    resource_id: f.resource_id.to_string(),
                    since: f.updated_at.format("%Y-%m-%d %H:%M").to_string(),
                })
                .collect();
            output::print_list(&rows, format);
        }
    }

    Ok(())
}
