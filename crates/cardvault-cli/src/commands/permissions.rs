//! Effective permission lookup.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use cardvault_core::error::AppError;
use cardvault_core::types::{ResourceId, UserId};

/// Arguments for permission commands
#[derive(Debug, Args)]
pub struct PermissionsArgs {
    /// Permission subcommand
    #[command(subcommand)]
    pub command: PermissionsCommand,
}

/// Permission subcommands
#[derive(Debug, Subcommand)]
pub enum PermissionsCommand {
    /// Resolve what a user may do with a resource
    Resolve {
        /// User ID
        #[arg(long)]
        user: String,
        /// Resource kind: card, voucher, or gift_card
        #[arg(long)]
        kind: String,
        /// Resource ID
        resource: String,
    },
}

/// Resolved permissions row
#[derive(Debug, Serialize, Tabled)]
struct PermissionRow {
    view: String,
    edit: String,
    delete: String,
    transactions: String,
    owner: String,
}

/// Execute permission commands
pub async fn execute(
    args: &PermissionsArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        PermissionsCommand::Resolve {
            user,
            kind,
            resource,
        } => {
            let user_id = UserId::parse(user)?;
            let kind = super::parse_kind(kind)?;
            let resource_id = ResourceId::parse(resource)?;
            let services = super::connect(config_path).await?;

            let perms = services.resolver.resolve(user_id, kind, resource_id).await?;
            match format {
                OutputFormat::Json => output::print_item(&perms, format),
                OutputFormat::Table => output::print_list(
                    &[PermissionRow {
                        view: output::yes_no(perms.can_view),
                        edit: output::yes_no(perms.can_edit),
                        delete: output::yes_no(perms.can_delete),
                        transactions: output::yes_no(perms.can_edit_transactions),
                        owner: output::yes_no(perms.is_owner),
                    }],
                    format,
                ),
            }
        }
    }

    Ok(())
}
