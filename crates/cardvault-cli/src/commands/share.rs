//! Share management CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use cardvault_core::error::AppError;
use cardvault_core::types::{ResourceId, ShareId};
use cardvault_entity::share::SharePermissions;
use cardvault_service::{CreateShareRequest, UpdateShareRequest};

/// Arguments for share commands
#[derive(Debug, Args)]
pub struct ShareArgs {
    /// Share subcommand
    #[command(subcommand)]
    pub command: ShareCommand,
}

/// Capability flags accepted by create and update
#[derive(Debug, Clone, Copy, Args)]
pub struct FlagArgs {
    /// Allow the grantee to edit
    #[arg(long)]
    pub can_edit: bool,
    /// Allow the grantee to delete
    #[arg(long)]
    pub can_delete: bool,
    /// Allow the grantee to edit gift card transactions
    #[arg(long)]
    pub can_edit_transactions: bool,
}

impl From<FlagArgs> for SharePermissions {
    fn from(flags: FlagArgs) -> Self {
        Self {
            can_edit: flags.can_edit,
            can_delete: flags.can_delete,
            can_edit_transactions: flags.can_edit_transactions,
        }
    }
}

/// Share subcommands
#[derive(Debug, Subcommand)]
pub enum ShareCommand {
    /// List active shares of a resource
    List {
        /// Resource kind: card, voucher, or gift_card
        #[arg(long)]
        kind: String,
        /// Resource ID
        resource: String,
    },
    /// Share a resource with a user by email
    Create {
        /// Owner's user ID
        #[arg(long = "as")]
        acting_user: String,
        /// Resource kind: card, voucher, or gift_card
        #[arg(long)]
        kind: String,
        /// Resource ID
        resource: String,
        /// Grantee email
        #[arg(long)]
        email: String,
        /// Capability flags
        #[command(flatten)]
        flags: FlagArgs,
    },
    /// Replace the capability flags of a share
    Update {
        /// Owner's user ID
        #[arg(long = "as")]
        acting_user: String,
        /// Resource kind: card or gift_card
        #[arg(long)]
        kind: String,
        /// Resource ID
        resource: String,
        /// Share ID
        #[arg(long)]
        share: String,
        /// Capability flags
        #[command(flatten)]
        flags: FlagArgs,
    },
    /// Revoke a share
    Delete {
        /// Owner's user ID
        #[arg(long = "as")]
        acting_user: String,
        /// Resource kind: card, voucher, or gift_card
        #[arg(long)]
        kind: String,
        /// Resource ID
        resource: String,
        /// Share ID
        #[arg(long)]
        share: String,
    },
    /// List resources shared with a user
    Received {
        /// Grantee's user ID
        #[arg(long = "as")]
        acting_user: String,
        /// Resource kind: card, voucher, or gift_card
        #[arg(long)]
        kind: String,
    },
}

/// Share display row for the owner's view
#[derive(Debug, Serialize, Tabled)]
struct ShareRow {
    id: String,
    email: String,
    name: String,
    edit: String,
    delete: String,
    transactions: String,
    created_at: String,
}

/// Share display row for the grantee's view
#[derive(Debug, Serialize, Tabled)]
struct ReceivedRow {
    share_id: String,
    resource_id: String,
    resource: String,
    edit: String,
    delete: String,
    transactions: String,
    created_at: String,
}

/// Execute share commands
pub async fn execute(
    args: &ShareArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        ShareCommand::List { kind, resource } => {
            let kind = super::parse_kind(kind)?;
            let resource_id = ResourceId::parse(resource)?;
            let services = super::connect(config_path).await?;

            let shares = services.shares.list(kind, resource_id).await?;
            match format {
                OutputFormat::Json => output::print_item(&shares, format),
                OutputFormat::Table => {
                    let rows: Vec<ShareRow> = shares
                        .iter()
                        .map(|s| {
                            let flags = s.permissions();
                            ShareRow {
                                id: s.id.to_string(),
                                email: s.grantee_email.clone(),
                                name: s.grantee_name.clone().unwrap_or_default(),
                                edit: output::yes_no(flags.can_edit),
                                delete: output::yes_no(flags.can_delete),
                                transactions: output::yes_no(flags.can_edit_transactions),
                                created_at: s.created_at.format("%Y-%m-%d %H:%M").to_string(),
                            }
                        })
                        .collect();
                    output::print_list(&rows, format);
                }
            }
        }
        ShareCommand::Create {
            acting_user,
            kind,
            resource,
            email,
            flags,
        } => {
            let ctx = super::acting_as(acting_user)?;
            let kind = super::parse_kind(kind)?;
            let request = CreateShareRequest {
                resource_id: ResourceId::parse(resource)?,
                grantee_email: email.clone(),
                permissions: (*flags).into(),
            };
            let services = super::connect(config_path).await?;

            let share = services.shares.create(&ctx, kind, request).await?;
            output::print_success(&format!("Shared with '{email}' (share {})", share.id));
        }
        ShareCommand::Update {
            acting_user,
            kind,
            resource,
            share,
            flags,
        } => {
            let ctx = super::acting_as(acting_user)?;
            let kind = super::parse_kind(kind)?;
            let request = UpdateShareRequest {
                share_id: ShareId::parse(share)?,
                resource_id: ResourceId::parse(resource)?,
                permissions: (*flags).into(),
            };
            let services = super::connect(config_path).await?;

            let share = services.shares.update(&ctx, kind, request).await?;
            output::print_success(&format!("Share {} updated", share.id));
        }
        ShareCommand::Delete {
            acting_user,
            kind,
            resource,
            share,
        } => {
            let ctx = super::acting_as(acting_user)?;
            let kind = super::parse_kind(kind)?;
            let resource_id = ResourceId::parse(resource)?;
            let share_id = ShareId::parse(share)?;
            let services = super::connect(config_path).await?;

            services
                .shares
                .delete(&ctx, kind, resource_id, share_id)
                .await?;
            output::print_success(&format!("Share {share_id} revoked"));
        }
        ShareCommand::Received { acting_user, kind } => {
            let ctx = super::acting_as(acting_user)?;
            let kind = super::parse_kind(kind)?;
            let services = super::connect(config_path).await?;

            let received = services.shares.list_shared_with(&ctx, kind).await?;
            match format {
                OutputFormat::Json => output::print_item(&received, format),
                OutputFormat::Table => {
                    let rows: Vec<ReceivedRow> = received
                        .iter()
                        .map(|r| ReceivedRow {
                            share_id: r.share_id.to_string(),
                            resource_id: r.resource_id.to_string(),
                            resource: r.resource_name.clone(),
                            edit: output::yes_no(r.can_edit),
                            delete: output::yes_no(r.can_delete),
                            transactions: output::yes_no(r.can_edit_transactions),
                            created_at: r.created_at.format("%Y-%m-%d %H:%M").to_string(),
                        })
                        .collect();
                    output::print_list(&rows, format);
                }
            }
        }
    }

    Ok(())
}
