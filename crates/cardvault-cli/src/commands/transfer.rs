//! Ownership transfer command.

use clap::Args;

use crate::output;
use cardvault_core::error::AppError;
use cardvault_core::types::{ResourceId, UserId};

/// Arguments for the transfer command
#[derive(Debug, Args)]
pub struct TransferArgs {
    /// Current owner's user ID
    #[arg(long = "as")]
    pub acting_user: String,
    /// Resource kind: card, voucher, or gift_card
    #[arg(long)]
    pub kind: String,
    /// Resource ID
    pub resource: String,
    /// New owner's user ID
    #[arg(long)]
    pub to: String,
    /// Skip confirmation prompt
    #[arg(long)]
    pub yes: bool,
}

/// Execute the transfer command
pub async fn execute(args: &TransferArgs, config_path: &str) -> Result<(), AppError> {
    let ctx = super::acting_as(&args.acting_user)?;
    let kind = super::parse_kind(&args.kind)?;
    let resource_id = ResourceId::parse(&args.resource)?;
    let new_owner_id = UserId::parse(&args.to)?;

    if !args.yes {
        let confirm = dialoguer::Confirm::new()
            .with_prompt(format!(
                "Transfer {} {resource_id} to {new_owner_id}? All existing shares will be revoked.",
                kind.label().to_lowercase()
            ))
            .default(false)
            .interact()
            .map_err(|e| AppError::internal(format!("Input error: {e}")))?;

        if !confirm {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let services = super::connect(config_path).await?;
    let revoked = services
        .transfers
        .transfer(&ctx, kind, resource_id, new_owner_id)
        .await?;

    output::print_success(&format!(
        "{} transferred to {new_owner_id}; {revoked} share(s) revoked",
        kind.label()
    ));
    Ok(())
}
