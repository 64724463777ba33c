//! Database migration management commands.

use clap::{Args, Subcommand};

use crate::output;
use cardvault_core::error::AppError;
use cardvault_database::DatabasePool;

/// Arguments for the migrate command
#[derive(Debug, Args)]
pub struct MigrateArgs {
    /// Migration subcommand
    #[command(subcommand)]
    pub command: MigrateCommand,
}

/// Migration subcommands
#[derive(Debug, Subcommand)]
pub enum MigrateCommand {
    /// Run all pending migrations
    Run,
}

/// Execute migration commands
pub async fn execute(args: &MigrateArgs, config_path: &str) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;
    let db = DatabasePool::connect(&config.database).await?;

    let result = match &args.command {
        MigrateCommand::Run => run(&db).await,
    };
    db.close().await;
    result
}

async fn run(db: &DatabasePool) -> Result<(), AppError> {
    output::print_kv("Server", &db.server_version().await?);
    println!("Running database migrations...");
    cardvault_database::migration::run_migrations(db.pool()).await?;
    output::print_success("All migrations applied successfully.");
    Ok(())
}
