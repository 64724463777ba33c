//! CLI command definitions and dispatch.

pub mod config;
pub mod favorite;
pub mod migrate;
pub mod notifications;
pub mod permissions;
pub mod share;
pub mod transfer;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use cardvault_auth::PermissionResolver;
use cardvault_core::config::AppConfig;
use cardvault_core::error::AppError;
use cardvault_core::types::UserId;
use cardvault_database::{DatabasePool, Stores};
use cardvault_entity::resource::ResourceKind;
use cardvault_service::{
    FavoriteService, NotificationService, RequestContext, ShareService, TransferService,
};

use crate::output::OutputFormat;

/// CardVault: sharing and ownership administration
#[derive(Debug, Parser)]
#[command(name = "cardvault", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

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
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// Configuration management
    Config(config::ConfigArgs),
    /// Effective permission lookup
    Permissions(permissions::PermissionsArgs),
    /// Share management
    Share(share::ShareArgs),
    /// Ownership transfer
    Transfer(transfer::TransferArgs),
    /// Favorite markers
    Favorite(favorite::FavoriteArgs),
    /// Notification inbox
    Notifications(notifications::NotificationsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        match &self.command {
            Commands::Migrate(args) => migrate::execute(args, &self.config).await,
            Commands::Config(args) => config::execute(args, &self.config, self.format).await,
            Commands::Permissions(args) => {
                permissions::execute(args, &self.config, self.format).await
            }
            Commands::Share(args) => share::execute(args, &self.config, self.format).await,
            Commands::Transfer(args) => transfer::execute(args, &self.config).await,
            Commands::Favorite(args) => favorite::execute(args, &self.config, self.format).await,
            Commands::Notifications(args) => {
                notifications::execute(args, &self.config, self.format).await
            }
        }
    }
}

/// Every service wired to PostgreSQL.
pub struct Services {
    /// Permission resolver.
    pub resolver: PermissionResolver,
    /// Share service.
    pub shares: ShareService,
    /// Transfer service.
    pub transfers: TransferService,
    /// Favorite service.
    pub favorites: FavoriteService,
    /// Notification service.
    pub notifications: NotificationService,
}

/// Helper: load configuration from file
pub fn load_config(config_path: &str) -> Result<AppConfig, AppError> {
    AppConfig::load(config_path)
}

/// Helper: create database pool from config
pub async fn create_db_pool(config: &AppConfig) -> Result<sqlx::PgPool, AppError> {
    let pool = DatabasePool::connect(&config.database).await?;
    Ok(pool.into_pool())
}

/// Helper: connect and build every service
pub async fn connect(config_path: &str) -> Result<Services, AppError> {
    let config = load_config(config_path)?;
    let stores = Stores::postgres(create_db_pool(&config).await?);
    let notifications = NotificationService::new(stores.notifications.clone());
    let notifier = Arc::new(notifications.clone());

    Ok(Services {
        resolver: PermissionResolver::from_stores(&stores),
        shares: ShareService::from_stores(&stores, notifier.clone(), config.sharing.clone()),
        transfers: TransferService::from_stores(&stores, notifier, config.sharing.clone()),
        favorites: FavoriteService::new(stores.favorites.clone()),
        notifications,
    })
}

/// Helper: parse the acting user into a request context
pub fn acting_as(raw: &str) -> Result<RequestContext, AppError> {
    Ok(RequestContext::new(UserId::parse(raw)?))
}

/// Helper: parse a resource kind argument
pub fn parse_kind(raw: &str) -> Result<ResourceKind, AppError> {
    raw.parse()
}
