//! # cardvault-database
//!
//! Persistence for CardVault. The [`store`] module defines the store
//! contracts the access-control layer relies on; [`repositories`]
//! implements them on PostgreSQL and [`memory`] implements them in
//! process for tests and single-node tooling.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

mod schema;

pub use connection::DatabasePool;
pub use memory::MemoryStore;
pub use store::{FavoriteStore, NotificationStore, ResourceStore, ShareStore, Stores, UserStore};
