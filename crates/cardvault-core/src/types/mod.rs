//! Shared types used across CardVault crates.

pub mod id;

pub use id::{FavoriteId, NotificationId, ResourceId, ShareId, UserId};
