//! # cardvault-entity
//!
//! Domain entity models for CardVault. Every struct in this crate is
//! either a database row or a derived value object. Row types derive
//! `sqlx::FromRow`; derived values such as
//! [`ResourcePermissions`](permission::ResourcePermissions) are never
//! persisted.

pub mod favorite;
pub mod notification;
pub mod permission;
pub mod resource;
pub mod share;
pub mod user;
