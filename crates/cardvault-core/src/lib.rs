//! # cardvault-core
//!
//! Core crate for CardVault. Contains the unified error system,
//! configuration schemas, typed identifiers, and the domain events
//! emitted by sharing and ownership transfer.
//!
//! This crate has **no** internal dependencies on other CardVault crates.

pub mod config;
pub mod error;
pub mod events;
pub mod result;
pub mod types;

pub use error::{AppError, ErrorDisposition, ErrorKind};
pub use result::AppResult;
