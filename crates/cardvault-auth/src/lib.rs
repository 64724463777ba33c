//! # cardvault-auth
//!
//! Authorization for CardVault resources.
//!
//! ## Modules
//!
//! - `acl`: effective permission resolution from ownership and shares

pub mod acl;

pub use acl::PermissionResolver;
