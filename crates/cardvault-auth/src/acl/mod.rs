//! Resource-level access control.

pub mod resolver;

pub use resolver::PermissionResolver;
