//! Derived access permissions.

pub mod model;

pub use model::ResourcePermissions;
