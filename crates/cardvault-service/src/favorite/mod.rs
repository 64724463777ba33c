//! Per-user favorite markers on resources.

pub mod service;

pub use service::FavoriteService;
