//! Favorite domain entities.

pub mod model;

pub use model::Favorite;
