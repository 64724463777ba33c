//! Shareable resource entities: cards, vouchers, and gift cards.

pub mod kind;
pub mod model;

pub use kind::{CapabilityGrain, ResourceKind};
pub use model::Resource;
