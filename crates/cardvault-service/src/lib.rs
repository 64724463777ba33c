//! # cardvault-service
//!
//! Business logic for sharing and ownership of cards, vouchers, and gift
//! cards. Each service orchestrates the stores, the permission resolver,
//! and the notifier to implement one application-level use case.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod context;
pub mod favorite;
pub mod notification;
pub mod share;
pub mod transfer;

pub use context::RequestContext;
pub use favorite::FavoriteService;
pub use notification::{NotificationService, Notifier};
pub use share::{
    CardShareAdapter, CreateShareRequest, GiftCardShareAdapter, ShareAdapter, ShareAdapters,
    ShareService, UpdateShareRequest, VoucherShareAdapter,
};
pub use transfer::TransferService;
