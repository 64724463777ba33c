//! Sharing of cards, vouchers, and gift cards with other users.

pub mod adapter;
pub mod card;
pub mod gift_card;
pub mod registry;
pub mod service;
pub mod voucher;

pub use adapter::{AdapterBase, CreateShareRequest, ShareAdapter, UpdateShareRequest};
pub use card::CardShareAdapter;
pub use gift_card::GiftCardShareAdapter;
pub use registry::ShareAdapters;
pub use service::ShareService;
pub use voucher::VoucherShareAdapter;
