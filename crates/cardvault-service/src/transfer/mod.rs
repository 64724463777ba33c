//! Ownership transfer of cards, vouchers, and gift cards.

pub mod service;

pub use service::TransferService;
