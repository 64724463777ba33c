//! Notifications raised by sharing and ownership transfer.

pub mod service;

pub use service::{NotificationService, Notifier};
