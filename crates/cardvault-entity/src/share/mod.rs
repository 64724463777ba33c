//! Share domain entities.

pub mod model;
pub mod view;

pub use model::{CreateShare, Share, SharePermissions};
pub use view::{ReceivedShare, ShareView};
