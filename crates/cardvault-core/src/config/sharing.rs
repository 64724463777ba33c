//! Sharing and ownership transfer configuration.

use serde::{Deserialize, Serialize};

/// Controls the side effects of share and transfer operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharingConfig {
    /// Notify the grantee when a resource is shared with them.
    #[serde(default = "default_true")]
    pub notify_on_share: bool,
    /// Notify the new owner when a resource is transferred to them.
    #[serde(default = "default_true")]
    pub notify_on_transfer: bool,
}

impl Default for SharingConfig {
    fn default() -> Self {
        Self {
            notify_on_share: true,
            notify_on_transfer: true,
        }
    }
}

fn default_true() -> bool {
    true
}
