//! Ownership transfer domain events.

use serde::{Deserialize, Serialize};

use crate::types::id::{ResourceId, UserId};

/// Events related to ownership transfer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TransferEvent {
    /// Ownership moved to a new user and all shares were revoked.
    Completed {
        /// The resource type.
        resource_type: String,
        /// The resource ID.
        resource_id: ResourceId,
        /// Owner before the transfer.
        previous_owner: UserId,
        /// Owner after the transfer.
        new_owner: UserId,
        /// Number of shares revoked by the transfer.
        revoked_shares: u64,
    },
}
