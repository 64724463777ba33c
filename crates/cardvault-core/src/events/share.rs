//! Share-related domain events.

use serde::{Deserialize, Serialize};

use crate::types::id::{ResourceId, ShareId, UserId};

/// Events related to sharing operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ShareEvent {
    /// A share was created.
    Created {
        /// The share ID.
        share_id: ShareId,
        /// The resource type being shared.
        resource_type: String,
        /// The resource ID.
        resource_id: ResourceId,
        /// The user receiving access.
        grantee_id: UserId,
    },
    /// The capability flags of a share were changed.
    Updated {
        /// The share ID.
        share_id: ShareId,
        /// The resource type.
        resource_type: String,
        /// The resource ID.
        resource_id: ResourceId,
    },
    /// A share was revoked by the owner.
    Revoked {
        /// The share ID.
        share_id: ShareId,
        /// The resource type.
        resource_type: String,
        /// The resource ID.
        resource_id: ResourceId,
    },
}
