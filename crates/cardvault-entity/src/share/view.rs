//! Read models for share listings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use cardvault_core::types::{ResourceId, ShareId, UserId};

use super::model::SharePermissions;

/// A non-deleted share with the grantee identity resolved, as shown to the owner.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ShareView {
    /// Share identifier.
    pub id: ShareId,
    /// The shared resource.
    pub resource_id: ResourceId,
    /// User receiving access.
    pub grantee_id: UserId,
    /// Grantee email.
    pub grantee_email: String,
    /// Grantee display name.
    pub grantee_name: Option<String>,
    /// Grantee may edit.
    pub can_edit: bool,
    /// Grantee may delete.
    pub can_delete: bool,
    /// Grantee may edit gift card transactions.
    pub can_edit_transactions: bool,
    /// When the share was created.
    pub created_at: DateTime<Utc>,
}

impl ShareView {
    /// The capability flags of this share.
    pub fn permissions(&self) -> SharePermissions {
        SharePermissions {
            can_edit: self.can_edit,
            can_delete: self.can_delete,
            can_edit_transactions: self.can_edit_transactions,
        }
    }
}

/// A resource shared with a user, as shown to the grantee.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ReceivedShare {
    /// Share identifier.
    pub share_id: ShareId,
    /// The shared resource.
    pub resource_id: ResourceId,
    /// Resource display name.
    pub resource_name: String,
    /// Owner who shared it.
    pub shared_by: UserId,
    /// Grantee may edit.
    pub can_edit: bool,
    /// Grantee may delete.
    pub can_delete: bool,
    /// Grantee may edit gift card transactions.
    pub can_edit_transactions: bool,
    /// When the share was created.
    pub created_at: DateTime<Utc>,
}
