//! Share entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use cardvault_core::types::{ResourceId, ShareId, UserId};

use crate::resource::CapabilityGrain;

/// Capability flags carried by a share.
///
/// Flags outside a resource kind's [`CapabilityGrain`] are always `false`
/// once stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharePermissions {
    /// Grantee may edit the resource.
    #[serde(default)]
    pub can_edit: bool,
    /// Grantee may delete the resource.
    #[serde(default)]
    pub can_delete: bool,
    /// Grantee may add or edit gift card transactions.
    #[serde(default)]
    pub can_edit_transactions: bool,
}

impl SharePermissions {
    /// Read-only share.
    pub const VIEW_ONLY: SharePermissions = SharePermissions {
        can_edit: false,
        can_delete: false,
        can_edit_transactions: false,
    };

    /// Whether any flag lies outside the given grain.
    pub fn exceeds(&self, grain: CapabilityGrain) -> bool {
        (!grain.edit_delete && (self.can_edit || self.can_delete))
            || (!grain.transactions && self.can_edit_transactions)
    }

    /// Clear every flag the grain does not support.
    pub fn masked(self, grain: CapabilityGrain) -> Self {
        Self {
            can_edit: grain.edit_delete && self.can_edit,
            can_delete: grain.edit_delete && self.can_delete,
            can_edit_transactions: grain.transactions && self.can_edit_transactions,
        }
    }
}

/// A share granting a user access to a resource they do not own.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Share {
    /// Unique share identifier.
    pub id: ShareId,
    /// The shared resource.
    pub resource_id: ResourceId,
    /// User receiving access.
    pub grantee_id: UserId,
    /// Owner who created the share.
    pub shared_by: UserId,
    /// Grantee may edit.
    pub can_edit: bool,
    /// Grantee may delete.
    pub can_delete: bool,
    /// Grantee may edit gift card transactions.
    pub can_edit_transactions: bool,
    /// When the share was created.
    pub created_at: DateTime<Utc>,
    /// When the share flags were last changed.
    pub updated_at: DateTime<Utc>,
    /// Tombstone; a deleted share grants nothing.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Share {
    /// Whether the share is still in effect.
    pub fn is_active(&self) -> bool {
        self.deleted_at.is_none()
    }

    /// The capability flags of this share.
    pub fn permissions(&self) -> SharePermissions {
        SharePermissions {
            can_edit: self.can_edit,
            can_delete: self.can_delete,
            can_edit_transactions: self.can_edit_transactions,
        }
    }
}

/// Data required to insert a share.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateShare {
    /// The shared resource.
    pub resource_id: ResourceId,
    /// User receiving access.
    pub grantee_id: UserId,
    /// Owner creating the share.
    pub shared_by: UserId,
    /// Capability flags, already masked to the resource kind.
    pub permissions: SharePermissions,
}
