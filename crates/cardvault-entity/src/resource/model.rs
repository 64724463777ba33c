//! Resource entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use cardvault_core::types::{ResourceId, UserId};

use super::kind::ResourceKind;

/// The access-relevant projection of a card, voucher, or gift card row.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Resource {
    /// Unique resource identifier.
    pub id: ResourceId,
    /// Which table the row came from.
    pub kind: ResourceKind,
    /// Current owner. Only empty while the creating workflow is in flight.
    pub owner_id: Option<UserId>,
    /// Display name of the resource.
    pub name: String,
    /// When the resource was created.
    pub created_at: DateTime<Utc>,
    /// When the resource was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Resource {
    /// Whether `user_id` is the current owner.
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.owner_id == Some(user_id)
    }
}
