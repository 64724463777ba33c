//! Favorite entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use cardvault_core::types::{FavoriteId, ResourceId, UserId};

use crate::resource::ResourceKind;

/// A user's favorite marker on a resource.
///
/// Toggling off sets `deleted_at`; toggling on again clears it on the
/// same row, so `id` and `created_at` survive any number of cycles.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Favorite {
    /// Unique favorite identifier.
    pub id: FavoriteId,
    /// User who marked the resource.
    pub user_id: UserId,
    /// Kind of the marked resource.
    pub resource_type: ResourceKind,
    /// The marked resource.
    pub resource_id: ResourceId,
    /// When the row was first created.
    pub created_at: DateTime<Utc>,
    /// When the row was last toggled.
    pub updated_at: DateTime<Utc>,
    /// Tombstone.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Favorite {
    /// Whether the favorite is currently on.
    pub fn is_active(&self) -> bool {
        self.deleted_at.is_none()
    }
}
