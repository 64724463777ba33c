//! Notification entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use cardvault_core::types::{NotificationId, ResourceId, UserId};

use crate::resource::ResourceKind;
use crate::share::SharePermissions;

/// Why a user is being notified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "notification_kind", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// A resource was shared with the recipient.
    ShareReceived,
    /// Ownership of a resource was transferred to the recipient.
    TransferReceived,
}

/// A notification request raised by a share or transfer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationEvent {
    /// Why the recipient is notified.
    pub kind: NotificationKind,
    /// User receiving the notification.
    pub recipient_id: UserId,
    /// User who performed the action.
    pub actor_id: UserId,
    /// Name of the actor as shown to the recipient.
    pub actor_display_name: String,
    /// Kind of the affected resource.
    pub resource_type: ResourceKind,
    /// The affected resource.
    pub resource_id: ResourceId,
    /// Granted flags, for share notifications on kinds with editable grains.
    pub permissions: Option<SharePermissions>,
}

impl NotificationEvent {
    /// One-line message text for the recipient.
    pub fn message(&self) -> String {
        match self.kind {
            NotificationKind::ShareReceived => format!(
                "{} shared a {} with you",
                self.actor_display_name,
                self.resource_type.label().to_lowercase()
            ),
            NotificationKind::TransferReceived => format!(
                "{} transferred a {} to you",
                self.actor_display_name,
                self.resource_type.label().to_lowercase()
            ),
        }
    }
}

/// A persisted notification.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Notification {
    /// Unique notification identifier.
    pub id: NotificationId,
    /// The recipient user.
    pub recipient_id: UserId,
    /// Why the recipient was notified.
    pub kind: NotificationKind,
    /// The user who triggered the notification.
    pub actor_id: UserId,
    /// Actor name at the time of the event.
    pub actor_display_name: String,
    /// Kind of the affected resource.
    pub resource_type: ResourceKind,
    /// The affected resource.
    pub resource_id: ResourceId,
    /// Granted flags for share notifications.
    pub permissions: Option<sqlx::types::Json<SharePermissions>>,
    /// Message text.
    pub message: String,
    /// Whether the recipient has read it.
    pub is_read: bool,
    /// When the notification was created.
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Build a new unread notification from an event.
    pub fn from_event(event: &NotificationEvent) -> Self {
        Self {
            id: NotificationId::new(),
            recipient_id: event.recipient_id,
            kind: event.kind,
            actor_id: event.actor_id,
            actor_display_name: event.actor_display_name.clone(),
            resource_type: event.resource_type,
            resource_id: event.resource_id,
            permissions: event.permissions.map(sqlx::types::Json),
            message: event.message(),
            is_read: false,
            created_at: Utc::now(),
        }
    }
}
