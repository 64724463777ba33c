//! Notification delivery and inbox management.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use cardvault_core::error::AppError;
use cardvault_core::result::AppResult;
use cardvault_core::types::NotificationId;
use cardvault_database::store::NotificationStore;
use cardvault_entity::notification::{Notification, NotificationEvent};

use crate::context::RequestContext;

/// Sink for share and transfer notifications.
///
/// Callers treat delivery as best effort: an error is logged by the
/// caller and never undoes the operation that raised the event.
#[async_trait]
pub trait Notifier: Send + Sync + 'static {
    /// Deliver one notification.
    async fn notify(&self, event: &NotificationEvent) -> AppResult<()>;
}

/// Persists notifications and serves each user's inbox.
#[derive(Clone)]
pub struct NotificationService {
    /// Notification store.
    store: Arc<dyn NotificationStore>,
}

impl std::fmt::Debug for NotificationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationService").finish()
    }
}

impl NotificationService {
    /// Creates a new notification service.
    pub fn new(store: Arc<dyn NotificationStore>) -> Self {
        Self { store }
    }

    /// Lists notifications for the current user, newest first.
    pub async fn list_for_user(
        &self,
        ctx: &RequestContext,
        unread_only: bool,
    ) -> AppResult<Vec<Notification>> {
        self.store.list_for_user(ctx.user_id, unread_only).await
    }

    /// Marks one of the current user's notifications as read.
    pub async fn mark_read(
        &self,
        ctx: &RequestContext,
        notification_id: NotificationId,
    ) -> AppResult<()> {
        if self.store.mark_read(notification_id, ctx.user_id).await? {
            debug!(user_id = %ctx.user_id, %notification_id, "Notification marked read");
            Ok(())
        } else {
            Err(AppError::not_found("Notification not found"))
        }
    }
}

#[async_trait]
impl Notifier for NotificationService {
    async fn notify(&self, event: &NotificationEvent) -> AppResult<()> {
        let notification = Notification::from_event(event);
        self.store.create(&notification).await?;

        info!(
            recipient_id = %notification.recipient_id,
            kind = ?notification.kind,
            resource_id = %notification.resource_id,
            "Notification stored"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardvault_core::error::ErrorKind;
    use cardvault_core::types::{ResourceId, UserId};
    use cardvault_database::MemoryStore;
    use cardvault_entity::notification::NotificationKind;
    use cardvault_entity::resource::ResourceKind;
    use cardvault_entity::share::SharePermissions;

    fn share_event(recipient_id: UserId) -> NotificationEvent {
        NotificationEvent {
            kind: NotificationKind::ShareReceived,
            recipient_id,
            actor_id: UserId::new(),
            actor_display_name: "Alice".to_string(),
            resource_type: ResourceKind::Card,
            resource_id: ResourceId::new(),
            permissions: Some(SharePermissions {
                can_edit: true,
                ..SharePermissions::VIEW_ONLY
            }),
        }
    }

    #[tokio::test]
    async fn test_notify_persists_into_inbox() {
        let service = NotificationService::new(Arc::new(MemoryStore::new()));
        let ctx = RequestContext::new(UserId::new());

        service.notify(&share_event(ctx.user_id)).await.expect("notify");

        let inbox = service.list_for_user(&ctx, false).await.expect("list");
        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox[0].message, "Alice shared a card with you");
        assert!(inbox[0].permissions.as_ref().is_some_and(|p| p.can_edit));
    }

    #[tokio::test]
    async fn test_mark_read_of_foreign_notification_is_not_found() {
        let service = NotificationService::new(Arc::new(MemoryStore::new()));
        let recipient = RequestContext::new(UserId::new());
        let other = RequestContext::new(UserId::new());
        service.notify(&share_event(recipient.user_id)).await.expect("notify");
        let id = service.list_for_user(&recipient, true).await.expect("list")[0].id;

        let err = service.mark_read(&other, id).await.expect_err("foreign");
        assert_eq!(err.kind, ErrorKind::NotFound);

        service.mark_read(&recipient, id).await.expect("own");
        assert!(service.list_for_user(&recipient, true).await.expect("list").is_empty());
    }
}
