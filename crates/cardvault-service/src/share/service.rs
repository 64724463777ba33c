//! Share orchestration: ownership gate, adapter dispatch, notification.

use std::sync::Arc;

use tracing::{info, warn};

use cardvault_auth::PermissionResolver;
use cardvault_core::config::SharingConfig;
use cardvault_core::error::AppError;
use cardvault_core::events::{DomainEvent, EventPayload, ShareEvent};
use cardvault_core::result::AppResult;
use cardvault_core::types::{ResourceId, ShareId};
use cardvault_database::store::{ShareStore, Stores, UserStore};
use cardvault_entity::notification::{NotificationEvent, NotificationKind};
use cardvault_entity::resource::ResourceKind;
use cardvault_entity::share::{ReceivedShare, Share, ShareView};

use super::adapter::{CreateShareRequest, ShareAdapter, UpdateShareRequest};
use super::registry::ShareAdapters;
use crate::context::RequestContext;
use crate::notification::Notifier;

/// Creates, updates, revokes, and lists shares on behalf of owners.
#[derive(Clone)]
pub struct ShareService {
    /// Kind-specific adapters.
    adapters: ShareAdapters,
    /// User lookups for notification text.
    users: Arc<dyn UserStore>,
    /// Share lookups for the grantee's view.
    shares: Arc<dyn ShareStore>,
    /// Notification sink.
    notifier: Arc<dyn Notifier>,
    /// Side-effect switches.
    config: SharingConfig,
}

impl std::fmt::Debug for ShareService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShareService")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ShareService {
    /// Creates a new share service.
    pub fn new(
        adapters: ShareAdapters,
        users: Arc<dyn UserStore>,
        shares: Arc<dyn ShareStore>,
        notifier: Arc<dyn Notifier>,
        config: SharingConfig,
    ) -> Self {
        Self {
            adapters,
            users,
            shares,
            notifier,
            config,
        }
    }

    /// Wires a share service over one store set.
    pub fn from_stores(
        stores: &Stores,
        notifier: Arc<dyn Notifier>,
        config: SharingConfig,
    ) -> Self {
        let resolver = PermissionResolver::from_stores(stores);
        Self::new(
            ShareAdapters::new(stores, &resolver),
            stores.users.clone(),
            stores.shares.clone(),
            notifier,
            config,
        )
    }

    /// Shares a resource with the user named in the request.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        kind: ResourceKind,
        req: CreateShareRequest,
    ) -> AppResult<Share> {
        let adapter = self.adapters.for_kind(kind);
        self.ensure_owner(adapter, ctx, req.resource_id).await?;

        let share = adapter.create_share(ctx.user_id, &req).await?;

        info!(
            user_id = %ctx.user_id,
            share_id = %share.id,
            resource_id = %share.resource_id,
            grantee_id = %share.grantee_id,
            %kind,
            "Share created"
        );
        log_event(
            ctx,
            ShareEvent::Created {
                share_id: share.id,
                resource_type: kind.to_string(),
                resource_id: share.resource_id,
                grantee_id: share.grantee_id,
            },
        );

        if self.config.notify_on_share {
            self.notify_grantee(ctx, adapter, &share).await;
        }

        Ok(share)
    }

    /// Re-applies capability flags to an existing share.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        kind: ResourceKind,
        req: UpdateShareRequest,
    ) -> AppResult<Share> {
        let adapter = self.adapters.for_kind(kind);
        self.ensure_owner(adapter, ctx, req.resource_id).await?;

        let share = adapter.update_share(ctx.user_id, &req).await?;

        info!(
            user_id = %ctx.user_id,
            share_id = %share.id,
            resource_id = %share.resource_id,
            %kind,
            "Share updated"
        );
        log_event(
            ctx,
            ShareEvent::Updated {
                share_id: share.id,
                resource_type: kind.to_string(),
                resource_id: share.resource_id,
            },
        );

        Ok(share)
    }

    /// Revokes a share.
    pub async fn delete(
        &self,
        ctx: &RequestContext,
        kind: ResourceKind,
        resource_id: ResourceId,
        share_id: ShareId,
    ) -> AppResult<()> {
        let adapter = self.adapters.for_kind(kind);
        self.ensure_owner(adapter, ctx, resource_id).await?;

        adapter.delete_share(ctx.user_id, resource_id, share_id).await?;

        info!(
            user_id = %ctx.user_id,
            %share_id,
            %resource_id,
            %kind,
            "Share revoked"
        );
        log_event(
            ctx,
            ShareEvent::Revoked {
                share_id,
                resource_type: kind.to_string(),
                resource_id,
            },
        );

        Ok(())
    }

    /// Lists the non-deleted shares of a resource, newest first.
    ///
    /// The caller is expected to have checked view access already.
    pub async fn list(
        &self,
        kind: ResourceKind,
        resource_id: ResourceId,
    ) -> AppResult<Vec<ShareView>> {
        self.adapters.for_kind(kind).list_shares(resource_id).await
    }

    /// Lists resources of one kind shared with the current user, newest first.
    pub async fn list_shared_with(
        &self,
        ctx: &RequestContext,
        kind: ResourceKind,
    ) -> AppResult<Vec<ReceivedShare>> {
        self.shares.list_received(kind, ctx.user_id).await
    }

    async fn ensure_owner(
        &self,
        adapter: &dyn ShareAdapter,
        ctx: &RequestContext,
        resource_id: ResourceId,
    ) -> AppResult<()> {
        if adapter.check_ownership(ctx.user_id, resource_id).await? {
            Ok(())
        } else {
            Err(AppError::forbidden(format!(
                "Only the owner can manage shares of this {}",
                adapter.kind().label().to_lowercase()
            )))
        }
    }

    /// Best effort: failures are logged and never reach the caller.
    async fn notify_grantee(
        &self,
        ctx: &RequestContext,
        adapter: &dyn ShareAdapter,
        share: &Share,
    ) {
        let owner = match self.users.find_by_id(ctx.user_id).await {
            Ok(Some(owner)) => owner,
            Ok(None) => {
                warn!(user_id = %ctx.user_id, "Sharing user vanished, skipping notification");
                return;
            }
            Err(e) => {
                warn!(
                    user_id = %ctx.user_id,
                    error = %e,
                    "Owner lookup failed, skipping notification"
                );
                return;
            }
        };

        let event = NotificationEvent {
            kind: NotificationKind::ShareReceived,
            recipient_id: share.grantee_id,
            actor_id: owner.id,
            actor_display_name: owner.visible_name().to_string(),
            resource_type: adapter.kind(),
            resource_id: share.resource_id,
            permissions: adapter.supports_edit().then(|| share.permissions()),
        };

        if let Err(e) = self.notifier.notify(&event).await {
            warn!(
                share_id = %share.id,
                grantee_id = %share.grantee_id,
                error = %e,
                "Share notification failed"
            );
        }
    }
}

fn log_event(ctx: &RequestContext, event: ShareEvent) {
    let event = DomainEvent::new(ctx.user_id, EventPayload::Share(event));
    info!(event = %event.to_log_line(), "Domain event");
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use cardvault_core::error::ErrorKind;
    use cardvault_database::MemoryStore;
    use cardvault_entity::share::SharePermissions;
    use cardvault_entity::user::User;

    use crate::notification::NotificationService;

    struct FailingNotifier;

    #[async_trait]
    impl Notifier for FailingNotifier {
        async fn notify(&self, _event: &NotificationEvent) -> AppResult<()> {
            Err(AppError::internal("mailer down"))
        }
    }

    struct Fixture {
        store: MemoryStore,
        stores: Stores,
        owner: User,
        grantee: User,
    }

    async fn fixture() -> Fixture {
        let store = MemoryStore::new();
        let owner = store.insert_user("owner@example.com", Some("Olive")).await;
        let grantee = store.insert_user("grantee@example.com", None).await;
        let stores = Stores::memory(store.clone());
        Fixture {
            store,
            stores,
            owner,
            grantee,
        }
    }

    fn request(
        resource_id: ResourceId,
        email: &str,
        permissions: SharePermissions,
    ) -> CreateShareRequest {
        CreateShareRequest {
            resource_id,
            grantee_email: email.to_string(),
            permissions,
        }
    }

    #[tokio::test]
    async fn test_create_notifies_grantee_with_flags() {
        let f = fixture().await;
        let notifications = NotificationService::new(f.stores.notifications.clone());
        let service = ShareService::from_stores(
            &f.stores,
            Arc::new(notifications.clone()),
            SharingConfig::default(),
        );
        let card = f.store.insert_resource(ResourceKind::Card, f.owner.id, "Gym").await;

        service
            .create(
                &RequestContext::new(f.owner.id),
                ResourceKind::Card,
                request(card.id, " Grantee@Example.com ", SharePermissions {
                    can_edit: true,
                    ..SharePermissions::VIEW_ONLY
                }),
            )
            .await
            .expect("create");

        let inbox = notifications
            .list_for_user(&RequestContext::new(f.grantee.id), false)
            .await
            .expect("inbox");
        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox[0].actor_display_name, "Olive");
        assert!(inbox[0].permissions.as_ref().is_some_and(|p| p.can_edit));
    }

    #[tokio::test]
    async fn test_voucher_notification_carries_no_flags() {
        let f = fixture().await;
        let notifications = NotificationService::new(f.stores.notifications.clone());
        let service = ShareService::from_stores(
            &f.stores,
            Arc::new(notifications.clone()),
            SharingConfig::default(),
        );
        let voucher = f.store.insert_resource(ResourceKind::Voucher, f.owner.id, "10% off").await;

        service
            .create(
                &RequestContext::new(f.owner.id),
                ResourceKind::Voucher,
                request(voucher.id, "grantee@example.com", SharePermissions::VIEW_ONLY),
            )
            .await
            .expect("create");

        let inbox = notifications
            .list_for_user(&RequestContext::new(f.grantee.id), false)
            .await
            .expect("inbox");
        assert!(inbox[0].permissions.is_none());
    }

    #[tokio::test]
    async fn test_notification_failure_does_not_fail_create() {
        let f = fixture().await;
        let service = ShareService::from_stores(
            &f.stores,
            Arc::new(FailingNotifier),
            SharingConfig::default(),
        );
        let card = f.store.insert_resource(ResourceKind::Card, f.owner.id, "Gym").await;

        let share = service
            .create(
                &RequestContext::new(f.owner.id),
                ResourceKind::Card,
                request(card.id, "grantee@example.com", SharePermissions::VIEW_ONLY),
            )
            .await
            .expect("create succeeds despite notifier");
        assert!(share.is_active());
    }

    #[tokio::test]
    async fn test_notifications_can_be_disabled() {
        let f = fixture().await;
        let notifications = NotificationService::new(f.stores.notifications.clone());
        let service = ShareService::from_stores(
            &f.stores,
            Arc::new(notifications.clone()),
            SharingConfig {
                notify_on_share: false,
                ..SharingConfig::default()
            },
        );
        let card = f.store.insert_resource(ResourceKind::Card, f.owner.id, "Gym").await;

        service
            .create(
                &RequestContext::new(f.owner.id),
                ResourceKind::Card,
                request(card.id, "grantee@example.com", SharePermissions::VIEW_ONLY),
            )
            .await
            .expect("create");

        let inbox = notifications
            .list_for_user(&RequestContext::new(f.grantee.id), false)
            .await
            .expect("inbox");
        assert!(inbox.is_empty());
    }

    #[tokio::test]
    async fn test_non_owner_cannot_manage_shares() {
        let f = fixture().await;
        let service = ShareService::from_stores(
            &f.stores,
            Arc::new(FailingNotifier),
            SharingConfig::default(),
        );
        let card = f.store.insert_resource(ResourceKind::Card, f.owner.id, "Gym").await;
        let intruder = RequestContext::new(f.grantee.id);

        let err = service
            .create(
                &intruder,
                ResourceKind::Card,
                request(card.id, "owner@example.com", SharePermissions::VIEW_ONLY),
            )
            .await
            .expect_err("not owner");
        assert_eq!(err.kind, ErrorKind::Forbidden);

        let err = service
            .delete(&intruder, ResourceKind::Card, card.id, ShareId::new())
            .await
            .expect_err("not owner");
        assert_eq!(err.kind, ErrorKind::Forbidden);
    }

    #[tokio::test]
    async fn test_unknown_grantee_and_self_share_are_rejected() {
        let f = fixture().await;
        let service = ShareService::from_stores(
            &f.stores,
            Arc::new(FailingNotifier),
            SharingConfig::default(),
        );
        let card = f.store.insert_resource(ResourceKind::Card, f.owner.id, "Gym").await;
        let ctx = RequestContext::new(f.owner.id);

        let err = service
            .create(
                &ctx,
                ResourceKind::Card,
                request(card.id, "nobody@example.com", SharePermissions::VIEW_ONLY),
            )
            .await
            .expect_err("unknown");
        assert_eq!(err.kind, ErrorKind::UserNotFound);

        let err = service
            .create(
                &ctx,
                ResourceKind::Card,
                request(card.id, "OWNER@example.com", SharePermissions::VIEW_ONLY),
            )
            .await
            .expect_err("self");
        assert_eq!(err.kind, ErrorKind::Validation);
        assert!(f.store.share_history(ResourceKind::Card, card.id).await.is_empty());
    }

    #[tokio::test]
    async fn test_delete_then_reshare_creates_fresh_row() {
        let f = fixture().await;
        let service = ShareService::from_stores(
            &f.stores,
            Arc::new(FailingNotifier),
            SharingConfig::default(),
        );
        let card = f.store.insert_resource(ResourceKind::Card, f.owner.id, "Gym").await;
        let ctx = RequestContext::new(f.owner.id);

        let first = service
            .create(
                &ctx,
                ResourceKind::Card,
                request(card.id, "grantee@example.com", SharePermissions::VIEW_ONLY),
            )
            .await
            .expect("create");
        service
            .delete(&ctx, ResourceKind::Card, card.id, first.id)
            .await
            .expect("delete");
        let err = service
            .delete(&ctx, ResourceKind::Card, card.id, first.id)
            .await
            .expect_err("already deleted");
        assert_eq!(err.kind, ErrorKind::NotFound);

        let second = service
            .create(
                &ctx,
                ResourceKind::Card,
                request(card.id, "grantee@example.com", SharePermissions::VIEW_ONLY),
            )
            .await
            .expect("re-share");
        assert_ne!(first.id, second.id);
        assert_eq!(
            f.store
                .share_history(ResourceKind::Card, card.id)
                .await
                .len(),
            2
        );
        assert_eq!(
            service
                .list(ResourceKind::Card, card.id)
                .await
                .expect("list")
                .len(),
            1
        );
    }

    #[tokio::test]
    async fn test_list_shared_with_shows_received_shares() {
        let f = fixture().await;
        let service = ShareService::from_stores(
            &f.stores,
            Arc::new(FailingNotifier),
            SharingConfig::default(),
        );
        let gift = f.store.insert_resource(ResourceKind::GiftCard, f.owner.id, "Books").await;

        service
            .create(
                &RequestContext::new(f.owner.id),
                ResourceKind::GiftCard,
                request(gift.id, "grantee@example.com", SharePermissions {
                    can_edit_transactions: true,
                    ..SharePermissions::VIEW_ONLY
                }),
            )
            .await
            .expect("create");

        let received = service
            .list_shared_with(&RequestContext::new(f.grantee.id), ResourceKind::GiftCard)
            .await
            .expect("received");
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].resource_name, "Books");
        assert!(received[0].can_edit_transactions);
    }
}
