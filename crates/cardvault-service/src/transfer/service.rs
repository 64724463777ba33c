//! Ownership transfer service.
//!
//! A transfer moves a resource to a new owner and leaves it with a clean
//! slate: every share the previous owner granted is revoked in the same
//! store transaction that changes the owner.

use std::sync::Arc;

use tracing::{info, warn};

use cardvault_auth::PermissionResolver;
use cardvault_core::config::SharingConfig;
use cardvault_core::error::{AppError, ErrorKind};
use cardvault_core::events::{DomainEvent, EventPayload, TransferEvent};
use cardvault_core::result::AppResult;
use cardvault_core::types::{ResourceId, UserId};
use cardvault_database::store::{ResourceStore, Stores, UserStore};
use cardvault_entity::notification::{NotificationEvent, NotificationKind};
use cardvault_entity::resource::ResourceKind;
use cardvault_entity::user::User;

use crate::context::RequestContext;
use crate::notification::Notifier;

/// Moves resources between owners.
#[derive(Clone)]
pub struct TransferService {
    /// User lookups.
    users: Arc<dyn UserStore>,
    /// Resource ownership and the atomic transfer unit.
    resources: Arc<dyn ResourceStore>,
    /// Ownership checks.
    resolver: PermissionResolver,
    /// Notification sink.
    notifier: Arc<dyn Notifier>,
    /// Side-effect switches.
    config: SharingConfig,
}

impl std::fmt::Debug for TransferService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransferService").finish()
    }
}

impl TransferService {
    /// Creates a new transfer service.
    pub fn new(
        users: Arc<dyn UserStore>,
        resources: Arc<dyn ResourceStore>,
        resolver: PermissionResolver,
        notifier: Arc<dyn Notifier>,
        config: SharingConfig,
    ) -> Self {
        Self {
            users,
            resources,
            resolver,
            notifier,
            config,
        }
    }

    /// Wires a transfer service over one store set.
    pub fn from_stores(
        stores: &Stores,
        notifier: Arc<dyn Notifier>,
        config: SharingConfig,
    ) -> Self {
        Self::new(
            stores.users.clone(),
            stores.resources.clone(),
            PermissionResolver::from_stores(stores),
            notifier,
            config,
        )
    }

    /// Transfers a resource from the current user to `new_owner_id`.
    ///
    /// Returns the number of shares revoked. On any error neither the
    /// owner nor the shares have changed.
    pub async fn transfer(
        &self,
        ctx: &RequestContext,
        kind: ResourceKind,
        resource_id: ResourceId,
        new_owner_id: UserId,
    ) -> AppResult<u64> {
        let current_owner_id = ctx.user_id;

        if self.users.find_by_id(new_owner_id).await?.is_none() {
            return Err(AppError::user_not_found("Recipient user does not exist"));
        }

        let is_owner = match self.resolver.resolve(current_owner_id, kind, resource_id).await {
            Ok(perms) => perms.is_owner,
            Err(e) if e.is(ErrorKind::Forbidden) => false,
            Err(e) => return Err(e),
        };
        if !is_owner {
            warn!(
                user_id = %current_owner_id,
                %resource_id,
                %kind,
                "Transfer attempted by non-owner"
            );
            return Err(AppError::not_owner(format!(
                "Only the owner can transfer this {}",
                kind.label().to_lowercase()
            )));
        }

        if new_owner_id == current_owner_id {
            return Err(AppError::self_transfer(format!(
                "{} is already owned by this user",
                kind.label()
            )));
        }

        let revoked = self
            .resources
            .transfer_ownership(kind, resource_id, current_owner_id, new_owner_id)
            .await?;

        info!(
            user_id = %current_owner_id,
            new_owner_id = %new_owner_id,
            %resource_id,
            %kind,
            revoked_shares = revoked,
            "Ownership transferred"
        );
        let event = DomainEvent::new(
            current_owner_id,
            EventPayload::Transfer(TransferEvent::Completed {
                resource_type: kind.to_string(),
                resource_id,
                previous_owner: current_owner_id,
                new_owner: new_owner_id,
                revoked_shares: revoked,
            }),
        );
        info!(event = %event.to_log_line(), "Domain event");

        if self.config.notify_on_transfer {
            self.notify_new_owner(current_owner_id, new_owner_id, kind, resource_id)
                .await;
        }

        Ok(revoked)
    }

    async fn notify_new_owner(
        &self,
        previous_owner_id: UserId,
        new_owner_id: UserId,
        kind: ResourceKind,
        resource_id: ResourceId,
    ) {
        let previous: Option<User> = match self.users.find_by_id(previous_owner_id).await {
            Ok(user) => user,
            Err(e) => {
                warn!(
                    user_id = %previous_owner_id,
                    error = %e,
                    "Owner lookup failed, skipping notification"
                );
                return;
            }
        };
        let Some(previous) = previous else {
            warn!(user_id = %previous_owner_id, "Previous owner vanished, skipping notification");
            return;
        };

        let event = NotificationEvent {
            kind: NotificationKind::TransferReceived,
            recipient_id: new_owner_id,
            actor_id: previous.id,
            actor_display_name: previous.visible_name().to_string(),
            resource_type: kind,
            resource_id,
            permissions: None,
        };
        if let Err(e) = self.notifier.notify(&event).await {
            warn!(
                %resource_id,
                recipient_id = %new_owner_id,
                error = %e,
                "Transfer notification failed"
            );
        }
    }
}
