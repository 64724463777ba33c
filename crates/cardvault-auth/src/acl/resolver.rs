//! Effective permission resolver over ownership and shares.
//!
//! Resolution order:
//! 1. Resource lookup. A missing resource is indistinguishable from no access.
//! 2. Owner check. The owner holds every capability the kind supports.
//! 3. Share check. A non-deleted share grants view plus its flags, masked
//!    to the kind's capability grain.
//!
//! Results are never cached; every call reads current store state.

use std::sync::Arc;

use tracing::debug;

use cardvault_core::error::AppError;
use cardvault_core::result::AppResult;
use cardvault_core::types::{ResourceId, UserId};
use cardvault_database::store::{ResourceStore, ShareStore, Stores};
use cardvault_entity::permission::ResourcePermissions;
use cardvault_entity::resource::ResourceKind;

/// Computes what a user may do with a card, voucher, or gift card.
#[derive(Clone)]
pub struct PermissionResolver {
    /// Resource ownership lookups.
    resources: Arc<dyn ResourceStore>,
    /// Share lookups.
    shares: Arc<dyn ShareStore>,
}

impl std::fmt::Debug for PermissionResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PermissionResolver").finish()
    }
}

impl PermissionResolver {
    /// Creates a resolver over the given stores.
    pub fn new(resources: Arc<dyn ResourceStore>, shares: Arc<dyn ShareStore>) -> Self {
        Self { resources, shares }
    }

    /// Creates a resolver from a full store set.
    pub fn from_stores(stores: &Stores) -> Self {
        Self::new(stores.resources.clone(), stores.shares.clone())
    }

    /// Resolves the effective permissions of `user_id` on a resource.
    ///
    /// Fails with `Forbidden` both when the resource does not exist and
    /// when the user neither owns it nor holds a non-deleted share, so
    /// callers cannot probe for existence.
    pub async fn resolve(
        &self,
        user_id: UserId,
        kind: ResourceKind,
        resource_id: ResourceId,
    ) -> AppResult<ResourcePermissions> {
        let Some(resource) = self.resources.find_by_id(kind, resource_id).await? else {
            debug!(%user_id, %resource_id, %kind, "Resource not found, denying");
            return Err(denied());
        };

        if resource.is_owned_by(user_id) {
            debug!(%user_id, %resource_id, %kind, source = "owner", "Permission resolved");
            return Ok(ResourcePermissions::owner(kind));
        }

        match self.shares.find_active(kind, resource_id, user_id).await? {
            Some(share) => {
                debug!(
                    %user_id, %resource_id, %kind,
                    share_id = %share.id,
                    source = "share",
                    "Permission resolved"
                );
                Ok(ResourcePermissions::granted_by(kind, &share))
            }
            None => {
                debug!(%user_id, %resource_id, %kind, "No owner or share match, denying");
                Err(denied())
            }
        }
    }
}

fn denied() -> AppError {
    AppError::forbidden("Access denied")
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardvault_core::error::ErrorKind;
    use cardvault_database::MemoryStore;
    use cardvault_entity::share::{CreateShare, SharePermissions};

    async fn setup() -> (MemoryStore, PermissionResolver) {
        let store = MemoryStore::new();
        let resolver = PermissionResolver::from_stores(&Stores::memory(store.clone()));
        (store, resolver)
    }

    #[tokio::test]
    async fn test_owner_gets_full_access() {
        let (store, resolver) = setup().await;
        let owner = store.insert_user("u1@example.com", None).await;

        for kind in ResourceKind::ALL {
            let resource = store.insert_resource(kind, owner.id, "Mine").await;
            let perms = resolver
                .resolve(owner.id, kind, resource.id)
                .await
                .expect("owner resolves");
            assert!(perms.is_owner);
            assert!(perms.can_view && perms.can_edit && perms.can_delete);
            assert_eq!(perms.can_edit_transactions, kind == ResourceKind::GiftCard);
        }
    }

    #[tokio::test]
    async fn test_missing_resource_looks_like_no_access() {
        let (store, resolver) = setup().await;
        let user = store.insert_user("u1@example.com", None).await;
        let stranger = store.insert_user("u2@example.com", None).await;
        let card = store
            .insert_resource(ResourceKind::Card, user.id, "Card")
            .await;

        let missing = resolver
            .resolve(user.id, ResourceKind::Card, ResourceId::new())
            .await
            .expect_err("missing");
        let unshared = resolver
            .resolve(stranger.id, ResourceKind::Card, card.id)
            .await
            .expect_err("unshared");
        assert_eq!(missing.kind, ErrorKind::Forbidden);
        assert_eq!(unshared.kind, ErrorKind::Forbidden);
        assert_eq!(missing.message, unshared.message);
    }

    #[tokio::test]
    async fn test_kind_selects_table() {
        let (store, resolver) = setup().await;
        let owner = store.insert_user("u1@example.com", None).await;
        let card = store
            .insert_resource(ResourceKind::Card, owner.id, "Card")
            .await;

        let err = resolver
            .resolve(owner.id, ResourceKind::Voucher, card.id)
            .await
            .expect_err("wrong kind");
        assert_eq!(err.kind, ErrorKind::Forbidden);
    }

    #[tokio::test]
    async fn test_share_grants_its_flags() {
        let (store, resolver) = setup().await;
        let owner = store.insert_user("u1@example.com", None).await;
        let grantee = store.insert_user("u2@example.com", None).await;
        let card = store
            .insert_resource(ResourceKind::Card, owner.id, "Card")
            .await;
        ShareStore::create(
            &store,
            ResourceKind::Card,
            &CreateShare {
                resource_id: card.id,
                grantee_id: grantee.id,
                shared_by: owner.id,
                permissions: SharePermissions {
                    can_edit: true,
                    ..SharePermissions::VIEW_ONLY
                },
            },
        )
        .await
        .expect("share");

        let perms = resolver
            .resolve(grantee.id, ResourceKind::Card, card.id)
            .await
            .expect("grantee resolves");
        assert!(perms.can_view && perms.can_edit);
        assert!(!perms.can_delete && !perms.is_owner);
    }
}
