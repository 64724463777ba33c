//! In-memory store for tests and single-node tooling.
//!
//! One Tokio mutex guards all state, so every store operation is atomic
//! with respect to every other one. That gives the same uniqueness,
//! ownership-conditional write and all-or-nothing transfer guarantees the
//! PostgreSQL repositories get from indexes and row locks.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use tracing::debug;

use cardvault_core::error::AppError;
use cardvault_core::result::AppResult;
use cardvault_core::types::{FavoriteId, NotificationId, ResourceId, ShareId, UserId};
use cardvault_entity::favorite::Favorite;
use cardvault_entity::notification::Notification;
use cardvault_entity::resource::{Resource, ResourceKind};
use cardvault_entity::share::{CreateShare, ReceivedShare, Share, SharePermissions, ShareView};
use cardvault_entity::user::{User, normalize_email};

use crate::store::{FavoriteStore, NotificationStore, ResourceStore, ShareStore, UserStore};

/// State behind the store mutex.
#[derive(Debug, Default)]
struct InnerState {
    users: HashMap<UserId, User>,
    resources: HashMap<(ResourceKind, ResourceId), Resource>,
    /// Share rows of every kind, deleted ones included.
    shares: Vec<(ResourceKind, Share)>,
    favorites: Vec<Favorite>,
    notifications: Vec<Notification>,
}

impl InnerState {
    fn owns(&self, kind: ResourceKind, resource_id: ResourceId, user_id: UserId) -> bool {
        self.resources
            .get(&(kind, resource_id))
            .is_some_and(|r| r.is_owned_by(user_id))
    }

    fn active_share_mut(
        &mut self,
        kind: ResourceKind,
        share_id: ShareId,
        resource_id: ResourceId,
    ) -> Option<&mut Share> {
        self.shares
            .iter_mut()
            .find(|(k, s)| {
                *k == kind && s.id == share_id && s.resource_id == resource_id && s.is_active()
            })
            .map(|(_, s)| s)
    }

    fn active_shares(&self, kind: ResourceKind) -> impl Iterator<Item = &Share> {
        self.shares
            .iter()
            .filter(move |(k, s)| *k == kind && s.is_active())
            .map(|(_, s)| s)
    }
}

/// In-memory implementation of every store trait.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<InnerState>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user. The email is stored normalized.
    pub async fn insert_user(&self, email: &str, display_name: Option<&str>) -> User {
        let user = User {
            id: UserId::new(),
            email: normalize_email(email),
            display_name: display_name.map(str::to_string),
            created_at: Utc::now(),
        };
        self.state
            .lock()
            .await
            .users
            .insert(user.id, user.clone());
        user
    }

    /// Create a resource owned by `owner_id`.
    pub async fn insert_resource(
        &self,
        kind: ResourceKind,
        owner_id: UserId,
        name: &str,
    ) -> Resource {
        let now = Utc::now();
        let resource = Resource {
            id: ResourceId::new(),
            kind,
            owner_id: Some(owner_id),
            name: name.to_string(),
            created_at: now,
            updated_at: now,
        };
        self.state
            .lock()
            .await
            .resources
            .insert((kind, resource.id), resource.clone());
        resource
    }

    /// Every share row of a resource, soft-deleted ones included.
    pub async fn share_history(&self, kind: ResourceKind, resource_id: ResourceId) -> Vec<Share> {
        self.state
            .lock()
            .await
            .shares
            .iter()
            .filter(|(k, s)| *k == kind && s.resource_id == resource_id)
            .map(|(_, s)| s.clone())
            .collect()
    }

    /// Every favorite row of a user, soft-deleted ones included.
    pub async fn favorite_history(&self, user_id: UserId) -> Vec<Favorite> {
        self.state
            .lock()
            .await
            .favorites
            .iter()
            .filter(|f| f.user_id == user_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>> {
        Ok(self.state.lock().await.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let email = normalize_email(email);
        Ok(self
            .state
            .lock()
            .await
            .users
            .values()
            .find(|u| u.email == email)
            .cloned())
    }
}

#[async_trait]
impl ResourceStore for MemoryStore {
    async fn find_by_id(&self, kind: ResourceKind, id: ResourceId) -> AppResult<Option<Resource>> {
        Ok(self.state.lock().await.resources.get(&(kind, id)).cloned())
    }

    async fn transfer_ownership(
        &self,
        kind: ResourceKind,
        id: ResourceId,
        from: UserId,
        to: UserId,
    ) -> AppResult<u64> {
        let mut state = self.state.lock().await;
        let now = Utc::now();

        let Some(resource) = state
            .resources
            .get_mut(&(kind, id))
            .filter(|r| r.is_owned_by(from))
        else {
            return Err(AppError::not_owner(format!(
                "Only the owner can transfer this {}",
                kind.label().to_lowercase()
            )));
        };
        resource.owner_id = Some(to);
        resource.updated_at = now;

        let mut revoked = 0;
        for (_, share) in state
            .shares
            .iter_mut()
            .filter(|(k, s)| *k == kind && s.resource_id == id && s.is_active())
        {
            share.deleted_at = Some(now);
            share.updated_at = now;
            revoked += 1;
        }

        debug!(resource_id = %id, kind = %kind, revoked, "Ownership transfer committed");
        Ok(revoked)
    }
}

#[async_trait]
impl ShareStore for MemoryStore {
    async fn find_active(
        &self,
        kind: ResourceKind,
        resource_id: ResourceId,
        grantee_id: UserId,
    ) -> AppResult<Option<Share>> {
        Ok(self
            .state
            .lock()
            .await
            .active_shares(kind)
            .find(|s| s.resource_id == resource_id && s.grantee_id == grantee_id)
            .cloned())
    }


    async fn list_active(
        &self,
        kind: ResourceKind,
        resource_id: ResourceId,
    ) -> AppResult<Vec<ShareView>> {
        let state = self.state.lock().await;
        let mut views: Vec<ShareView> = state
            .active_shares(kind)
            .filter(|s| s.resource_id == resource_id)
            .filter_map(|s| {
                let grantee = state.users.get(&s.grantee_id)?;
                Some(ShareView {
                    id: s.id,
                    resource_id: s.resource_id,
                    grantee_id: s.grantee_id,
                    grantee_email: grantee.email.clone(),
                    grantee_name: grantee.display_name.clone(),
                    can_edit: s.can_edit,
                    can_delete: s.can_delete,
                    can_edit_transactions: s.can_edit_transactions,
                    created_at: s.created_at,
                })
            })
            .collect();
        views.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(views)
    }

    async fn list_received(
        &self,
        kind: ResourceKind,
        grantee_id: UserId,
    ) -> AppResult<Vec<ReceivedShare>> {
        let state = self.state.lock().await;
        let mut received: Vec<ReceivedShare> = state
            .active_shares(kind)
            .filter(|s| s.grantee_id == grantee_id)
            .filter_map(|s| {
                let resource = state.resources.get(&(kind, s.resource_id))?;
                Some(ReceivedShare {
                    share_id: s.id,
                    resource_id: s.resource_id,
                    resource_name: resource.name.clone(),
                    shared_by: s.shared_by,
                    can_edit: s.can_edit,
                    can_delete: s.can_delete,
                    can_edit_transactions: s.can_edit_transactions,
                    created_at: s.created_at,
                })
            })
            .collect();
        received.sort_by(|a, b| (b.created_at, b.share_id).cmp(&(a.created_at, a.share_id)));
        Ok(received)
    }

    async fn create(&self, kind: ResourceKind, data: &CreateShare) -> AppResult<Share> {
        let mut state = self.state.lock().await;

        if !state.owns(kind, data.resource_id, data.shared_by) || data.grantee_id == data.shared_by
        {
            return Err(AppError::forbidden(format!(
                "{} is not owned by the sharing user",
                kind.label()
            )));
        }
        if state
            .active_shares(kind)
            .any(|s| s.resource_id == data.resource_id && s.grantee_id == data.grantee_id)
        {
            return Err(AppError::already_shared(format!(
                "{} is already shared with this user",
                kind.label()
            )));
        }

        // Columns a kind's table lacks read back as false.
        let flags = data.permissions.masked(kind.grain());
        let now = Utc::now();
        let share = Share {
            id: ShareId::new(),
            resource_id: data.resource_id,
            grantee_id: data.grantee_id,
            shared_by: data.shared_by,
            can_edit: flags.can_edit,
            can_delete: flags.can_delete,
            can_edit_transactions: flags.can_edit_transactions,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        state.shares.push((kind, share.clone()));
        Ok(share)
    }

    async fn update_permissions(
        &self,
        kind: ResourceKind,
        share_id: ShareId,
        resource_id: ResourceId,
        owner_id: UserId,
        permissions: SharePermissions,
    ) -> AppResult<Option<Share>> {
        let grain = kind.grain();
        if !grain.edit_delete && !grain.transactions {
            return Err(AppError::not_supported(format!(
                "{} shares carry no editable permissions",
                kind.label()
            )));
        }

        let mut state = self.state.lock().await;
        if !state.owns(kind, resource_id, owner_id) {
            return Ok(None);
        }
        let Some(share) = state.active_share_mut(kind, share_id, resource_id) else {
            return Ok(None);
        };

        let flags = permissions.masked(grain);
        share.can_edit = flags.can_edit;
        share.can_delete = flags.can_delete;
        share.can_edit_transactions = flags.can_edit_transactions;
        share.updated_at = Utc::now();
        Ok(Some(share.clone()))
    }

    async fn soft_delete(
        &self,
        kind: ResourceKind,
        share_id: ShareId,
        resource_id: ResourceId,
        owner_id: UserId,
    ) -> AppResult<bool> {
        let mut state = self.state.lock().await;
        if !state.owns(kind, resource_id, owner_id) {
            return Ok(false);
        }
        match state.active_share_mut(kind, share_id, resource_id) {
            Some(share) => {
                let now = Utc::now();
                share.deleted_at = Some(now);
                share.updated_at = now;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

fn toggled_concurrently() -> AppError {
    AppError::conflict("Favorite was toggled concurrently")
}

#[async_trait]
impl FavoriteStore for MemoryStore {
    async fn find_latest(
        &self,
        user_id: UserId,
        kind: ResourceKind,
        resource_id: ResourceId,
    ) -> AppResult<Option<Favorite>> {
        let state = self.state.lock().await;
        Ok(state
            .favorites
            .iter()
            .filter(|f| {
                f.user_id == user_id && f.resource_type == kind && f.resource_id == resource_id
            })
            .max_by_key(|f| (f.is_active(), f.updated_at))
            .cloned())
    }

    async fn insert(
        &self,
        user_id: UserId,
        kind: ResourceKind,
        resource_id: ResourceId,
    ) -> AppResult<Favorite> {
        let mut state = self.state.lock().await;
        if state.favorites.iter().any(|f| {
            f.user_id == user_id
                && f.resource_type == kind
                && f.resource_id == resource_id
                && f.is_active()
        }) {
            return Err(toggled_concurrently());
        }

        let now = Utc::now();
        let favorite = Favorite {
            id: FavoriteId::new(),
            user_id,
            resource_type: kind,
            resource_id,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        state.favorites.push(favorite.clone());
        Ok(favorite)
    }

    async fn soft_delete(&self, id: FavoriteId) -> AppResult<Favorite> {
        let mut state = self.state.lock().await;
        let favorite = state
            .favorites
            .iter_mut()
            .find(|f| f.id == id && f.is_active())
            .ok_or_else(toggled_concurrently)?;
        let now = Utc::now();
        favorite.deleted_at = Some(now);
        favorite.updated_at = now;
        Ok(favorite.clone())
    }

    async fn restore(&self, id: FavoriteId) -> AppResult<Favorite> {
        let mut state = self.state.lock().await;
        let Some(target) = state.favorites.iter().find(|f| f.id == id && !f.is_active()) else {
            return Err(toggled_concurrently());
        };
        let key = (target.user_id, target.resource_type, target.resource_id);
        if state
            .favorites
            .iter()
            .any(|f| (f.user_id, f.resource_type, f.resource_id) == key && f.is_active())
        {
            return Err(toggled_concurrently());
        }

        let favorite = state
            .favorites
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or_else(toggled_concurrently)?;
        favorite.deleted_at = None;
        favorite.updated_at = Utc::now();
        Ok(favorite.clone())
    }

    async fn list_active(
        &self,
        user_id: UserId,
        kind: Option<ResourceKind>,
    ) -> AppResult<Vec<Favorite>> {
        let state = self.state.lock().await;
        let mut favorites: Vec<Favorite> = state
            .favorites
            .iter()
            .filter(|f| f.user_id == user_id && f.is_active())
            .filter(|f| kind.is_none_or(|k| f.resource_type == k))
            .cloned()
            .collect();
        favorites.sort_by(|a, b| (b.updated_at, b.id).cmp(&(a.updated_at, a.id)));
        Ok(favorites)
    }
}

#[async_trait]
impl NotificationStore for MemoryStore {
    async fn create(&self, notification: &Notification) -> AppResult<()> {
        self.state
            .lock()
            .await
            .notifications
            .push(notification.clone());
        Ok(())
    }

    async fn list_for_user(
        &self,
        user_id: UserId,
        unread_only: bool,
    ) -> AppResult<Vec<Notification>> {
        let state = self.state.lock().await;
        let mut notifications: Vec<Notification> = state
            .notifications
            .iter()
            .filter(|n| n.recipient_id == user_id && (!unread_only || !n.is_read))
            .cloned()
            .collect();
        notifications.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(notifications)
    }

    async fn mark_read(&self, id: NotificationId, user_id: UserId) -> AppResult<bool> {
        let mut state = self.state.lock().await;
        match state
            .notifications
            .iter_mut()
            .find(|n| n.id == id && n.recipient_id == user_id)
        {
            Some(n) => {
                n.is_read = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardvault_core::error::ErrorKind;

    async fn seeded(kind: ResourceKind) -> (MemoryStore, User, User, Resource) {
        let store = MemoryStore::new();
        let owner = store.insert_user("owner@example.com", Some("Owner")).await;
        let grantee = store.insert_user("Grantee@Example.com", None).await;
        let resource = store.insert_resource(kind, owner.id, "Coffee").await;
        (store, owner, grantee, resource)
    }

    fn request(resource: &Resource, owner: &User, grantee: &User) -> CreateShare {
        CreateShare {
            resource_id: resource.id,
            grantee_id: grantee.id,
            shared_by: owner.id,
            permissions: SharePermissions {
                can_edit: true,
                can_delete: true,
                can_edit_transactions: true,
            },
        }
    }

    #[tokio::test]
    async fn test_find_by_email_is_case_insensitive() {
        let (store, _, grantee, _) = seeded(ResourceKind::Card).await;
        let found = UserStore::find_by_email(&store, "  GRANTEE@example.com")
            .await
            .expect("lookup");
        assert_eq!(found.map(|u| u.id), Some(grantee.id));
    }

    #[tokio::test]
    async fn test_create_masks_flags_to_kind() {
        let (store, owner, grantee, card) = seeded(ResourceKind::Card).await;
        let share =
            ShareStore::create(&store, ResourceKind::Card, &request(&card, &owner, &grantee))
                .await
                .expect("create");
        assert!(share.can_edit && share.can_delete);
        assert!(!share.can_edit_transactions);
    }

    #[tokio::test]
    async fn test_second_active_share_is_rejected() {
        let (store, owner, grantee, card) = seeded(ResourceKind::Card).await;
        let data = request(&card, &owner, &grantee);
        ShareStore::create(&store, ResourceKind::Card, &data)
            .await
            .expect("first");
        let err = ShareStore::create(&store, ResourceKind::Card, &data)
            .await
            .expect_err("second must fail");
        assert_eq!(err.kind, ErrorKind::AlreadyShared);
    }

    #[tokio::test]
    async fn test_create_requires_current_owner() {
        let (store, owner, grantee, card) = seeded(ResourceKind::Card).await;
        let mut data = request(&card, &owner, &grantee);
        data.shared_by = grantee.id;
        data.grantee_id = owner.id;
        let err = ShareStore::create(&store, ResourceKind::Card, &data)
            .await
            .expect_err("non-owner");
        assert_eq!(err.kind, ErrorKind::Forbidden);
    }

    #[tokio::test]
    async fn test_kinds_do_not_share_rows() {
        let (store, owner, grantee, card) = seeded(ResourceKind::Card).await;
        ShareStore::create(&store, ResourceKind::Card, &request(&card, &owner, &grantee))
            .await
            .expect("create");
        let other = ShareStore::find_active(&store, ResourceKind::GiftCard, card.id, grantee.id)
            .await
            .expect("lookup");
        assert!(other.is_none());
    }

    #[tokio::test]
    async fn test_voucher_update_is_not_supported() {
        let (store, owner, grantee, voucher) = seeded(ResourceKind::Voucher).await;
        let share =
            ShareStore::create(&store, ResourceKind::Voucher, &request(&voucher, &owner, &grantee))
                .await
                .expect("create");
        assert_eq!(share.permissions(), SharePermissions::VIEW_ONLY);

        let err = store
            .update_permissions(
                ResourceKind::Voucher,
                share.id,
                voucher.id,
                owner.id,
                SharePermissions::VIEW_ONLY,
            )
            .await
            .expect_err("voucher update");
        assert_eq!(err.kind, ErrorKind::NotSupported);
    }

    #[tokio::test]
    async fn test_delete_is_scoped_to_resource() {
        let (store, owner, grantee, card) = seeded(ResourceKind::Card).await;
        let other = store
            .insert_resource(ResourceKind::Card, owner.id, "Other")
            .await;
        let share =
            ShareStore::create(&store, ResourceKind::Card, &request(&card, &owner, &grantee))
                .await
                .expect("create");

        let deleted =
            ShareStore::soft_delete(&store, ResourceKind::Card, share.id, other.id, owner.id)
                .await
                .expect("delete");
        assert!(!deleted);

        let deleted =
            ShareStore::soft_delete(&store, ResourceKind::Card, share.id, card.id, owner.id)
                .await
                .expect("delete");
        assert!(deleted);
        assert_eq!(store.share_history(ResourceKind::Card, card.id).await.len(), 1);
    }

    #[tokio::test]
    async fn test_transfer_moves_owner_and_revokes_shares() {
        let (store, owner, grantee, gift) = seeded(ResourceKind::GiftCard).await;
        ShareStore::create(&store, ResourceKind::GiftCard, &request(&gift, &owner, &grantee))
            .await
            .expect("create");

        let revoked = store
            .transfer_ownership(ResourceKind::GiftCard, gift.id, owner.id, grantee.id)
            .await
            .expect("transfer");
        assert_eq!(revoked, 1);

        let resource = ResourceStore::find_by_id(&store, ResourceKind::GiftCard, gift.id)
            .await
            .expect("lookup")
            .expect("exists");
        assert!(resource.is_owned_by(grantee.id));
        let history = store.share_history(ResourceKind::GiftCard, gift.id).await;
        assert!(history.iter().all(|s| !s.is_active()));
    }

    #[tokio::test]
    async fn test_transfer_by_stale_owner_changes_nothing() {
        let (store, owner, grantee, gift) = seeded(ResourceKind::GiftCard).await;
        let err = store
            .transfer_ownership(ResourceKind::GiftCard, gift.id, grantee.id, owner.id)
            .await
            .expect_err("not owner");
        assert_eq!(err.kind, ErrorKind::NotOwner);

        let err = store
            .transfer_ownership(ResourceKind::GiftCard, ResourceId::new(), owner.id, grantee.id)
            .await
            .expect_err("missing");
        assert_eq!(err.kind, ErrorKind::NotOwner);
    }

    #[tokio::test]
    async fn test_favorite_restore_keeps_row() {
        let (store, owner, _, card) = seeded(ResourceKind::Card).await;
        let fav = FavoriteStore::insert(&store, owner.id, ResourceKind::Card, card.id)
            .await
            .expect("insert");
        FavoriteStore::soft_delete(&store, fav.id).await.expect("off");
        let restored = store.restore(fav.id).await.expect("on");
        assert_eq!(restored.id, fav.id);
        assert_eq!(restored.created_at, fav.created_at);
        assert!(restored.is_active());

        let err = FavoriteStore::insert(&store, owner.id, ResourceKind::Card, card.id)
            .await
            .expect_err("duplicate");
        assert_eq!(err.kind, ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn test_notifications_mark_read_checks_recipient() {
        let (store, owner, grantee, _) = seeded(ResourceKind::Card).await;
        let notification = Notification {
            id: NotificationId::new(),
            recipient_id: grantee.id,
            kind: cardvault_entity::notification::NotificationKind::ShareReceived,
            actor_id: owner.id,
            actor_display_name: "Owner".to_string(),
            resource_type: ResourceKind::Card,
            resource_id: ResourceId::new(),
            permissions: None,
            message: "Owner shared a card with you".to_string(),
            is_read: false,
            created_at: Utc::now(),
        };
        NotificationStore::create(&store, &notification)
            .await
            .expect("create");

        assert!(!store.mark_read(notification.id, owner.id).await.expect("mark"));
        assert!(store.mark_read(notification.id, grantee.id).await.expect("mark"));
        let unread = store.list_for_user(grantee.id, true).await.expect("list");
        assert!(unread.is_empty());
    }
}
