//! Store contracts consumed by the access-control and sharing services.
//!
//! Every implementation must uphold the same guarantees:
//! - at most one non-deleted share per `(resource, grantee)`; a second
//!   insert fails with [`ErrorKind::AlreadyShared`](cardvault_core::ErrorKind::AlreadyShared)
//!   no matter how the callers interleave;
//! - share writes are conditional on the writer still owning the
//!   resource, so they serialize against ownership transfer;
//! - [`ResourceStore::transfer_ownership`] changes the owner and revokes
//!   every share as one all-or-nothing unit.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;

use cardvault_core::result::AppResult;
use cardvault_core::types::{FavoriteId, NotificationId, ResourceId, ShareId, UserId};
use cardvault_entity::favorite::Favorite;
use cardvault_entity::notification::Notification;
use cardvault_entity::resource::{Resource, ResourceKind};
use cardvault_entity::share::{CreateShare, ReceivedShare, Share, SharePermissions, ShareView};
use cardvault_entity::user::User;

use crate::memory::MemoryStore;
use crate::repositories::{
    FavoriteRepository, NotificationRepository, ResourceRepository, ShareRepository,
    UserRepository,
};

/// User identity lookups.
#[async_trait]
pub trait UserStore: Send + Sync + 'static {
    /// Find a user by ID.
    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>>;

    /// Find a user by email, compared case-insensitively.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;
}

/// Ownership state of cards, vouchers, and gift cards.
#[async_trait]
pub trait ResourceStore: Send + Sync + 'static {
    /// Find a resource by kind and ID.
    async fn find_by_id(&self, kind: ResourceKind, id: ResourceId) -> AppResult<Option<Resource>>;

    /// Move ownership from `from` to `to` and soft-delete every active share.
    ///
    /// Both writes commit together or not at all. Fails with
    /// `Forbidden` if the resource is gone and `NotOwner` if `from` is no
    /// longer the owner when the row lock is taken. Returns the number of
    /// revoked shares.
    async fn transfer_ownership(
        &self,
        kind: ResourceKind,
        id: ResourceId,
        from: UserId,
        to: UserId,
    ) -> AppResult<u64>;
}

/// Share rows, one table per resource kind.
#[async_trait]
pub trait ShareStore: Send + Sync + 'static {
    /// Find the non-deleted share for a resource and grantee.
    async fn find_active(
        &self,
        kind: ResourceKind,
        resource_id: ResourceId,
        grantee_id: UserId,
    ) -> AppResult<Option<Share>>;


    /// Non-deleted shares of a resource with grantee identity, newest first.
    async fn list_active(&self, kind: ResourceKind, resource_id: ResourceId)
    -> AppResult<Vec<ShareView>>;

    /// Non-deleted shares received by a user, newest first.
    async fn list_received(
        &self,
        kind: ResourceKind,
        grantee_id: UserId,
    ) -> AppResult<Vec<ReceivedShare>>;

    /// Insert a share if `data.shared_by` still owns the resource and the
    /// grantee is not the owner.
    ///
    /// Fails with `AlreadyShared` on a uniqueness violation and with
    /// `Forbidden` if the ownership condition does not hold.
    async fn create(&self, kind: ResourceKind, data: &CreateShare) -> AppResult<Share>;

    /// Overwrite the capability flags of a non-deleted share if `owner_id`
    /// still owns the resource. Returns `None` when no row matched.
    async fn update_permissions(
        &self,
        kind: ResourceKind,
        share_id: ShareId,
        resource_id: ResourceId,
        owner_id: UserId,
        permissions: SharePermissions,
    ) -> AppResult<Option<Share>>;

    /// Soft-delete a non-deleted share if `owner_id` still owns the
    /// resource. Returns `true` if a row was deleted.
    async fn soft_delete(
        &self,
        kind: ResourceKind,
        share_id: ShareId,
        resource_id: ResourceId,
        owner_id: UserId,
    ) -> AppResult<bool>;
}

/// Favorite markers, soft-deleted and restored in place.
#[async_trait]
pub trait FavoriteStore: Send + Sync + 'static {
    /// Latest favorite row for the triple, deleted or not.
    async fn find_latest(
        &self,
        user_id: UserId,
        kind: ResourceKind,
        resource_id: ResourceId,
    ) -> AppResult<Option<Favorite>>;

    /// Insert an active favorite. Fails with `Conflict` if one already exists.
    async fn insert(
        &self,
        user_id: UserId,
        kind: ResourceKind,
        resource_id: ResourceId,
    ) -> AppResult<Favorite>;

    /// Set the tombstone on an active favorite.
    async fn soft_delete(&self, id: FavoriteId) -> AppResult<Favorite>;

    /// Clear the tombstone on a deleted favorite.
    async fn restore(&self, id: FavoriteId) -> AppResult<Favorite>;

    /// Active favorites of a user, newest first, optionally of one kind.
    async fn list_active(
        &self,
        user_id: UserId,
        kind: Option<ResourceKind>,
    ) -> AppResult<Vec<Favorite>>;
}

/// Persisted notifications.
#[async_trait]
pub trait NotificationStore: Send + Sync + 'static {
    /// Persist a notification.
    async fn create(&self, notification: &Notification) -> AppResult<()>;

    /// Notifications of a user, newest first.
    async fn list_for_user(&self, user_id: UserId, unread_only: bool)
    -> AppResult<Vec<Notification>>;

    /// Mark one of the user's notifications as read.
    async fn mark_read(&self, id: NotificationId, user_id: UserId) -> AppResult<bool>;
}

/// The full set of stores, wired to one backend.
#[derive(Clone)]
pub struct Stores {
    /// User lookups.
    pub users: Arc<dyn UserStore>,
    /// Resource ownership.
    pub resources: Arc<dyn ResourceStore>,
    /// Share rows.
    pub shares: Arc<dyn ShareStore>,
    /// Favorite markers.
    pub favorites: Arc<dyn FavoriteStore>,
    /// Notifications.
    pub notifications: Arc<dyn NotificationStore>,
}

impl std::fmt::Debug for Stores {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stores").finish_non_exhaustive()
    }
}

impl Stores {
    /// Stores backed by PostgreSQL.
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(UserRepository::new(pool.clone())),
            resources: Arc::new(ResourceRepository::new(pool.clone())),
            shares: Arc::new(ShareRepository::new(pool.clone())),
            favorites: Arc::new(FavoriteRepository::new(pool.clone())),
            notifications: Arc::new(NotificationRepository::new(pool)),
        }
    }

    /// Stores backed by one shared in-memory store.
    pub fn memory(store: MemoryStore) -> Self {
        let store = Arc::new(store);
        Self {
            users: store.clone(),
            resources: store.clone(),
            shares: store.clone(),
            favorites: store.clone(),
            notifications: store,
        }
    }
}
