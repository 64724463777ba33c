//! Shared test helpers for service-level tests.

#![allow(dead_code)]

use std::sync::Arc;

use cardvault_auth::PermissionResolver;
use cardvault_core::config::SharingConfig;
use cardvault_core::types::{ResourceId, UserId};
use cardvault_database::{MemoryStore, Stores};
use cardvault_entity::resource::{Resource, ResourceKind};
use cardvault_entity::share::{Share, SharePermissions};
use cardvault_entity::user::User;
use cardvault_service::{
    CreateShareRequest, FavoriteService, NotificationService, RequestContext, ShareService,
    TransferService,
};

/// Every service wired to one in-memory store.
pub struct TestApp {
    /// Direct store access for seeding and inspection.
    pub store: MemoryStore,
    /// Permission resolver.
    pub resolver: PermissionResolver,
    /// Share service.
    pub shares: ShareService,
    /// Transfer service.
    pub transfers: TransferService,
    /// Favorite service.
    pub favorites: FavoriteService,
    /// Notification inbox.
    pub notifications: NotificationService,
}

impl TestApp {
    /// Create a new test application.
    pub fn new() -> Self {
        let store = MemoryStore::new();
        let stores = Stores::memory(store.clone());
        let notifications = NotificationService::new(stores.notifications.clone());
        let notifier = Arc::new(notifications.clone());

        Self {
            resolver: PermissionResolver::from_stores(&stores),
            shares: ShareService::from_stores(&stores, notifier.clone(), SharingConfig::default()),
            transfers: TransferService::from_stores(&stores, notifier, SharingConfig::default()),
            favorites: FavoriteService::new(stores.favorites.clone()),
            notifications,
            store,
        }
    }

    /// Register a user whose email is `<name>@example.com`.
    pub async fn user(&self, name: &str) -> User {
        self.store
            .insert_user(&format!("{name}@example.com"), Some(name))
            .await
    }

    /// Create a resource owned by `owner`.
    pub async fn resource(&self, kind: ResourceKind, owner: &User) -> Resource {
        self.store.insert_resource(kind, owner.id, "Test resource").await
    }

    /// Share `resource` from `owner` with `grantee`, panicking on failure.
    pub async fn share(
        &self,
        owner: &User,
        resource: &Resource,
        grantee: &User,
        permissions: SharePermissions,
    ) -> Share {
        self.shares
            .create(
                &ctx(owner.id),
                resource.kind,
                create_request(resource.id, &grantee.email, permissions),
            )
            .await
            .expect("Failed to create share")
    }
}

/// Context acting as `user_id`.
pub fn ctx(user_id: UserId) -> RequestContext {
    RequestContext::new(user_id)
}

/// A create request for `resource_id`.
pub fn create_request(
    resource_id: ResourceId,
    grantee_email: &str,
    permissions: SharePermissions,
) -> CreateShareRequest {
    CreateShareRequest {
        resource_id,
        grantee_email: grantee_email.to_string(),
        permissions,
    }
}

/// Flags with only edit set.
pub fn edit_only() -> SharePermissions {
    SharePermissions {
        can_edit: true,
        ..SharePermissions::VIEW_ONLY
    }
}

/// Every flag set.
pub fn all_flags() -> SharePermissions {
    SharePermissions {
        can_edit: true,
        can_delete: true,
        can_edit_transactions: true,
    }
}
