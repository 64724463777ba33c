//! The capability contract every resource kind implements for sharing.
//!
//! [`ShareAdapter`] is the one seam where resource kinds differ. The
//! generic steps (grantee lookup, duplicate detection, ownership-scoped
//! writes) live in [`AdapterBase`]; each kind's adapter decides which
//! capability flags it accepts.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use cardvault_auth::PermissionResolver;
use cardvault_core::error::{AppError, ErrorKind};
use cardvault_core::result::AppResult;
use cardvault_core::types::{ResourceId, ShareId, UserId};
use cardvault_database::store::{ShareStore, UserStore};
use cardvault_entity::resource::ResourceKind;
use cardvault_entity::share::{CreateShare, Share, SharePermissions, ShareView};
use cardvault_entity::user::normalize_email;

/// Request to share a resource with another user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateShareRequest {
    /// Resource being shared.
    pub resource_id: ResourceId,
    /// Email of the grantee, matched case-insensitively.
    pub grantee_email: String,
    /// Requested capability flags.
    #[serde(default)]
    pub permissions: SharePermissions,
}

/// Request to change the flags of an existing share.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateShareRequest {
    /// Share being changed.
    pub share_id: ShareId,
    /// Resource the share belongs to.
    pub resource_id: ResourceId,
    /// New capability flags.
    pub permissions: SharePermissions,
}

/// Kind-specific sharing behaviour.
///
/// Mutating methods take the acting owner so the store can make each write
/// conditional on that user still owning the resource.
#[async_trait]
pub trait ShareAdapter: Send + Sync + 'static {
    /// The resource kind this adapter serves.
    fn kind(&self) -> ResourceKind;

    /// Whether `user_id` owns the resource. Lack of access is `false`, not an error.
    async fn check_ownership(&self, user_id: UserId, resource_id: ResourceId) -> AppResult<bool>;

    /// Non-deleted shares of the resource, newest first.
    async fn list_shares(&self, resource_id: ResourceId) -> AppResult<Vec<ShareView>>;

    /// Share the resource with the user named by `req.grantee_email`.
    async fn create_share(&self, owner_id: UserId, req: &CreateShareRequest) -> AppResult<Share>;

    /// Re-apply capability flags to an existing share.
    async fn update_share(&self, owner_id: UserId, req: &UpdateShareRequest) -> AppResult<Share>;

    /// Soft-delete a share of the resource.
    async fn delete_share(
        &self,
        owner_id: UserId,
        resource_id: ResourceId,
        share_id: ShareId,
    ) -> AppResult<()>;

    /// Whether shares of this kind have editable flags.
    fn supports_edit(&self) -> bool;

    /// Whether shares of this kind carry a transaction permission.
    fn has_transaction_permission(&self) -> bool;
}

/// Kind-independent share operations shared by every adapter.
#[derive(Clone)]
pub struct AdapterBase {
    kind: ResourceKind,
    resolver: PermissionResolver,
    users: Arc<dyn UserStore>,
    shares: Arc<dyn ShareStore>,
}

impl std::fmt::Debug for AdapterBase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdapterBase")
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

impl AdapterBase {
    /// Creates the shared part of an adapter for one kind.
    pub fn new(
        kind: ResourceKind,
        resolver: PermissionResolver,
        users: Arc<dyn UserStore>,
        shares: Arc<dyn ShareStore>,
    ) -> Self {
        Self {
            kind,
            resolver,
            users,
            shares,
        }
    }

    /// The kind served.
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// Ownership from the resolver, with `Forbidden` folded into `false`.
    pub async fn check_ownership(
        &self,
        user_id: UserId,
        resource_id: ResourceId,
    ) -> AppResult<bool> {
        match self.resolver.resolve(user_id, self.kind, resource_id).await {
            Ok(perms) => Ok(perms.is_owner),
            Err(e) if e.is(ErrorKind::Forbidden) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Active shares with grantee identity.
    pub async fn list_shares(&self, resource_id: ResourceId) -> AppResult<Vec<ShareView>> {
        self.shares.list_active(self.kind, resource_id).await
    }

    /// Insert a share carrying exactly `permissions`.
    ///
    /// The existence check gives the common case a clear error; the store's
    /// uniqueness guarantee still decides concurrent creates.
    pub async fn create_share(
        &self,
        owner_id: UserId,
        req: &CreateShareRequest,
        permissions: SharePermissions,
    ) -> AppResult<Share> {
        let email = normalize_email(&req.grantee_email);
        let grantee = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or_else(|| AppError::user_not_found(format!("No user with email '{email}'")))?;

        if grantee.id == owner_id {
            return Err(AppError::validation(format!(
                "Cannot share a {} with its owner",
                self.kind.label().to_lowercase()
            )));
        }

        if self
            .shares
            .find_active(self.kind, req.resource_id, grantee.id)
            .await?
            .is_some()
        {
            return Err(AppError::already_shared(format!(
                "{} is already shared with this user",
                self.kind.label()
            )));
        }

        let share = self
            .shares
            .create(
                self.kind,
                &CreateShare {
                    resource_id: req.resource_id,
                    grantee_id: grantee.id,
                    shared_by: owner_id,
                    permissions,
                },
            )
            .await?;

        debug!(
            share_id = %share.id,
            resource_id = %share.resource_id,
            grantee_id = %share.grantee_id,
            kind = %self.kind,
            "Share row inserted"
        );
        Ok(share)
    }

    /// Overwrite the flags of the share at `(share_id, resource_id)`.
    pub async fn update_share(
        &self,
        owner_id: UserId,
        req: &UpdateShareRequest,
        permissions: SharePermissions,
    ) -> AppResult<Share> {
        self.shares
            .update_permissions(self.kind, req.share_id, req.resource_id, owner_id, permissions)
            .await?
            .ok_or_else(|| AppError::not_found("Share not found"))
    }

    /// Soft-delete the share at `(share_id, resource_id)`.
    pub async fn delete_share(
        &self,
        owner_id: UserId,
        resource_id: ResourceId,
        share_id: ShareId,
    ) -> AppResult<()> {
        if self
            .shares
            .soft_delete(self.kind, share_id, resource_id, owner_id)
            .await?
        {
            Ok(())
        } else {
            Err(AppError::not_found("Share not found"))
        }
    }
}
