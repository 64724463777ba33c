//! Voucher sharing. Voucher shares are always view-only.

use async_trait::async_trait;
use tracing::debug;

use cardvault_core::error::AppError;
use cardvault_core::result::AppResult;
use cardvault_core::types::{ResourceId, ShareId, UserId};
use cardvault_entity::resource::ResourceKind;
use cardvault_entity::share::{Share, SharePermissions, ShareView};

use super::adapter::{AdapterBase, CreateShareRequest, ShareAdapter, UpdateShareRequest};

/// Share adapter for vouchers.
#[derive(Debug, Clone)]
pub struct VoucherShareAdapter {
    base: AdapterBase,
}

impl VoucherShareAdapter {
    /// Wraps a base configured for [`ResourceKind::Voucher`].
    pub fn new(base: AdapterBase) -> Self {
        Self { base }
    }
}

#[async_trait]
impl ShareAdapter for VoucherShareAdapter {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Voucher
    }

    async fn check_ownership(&self, user_id: UserId, resource_id: ResourceId) -> AppResult<bool> {
        self.base.check_ownership(user_id, resource_id).await
    }

    async fn list_shares(&self, resource_id: ResourceId) -> AppResult<Vec<ShareView>> {
        self.base.list_shares(resource_id).await
    }

    async fn create_share(&self, owner_id: UserId, req: &CreateShareRequest) -> AppResult<Share> {
        if req.permissions != SharePermissions::VIEW_ONLY {
            debug!(
                resource_id = %req.resource_id,
                "Dropping requested flags on voucher share"
            );
        }
        self.base
            .create_share(owner_id, req, SharePermissions::VIEW_ONLY)
            .await
    }

    async fn update_share(&self, _owner_id: UserId, _req: &UpdateShareRequest) -> AppResult<Share> {
        Err(AppError::not_supported(
            "Voucher shares are view-only and cannot be updated",
        ))
    }

    async fn delete_share(
        &self,
        owner_id: UserId,
        resource_id: ResourceId,
        share_id: ShareId,
    ) -> AppResult<()> {
        self.base.delete_share(owner_id, resource_id, share_id).await
    }

    fn supports_edit(&self) -> bool {
        false
    }

    fn has_transaction_permission(&self) -> bool {
        false
    }
}
