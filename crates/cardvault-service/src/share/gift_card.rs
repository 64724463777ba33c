//! Gift card sharing: edit, delete, and transaction flags.

use async_trait::async_trait;

use cardvault_core::result::AppResult;
use cardvault_core::types::{ResourceId, ShareId, UserId};
use cardvault_entity::resource::ResourceKind;
use cardvault_entity::share::{Share, ShareView};

use super::adapter::{AdapterBase, CreateShareRequest, ShareAdapter, UpdateShareRequest};

/// Share adapter for gift cards.
#[derive(Debug, Clone)]
pub struct GiftCardShareAdapter {
    base: AdapterBase,
}

impl GiftCardShareAdapter {
    /// Wraps a base configured for [`ResourceKind::GiftCard`].
    pub fn new(base: AdapterBase) -> Self {
        Self { base }
    }
}

#[async_trait]
impl ShareAdapter for GiftCardShareAdapter {
    fn kind(&self) -> ResourceKind {
        ResourceKind::GiftCard
    }

    async fn check_ownership(&self, user_id: UserId, resource_id: ResourceId) -> AppResult<bool> {
        self.base.check_ownership(user_id, resource_id).await
    }

    async fn list_shares(&self, resource_id: ResourceId) -> AppResult<Vec<ShareView>> {
        self.base.list_shares(resource_id).await
    }

    async fn create_share(&self, owner_id: UserId, req: &CreateShareRequest) -> AppResult<Share> {
        self.base.create_share(owner_id, req, req.permissions).await
    }

    async fn update_share(&self, owner_id: UserId, req: &UpdateShareRequest) -> AppResult<Share> {
        self.base.update_share(owner_id, req, req.permissions).await
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
        true
    }

    fn has_transaction_permission(&self) -> bool {
        true
    }
}
