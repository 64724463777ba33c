//! Card sharing: edit and delete flags, no transactions.

use async_trait::async_trait;

use cardvault_core::result::AppResult;
use cardvault_core::types::{ResourceId, ShareId, UserId};
use cardvault_entity::resource::ResourceKind;
use cardvault_entity::share::{Share, SharePermissions, ShareView};

use super::adapter::{AdapterBase, CreateShareRequest, ShareAdapter, UpdateShareRequest};

/// Share adapter for cards.
#[derive(Debug, Clone)]
pub struct CardShareAdapter {
    base: AdapterBase,
}

impl CardShareAdapter {
    /// Wraps a base configured for [`ResourceKind::Card`].
    pub fn new(base: AdapterBase) -> Self {
        Self { base }
    }

    fn flags(requested: SharePermissions) -> SharePermissions {
        SharePermissions {
            can_edit: requested.can_edit,
            can_delete: requested.can_delete,
            can_edit_transactions: false,
        }
    }
}

#[async_trait]
impl ShareAdapter for CardShareAdapter {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Card
    }

    async fn check_ownership(&self, user_id: UserId, resource_id: ResourceId) -> AppResult<bool> {
        self.base.check_ownership(user_id, resource_id).await
    }

    async fn list_shares(&self, resource_id: ResourceId) -> AppResult<Vec<ShareView>> {
        self.base.list_shares(resource_id).await
    }

    async fn create_share(&self, owner_id: UserId, req: &CreateShareRequest) -> AppResult<Share> {
        self.base
            .create_share(owner_id, req, Self::flags(req.permissions))
            .await
    }

    async fn update_share(&self, owner_id: UserId, req: &UpdateShareRequest) -> AppResult<Share> {
        self.base
            .update_share(owner_id, req, Self::flags(req.permissions))
            .await
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
        false
    }
}
