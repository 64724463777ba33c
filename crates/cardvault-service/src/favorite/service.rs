//! Favorite toggling.
//!
//! A favorite row is never hard-deleted. Toggling off sets its tombstone
//! and toggling on again clears it, so a user has at most one row per
//! resource no matter how often they toggle.

use std::sync::Arc;

use tracing::info;

use cardvault_core::result::AppResult;
use cardvault_core::types::{ResourceId, UserId};
use cardvault_database::store::FavoriteStore;
use cardvault_entity::favorite::Favorite;
use cardvault_entity::resource::ResourceKind;

/// Marks and unmarks resources as favorites.
///
/// Favorites are not permission-gated; any user may mark any resource id.
#[derive(Clone)]
pub struct FavoriteService {
    /// Favorite store.
    favorites: Arc<dyn FavoriteStore>,
}

impl std::fmt::Debug for FavoriteService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FavoriteService").finish()
    }
}

impl FavoriteService {
    /// Creates a new favorite service.
    pub fn new(favorites: Arc<dyn FavoriteStore>) -> Self {
        Self { favorites }
    }

    /// Flips the favorite state and returns the row in its new state.
    ///
    /// A concurrent toggle of the same triple surfaces as `Conflict`.
    pub async fn toggle(
        &self,
        user_id: UserId,
        kind: ResourceKind,
        resource_id: ResourceId,
    ) -> AppResult<Favorite> {
        let favorite = match self.favorites.find_latest(user_id, kind, resource_id).await? {
            None => self.favorites.insert(user_id, kind, resource_id).await?,
            Some(existing) if existing.is_active() => {
                self.favorites.soft_delete(existing.id).await?
            }
            Some(existing) => self.favorites.restore(existing.id).await?,
        };

        info!(
            %user_id,
            %resource_id,
            %kind,
            favorite = favorite.is_active(),
            "Favorite toggled"
        );
        Ok(favorite)
    }

    /// Whether the user currently has the resource marked.
    pub async fn is_favorite(
        &self,
        user_id: UserId,
        kind: ResourceKind,
        resource_id: ResourceId,
    ) -> AppResult<bool> {
        Ok(self
            .favorites
            .find_latest(user_id, kind, resource_id)
            .await?
            .is_some_and(|f| f.is_active()))
    }

    /// Active favorites of a user, newest first, optionally of one kind.
    pub async fn get_user_favorites(
        &self,
        user_id: UserId,
        kind: Option<ResourceKind>,
    ) -> AppResult<Vec<Favorite>> {
        self.favorites.list_active(user_id, kind).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardvault_database::MemoryStore;

    #[tokio::test]
    async fn test_toggle_reuses_row() {
        let store = MemoryStore::new();
        let service = FavoriteService::new(Arc::new(store.clone()));
        let user = UserId::new();
        let card = ResourceId::new();

        let on = service.toggle(user, ResourceKind::Card, card).await.expect("on");
        let off = service.toggle(user, ResourceKind::Card, card).await.expect("off");
        let again = service.toggle(user, ResourceKind::Card, card).await.expect("on again");

        assert!(on.is_active() && !off.is_active() && again.is_active());
        assert_eq!(on.id, again.id);
        assert_eq!(on.created_at, again.created_at);
        assert_eq!(store.favorite_history(user).await.len(), 1);
    }

    #[tokio::test]
    async fn test_list_filters_by_kind() {
        let service = FavoriteService::new(Arc::new(MemoryStore::new()));
        let user = UserId::new();
        let card = ResourceId::new();
        let voucher = ResourceId::new();

        service.toggle(user, ResourceKind::Card, card).await.expect("card");
        service.toggle(user, ResourceKind::Voucher, voucher).await.expect("voucher");

        let all = service.get_user_favorites(user, None).await.expect("all");
        assert_eq!(all.len(), 2);

        let vouchers = service
            .get_user_favorites(user, Some(ResourceKind::Voucher))
            .await
            .expect("vouchers");
        assert_eq!(vouchers.len(), 1);
        assert_eq!(vouchers[0].resource_id, voucher);

        service.toggle(user, ResourceKind::Card, card).await.expect("card off");
        let all = service.get_user_favorites(user, None).await.expect("all");
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn test_same_id_under_other_kind_is_distinct() {
        let service = FavoriteService::new(Arc::new(MemoryStore::new()));
        let user = UserId::new();
        let id = ResourceId::new();

        service.toggle(user, ResourceKind::Card, id).await.expect("card");
        assert!(service.is_favorite(user, ResourceKind::Card, id).await.expect("card"));
        assert!(!service.is_favorite(user, ResourceKind::GiftCard, id).await.expect("gift"));
    }
}
