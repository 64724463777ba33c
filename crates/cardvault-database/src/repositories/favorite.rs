//! Favorite repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use cardvault_core::error::{AppError, ErrorKind};
use cardvault_core::result::AppResult;
use cardvault_core::types::{FavoriteId, ResourceId, UserId};
use cardvault_entity::favorite::Favorite;
use cardvault_entity::resource::ResourceKind;

use super::is_unique_violation;
use crate::store::FavoriteStore;

/// Repository for favorite markers.
#[derive(Debug, Clone)]
pub struct FavoriteRepository {
    pool: PgPool,
}

impl FavoriteRepository {
    /// Create a new favorite repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FavoriteStore for FavoriteRepository {
    async fn find_latest(
        &self,
        user_id: UserId,
        kind: ResourceKind,
        resource_id: ResourceId,
    ) -> AppResult<Option<Favorite>> {
        sqlx::query_as::<_, Favorite>(
            "SELECT * FROM favorites \
             WHERE user_id = $1 AND resource_type = $2 AND resource_id = $3 \
             ORDER BY (deleted_at IS NULL) DESC, updated_at DESC LIMIT 1",
        )
        .bind(user_id)
        .bind(kind)
        .bind(resource_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find favorite", e))
    }

    async fn insert(
        &self,
        user_id: UserId,
        kind: ResourceKind,
        resource_id: ResourceId,
    ) -> AppResult<Favorite> {
        sqlx::query_as::<_, Favorite>(
            "INSERT INTO favorites (id, user_id, resource_type, resource_id) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(FavoriteId::new())
        .bind(user_id)
        .bind(kind)
        .bind(resource_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::conflict("Favorite was toggled concurrently")
            } else {
                AppError::with_source(ErrorKind::Database, "Failed to create favorite", e)
            }
        })
    }

    async fn soft_delete(&self, id: FavoriteId) -> AppResult<Favorite> {
        sqlx::query_as::<_, Favorite>(
            "UPDATE favorites SET deleted_at = NOW(), updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete favorite", e))?
        .ok_or_else(|| AppError::conflict("Favorite was toggled concurrently"))
    }

    async fn restore(&self, id: FavoriteId) -> AppResult<Favorite> {
        sqlx::query_as::<_, Favorite>(
            "UPDATE favorites SET deleted_at = NULL, updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NOT NULL RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::conflict("Favorite was toggled concurrently")
            } else {
                AppError::with_source(ErrorKind::Database, "Failed to restore favorite", e)
            }
        })?
        .ok_or_else(|| AppError::conflict("Favorite was toggled concurrently"))
    }

    async fn list_active(
        &self,
        user_id: UserId,
        kind: Option<ResourceKind>,
    ) -> AppResult<Vec<Favorite>> {
        sqlx::query_as::<_, Favorite>(
            "SELECT * FROM favorites \
             WHERE user_id = $1 AND deleted_at IS NULL \
             AND ($2::resource_kind IS NULL OR resource_type = $2) \
             ORDER BY updated_at DESC, id DESC",
        )
        .bind(user_id)
        .bind(kind)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list favorites", e))
    }
}
