//! Resource repository: ownership lookups and atomic transfer.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use cardvault_core::error::{AppError, ErrorKind};
use cardvault_core::result::AppResult;
use cardvault_core::types::{ResourceId, UserId};
use cardvault_entity::resource::{Resource, ResourceKind};

use crate::schema::schema;
use crate::store::ResourceStore;

/// Repository over the `cards`, `vouchers`, and `gift_cards` tables.
#[derive(Debug, Clone)]
pub struct ResourceRepository {
    pool: PgPool,
}

impl ResourceRepository {
    /// Create a new resource repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResourceStore for ResourceRepository {
    async fn find_by_id(&self, kind: ResourceKind, id: ResourceId) -> AppResult<Option<Resource>> {
        let sql = format!(
            "SELECT id, '{kind}'::resource_kind AS kind, owner_id, name, created_at, updated_at \
             FROM {} WHERE id = $1",
            schema(kind).resources
        );

        sqlx::query_as::<_, Resource>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find resource", e))
    }

    async fn transfer_ownership(
        &self,
        kind: ResourceKind,
        id: ResourceId,
        from: UserId,
        to: UserId,
    ) -> AppResult<u64> {
        let tables = schema(kind);
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transfer", e)
        })?;

        // Share writers take FOR SHARE on this row; holding FOR UPDATE
        // until commit keeps them out until the new owner is visible.
        let owner: Option<Option<UserId>> = sqlx::query_scalar(&format!(
            "SELECT owner_id FROM {} WHERE id = $1 FOR UPDATE",
            tables.resources
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to lock resource", e))?;

        if owner.flatten() != Some(from) {
            return Err(AppError::not_owner(format!(
                "Only the owner can transfer this {}",
                kind.label().to_lowercase()
            )));
        }

        sqlx::query(&format!(
            "UPDATE {} SET owner_id = $2, updated_at = NOW() WHERE id = $1",
            tables.resources
        ))
        .bind(id)
        .bind(to)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update owner", e))?;

        let revoked = sqlx::query(&format!(
            "UPDATE {} SET deleted_at = NOW(), updated_at = NOW() \
             WHERE resource_id = $1 AND deleted_at IS NULL",
            tables.shares
        ))
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to revoke shares", e))?
        .rows_affected();

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit transfer", e)
        })?;

        debug!(resource_id = %id, kind = %kind, revoked, "Ownership transfer committed");
        Ok(revoked)
    }
}
