//! Share repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use cardvault_core::error::{AppError, ErrorKind};
use cardvault_core::result::AppResult;
use cardvault_core::types::{ResourceId, ShareId, UserId};
use cardvault_entity::resource::ResourceKind;
use cardvault_entity::share::{CreateShare, ReceivedShare, Share, SharePermissions, ShareView};

use super::is_unique_violation;
use crate::schema::schema;
use crate::store::ShareStore;

/// Repository over the per-kind share tables.
#[derive(Debug, Clone)]
pub struct ShareRepository {
    pool: PgPool,
}

impl ShareRepository {
    /// Create a new share repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ShareStore for ShareRepository {
    async fn find_active(
        &self,
        kind: ResourceKind,
        resource_id: ResourceId,
        grantee_id: UserId,
    ) -> AppResult<Option<Share>> {
        let tables = schema(kind);
        let sql = format!(
            "SELECT {} FROM {} s \
             WHERE s.resource_id = $1 AND s.grantee_id = $2 AND s.deleted_at IS NULL",
            tables.share_select("s"),
            tables.shares
        );

        sqlx::query_as::<_, Share>(&sql)
            .bind(resource_id)
            .bind(grantee_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find share", e))
    }


    async fn list_active(
        &self,
        kind: ResourceKind,
        resource_id: ResourceId,
    ) -> AppResult<Vec<ShareView>> {
        let tables = schema(kind);
        let sql = format!(
            "SELECT s.id, s.resource_id, s.grantee_id, u.email AS grantee_email, \
             u.display_name AS grantee_name, {}, s.created_at \
             FROM {} s INNER JOIN users u ON u.id = s.grantee_id \
             WHERE s.resource_id = $1 AND s.deleted_at IS NULL \
             ORDER BY s.created_at DESC, s.id DESC",
            tables.flag_select("s"),
            tables.shares
        );

        sqlx::query_as::<_, ShareView>(&sql)
            .bind(resource_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list shares", e))
    }

    async fn list_received(
        &self,
        kind: ResourceKind,
        grantee_id: UserId,
    ) -> AppResult<Vec<ReceivedShare>> {
        let tables = schema(kind);
        let sql = format!(
            "SELECT s.id AS share_id, s.resource_id, r.name AS resource_name, s.shared_by, \
             {}, s.created_at \
             FROM {} s INNER JOIN {} r ON r.id = s.resource_id \
             WHERE s.grantee_id = $1 AND s.deleted_at IS NULL \
             ORDER BY s.created_at DESC, s.id DESC",
            tables.flag_select("s"),
            tables.shares,
            tables.resources
        );

        sqlx::query_as::<_, ReceivedShare>(&sql)
            .bind(grantee_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to list received shares", e)
            })
    }

    async fn create(&self, kind: ResourceKind, data: &CreateShare) -> AppResult<Share> {
        let tables = schema(kind);
        let columns: String = tables.flags.iter().map(|c| format!(", {c}")).collect();
        let params: String = (0..tables.flags.len())
            .map(|i| format!(", ${}", i + 5))
            .collect();

        // The ownership predicate takes FOR SHARE on the resource row so the
        // insert serializes against a concurrent transfer.
        let sql = format!(
            "INSERT INTO {shares} AS s (id, resource_id, grantee_id, shared_by{columns}) \
             SELECT $1, $2, $3, $4{params} \
             WHERE EXISTS (SELECT 1 FROM {resources} r \
                 WHERE r.id = $2 AND r.owner_id = $4 AND r.owner_id <> $3 FOR SHARE) \
             RETURNING {returning}",
            shares = tables.shares,
            resources = tables.resources,
            returning = tables.share_select("s"),
        );

        let mut query = sqlx::query_as::<_, Share>(&sql)
            .bind(ShareId::new())
            .bind(data.resource_id)
            .bind(data.grantee_id)
            .bind(data.shared_by);
        for value in tables.flag_values(data.permissions) {
            query = query.bind(value);
        }

        match query.fetch_optional(&self.pool).await {
            Ok(Some(share)) => Ok(share),
            Ok(None) => Err(AppError::forbidden(format!(
                "{} is not owned by the sharing user",
                kind.label()
            ))),
            Err(e) if is_unique_violation(&e) => Err(AppError::already_shared(format!(
                "{} is already shared with this user",
                kind.label()
            ))),
            Err(e) => Err(AppError::with_source(
                ErrorKind::Database,
                "Failed to create share",
                e,
            )),
        }
    }

    async fn update_permissions(
        &self,
        kind: ResourceKind,
        share_id: ShareId,
        resource_id: ResourceId,
        owner_id: UserId,
        permissions: SharePermissions,
    ) -> AppResult<Option<Share>> {
        let tables = schema(kind);
        if tables.flags.is_empty() {
            return Err(AppError::not_supported(format!(
                "{} shares carry no editable permissions",
                kind.label()
            )));
        }

        let assignments: String = tables
            .flags
            .iter()
            .enumerate()
            .map(|(i, col)| format!("{col} = ${}, ", i + 4))
            .collect();
        let sql = format!(
            "UPDATE {shares} AS s SET {assignments}updated_at = NOW() \
             WHERE s.id = $1 AND s.resource_id = $2 AND s.deleted_at IS NULL \
             AND EXISTS (SELECT 1 FROM {resources} r \
                 WHERE r.id = $2 AND r.owner_id = $3 FOR SHARE) \
             RETURNING {returning}",
            shares = tables.shares,
            resources = tables.resources,
            returning = tables.share_select("s"),
        );

        let mut query = sqlx::query_as::<_, Share>(&sql)
            .bind(share_id)
            .bind(resource_id)
            .bind(owner_id);
        for value in tables.flag_values(permissions) {
            query = query.bind(value);
        }

        query
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update share", e))
    }

    async fn soft_delete(
        &self,
        kind: ResourceKind,
        share_id: ShareId,
        resource_id: ResourceId,
        owner_id: UserId,
    ) -> AppResult<bool> {
        let tables = schema(kind);
        let sql = format!(
            "UPDATE {shares} AS s SET deleted_at = NOW(), updated_at = NOW() \
             WHERE s.id = $1 AND s.resource_id = $2 AND s.deleted_at IS NULL \
             AND EXISTS (SELECT 1 FROM {resources} r \
                 WHERE r.id = $2 AND r.owner_id = $3 FOR SHARE)",
            shares = tables.shares,
            resources = tables.resources,
        );

        let result = sqlx::query(&sql)
            .bind(share_id)
            .bind(resource_id)
            .bind(owner_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete share", e))?;
        Ok(result.rows_affected() > 0)
    }
}
