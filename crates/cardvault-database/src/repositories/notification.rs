//! Notification repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use cardvault_core::error::{AppError, ErrorKind};
use cardvault_core::result::AppResult;
use cardvault_core::types::{NotificationId, UserId};
use cardvault_entity::notification::Notification;

use crate::store::NotificationStore;

/// Repository for persisted notifications.
#[derive(Debug, Clone)]
pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    /// Create a new notification repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationStore for NotificationRepository {
    async fn create(&self, n: &Notification) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO notifications (id, recipient_id, kind, actor_id, actor_display_name, \
             resource_type, resource_id, permissions, message, is_read, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
        )
        .bind(n.id)
        .bind(n.recipient_id)
        .bind(n.kind)
        .bind(n.actor_id)
        .bind(&n.actor_display_name)
        .bind(n.resource_type)
        .bind(n.resource_id)
        .bind(&n.permissions)
        .bind(&n.message)
        .bind(n.is_read)
        .bind(n.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to create notification", e)
        })?;
        Ok(())
    }

    async fn list_for_user(
        &self,
        user_id: UserId,
        unread_only: bool,
    ) -> AppResult<Vec<Notification>> {
        sqlx::query_as::<_, Notification>(
            "SELECT * FROM notifications \
             WHERE recipient_id = $1 AND (NOT $2 OR is_read = FALSE) \
             ORDER BY created_at DESC, id DESC",
        )
        .bind(user_id)
        .bind(unread_only)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list notifications", e))
    }

    async fn mark_read(&self, id: NotificationId, user_id: UserId) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE WHERE id = $1 AND recipient_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to mark read", e))?;
        Ok(result.rows_affected() > 0)
    }
}
