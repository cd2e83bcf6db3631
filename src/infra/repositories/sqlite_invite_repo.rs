use crate::domain::{models::invite::Invite, ports::InviteRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

const INVITE_COLUMNS: &str = "id, creator_id, short_code, message, recipient_name, is_public, theme, occasion, device_token, opened_at, deleted_at, created_at";

pub struct SqliteInviteRepo {
    pool: SqlitePool,
}

impl SqliteInviteRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InviteRepository for SqliteInviteRepo {
    async fn create(&self, invite: &Invite) -> Result<Invite, AppError> {
        sqlx::query_as::<_, Invite>(&format!(
            "INSERT INTO invites ({INVITE_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING {INVITE_COLUMNS}"
        ))
            .bind(&invite.id)
            .bind(&invite.creator_id)
            .bind(&invite.short_code)
            .bind(&invite.message)
            .bind(&invite.recipient_name)
            .bind(invite.is_public)
            .bind(&invite.theme)
            .bind(&invite.occasion)
            .bind(&invite.device_token)
            .bind(invite.opened_at)
            .bind(invite.deleted_at)
            .bind(invite.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Invite>, AppError> {
        sqlx::query_as::<_, Invite>(&format!("SELECT {INVITE_COLUMNS} FROM invites WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_short_code(&self, short_code: &str) -> Result<Option<Invite>, AppError> {
        sqlx::query_as::<_, Invite>(&format!("SELECT {INVITE_COLUMNS} FROM invites WHERE short_code = ?"))
            .bind(short_code)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_creator(&self, creator_id: &str) -> Result<Vec<Invite>, AppError> {
        sqlx::query_as::<_, Invite>(&format!(
            "SELECT {INVITE_COLUMNS} FROM invites WHERE creator_id = ? AND deleted_at IS NULL ORDER BY created_at DESC, rowid DESC"
        ))
            .bind(creator_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn soft_delete(&self, creator_id: &str, id: &str, at: DateTime<Utc>) -> Result<Option<Invite>, AppError> {
        sqlx::query_as::<_, Invite>(&format!(
            "UPDATE invites SET deleted_at = ? WHERE id = ? AND creator_id = ? AND deleted_at IS NULL RETURNING {INVITE_COLUMNS}"
        ))
            .bind(at)
            .bind(id)
            .bind(creator_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn mark_opened(&self, id: &str, at: DateTime<Utc>) -> Result<Option<Invite>, AppError> {
        sqlx::query_as::<_, Invite>(&format!(
            "UPDATE invites SET opened_at = ? WHERE id = ? AND opened_at IS NULL AND deleted_at IS NULL RETURNING {INVITE_COLUMNS}"
        ))
            .bind(at)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn claim_device(&self, id: &str, device_token: &str) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE invites SET device_token = ? WHERE id = ? AND deleted_at IS NULL AND (device_token IS NULL OR device_token = ?)"
        )
            .bind(device_token)
            .bind(id)
            .bind(device_token)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        Ok(result.rows_affected() > 0)
    }
}
