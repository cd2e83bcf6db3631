use crate::domain::{models::invite::Invite, ports::InviteRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

const INVITE_COLUMNS: &str = "id, creator_id, short_code, message, recipient_name, is_public, theme, occasion, device_token, opened_at, deleted_at, created_at";

pub struct PostgresInviteRepo {
    pool: PgPool,
}

impl PostgresInviteRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InviteRepository for PostgresInviteRepo {
    async fn create(&self, invite: &Invite) -> Result<Invite, AppError> {
        sqlx::query_as::<_, Invite>(&format!(
            "INSERT INTO invites ({INVITE_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) RETURNING {INVITE_COLUMNS}"
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
        sqlx::query_as::<_, Invite>(&format!("SELECT {INVITE_COLUMNS} FROM invites WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_short_code(&self, short_code: &str) -> Result<Option<Invite>, AppError> {
        sqlx::query_as::<_, Invite>(&format!("SELECT {INVITE_COLUMNS} FROM invites WHERE short_code = $1"))
            .bind(short_code)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_creator(&self, creator_id: &str) -> Result<Vec<Invite>, AppError> {
        sqlx::query_as::<_, Invite>(&format!(
            "SELECT {INVITE_COLUMNS} FROM invites WHERE creator_id = $1 AND deleted_at IS NULL ORDER BY created_at DESC, id DESC"
        ))
            .bind(creator_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn soft_delete(&self, creator_id: &str, id: &str, at: DateTime<Utc>) -> Result<Option<Invite>, AppError> {
        sqlx::query_as::<_, Invite>(&format!(
            "UPDATE invites SET deleted_at = $1 WHERE id = $2 AND creator_id = $3 AND deleted_at IS NULL RETURNING {INVITE_COLUMNS}"
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
            "UPDATE invites SET opened_at = $1 WHERE id = $2 AND opened_at IS NULL AND deleted_at IS NULL RETURNING {INVITE_COLUMNS}"
        ))
            .bind(at)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn claim_device(&self, id: &str, device_token: &str) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE invites SET device_token = $1 WHERE id = $2 AND deleted_at IS NULL AND (device_token IS NULL OR device_token = $1)"
        )
            .bind(device_token)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        Ok(result.rows_affected() > 0)
    }
}
