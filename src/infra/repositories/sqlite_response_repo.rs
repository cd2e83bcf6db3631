use crate::domain::{
    models::{invite::Invite, response::{Response, SubmitResponse}},
    ports::ResponseRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteResponseRepo {
    pool: SqlitePool,
}

impl SqliteResponseRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResponseRepository for SqliteResponseRepo {
    async fn submit(&self, invite: &Invite, submission: &SubmitResponse) -> Result<Option<Response>, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        if !invite.is_public {
            let claimed = sqlx::query(
                "UPDATE invites SET device_token = ? WHERE id = ? AND deleted_at IS NULL AND (device_token IS NULL OR device_token = ?)"
            )
                .bind(&submission.device_token)
                .bind(&invite.id)
                .bind(&submission.device_token)
                .execute(&mut *tx)
                .await
                .map_err(AppError::Database)?;

            if claimed.rows_affected() == 0 {
                tx.rollback().await.map_err(AppError::Database)?;
                return Ok(None);
            }
        }

        let response = Response::from_submission(submission);
        let created = sqlx::query_as::<_, Response>(
            "INSERT INTO responses (id, invite_id, answer, reason, responder_id, device_token, created_at) VALUES (?, ?, ?, ?, ?, ?, ?) RETURNING id, invite_id, answer, reason, responder_id, device_token, created_at",
        )
            .bind(&response.id)
            .bind(&response.invite_id)
            .bind(response.answer.as_str())
            .bind(&response.reason)
            .bind(&response.responder_id)
            .bind(&response.device_token)
            .bind(response.created_at)
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(Some(created))
    }

    async fn list_by_invite(&self, invite_id: &str) -> Result<Vec<Response>, AppError> {
        sqlx::query_as::<_, Response>(
            "SELECT r.id, r.invite_id, r.answer, r.reason, r.responder_id, r.device_token, r.created_at, p.display_name AS responder_name
             FROM responses r LEFT JOIN profiles p ON p.id = r.responder_id
             WHERE r.invite_id = ? ORDER BY r.created_at ASC, r.rowid ASC",
        )
            .bind(invite_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_for_creator(&self, creator_id: &str) -> Result<Vec<Response>, AppError> {
        sqlx::query_as::<_, Response>(
            "SELECT r.id, r.invite_id, r.answer, r.reason, r.responder_id, r.device_token, r.created_at, p.display_name AS responder_name
             FROM responses r
             JOIN invites i ON i.id = r.invite_id
             LEFT JOIN profiles p ON p.id = r.responder_id
             WHERE i.creator_id = ? AND i.deleted_at IS NULL
             ORDER BY r.created_at ASC, r.rowid ASC",
        )
            .bind(creator_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
