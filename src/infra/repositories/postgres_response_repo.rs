use crate::domain::{
    models::{invite::Invite, response::{Response, SubmitResponse}},
    ports::ResponseRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresResponseRepo {
    pool: PgPool,
}

impl PostgresResponseRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResponseRepository for PostgresResponseRepo {
    async fn submit(&self, invite: &Invite, submission: &SubmitResponse) -> Result<Option<Response>, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        if !invite.is_public {
            // Row lock serialises racing devices; the loser re-reads the committed token.
            let claimed = sqlx::query(
                "UPDATE invites SET device_token = $1 WHERE id = $2 AND deleted_at IS NULL AND (device_token IS NULL OR device_token = $1)"
            )
                .bind(&submission.device_token)
                .bind(&invite.id)
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
            "INSERT INTO responses (id, invite_id, answer, reason, responder_id, device_token, created_at) VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING id, invite_id, answer, reason, responder_id, device_token, created_at",
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
             WHERE r.invite_id = $1 ORDER BY r.created_at ASC",
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
             WHERE i.creator_id = $1 AND i.deleted_at IS NULL
             ORDER BY r.created_at ASC",
        )
            .bind(creator_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
