use crate::domain::models::{
    auth::RefreshTokenRecord, change::ChangeEvent, invite::Invite,
    response::{Response, SubmitResponse}, user::{Profile, User},
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts the account and its profile together.
    async fn create(&self, user: &User, profile: &Profile) -> Result<User, AppError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError>;
    async fn find_profile(&self, user_id: &str) -> Result<Option<Profile>, AppError>;
    async fn update_display_name(&self, user_id: &str, display_name: Option<&str>) -> Result<Profile, AppError>;
}

#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn create_refresh_token(&self, record: &RefreshTokenRecord) -> Result<(), AppError>;
    async fn find_refresh_token(&self, token_hash: &str) -> Result<Option<RefreshTokenRecord>, AppError>;
    async fn delete_refresh_token(&self, token_hash: &str) -> Result<(), AppError>;
    async fn delete_refresh_family(&self, family_id: Uuid) -> Result<(), AppError>;
}

#[async_trait]
pub trait InviteRepository: Send + Sync {
    async fn create(&self, invite: &Invite) -> Result<Invite, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Invite>, AppError>;
    /// Includes soft-deleted invites; callers decide whether they resolve.
    async fn find_by_short_code(&self, short_code: &str) -> Result<Option<Invite>, AppError>;
    /// Non-deleted invites of one creator, newest first.
    async fn list_by_creator(&self, creator_id: &str) -> Result<Vec<Invite>, AppError>;
    /// Returns the updated row, or None if the invite is not owned, missing or already deleted.
    async fn soft_delete(&self, creator_id: &str, id: &str, at: DateTime<Utc>) -> Result<Option<Invite>, AppError>;
    /// Sets opened_at only if it was unset. Returns the row when it changed.
    async fn mark_opened(&self, id: &str, at: DateTime<Utc>) -> Result<Option<Invite>, AppError>;
    /// Single conditional update: granted iff the token was unset or already equal.
    async fn claim_device(&self, id: &str, device_token: &str) -> Result<bool, AppError>;
}

#[async_trait]
pub trait ResponseRepository: Send + Sync {
    /// Claim check and insert in one transaction. None when the device lock denies the write.
    async fn submit(&self, invite: &Invite, submission: &SubmitResponse) -> Result<Option<Response>, AppError>;
    async fn list_by_invite(&self, invite_id: &str) -> Result<Vec<Response>, AppError>;
    /// Responses of every non-deleted invite owned by the creator, oldest first.
    async fn list_for_creator(&self, creator_id: &str) -> Result<Vec<Response>, AppError>;
}

/// Publishes row changes to live subscribers.
pub trait ChangeNotifier: Send + Sync {
    fn publish(&self, event: ChangeEvent);
}

/// The remote calls the response page depends on.
#[async_trait]
pub trait ResponseGateway: Send + Sync {
    async fn claim_device(&self, invite_id: &str, device_token: &str) -> Result<bool, AppError>;
    async fn record_opened(&self, invite_id: &str) -> Result<(), AppError>;
    async fn submit_response(&self, submission: &SubmitResponse) -> Result<bool, AppError>;
}

/// Durable per-device anonymous identifier, generated once and reused.
pub trait DeviceStore: Send + Sync {
    fn load_or_create(&self) -> Result<String, AppError>;
}
