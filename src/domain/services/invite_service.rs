use std::collections::HashMap;
use std::sync::Arc;
use async_trait::async_trait;
use chrono::Utc;
use tracing::{info, warn};

use crate::domain::models::{
    change::ChangeEvent,
    invite::{Invite, InviteWithResponses, NewInviteParams},
    response::{normalize_reason, Response, SubmitResponse},
};
use crate::domain::ports::{ChangeNotifier, InviteRepository, ResponseGateway, ResponseRepository};
use crate::error::AppError;

/// Owns every invite/response mutation so that each one is published to the change feed.
pub struct InviteService {
    invites: Arc<dyn InviteRepository>,
    responses: Arc<dyn ResponseRepository>,
    notifier: Arc<dyn ChangeNotifier>,
}

impl InviteService {
    pub fn new(
        invites: Arc<dyn InviteRepository>,
        responses: Arc<dyn ResponseRepository>,
        notifier: Arc<dyn ChangeNotifier>,
    ) -> Self {
        Self { invites, responses, notifier }
    }

    pub async fn create(&self, params: NewInviteParams) -> Result<Invite, AppError> {
        let invite = Invite::new(params);
        let created = self.invites.create(&invite).await?;
        info!("Created invite {} ({})", created.id, created.short_code);
        Ok(created)
    }

    /// Non-deleted invites of the creator, newest first, each with its responses oldest first.
    pub async fn dashboard(&self, creator_id: &str) -> Result<Vec<InviteWithResponses>, AppError> {
        let invites = self.invites.list_by_creator(creator_id).await?;
        let mut grouped: HashMap<String, Vec<Response>> = HashMap::new();
        for response in self.responses.list_for_creator(creator_id).await? {
            grouped.entry(response.invite_id.clone()).or_default().push(response);
        }

        Ok(invites.into_iter()
            .map(|invite| {
                let responses = grouped.remove(&invite.id).unwrap_or_default();
                InviteWithResponses { invite, responses }
            })
            .collect())
    }

    /// Owner-only detail view. Soft-deleted invites remain readable by their owner.
    pub async fn results(&self, creator_id: &str, short_code: &str) -> Result<InviteWithResponses, AppError> {
        let invite = self.invites.find_by_short_code(short_code).await?
            .ok_or(AppError::NotFound("Invite not found".into()))?;

        if invite.creator_id != creator_id {
            return Err(AppError::Forbidden("Only the creator can view these results".into()));
        }

        let responses = self.responses.list_by_invite(&invite.id).await?;
        Ok(InviteWithResponses { invite, responses })
    }

    /// Resolves a public link. Soft-deleted invites no longer resolve.
    pub async fn find_public(&self, short_code: &str) -> Result<Invite, AppError> {
        self.invites.find_by_short_code(short_code).await?
            .filter(|invite| !invite.is_deleted())
            .ok_or(AppError::NotFound("Invite not found".into()))
    }

    pub async fn soft_delete(&self, creator_id: &str, invite_id: &str) -> Result<Invite, AppError> {
        let deleted = self.invites.soft_delete(creator_id, invite_id, Utc::now()).await?
            .ok_or(AppError::NotFound("Invite not found".into()))?;

        info!("Soft-deleted invite {}", invite_id);
        self.notifier.publish(ChangeEvent::InviteUpdated {
            owner_id: deleted.creator_id.clone(),
            invite: deleted.clone(),
        });
        Ok(deleted)
    }

    async fn live_invite(&self, invite_id: &str) -> Result<Invite, AppError> {
        self.invites.find_by_id(invite_id).await?
            .filter(|invite| !invite.is_deleted())
            .ok_or(AppError::NotFound("Invite not found".into()))
    }
}

#[async_trait]
impl ResponseGateway for InviteService {
    /// Public invites are never locked; private ones go to the first device that claims them.
    async fn claim_device(&self, invite_id: &str, device_token: &str) -> Result<bool, AppError> {
        let invite = self.live_invite(invite_id).await?;
        if invite.is_public {
            return Ok(true);
        }

        let granted = self.invites.claim_device(invite_id, device_token).await?;
        if !granted {
            warn!("Device claim denied for invite {}", invite_id);
        }
        Ok(granted)
    }

    async fn record_opened(&self, invite_id: &str) -> Result<(), AppError> {
        let invite = self.live_invite(invite_id).await?;
        if let Some(updated) = self.invites.mark_opened(&invite.id, Utc::now()).await? {
            info!("Invite {} opened for the first time", invite_id);
            self.notifier.publish(ChangeEvent::InviteUpdated {
                owner_id: updated.creator_id.clone(),
                invite: updated,
            });
        }
        Ok(())
    }

    async fn submit_response(&self, submission: &SubmitResponse) -> Result<bool, AppError> {
        let invite = self.live_invite(&submission.invite_id).await?;

        let reason = normalize_reason(submission.answer, submission.reason.as_deref())
            .map_err(AppError::Validation)?;
        let submission = SubmitResponse { reason, ..submission.clone() };

        match self.responses.submit(&invite, &submission).await? {
            Some(response) => {
                info!("Recorded '{}' for invite {}", response.answer.as_str(), invite.id);
                self.notifier.publish(ChangeEvent::ResponseInserted {
                    owner_id: invite.creator_id.clone(),
                    response,
                });
                Ok(true)
            }
            None => {
                warn!("Response rejected: invite {} is locked to another device", invite.id);
                Ok(false)
            }
        }
    }
}
