use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::models::invite::{Invite, InviteWithResponses};
use crate::domain::models::response::Response;
use crate::domain::services::metrics::{self, DashboardSummary, InviteMetrics};

#[derive(Serialize, Deserialize, Debug)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct InviteCreatedResponse {
    #[serde(flatten)]
    pub invite: Invite,
    pub share_url: String,
}

#[derive(Serialize, Debug)]
pub struct DashboardInvite {
    #[serde(flatten)]
    pub invite: Invite,
    pub share_url: String,
    pub responses: Vec<Response>,
    pub metrics: InviteMetrics,
}

#[derive(Serialize, Debug)]
pub struct DashboardResponse {
    pub summary: DashboardSummary,
    pub invites: Vec<DashboardInvite>,
}

impl DashboardResponse {
    pub fn build(entries: Vec<InviteWithResponses>, share_url: impl Fn(&str) -> String) -> Self {
        let summary = metrics::summarize(&entries);
        let invites = entries.into_iter()
            .map(|entry| DashboardInvite {
                share_url: share_url(&entry.invite.short_code),
                metrics: metrics::invite_metrics(&entry.responses),
                invite: entry.invite,
                responses: entry.responses,
            })
            .collect();
        Self { summary, invites }
    }
}

/// What the recipient's page gets to see. No owner or device details.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PublicInviteView {
    pub id: String,
    pub short_code: String,
    pub recipient_name: String,
    pub message: String,
    pub is_public: bool,
    pub theme: Option<String>,
    pub occasion: Option<String>,
    pub sender_name: String,
    pub created_at: DateTime<Utc>,
}

impl PublicInviteView {
    pub fn new(invite: Invite, sender_name: String) -> Self {
        Self {
            id: invite.id,
            short_code: invite.short_code,
            recipient_name: invite.recipient_name,
            message: invite.message,
            is_public: invite.is_public,
            theme: invite.theme,
            occasion: invite.occasion,
            sender_name,
            created_at: invite.created_at,
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ClaimResponse {
    pub granted: bool,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct SubmitResult {
    pub success: bool,
}

#[derive(Serialize, Debug)]
pub struct ResultsResponse {
    #[serde(flatten)]
    pub invite: Invite,
    pub responses: Vec<Response>,
    pub metrics: InviteMetrics,
}

impl From<InviteWithResponses> for ResultsResponse {
    fn from(entry: InviteWithResponses) -> Self {
        Self {
            metrics: metrics::invite_metrics(&entry.responses),
            invite: entry.invite,
            responses: entry.responses,
        }
    }
}
