use serde::{Deserialize, Serialize};

use crate::domain::models::{invite::Invite, response::Response};

/// Row-level change pushed to open dashboards of the invite's owner.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ChangeEvent {
    ResponseInserted { owner_id: String, response: Response },
    InviteUpdated { owner_id: String, invite: Invite },
}

impl ChangeEvent {
    pub fn owner_id(&self) -> &str {
        match self {
            ChangeEvent::ResponseInserted { owner_id, .. } => owner_id,
            ChangeEvent::InviteUpdated { owner_id, .. } => owner_id,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ChangeEvent::ResponseInserted { .. } => "response_inserted",
            ChangeEvent::InviteUpdated { .. } => "invite_updated",
        }
    }
}
