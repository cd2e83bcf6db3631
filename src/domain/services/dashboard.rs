use crate::domain::models::change::ChangeEvent;
use crate::domain::models::invite::InviteWithResponses;
use crate::domain::services::metrics::{self, DashboardSummary, InviteMetrics};

/// Live in-memory view of a creator's invites, patched by change events.
///
/// Merging is unconditional: a response insert is appended to its invite,
/// an invite update replaces the stored record. Events for invites not in
/// the view are ignored. Metrics are recomputed on every read.
#[derive(Debug, Default, Clone)]
pub struct DashboardState {
    invites: Vec<InviteWithResponses>,
}

impl DashboardState {
    pub fn new(invites: Vec<InviteWithResponses>) -> Self {
        Self { invites }
    }

    pub fn invites(&self) -> &[InviteWithResponses] {
        &self.invites
    }

    pub fn get(&self, invite_id: &str) -> Option<&InviteWithResponses> {
        self.invites.iter().find(|i| i.invite.id == invite_id)
    }

    pub fn apply(&mut self, event: &ChangeEvent) {
        match event {
            ChangeEvent::ResponseInserted { response, .. } => {
                if let Some(entry) = self.invites.iter_mut().find(|i| i.invite.id == response.invite_id) {
                    entry.responses.push(response.clone());
                }
            }
            ChangeEvent::InviteUpdated { invite, .. } => {
                if invite.is_deleted() {
                    self.remove(&invite.id);
                } else if let Some(entry) = self.invites.iter_mut().find(|i| i.invite.id == invite.id) {
                    entry.invite = invite.clone();
                }
            }
        }
    }

    /// Local removal once a delete has been acknowledged.
    pub fn remove(&mut self, invite_id: &str) -> bool {
        let before = self.invites.len();
        self.invites.retain(|i| i.invite.id != invite_id);
        self.invites.len() != before
    }

    pub fn metrics(&self, invite_id: &str) -> Option<InviteMetrics> {
        self.get(invite_id).map(|i| metrics::invite_metrics(&i.responses))
    }

    pub fn summary(&self) -> DashboardSummary {
        metrics::summarize(&self.invites)
    }
}
