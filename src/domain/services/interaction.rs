//! Recipient-side response flow.
//!
//! Drives the claim / opened / submit calls through a [`ResponseGateway`]
//! and keeps the page state: locked out, concealed behind a scratch card,
//! answering (with a local refusal counter), awaiting a reason, submitted.

use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::models::invite::Theme;
use crate::domain::models::response::{Answer, SubmitResponse};
use crate::domain::ports::{DeviceStore, ResponseGateway};
use crate::domain::services::metrics::REFUSAL_THRESHOLD;
use crate::domain::services::scratch::ScratchCard;
use crate::error::AppError;

const REFUSAL_COPY: [&str; 4] = ["No", "Are you sure?", "Really?", "Last chance... 😅"];

/// Canvas used for the scratch overlay.
pub const SCRATCH_WIDTH: u32 = 320;
pub const SCRATCH_HEIGHT: u32 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    /// Private invite claimed by another device. Terminal.
    LockedOut,
    /// Scratch theme: message hidden until enough of the overlay is erased.
    Concealed,
    Answering,
    AwaitingReason,
    /// Terminal.
    Submitted(Answer),
}

#[derive(Debug, Error)]
pub enum FlowError {
    #[error("We couldn't deliver your response. Please check your connection and try again.")]
    Delivery(#[source] Option<AppError>),
    #[error("Please provide a reason or press 'Yes' instead! 💖")]
    ReasonRequired,
    #[error("Action not available in state {0:?}")]
    InvalidState(FlowState),
    #[error("Device identifier unavailable: {0}")]
    Device(#[source] AppError),
}

/// What the flow needs to know about the invite being answered.
#[derive(Debug, Clone)]
pub struct InviteContext {
    pub invite_id: String,
    pub is_public: bool,
    pub theme: Theme,
}

pub struct ResponseFlow {
    gateway: Arc<dyn ResponseGateway>,
    invite: InviteContext,
    device_token: String,
    responder_id: Option<String>,
    state: FlowState,
    refusals: u32,
    scratch: Option<ScratchCard>,
}

impl ResponseFlow {
    /// Resolves the device id, records the visit and attempts the device claim.
    pub async fn start(
        gateway: Arc<dyn ResponseGateway>,
        devices: &dyn DeviceStore,
        invite: InviteContext,
        responder_id: Option<String>,
    ) -> Result<Self, FlowError> {
        let device_token = devices.load_or_create().map_err(FlowError::Device)?;

        if let Err(e) = gateway.record_opened(&invite.invite_id).await {
            warn!("Failed to record opened marker for {}: {}", invite.invite_id, e);
        }

        let granted = match gateway.claim_device(&invite.invite_id, &device_token).await {
            Ok(granted) => granted,
            Err(e) => {
                warn!("Device claim failed for {}: {}", invite.invite_id, e);
                false
            }
        };

        let (state, scratch) = if !invite.is_public && !granted {
            info!("Invite {} is locked to another device", invite.invite_id);
            (FlowState::LockedOut, None)
        } else if invite.theme == Theme::Scratch {
            (FlowState::Concealed, Some(ScratchCard::new(SCRATCH_WIDTH, SCRATCH_HEIGHT)))
        } else {
            (FlowState::Answering, None)
        };

        Ok(Self {
            gateway,
            invite,
            device_token,
            responder_id,
            state,
            refusals: 0,
            scratch,
        })
    }

    pub fn state(&self) -> FlowState {
        self.state
    }

    pub fn refusals(&self) -> u32 {
        self.refusals
    }

    pub fn device_token(&self) -> &str {
        &self.device_token
    }

    /// Label of the "no" button for the current refusal count.
    pub fn refusal_copy(&self) -> &'static str {
        REFUSAL_COPY[(self.refusals as usize).min(REFUSAL_COPY.len() - 1)]
    }

    /// The "yes" button grows with every refusal.
    pub fn yes_scale(&self) -> f32 {
        1.0 + self.refusals as f32 * 0.2
    }

    pub fn scratch_coverage(&self) -> f32 {
        self.scratch.as_ref().map_or(1.0, ScratchCard::coverage)
    }

    /// Feeds one pointer sample to the overlay. `stroke_start` marks pointer down.
    pub fn scratch(&mut self, x: f32, y: f32, stroke_start: bool) -> Result<FlowState, FlowError> {
        if self.state != FlowState::Concealed {
            return Err(FlowError::InvalidState(self.state));
        }
        let Some(card) = self.scratch.as_mut() else {
            return Err(FlowError::InvalidState(self.state));
        };

        let revealed = if stroke_start { card.begin_stroke(x, y) } else { card.stroke_to(x, y) };
        if revealed {
            debug!("Scratch card revealed for {}", self.invite.invite_id);
            self.state = FlowState::Answering;
        }
        Ok(self.state)
    }

    pub fn end_scratch_stroke(&mut self) {
        if let Some(card) = self.scratch.as_mut() {
            card.end_stroke();
        }
    }

    /// Yes or maybe. Failures are surfaced and the page stays where it was.
    pub async fn answer(&mut self, answer: Answer) -> Result<FlowState, FlowError> {
        if answer == Answer::No {
            return self.refuse().await;
        }
        self.expect_state(FlowState::Answering)?;

        match self.submit(answer, None).await {
            Ok(true) => {
                self.state = FlowState::Submitted(answer);
                Ok(self.state)
            }
            Ok(false) => Err(FlowError::Delivery(None)),
            Err(e) => Err(FlowError::Delivery(Some(e))),
        }
    }

    /// A "no" click. Below the threshold each click is persisted immediately;
    /// failures are swallowed so the teasing keeps going.
    pub async fn refuse(&mut self) -> Result<FlowState, FlowError> {
        self.expect_state(FlowState::Answering)?;

        if self.refusals >= REFUSAL_THRESHOLD {
            self.state = FlowState::AwaitingReason;
            return Ok(self.state);
        }

        match self.submit(Answer::No, None).await {
            Ok(true) => {}
            Ok(false) => debug!("Refusal not recorded for {}", self.invite.invite_id),
            Err(e) => debug!("Refusal submission failed for {}: {}", self.invite.invite_id, e),
        }
        self.refusals += 1;
        Ok(self.state)
    }

    /// The final "no". Blank reasons are rejected before any remote call.
    pub async fn submit_reason(&mut self, reason: &str) -> Result<FlowState, FlowError> {
        self.expect_state(FlowState::AwaitingReason)?;

        let reason = reason.trim();
        if reason.is_empty() {
            return Err(FlowError::ReasonRequired);
        }

        match self.submit(Answer::No, Some(reason.to_string())).await {
            Ok(true) => {}
            Ok(false) => debug!("Final refusal not recorded for {}", self.invite.invite_id),
            Err(e) => debug!("Final refusal submission failed for {}: {}", self.invite.invite_id, e),
        }
        self.state = FlowState::Submitted(Answer::No);
        Ok(self.state)
    }

    fn expect_state(&self, expected: FlowState) -> Result<(), FlowError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(FlowError::InvalidState(self.state))
        }
    }

    async fn submit(&self, answer: Answer, reason: Option<String>) -> Result<bool, AppError> {
        let submission = SubmitResponse {
            invite_id: self.invite.invite_id.clone(),
            device_token: self.device_token.clone(),
            answer,
            responder_id: self.responder_id.clone(),
            reason,
        };
        self.gateway.submit_response(&submission).await
    }
}
