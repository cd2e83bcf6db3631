use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, error};

use crate::api::dtos::requests::SubmitAnswerRequest;
use crate::api::dtos::responses::{ClaimResponse, PublicInviteView, SubmitResult};
use crate::domain::models::response::SubmitResponse;
use crate::domain::ports::ResponseGateway;
use crate::error::AppError;

pub const DEVICE_HEADER: &str = "X-Device-Token";

/// Talks to the public invite endpoints on behalf of a recipient's device.
///
/// The responder identity is derived server-side from the session cookie,
/// so `SubmitResponse::responder_id` is not sent.
pub struct HttpInviteClient {
    client: Client,
    base_url: String,
}

impl HttpInviteClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn fetch_invite(&self, short_code: &str) -> Result<PublicInviteView, AppError> {
        let url = format!("{}/api/v1/public/invites/by-code/{}", self.base_url, short_code);
        let res = self.client.get(&url).send().await.map_err(connection_error)?;

        if res.status() == StatusCode::NOT_FOUND {
            return Err(AppError::NotFound("Invite not found".into()));
        }
        read_json(res).await
    }

    fn post(&self, invite_id: &str, action: &str) -> RequestBuilder {
        let url = format!("{}/api/v1/public/invites/{}/{}", self.base_url, invite_id, action);
        self.client.post(url)
    }
}

#[async_trait]
impl ResponseGateway for HttpInviteClient {
    async fn claim_device(&self, invite_id: &str, device_token: &str) -> Result<bool, AppError> {
        let res = self.post(invite_id, "claim")
            .header(DEVICE_HEADER, device_token)
            .send()
            .await
            .map_err(connection_error)?;

        let body: ClaimResponse = read_json(res).await?;
        debug!("Claim for {} granted={}", invite_id, body.granted);
        Ok(body.granted)
    }

    async fn record_opened(&self, invite_id: &str) -> Result<(), AppError> {
        let res = self.post(invite_id, "opened")
            .send()
            .await
            .map_err(connection_error)?;

        if !res.status().is_success() {
            return Err(status_error(res).await);
        }
        Ok(())
    }

    async fn submit_response(&self, submission: &SubmitResponse) -> Result<bool, AppError> {
        let payload = SubmitAnswerRequest {
            answer: submission.answer,
            reason: submission.reason.clone(),
        };

        let res = self.post(&submission.invite_id, "responses")
            .header(DEVICE_HEADER, &submission.device_token)
            .json(&payload)
            .send()
            .await
            .map_err(connection_error)?;

        let body: SubmitResult = read_json(res).await?;
        Ok(body.success)
    }
}

fn connection_error(e: reqwest::Error) -> AppError {
    let msg = format!("Invite service connection error: {}", e);
    error!("{}", msg);
    AppError::InternalWithMsg(msg)
}

async fn status_error(res: reqwest::Response) -> AppError {
    let status = res.status();
    let text = res.text().await.unwrap_or_default();
    let msg = format!("Invite service failed. Status: {}, Body: {}", status, text);
    error!("{}", msg);
    AppError::InternalWithMsg(msg)
}

async fn read_json<T: DeserializeOwned>(res: reqwest::Response) -> Result<T, AppError> {
    if !res.status().is_success() {
        return Err(status_error(res).await);
    }
    res.json::<T>().await.map_err(|e| {
        let msg = format!("Invite service returned an unexpected body: {}", e);
        error!("{}", msg);
        AppError::InternalWithMsg(msg)
    })
}
