use axum::{extract::{State, Path}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::{device::DeviceToken, maybe_auth::MaybeAuthUser};
use crate::api::dtos::requests::SubmitAnswerRequest;
use crate::api::dtos::responses::{ClaimResponse, PublicInviteView, SubmitResult};
use crate::domain::models::response::SubmitResponse;
use crate::domain::models::user::display_name_or_fallback;
use crate::domain::ports::ResponseGateway;
use crate::error::AppError;
use std::sync::Arc;
use tracing::{info, warn};

pub async fn get_invite_by_code(
    State(state): State<Arc<AppState>>,
    Path(short_code): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let invite = state.invite_service.find_public(&short_code).await?;
    let sender_name = sender_name(&state, &invite.creator_id).await?;
    Ok(Json(PublicInviteView::new(invite, sender_name)))
}

pub async fn claim_invite(
    State(state): State<Arc<AppState>>,
    Path(invite_id): Path<String>,
    DeviceToken(device_token): DeviceToken,
) -> Result<impl IntoResponse, AppError> {
    let granted = state.invite_service.claim_device(&invite_id, &device_token).await?;
    Ok(Json(ClaimResponse { granted }))
}

pub async fn mark_opened(
    State(state): State<Arc<AppState>>,
    Path(invite_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.invite_service.record_opened(&invite_id).await?;
    Ok(Json(serde_json::json!({ "status": "ok" })))
}

pub async fn submit_response(
    State(state): State<Arc<AppState>>,
    Path(invite_id): Path<String>,
    DeviceToken(device_token): DeviceToken,
    MaybeAuthUser(identity): MaybeAuthUser,
    Json(payload): Json<SubmitAnswerRequest>,
) -> Result<impl IntoResponse, AppError> {
    let submission = SubmitResponse {
        invite_id,
        device_token,
        answer: payload.answer,
        responder_id: identity.map(|i| i.user_id),
        reason: payload.reason,
    };

    let success = state.invite_service.submit_response(&submission).await?;
    if success {
        info!("Response '{}' accepted for invite {}", submission.answer.as_str(), submission.invite_id);
    } else {
        warn!("Response for invite {} denied by device lock", submission.invite_id);
    }
    Ok(Json(SubmitResult { success }))
}

/// Display name of the invite's creator, with the email fallback.
pub(crate) async fn sender_name(state: &AppState, creator_id: &str) -> Result<String, AppError> {
    let Some(user) = state.user_repo.find_by_id(creator_id).await? else {
        return Ok("Someone".to_string());
    };
    let profile = state.user_repo.find_profile(creator_id).await?;
    Ok(display_name_or_fallback(profile.as_ref().and_then(|p| p.display_name.as_deref()), &user.email))
}
