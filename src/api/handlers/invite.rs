use axum::{extract::{State, Path}, response::IntoResponse, Json, http::StatusCode};
use crate::state::AppState;
use crate::api::extractors::auth::AuthUser;
use crate::api::dtos::requests::CreateInviteRequest;
use crate::api::dtos::responses::{DashboardResponse, InviteCreatedResponse, ResultsResponse};
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

pub async fn create_invite(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
    Json(payload): Json<CreateInviteRequest>,
) -> Result<impl IntoResponse, AppError> {
    let params = payload.into_params(identity.user_id)?;
    let invite = state.invite_service.create(params).await?;

    let share_url = state.config.share_url(&invite.short_code);
    Ok((StatusCode::CREATED, Json(InviteCreatedResponse { invite, share_url })))
}

pub async fn list_invites(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let entries = state.invite_service.dashboard(&identity.user_id).await?;
    info!("Dashboard loaded with {} invite(s)", entries.len());

    Ok(Json(DashboardResponse::build(entries, |code| state.config.share_url(code))))
}

pub async fn delete_invite(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
    Path(invite_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.invite_service.soft_delete(&identity.user_id, &invite_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_results(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
    Path(short_code): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let entry = state.invite_service.results(&identity.user_id, &short_code).await?;
    Ok(Json(ResultsResponse::from(entry)))
}
