use axum::{extract::State, response::IntoResponse, Json};
use crate::state::AppState;
use crate::error::AppError;
use crate::api::dtos::requests::UpdateProfileRequest;
use crate::api::extractors::auth::AuthUser;
use crate::domain::models::auth::UserProfile;
use crate::domain::models::user::display_name_or_fallback;
use std::sync::Arc;
use tracing::info;

const MAX_DISPLAY_NAME_LEN: usize = 80;

pub async fn get_me(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let user = state.user_repo.find_by_id(&identity.user_id).await?
        .ok_or(AppError::Unauthorized)?;
    let profile = state.user_repo.find_profile(&user.id).await?;

    Ok(Json(UserProfile {
        display_name: display_name_or_fallback(profile.as_ref().and_then(|p| p.display_name.as_deref()), &user.email),
        id: user.id,
        email: user.email,
    }))
}

pub async fn update_me(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<impl IntoResponse, AppError> {
    let display_name = payload.display_name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty());

    if display_name.is_some_and(|n| n.chars().count() > MAX_DISPLAY_NAME_LEN) {
        return Err(AppError::Validation(format!(
            "Display name must be at most {} characters", MAX_DISPLAY_NAME_LEN
        )));
    }

    let user = state.user_repo.find_by_id(&identity.user_id).await?
        .ok_or(AppError::Unauthorized)?;
    let profile = state.user_repo.update_display_name(&user.id, display_name).await?;

    info!("Profile updated for user {}", user.id);

    Ok(Json(UserProfile {
        display_name: display_name_or_fallback(profile.display_name.as_deref(), &user.email),
        id: user.id,
        email: user.email,
    }))
}
