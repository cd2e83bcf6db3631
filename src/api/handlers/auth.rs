use axum::{extract::State, response::IntoResponse, Json, http::StatusCode};
use crate::state::AppState;
use crate::error::AppError;
use crate::api::dtos::requests::{LoginRequest, SignupRequest};
use crate::domain::models::auth::{AuthResponse, UserProfile};
use crate::domain::models::user::{display_name_or_fallback, Profile, User};
use crate::domain::services::auth_service::TokenPair;
use std::sync::Arc;
use tower_cookies::{Cookies, Cookie};
use tower_cookies::cookie::SameSite;
use time::Duration;
use tracing::{info, warn};

pub async fn signup(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    Json(payload): Json<SignupRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let email = normalize_email(&payload.email);

    if state.user_repo.find_by_email(&email).await?.is_some() {
        return Err(AppError::Conflict("An account with this email already exists".into()));
    }

    let password_hash = state.auth_service.hash_password(&payload.password)?;
    let user = User::new(email, password_hash);
    let display_name = payload.display_name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty());
    let profile = Profile::new(user.id.clone(), display_name);

    let user = state.user_repo.create(&user, &profile).await?;
    let tokens = state.auth_service.login(&user).await?;
    set_cookies(&cookies, &tokens);

    info!("User signed up: {}", user.id);

    Ok((StatusCode::CREATED, Json(auth_response(tokens.csrf_token, &user, profile.display_name.as_deref()))))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = state.user_repo.find_by_email(&normalize_email(&payload.email)).await?
        .ok_or(AppError::Unauthorized)?;

    state.auth_service.verify_password(&payload.password, &user.password_hash)
        .inspect_err(|_| warn!("Failed login for user {}", user.id))?;

    let tokens = state.auth_service.login(&user).await?;
    set_cookies(&cookies, &tokens);

    info!("User logged in: {}", user.id);

    let profile = state.user_repo.find_profile(&user.id).await?;
    let display_name = profile.as_ref().and_then(|p| p.display_name.as_deref());
    Ok(Json(auth_response(tokens.csrf_token, &user, display_name)))
}

pub async fn refresh(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
) -> Result<impl IntoResponse, AppError> {
    let refresh_cookie = cookies.get("refresh_token").ok_or(AppError::Unauthorized)?;
    let raw_token = refresh_cookie.value();

    let token_hash = state.auth_service.hash_token(raw_token);
    let record = state.auth_repo.find_refresh_token(&token_hash).await?
        .ok_or(AppError::Unauthorized)?;

    let user = state.user_repo.find_by_id(&record.user_id).await?
        .ok_or(AppError::Unauthorized)?;

    let tokens = state.auth_service.refresh(raw_token, &user).await?;
    set_cookies(&cookies, &tokens);

    info!("Token refreshed for user: {}", user.id);

    let profile = state.user_repo.find_profile(&user.id).await?;
    let display_name = profile.as_ref().and_then(|p| p.display_name.as_deref());
    Ok(Json(auth_response(tokens.csrf_token, &user, display_name)))
}

pub async fn logout(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
) -> Result<impl IntoResponse, AppError> {
    if let Some(cookie) = cookies.get("refresh_token")
        && let Err(e) = state.auth_service.logout(cookie.value()).await
    {
        warn!("Failed to revoke refresh token on logout: {}", e);
    }

    cookies.remove(Cookie::build(("access_token", "")).path("/").into());
    cookies.remove(Cookie::build(("refresh_token", "")).path("/").into());

    info!("User logged out");

    Ok(StatusCode::OK)
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn auth_response(csrf_token: String, user: &User, display_name: Option<&str>) -> AuthResponse {
    AuthResponse {
        csrf_token,
        user: UserProfile {
            id: user.id.clone(),
            email: user.email.clone(),
            display_name: display_name_or_fallback(display_name, &user.email),
        },
    }
}

fn set_cookies(cookies: &Cookies, tokens: &TokenPair) {
    let mut access_c = Cookie::new("access_token", tokens.access_token.clone());
    access_c.set_http_only(true);
    access_c.set_secure(true);
    access_c.set_same_site(SameSite::Strict);
    access_c.set_path("/");
    access_c.set_max_age(Duration::minutes(15));
    cookies.add(access_c);

    let mut refresh_c = Cookie::new("refresh_token", tokens.refresh_token.clone());
    refresh_c.set_http_only(true);
    refresh_c.set_secure(true);
    refresh_c.set_same_site(SameSite::Strict);
    refresh_c.set_path("/");
    refresh_c.set_max_age(Duration::days(7));
    cookies.add(refresh_c);
}
