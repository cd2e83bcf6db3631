use axum::{
    extract::{FromRequestParts, FromRef},
    http::{request::Parts, StatusCode},
};
use crate::state::AppState;
use crate::api::extractors::auth::decode_access_token;
use crate::domain::models::auth::Identity;
use std::sync::Arc;
use tower_cookies::Cookies;
use tracing::{debug, Span};

/// Session identity when present. Public routes accept anonymous callers.
pub struct MaybeAuthUser(pub Option<Identity>);

impl<S> FromRequestParts<S> for MaybeAuthUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Some(cookies) = parts.extensions.get::<Cookies>() else {
            return Ok(MaybeAuthUser(None));
        };

        let Some(access_token) = cookies.get("access_token").map(|c| c.value().to_string()) else {
            return Ok(MaybeAuthUser(None));
        };

        let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);
        let claims = match decode_access_token(&app_state, &access_token) {
            Ok(claims) => claims,
            Err(e) => {
                debug!("MaybeAuth: ignoring invalid token: {}", e);
                return Ok(MaybeAuthUser(None));
            }
        };

        Span::current().record("user_id", &claims.sub);

        Ok(MaybeAuthUser(Some(Identity { user_id: claims.sub })))
    }
}
