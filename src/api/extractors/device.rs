use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};
use tower_cookies::{Cookie, Cookies};
use tower_cookies::cookie::SameSite;
use time::Duration;
use tracing::debug;
use uuid::Uuid;

use crate::infra::client::http_invite_client::DEVICE_HEADER;

pub const DEVICE_COOKIE: &str = "anon_id";
const MAX_TOKEN_LEN: usize = 128;

/// Anonymous device identifier of the caller.
///
/// Taken from the `X-Device-Token` header, else the `anon_id` cookie. A
/// browser without either gets a fresh id stored in the cookie for a year.
pub struct DeviceToken(pub String);

impl<S> FromRequestParts<S> for DeviceToken
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(value) = parts.headers.get(DEVICE_HEADER) {
            let token = value.to_str().map_err(|_| StatusCode::BAD_REQUEST)?.trim();
            if token.is_empty() || token.len() > MAX_TOKEN_LEN {
                return Err(StatusCode::BAD_REQUEST);
            }
            return Ok(DeviceToken(token.to_string()));
        }

        let cookies = parts.extensions.get::<Cookies>()
            .ok_or(StatusCode::INTERNAL_SERVER_ERROR)?;

        if let Some(cookie) = cookies.get(DEVICE_COOKIE)
            && !cookie.value().is_empty()
        {
            return Ok(DeviceToken(cookie.value().to_string()));
        }

        let token = Uuid::new_v4().to_string();
        debug!("Issuing new device id");

        let mut c = Cookie::new(DEVICE_COOKIE, token.clone());
        c.set_http_only(true);
        c.set_same_site(SameSite::Lax);
        c.set_path("/");
        c.set_max_age(Duration::days(365));
        cookies.add(c);

        Ok(DeviceToken(token))
    }
}
