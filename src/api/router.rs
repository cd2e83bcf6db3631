use axum::{
    body::Body,
    extract::Request,
    routing::{get, post, delete},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{auth, dashboard, health, invite, profile, public_invite, share};
use tower_http::{
    trace::TraceLayer,
    classify::ServerErrorsFailureClass,
};
use tower_cookies::CookieManagerLayer;
use tracing::{info_span, Span, error, info};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Auth
        .route("/api/v1/auth/signup", post(auth::signup))
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/refresh", post(auth::refresh))
        .route("/api/v1/auth/logout", post(auth::logout))
        .route("/api/v1/me", get(profile::get_me).put(profile::update_me))

        // Creator
        .route("/api/v1/invites", post(invite::create_invite).get(invite::list_invites))
        .route("/api/v1/invites/{invite_id}", delete(invite::delete_invite))
        .route("/api/v1/invites/by-code/{short_code}/results", get(invite::get_results))
        .route("/api/v1/dashboard/stream", get(dashboard::stream_changes))

        // Recipient
        .route("/api/v1/public/invites/by-code/{short_code}", get(public_invite::get_invite_by_code))
        .route("/api/v1/public/invites/{invite_id}/claim", post(public_invite::claim_invite))
        .route("/api/v1/public/invites/{invite_id}/opened", post(public_invite::mark_opened))
        .route("/api/v1/public/invites/{invite_id}/responses", post(public_invite::submit_response))

        // Share links
        .route("/v/{short_code}", get(share::share_page))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                        user_id = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .layer(CookieManagerLayer::new())
        .with_state(state)
}
