use axum::{extract::{State, Path}, response::Html};
use crate::state::AppState;
use crate::api::handlers::public_invite::sender_name;
use crate::error::AppError;
use std::sync::Arc;
use tera::Context;

/// Link-preview page for `/v/{short_code}`.
pub async fn share_page(
    State(state): State<Arc<AppState>>,
    Path(short_code): Path<String>,
) -> Result<Html<String>, AppError> {
    let invite = state.invite_service.find_public(&short_code).await?;
    let sender = sender_name(&state, &invite.creator_id).await?;

    let mut ctx = Context::new();
    ctx.insert("invite_id", &invite.id);
    ctx.insert("short_code", &invite.short_code);
    ctx.insert("recipient_name", &invite.recipient_name);
    ctx.insert("message", &invite.message);
    ctx.insert("theme", invite.theme().as_str());
    ctx.insert("sender_name", &sender);
    ctx.insert("share_url", &state.config.share_url(&invite.short_code));

    let html = state.templates.render("share.html", &ctx)
        .map_err(|e| AppError::InternalWithMsg(format!("Failed to render share page: {}", e)))?;
    Ok(Html(html))
}
