use axum::{extract::State, response::sse::{Event, KeepAlive, Sse}};
use crate::state::AppState;
use crate::api::extractors::auth::AuthUser;
use futures::stream::{self, Stream};
use std::convert::Infallible;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};

/// Live change feed for the caller's invites as server-sent events.
///
/// Each event is named after the change (`response_inserted`,
/// `invite_updated`) and carries the changed row as JSON.
pub async fn stream_changes(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.change_feed.subscribe();
    let owner_id = identity.user_id;
    info!("Dashboard stream opened for {}", owner_id);

    let events = stream::unfold((rx, owner_id), |(mut rx, owner_id)| async move {
        loop {
            match rx.recv().await {
                Ok(change) if change.owner_id() == owner_id => {
                    match Event::default().event(change.name()).json_data(&change) {
                        Ok(event) => return Some((Ok(event), (rx, owner_id))),
                        Err(e) => warn!("Failed to encode {} event: {}", change.name(), e),
                    }
                }
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Dashboard stream for {} lagged, skipped {} event(s)", owner_id, skipped);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    });

    Sse::new(events).keep_alive(KeepAlive::default())
}
