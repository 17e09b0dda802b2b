//! SSE bridge from the in-process notification channel to the browser.

use std::convert::Infallible;

use axum::{
    Router,
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
    routing::get,
};
use tokio_stream::{Stream, StreamExt, wrappers::BroadcastStream};

use crate::{auth::AuthUser, state::AppState};

/// GET /api/notifications/stream
/// Stream the caller's watering notifications as server-sent events.
pub async fn stream(
    State(state): State<AppState>,
    user: AuthUser,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.notifications.subscribe();
    let owner_id = user.owner_id;

    let stream = BroadcastStream::new(rx).filter_map(move |event| match event {
        Ok(notification) if notification.owner_id == owner_id => Event::default()
            .event("watering")
            .json_data(&notification)
            .ok()
            .map(Ok::<_, Infallible>),
        // Other users' notifications and lagged receivers are skipped.
        _ => None,
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}

pub fn router() -> Router<AppState> {
    Router::new().route("/notifications/stream", get(stream))
}
