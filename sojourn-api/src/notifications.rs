use std::convert::Infallible;

use axum::{
    extract::{Path, State},
    middleware::from_fn_with_state,
    response::sse::{Event, KeepAlive, Sse},
    routing::{get, post},
    Extension, Json, Router,
};
use futures_util::stream::{self, Stream, StreamExt};
use serde::Serialize;
use sojourn_booking::models::Notification;
use tokio_stream::wrappers::BroadcastStream;
use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::auth::{traveler_auth_middleware, TravelerClaims};
use crate::state::AppState;

#[derive(Debug, Serialize)]
struct MarkedRead {
    notification_id: Uuid,
    read: bool,
}

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/v1/notifications", get(list_notifications))
        .route("/v1/notifications/stream", get(notification_stream))
        .route("/v1/notifications/{id}/read", post(mark_read))
        .route_layer(from_fn_with_state(state, traveler_auth_middleware))
}

// ============================================================================
// Handlers
// ============================================================================

/// Booking notifications for the caller, newest first, bounded by the
/// configured feed limit.
async fn list_notifications(
    State(state): State<AppState>,
    Extension(claims): Extension<TravelerClaims>,
) -> Result<Json<Vec<Notification>>, ApiError> {
    let feed = state.service.feed(&claims.sub).await?;
    Ok(Json(feed))
}

async fn mark_read(
    State(state): State<AppState>,
    Extension(claims): Extension<TravelerClaims>,
    Path(id): Path<Uuid>,
) -> Result<Json<MarkedRead>, ApiError> {
    state.service.mark_read(&claims.sub, id).await?;
    Ok(Json(MarkedRead {
        notification_id: id,
        read: true,
    }))
}

/// Restartable live sequence: every connect re-delivers the current feed,
/// then incremental events as moderation happens.
async fn notification_stream(
    State(state): State<AppState>,
    Extension(claims): Extension<TravelerClaims>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    let current = state.service.feed(&claims.sub).await?;
    let rx = state.service.subscribe_notifications();
    let user_id = claims.sub.clone();

    let snapshot = stream::iter(
        current
            .iter()
            .filter_map(|n| {
                Event::default()
                    .event("notification")
                    .json_data(n.to_event())
                    .ok()
            })
            .map(Ok::<_, Infallible>)
            .collect::<Vec<_>>(),
    );

    let live = BroadcastStream::new(rx).filter_map(move |result| {
        let user_id = user_id.clone();
        async move {
            match result {
                Ok(event) if event.user_id == user_id => Event::default()
                    .event("notification")
                    .json_data(&event)
                    .ok()
                    .map(Ok::<_, Infallible>),
                _ => None,
            }
        }
    });

    Ok(Sse::new(snapshot.chain(live)).keep_alive(KeepAlive::default()))
}
