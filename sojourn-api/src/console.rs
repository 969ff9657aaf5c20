use std::convert::Infallible;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    middleware::from_fn_with_state,
    response::sse::{Event, KeepAlive, Sse},
    routing::{get, post},
    Extension, Json, Router,
};
use futures_util::stream::{self, Stream, StreamExt};
use serde::{Deserialize, Serialize};
use sojourn_booking::models::{Booking, BookingStatus};
use sojourn_booking::service::ConsoleBooking;
use sojourn_catalog::hotel::HotelDraft;
use sojourn_core::Error;
use sojourn_store::events::{TOPIC_BOOKING_ACCEPTED, TOPIC_BOOKING_REJECTED};
use tokio_stream::wrappers::BroadcastStream;
use tracing::warn;
use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::auth::{owner_auth_middleware, OwnerClaims};
use crate::publish_booking_event;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
struct HotelCreated {
    hotel_id: Uuid,
}

#[derive(Debug, Serialize)]
struct ModerationResponse {
    booking_id: Uuid,
    status: String,
}

#[derive(Debug, Deserialize)]
struct ArchiveQuery {
    status: String,
}

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/v1/console/hotels", post(create_hotel))
        .route("/v1/console/bookings", get(pending_bookings))
        .route("/v1/console/bookings/archive", get(archived_bookings))
        .route("/v1/console/bookings/{id}/accept", post(accept_booking))
        .route("/v1/console/bookings/{id}/reject", post(reject_booking))
        .route("/v1/console/stream", get(booking_stream))
        .route_layer(from_fn_with_state(state, owner_auth_middleware))
}

// ============================================================================
// Handlers
// ============================================================================

async fn create_hotel(
    State(state): State<AppState>,
    Extension(claims): Extension<OwnerClaims>,
    Json(draft): Json<HotelDraft>,
) -> Result<(StatusCode, Json<HotelCreated>), ApiError> {
    let hotel = state.service.create_hotel(&claims.sub, draft).await?;

    // Seed the display gauges; best effort, Postgres stays authoritative.
    if let Some(redis) = &state.redis {
        for room in &hotel.room_types {
            if let Err(e) = redis
                .set_room_availability(hotel.id, &room.name, i64::from(room.quantity))
                .await
            {
                warn!(hotel_id = %hotel.id, room = %room.name, error = %e, "failed to seed availability gauge");
            }
        }
    }

    Ok((StatusCode::CREATED, Json(HotelCreated { hotel_id: hotel.id })))
}

/// Pending bookings for this owner, each with best-effort guest contact.
async fn pending_bookings(
    State(state): State<AppState>,
    Extension(claims): Extension<OwnerClaims>,
) -> Result<Json<Vec<ConsoleBooking>>, ApiError> {
    let pending = state.service.pending_for_owner(&claims.sub).await?;
    Ok(Json(pending))
}

async fn archived_bookings(
    State(state): State<AppState>,
    Extension(claims): Extension<OwnerClaims>,
    Query(query): Query<ArchiveQuery>,
) -> Result<Json<Vec<Booking>>, ApiError> {
    let status = match query.status.to_ascii_lowercase().as_str() {
        "accepted" => BookingStatus::Accepted,
        "rejected" => BookingStatus::Rejected,
        other => {
            return Err(
                Error::ValidationFailed(format!("unknown archive status {other:?}")).into(),
            )
        }
    };
    let bookings = state.service.bookings_for_owner(&claims.sub, status).await?;
    Ok(Json(bookings))
}

async fn accept_booking(
    State(state): State<AppState>,
    Extension(claims): Extension<OwnerClaims>,
    Path(id): Path<Uuid>,
) -> Result<Json<ModerationResponse>, ApiError> {
    let booking = state.service.accept(&claims.sub, id).await?;
    publish_booking_event(&state, TOPIC_BOOKING_ACCEPTED, &booking).await;
    Ok(Json(ModerationResponse {
        booking_id: booking.id,
        status: booking.status.to_string(),
    }))
}

async fn reject_booking(
    State(state): State<AppState>,
    Extension(claims): Extension<OwnerClaims>,
    Path(id): Path<Uuid>,
) -> Result<Json<ModerationResponse>, ApiError> {
    let booking = state.service.reject(&claims.sub, id).await?;
    publish_booking_event(&state, TOPIC_BOOKING_REJECTED, &booking).await;
    Ok(Json(ModerationResponse {
        booking_id: booking.id,
        status: booking.status.to_string(),
    }))
}

/// Live booking feed for this owner's hotels: the current pending set first,
/// then lifecycle events as they happen.
async fn booking_stream(
    State(state): State<AppState>,
    Extension(claims): Extension<OwnerClaims>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    let pending = state
        .service
        .bookings_for_owner(&claims.sub, BookingStatus::Pending)
        .await?;
    let rx = state.service.subscribe_bookings();
    let owner_id = claims.sub.clone();

    let snapshot = stream::iter(
        pending
            .iter()
            .filter_map(|b| Event::default().event("booking").json_data(b.to_event()).ok())
            .map(Ok::<_, Infallible>)
            .collect::<Vec<_>>(),
    );

    let live = BroadcastStream::new(rx).filter_map(move |result| {
        let owner_id = owner_id.clone();
        async move {
            match result {
                Ok(event) if event.owner_id == owner_id => Event::default()
                    .event("booking")
                    .json_data(&event)
                    .ok()
                    .map(Ok::<_, Infallible>),
                _ => None,
            }
        }
    });

    Ok(Sse::new(snapshot.chain(live)).keep_alive(KeepAlive::default()))
}
