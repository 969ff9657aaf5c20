use axum::{
    extract::State,
    http::StatusCode,
    middleware::from_fn_with_state,
    routing::post,
    Extension, Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sojourn_booking::models::Booking;
use sojourn_booking::service::SubmitBooking;
use sojourn_catalog::pricing::Quote;
use sojourn_store::events::TOPIC_BOOKING_CREATED;
use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::auth::{traveler_auth_middleware, TravelerClaims};
use crate::publish_booking_event;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct QuoteRequest {
    hotel_id: Uuid,
    room_type: String,
    check_in: NaiveDate,
    check_out: NaiveDate,
}

#[derive(Debug, Serialize)]
struct BookingResponse {
    booking_id: Uuid,
    status: String,
    nights: u32,
    total_cents: i64,
}

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/v1/bookings", post(submit_booking).get(my_bookings))
        .route("/v1/bookings/quote", post(quote))
        .route_layer(from_fn_with_state(state, traveler_auth_middleware))
}

// ============================================================================
// Handlers
// ============================================================================

/// The wizard's live total: recomputed from the three inputs, nothing stored.
async fn quote(
    State(state): State<AppState>,
    Extension(_claims): Extension<TravelerClaims>,
    Json(req): Json<QuoteRequest>,
) -> Result<Json<Quote>, ApiError> {
    let quote = state
        .service
        .quote(req.hotel_id, &req.room_type, req.check_in, req.check_out)
        .await?;
    Ok(Json(quote))
}

async fn submit_booking(
    State(state): State<AppState>,
    Extension(claims): Extension<TravelerClaims>,
    Json(req): Json<SubmitBooking>,
) -> Result<(StatusCode, Json<BookingResponse>), ApiError> {
    let booking = state.service.submit(&claims.sub, req).await?;

    publish_booking_event(&state, TOPIC_BOOKING_CREATED, &booking).await;

    Ok((
        StatusCode::CREATED,
        Json(BookingResponse {
            booking_id: booking.id,
            status: booking.status.to_string(),
            nights: booking.nights,
            total_cents: booking.total_cents,
        }),
    ))
}

async fn my_bookings(
    State(state): State<AppState>,
    Extension(claims): Extension<TravelerClaims>,
) -> Result<Json<Vec<Booking>>, ApiError> {
    let bookings = state.service.bookings_for_traveler(&claims.sub).await?;
    Ok(Json(bookings))
}
