use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use chrono::NaiveTime;
use serde::Serialize;
use sojourn_catalog::hotel::Hotel;
use tracing::warn;
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HotelSummary {
    pub id: Uuid,
    pub name: String,
    pub location: Option<String>,
    pub amenities: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct RoomAvailability {
    pub name: String,
    pub capacity: u32,
    pub price_per_night_cents: i64,
    pub available: i64,
}

#[derive(Debug, Serialize)]
pub struct HotelDetail {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub amenities: Vec<String>,
    pub open_time: Option<NaiveTime>,
    pub close_time: Option<NaiveTime>,
    pub rooms: Vec<RoomAvailability>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/hotels", get(list_hotels))
        .route("/v1/hotels/{id}", get(hotel_detail))
}

// ============================================================================
// Handlers
// ============================================================================

async fn list_hotels(State(state): State<AppState>) -> Result<Json<Vec<HotelSummary>>, ApiError> {
    let hotels = state.service.list_hotels().await?;
    Ok(Json(
        hotels
            .into_iter()
            .map(|h| HotelSummary {
                id: h.id,
                name: h.name,
                location: h.location,
                amenities: h.amenities.into_iter().collect(),
            })
            .collect(),
    ))
}

async fn hotel_detail(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<HotelDetail>, ApiError> {
    let hotel = state.service.get_hotel(id).await?;
    let rooms = rooms_with_availability(&state, &hotel).await;

    Ok(Json(HotelDetail {
        id: hotel.id,
        name: hotel.name,
        description: hotel.description,
        location: hotel.location,
        amenities: hotel.amenities.into_iter().collect(),
        open_time: hotel.open_time,
        close_time: hotel.close_time,
        rooms,
    }))
}

/// Display counts come from the Redis gauge when it is warm; a cold or
/// failing cache falls back to the authoritative quantity and re-seeds.
async fn rooms_with_availability(state: &AppState, hotel: &Hotel) -> Vec<RoomAvailability> {
    let mut rooms = Vec::with_capacity(hotel.room_types.len());
    for room in &hotel.room_types {
        let authoritative = i64::from(room.quantity);
        let available = match &state.redis {
            Some(redis) => match redis.get_room_availability(hotel.id, &room.name).await {
                Ok(Some(cached)) => cached.max(0),
                Ok(None) => {
                    if let Err(e) = redis
                        .set_room_availability(hotel.id, &room.name, authoritative)
                        .await
                    {
                        warn!(hotel_id = %hotel.id, room = %room.name, error = %e, "failed to seed availability gauge");
                    }
                    authoritative
                }
                Err(e) => {
                    warn!(hotel_id = %hotel.id, room = %room.name, error = %e, "availability gauge read failed");
                    authoritative
                }
            },
            None => authoritative,
        };
        rooms.push(RoomAvailability {
            name: room.name.clone(),
            capacity: room.capacity,
            price_per_night_cents: room.price_per_night_cents,
            available,
        });
    }
    rooms
}
