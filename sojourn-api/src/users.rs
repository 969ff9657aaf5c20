use axum::{
    extract::State,
    middleware::from_fn_with_state,
    routing::get,
    Extension, Json, Router,
};
use serde::Deserialize;
use sojourn_booking::repository::UserProfile;
use sojourn_core::Error;

use crate::error::ApiError;
use crate::middleware::auth::{traveler_auth_middleware, TravelerClaims};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
struct ProfileRequest {
    username: String,
    contact: Option<String>,
}

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/v1/profile", get(get_profile).put(put_profile))
        .route_layer(from_fn_with_state(state, traveler_auth_middleware))
}

async fn get_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<TravelerClaims>,
) -> Result<Json<UserProfile>, ApiError> {
    let profile = state
        .service
        .get_profile(&claims.sub)
        .await?
        .ok_or_else(|| Error::NotFound(format!("profile {}", claims.sub)))?;
    Ok(Json(profile))
}

/// The contact written here is what the owner console shows next to a
/// pending booking.
async fn put_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<TravelerClaims>,
    Json(req): Json<ProfileRequest>,
) -> Result<Json<UserProfile>, ApiError> {
    let profile = UserProfile {
        id: claims.sub.clone(),
        username: req.username,
        contact: req.contact,
    };
    state.service.upsert_profile(&profile).await?;
    Ok(Json(profile))
}
