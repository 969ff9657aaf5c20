use axum::{extract::State, routing::post, Json, Router};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::auth::{OwnerClaims, TravelerClaims, ROLE_OWNER, ROLE_TRAVELER};
use crate::state::AppState;

#[derive(Debug, Serialize)]
struct AuthResponse {
    token: String,
    user_id: String,
}

#[derive(Debug, Deserialize)]
struct OwnerLoginRequest {
    /// Stable owner identity; a fresh one is minted when omitted.
    owner_id: Option<String>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/auth/guest", post(login_guest))
        .route("/v1/auth/owner", post(login_owner))
}

async fn login_guest(State(state): State<AppState>) -> Result<Json<AuthResponse>, ApiError> {
    let sub = format!("guest-{}", Uuid::new_v4());
    let claims = TravelerClaims {
        sub: sub.clone(),
        role: ROLE_TRAVELER.to_owned(),
        exp: expiry(state.auth.expiration),
    };

    let token = sign(&claims, &state.auth.secret)?;
    Ok(Json(AuthResponse { token, user_id: sub }))
}

async fn login_owner(
    State(state): State<AppState>,
    Json(req): Json<OwnerLoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let sub = req
        .owner_id
        .unwrap_or_else(|| format!("owner-{}", Uuid::new_v4()));
    let claims = OwnerClaims {
        sub: sub.clone(),
        role: ROLE_OWNER.to_owned(),
        exp: expiry(state.auth.expiration),
    };

    let token = sign(&claims, &state.auth.secret)?;
    Ok(Json(AuthResponse { token, user_id: sub }))
}

fn expiry(seconds: u64) -> usize {
    (Utc::now() + Duration::seconds(seconds as i64)).timestamp() as usize
}

fn sign<T: Serialize>(claims: &T, secret: &str) -> Result<String, ApiError> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| ApiError::Internal(anyhow::anyhow!("token encoding failed: {e}")))
}
