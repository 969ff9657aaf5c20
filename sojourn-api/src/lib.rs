use axum::{
    extract::{ConnectInfo, Request, State},
    http::{Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Router,
};
use sojourn_booking::models::Booking;
use std::net::SocketAddr;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::error;

pub mod auth;
pub mod bookings;
pub mod console;
pub mod error;
pub mod hotels;
pub mod middleware;
pub mod notifications;
pub mod state;
pub mod users;
pub mod worker;

pub use state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
            axum::http::header::USER_AGENT,
        ]);

    Router::new()
        .merge(auth::routes())
        .merge(hotels::routes())
        .merge(bookings::routes(state.clone()))
        .merge(users::routes(state.clone()))
        .merge(notifications::routes(state.clone()))
        .merge(console::routes(state.clone()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        .with_state(state)
}

async fn rate_limit_middleware(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, impl IntoResponse> {
    let ip = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ci| ci.0.ip().to_string());

    if let (Some(redis), Some(ip)) = (&state.redis, ip) {
        let key = format!("ratelimit:{}", ip);
        match redis
            .check_rate_limit(&key, state.rate_limit_per_minute, 60)
            .await
        {
            Ok(true) => {}
            Ok(false) => {
                return Err((StatusCode::TOO_MANY_REQUESTS, "Rate limit exceeded"));
            }
            Err(_) => {} // Fail open
        }
    }

    Ok(next.run(req).await)
}

/// Publishes a booking lifecycle event when Kafka is configured; delivery
/// failures are logged and never fail the request that triggered them.
pub(crate) async fn publish_booking_event(state: &AppState, topic: &str, booking: &Booking) {
    let Some(kafka) = &state.kafka else {
        return;
    };
    match serde_json::to_string(&booking.to_event()) {
        Ok(payload) => {
            let _ = kafka
                .publish(topic, &booking.id.to_string(), &payload)
                .await;
        }
        Err(e) => error!(booking_id = %booking.id, "failed to encode booking event: {}", e),
    }
}
