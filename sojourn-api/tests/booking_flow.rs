use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};
use sojourn_api::middleware::auth::{OwnerClaims, TravelerClaims};
use sojourn_api::state::AuthConfig;
use sojourn_api::{app, AppState};
use sojourn_booking::service::BookingService;
use sojourn_shared::events::{BookingEvent, NotificationEvent};
use sojourn_store::MemoryStore;
use tokio::sync::broadcast;
use tower::util::ServiceExt;

const SECRET: &str = "test-secret";

fn test_app() -> Router {
    let store = Arc::new(MemoryStore::new());
    let (booking_tx, _) = broadcast::channel::<BookingEvent>(16);
    let (notification_tx, _) = broadcast::channel::<NotificationEvent>(16);

    let service = Arc::new(BookingService::new(
        store.clone(),
        store.clone(),
        store.clone(),
        store,
        booking_tx,
        notification_tx,
        100,
    ));

    app(AppState {
        service,
        redis: None,
        kafka: None,
        auth: AuthConfig {
            secret: SECRET.to_string(),
            expiration: 3600,
        },
        rate_limit_per_minute: 100,
    })
}

fn traveler_token(sub: &str) -> String {
    let claims = TravelerClaims {
        sub: sub.to_string(),
        role: "TRAVELER".to_string(),
        exp: (Utc::now().timestamp() + 3600) as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap()
}

fn owner_token(sub: &str) -> String {
    let claims = OwnerClaims {
        sub: sub.to_string(),
        role: "OWNER".to_string(),
        exp: (Utc::now().timestamp() + 3600) as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap()
}

async fn call(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

fn seaside_draft() -> Value {
    json!({
        "name": "Seaside Inn",
        "description": "On the beach",
        "location": "Galle",
        "room_types": [
            { "name": "Deluxe", "capacity": "2", "price": "150", "quantity": "2" }
        ],
        "amenities": ["wifi", "pool"],
        "open_time": "08:00",
        "close_time": "22:00"
    })
}

#[tokio::test]
async fn booking_lifecycle_end_to_end() {
    let app = test_app();
    let owner = owner_token("owner-1");
    let traveler = traveler_token("traveler-1");

    // Owner creates the hotel.
    let (status, body) = call(
        &app,
        Method::POST,
        "/v1/console/hotels",
        Some(&owner),
        Some(seaside_draft()),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let hotel_id = body["hotel_id"].as_str().unwrap().to_string();

    // Traveler registers contact details, quotes, then books.
    let (status, _) = call(
        &app,
        Method::PUT,
        "/v1/profile",
        Some(&traveler),
        Some(json!({ "username": "amara", "contact": "555-0100" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, quote) = call(
        &app,
        Method::POST,
        "/v1/bookings/quote",
        Some(&traveler),
        Some(json!({
            "hotel_id": hotel_id,
            "room_type": "Deluxe",
            "check_in": "2024-06-01",
            "check_out": "2024-06-04"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(quote["nights"], 3);
    assert_eq!(quote["total_cents"], 49500);

    let submit_body = json!({
        "hotel_id": hotel_id,
        "room_type": "Deluxe",
        "check_in": "2024-06-01",
        "check_out": "2024-06-04",
        "guests": 2
    });
    let (status, booking) = call(
        &app,
        Method::POST,
        "/v1/bookings",
        Some(&traveler),
        Some(submit_body.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(booking["status"], "PENDING");
    assert_eq!(booking["total_cents"], 49500);
    let booking_id = booking["booking_id"].as_str().unwrap().to_string();

    // The room listing reflects the decrement.
    let (status, detail) = call(
        &app,
        Method::GET,
        &format!("/v1/hotels/{hotel_id}"),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["rooms"][0]["available"], 1);

    // The console lists the pending booking with the guest's contact.
    let (status, pending) = call(&app, Method::GET, "/v1/console/bookings", Some(&owner), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(pending.as_array().unwrap().len(), 1);
    assert_eq!(pending[0]["guest_name"], "amara");
    assert_eq!(pending[0]["guest_contact"], "555-0100");

    // Accept is terminal; a second accept conflicts.
    let accept_uri = format!("/v1/console/bookings/{booking_id}/accept");
    let (status, accepted) = call(&app, Method::POST, &accept_uri, Some(&owner), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(accepted["status"], "ACCEPTED");

    let (status, _) = call(&app, Method::POST, &accept_uri, Some(&owner), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Exactly one acceptance notification reaches the traveler.
    let (status, feed) = call(&app, Method::GET, "/v1/notifications", Some(&traveler), None).await;
    assert_eq!(status, StatusCode::OK);
    let feed = feed.as_array().unwrap().clone();
    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0]["kind"], "booking_accepted");
    assert_eq!(feed[0]["read"], false);
    let notification_id = feed[0]["id"].as_str().unwrap().to_string();

    let (status, marked) = call(
        &app,
        Method::POST,
        &format!("/v1/notifications/{notification_id}/read"),
        Some(&traveler),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(marked["read"], true);

    let (_, feed) = call(&app, Method::GET, "/v1/notifications", Some(&traveler), None).await;
    assert_eq!(feed[0]["read"], true);

    // Second booking exhausts the inventory; the third conflicts.
    let (status, _) = call(
        &app,
        Method::POST,
        "/v1/bookings",
        Some(&traveler),
        Some(submit_body.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = call(
        &app,
        Method::POST,
        "/v1/bookings",
        Some(&traveler),
        Some(submit_body),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["kind"], "CONFLICT");

    // Accepted archive shows the moderated booking.
    let (status, archive) = call(
        &app,
        Method::GET,
        "/v1/console/bookings/archive?status=accepted",
        Some(&owner),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(archive.as_array().unwrap().len(), 1);

    // Traveler sees both bookings in their history.
    let (_, mine) = call(&app, Method::GET, "/v1/bookings", Some(&traveler), None).await;
    assert_eq!(mine.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn validation_and_auth_failures_map_to_statuses() {
    let app = test_app();
    let owner = owner_token("owner-1");
    let traveler = traveler_token("traveler-1");

    // No token.
    let (status, _) = call(&app, Method::GET, "/v1/bookings", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Traveler token on an owner route: decodes fine, wrong role.
    let (status, _) = call(&app, Method::GET, "/v1/console/bookings", Some(&traveler), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Malformed room price is rejected at ingestion.
    let mut bad_draft = seaside_draft();
    bad_draft["room_types"][0]["price"] = json!("not-a-number");
    let (status, body) = call(
        &app,
        Method::POST,
        "/v1/console/hotels",
        Some(&owner),
        Some(bad_draft),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "VALIDATION_FAILED");

    // Zero-night stays are rejected at submission.
    let (_, created) = call(
        &app,
        Method::POST,
        "/v1/console/hotels",
        Some(&owner),
        Some(seaside_draft()),
    )
    .await;
    let hotel_id = created["hotel_id"].as_str().unwrap();
    let (status, body) = call(
        &app,
        Method::POST,
        "/v1/bookings",
        Some(&traveler),
        Some(json!({
            "hotel_id": hotel_id,
            "room_type": "Deluxe",
            "check_in": "2024-06-01",
            "check_out": "2024-06-01",
            "guests": 1
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "VALIDATION_FAILED");

    // Unknown hotel is NotFound.
    let (status, _) = call(
        &app,
        Method::POST,
        "/v1/bookings/quote",
        Some(&traveler),
        Some(json!({
            "hotel_id": "00000000-0000-0000-0000-000000000000",
            "room_type": "Deluxe",
            "check_in": "2024-06-01",
            "check_out": "2024-06-04"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
