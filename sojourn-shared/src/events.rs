use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Booking lifecycle event, fanned out to the owner console stream and
/// published on the `booking.*` Kafka topics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingEvent {
    pub booking_id: Uuid,
    pub hotel_id: Uuid,
    pub hotel_name: String,
    pub room_type: String,
    pub traveler_id: String,
    pub owner_id: String,
    pub status: String,
    pub occurred_at: DateTime<Utc>,
}

/// Delivered to the traveler notification stream when moderation writes a
/// notification record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationEvent {
    pub notification_id: Uuid,
    pub user_id: String,
    pub kind: String,
    pub title: String,
    pub message: String,
    pub hotel_name: String,
    pub room_type: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub booking_id: Uuid,
    pub created_at: DateTime<Utc>,
}
