use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sojourn_shared::events::{BookingEvent, NotificationEvent};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Pending,
    Accepted,
    Rejected,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "PENDING",
            BookingStatus::Accepted => "ACCEPTED",
            BookingStatus::Rejected => "REJECTED",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(BookingStatus::Pending),
            "ACCEPTED" => Ok(BookingStatus::Accepted),
            "REJECTED" => Ok(BookingStatus::Rejected),
            other => Err(format!("unknown booking status {other:?}")),
        }
    }
}

/// A traveler's request to occupy one room type for a date range. Created
/// Pending; moderated exactly once to Accepted or Rejected; never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub traveler_id: String,
    pub hotel_id: Uuid,
    pub hotel_name: String,
    pub room_type: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests: u32,
    pub nights: u32,
    pub price_per_night_cents: i64,
    pub total_cents: i64,
    pub status: BookingStatus,
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    /// Event payload for the console stream and the `booking.*` topics.
    pub fn to_event(&self) -> BookingEvent {
        BookingEvent {
            booking_id: self.id,
            hotel_id: self.hotel_id,
            hotel_name: self.hotel_name.clone(),
            room_type: self.room_type.clone(),
            traveler_id: self.traveler_id.clone(),
            owner_id: self.owner_id.clone(),
            status: self.status.to_string(),
            occurred_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    BookingAccepted,
    BookingRejected,
}

impl NotificationKind {
    /// Wire value, kept identical to what the original clients filter on.
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::BookingAccepted => "booking_accepted",
            NotificationKind::BookingRejected => "booking_rejected",
        }
    }
}

impl FromStr for NotificationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "booking_accepted" => Ok(NotificationKind::BookingAccepted),
            "booking_rejected" => Ok(NotificationKind::BookingRejected),
            other => Err(format!("unknown notification kind {other:?}")),
        }
    }
}

/// Denormalized stay details embedded in a notification so the feed renders
/// without a second read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaySummary {
    pub hotel_name: String,
    pub room_type: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
}

/// Written once per moderation transition, in the same transaction as the
/// status update. The only later mutation is the traveler marking it read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: String,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub stay: StaySummary,
    pub booking_id: Uuid,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Event payload for the traveler notification stream.
    pub fn to_event(&self) -> NotificationEvent {
        NotificationEvent {
            notification_id: self.id,
            user_id: self.user_id.clone(),
            kind: self.kind.as_str().to_string(),
            title: self.title.clone(),
            message: self.message.clone(),
            hotel_name: self.stay.hotel_name.clone(),
            room_type: self.stay.room_type.clone(),
            check_in: self.stay.check_in,
            check_out: self.stay.check_out,
            booking_id: self.booking_id,
            created_at: self.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_text() {
        for status in [
            BookingStatus::Pending,
            BookingStatus::Accepted,
            BookingStatus::Rejected,
        ] {
            assert_eq!(status.as_str().parse::<BookingStatus>().unwrap(), status);
        }
        assert!("CONFIRMED".parse::<BookingStatus>().is_err());
    }

    #[test]
    fn notification_kind_uses_original_wire_values() {
        assert_eq!(NotificationKind::BookingAccepted.as_str(), "booking_accepted");
        assert_eq!(
            "booking_rejected".parse::<NotificationKind>().unwrap(),
            NotificationKind::BookingRejected
        );
    }
}
