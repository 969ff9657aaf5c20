use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sojourn_catalog::hotel::{Hotel, HotelDraft};
use sojourn_catalog::pricing;
use sojourn_catalog::repository::HotelRepository;
use sojourn_core::{Error, Result};
use sojourn_shared::events::{BookingEvent, NotificationEvent};
use sojourn_shared::pii::Masked;
use tokio::sync::broadcast;
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::{Booking, BookingStatus, Notification, NotificationKind, StaySummary};
use crate::repository::{BookingRepository, NotificationRepository, UserProfile, UserRepository};

#[derive(Debug, Clone, Deserialize)]
pub struct SubmitBooking {
    pub hotel_id: Uuid,
    pub room_type: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests: u32,
}

/// Pending booking as the owner console renders it: the booking plus
/// best-effort guest contact details.
#[derive(Debug, Clone, Serialize)]
pub struct ConsoleBooking {
    #[serde(flatten)]
    pub booking: Booking,
    pub guest_name: String,
    pub guest_contact: Masked<String>,
}

/// Orchestrates the booking lifecycle over the repositories. Constructed once
/// at startup and handed to both surfaces; nothing here lives at module
/// scope.
pub struct BookingService {
    hotels: Arc<dyn HotelRepository>,
    bookings: Arc<dyn BookingRepository>,
    notifications: Arc<dyn NotificationRepository>,
    users: Arc<dyn UserRepository>,
    booking_events: broadcast::Sender<BookingEvent>,
    notification_events: broadcast::Sender<NotificationEvent>,
    feed_limit: usize,
}

impl BookingService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        hotels: Arc<dyn HotelRepository>,
        bookings: Arc<dyn BookingRepository>,
        notifications: Arc<dyn NotificationRepository>,
        users: Arc<dyn UserRepository>,
        booking_events: broadcast::Sender<BookingEvent>,
        notification_events: broadcast::Sender<NotificationEvent>,
        feed_limit: usize,
    ) -> Self {
        Self {
            hotels,
            bookings,
            notifications,
            users,
            booking_events,
            notification_events,
            feed_limit,
        }
    }

    // ------------------------------------------------------------------
    // Hotels
    // ------------------------------------------------------------------

    pub async fn create_hotel(&self, owner_id: &str, draft: HotelDraft) -> Result<Hotel> {
        let hotel = draft
            .validate(owner_id, Utc::now())
            .map_err(|e| Error::ValidationFailed(e.to_string()))?;
        self.hotels.create_hotel(&hotel).await?;
        info!(hotel_id = %hotel.id, owner_id, "hotel created");
        Ok(hotel)
    }

    pub async fn get_hotel(&self, id: Uuid) -> Result<Hotel> {
        self.hotels.get_hotel(id).await
    }

    pub async fn list_hotels(&self) -> Result<Vec<Hotel>> {
        self.hotels.list_hotels().await
    }

    // ------------------------------------------------------------------
    // Submission
    // ------------------------------------------------------------------

    /// Quote without committing anything; the booking wizard's live total.
    pub async fn quote(
        &self,
        hotel_id: Uuid,
        room_type: &str,
        check_in: NaiveDate,
        check_out: NaiveDate,
    ) -> Result<pricing::Quote> {
        let hotel = self.hotels.get_hotel(hotel_id).await?;
        let room = hotel
            .room_type(room_type)
            .ok_or_else(|| Error::NotFound(format!("room type {room_type:?}")))?;
        Ok(pricing::quote(
            room.price_per_night_cents,
            check_in,
            check_out,
        ))
    }

    pub async fn submit(&self, traveler_id: &str, req: SubmitBooking) -> Result<Booking> {
        if req.check_out <= req.check_in {
            return Err(Error::ValidationFailed(
                "check-out must be after check-in".into(),
            ));
        }
        if req.guests == 0 {
            return Err(Error::ValidationFailed("at least one guest".into()));
        }

        let hotel = self.hotels.get_hotel(req.hotel_id).await?;
        let room = hotel
            .room_type(&req.room_type)
            .ok_or_else(|| Error::NotFound(format!("room type {:?}", req.room_type)))?;

        if req.guests > room.capacity {
            return Err(Error::ValidationFailed(format!(
                "room {} sleeps at most {} guests",
                room.name, room.capacity
            )));
        }
        // Early exit on a stale zero; the guarded decrement in the store is
        // what actually prevents overselling under races.
        if room.quantity == 0 {
            return Err(Error::Conflict(format!("room {} is sold out", room.name)));
        }

        let quote = pricing::quote(room.price_per_night_cents, req.check_in, req.check_out);
        let booking = Booking {
            id: Uuid::new_v4(),
            traveler_id: traveler_id.to_string(),
            hotel_id: hotel.id,
            hotel_name: hotel.name.clone(),
            room_type: room.name.clone(),
            check_in: req.check_in,
            check_out: req.check_out,
            guests: req.guests,
            nights: quote.nights,
            price_per_night_cents: quote.price_per_night_cents,
            total_cents: quote.total_cents,
            status: BookingStatus::Pending,
            owner_id: hotel.owner_id.clone(),
            created_at: Utc::now(),
        };

        self.bookings.create_pending(&booking).await?;
        info!(booking_id = %booking.id, hotel_id = %hotel.id, room = %booking.room_type, "booking submitted");
        let _ = self.booking_events.send(booking.to_event());
        Ok(booking)
    }

    pub async fn bookings_for_traveler(&self, traveler_id: &str) -> Result<Vec<Booking>> {
        self.bookings.list_for_traveler(traveler_id).await
    }

    // ------------------------------------------------------------------
    // Moderation
    // ------------------------------------------------------------------

    pub async fn pending_for_owner(&self, owner_id: &str) -> Result<Vec<ConsoleBooking>> {
        let pending = self
            .bookings
            .list_for_owner(owner_id, BookingStatus::Pending)
            .await?;

        let mut out = Vec::with_capacity(pending.len());
        for booking in pending {
            // Best effort: a missing or unreadable profile never blocks the
            // listing.
            let profile = match self.users.get_user(&booking.traveler_id).await {
                Ok(p) => p,
                Err(e) => {
                    warn!(booking_id = %booking.id, error = %e, "guest profile lookup failed");
                    None
                }
            };
            let (guest_name, guest_contact) = match profile {
                Some(p) => (p.username, p.contact.unwrap_or_else(|| "Not available".into())),
                None => ("Unknown".into(), "Not available".into()),
            };
            out.push(ConsoleBooking {
                booking,
                guest_name,
                guest_contact: Masked(guest_contact),
            });
        }
        Ok(out)
    }

    pub async fn bookings_for_owner(
        &self,
        owner_id: &str,
        status: BookingStatus,
    ) -> Result<Vec<Booking>> {
        self.bookings.list_for_owner(owner_id, status).await
    }

    pub async fn accept(&self, owner_id: &str, booking_id: Uuid) -> Result<Booking> {
        self.moderate(owner_id, booking_id, BookingStatus::Accepted)
            .await
    }

    pub async fn reject(&self, owner_id: &str, booking_id: Uuid) -> Result<Booking> {
        self.moderate(owner_id, booking_id, BookingStatus::Rejected)
            .await
    }

    async fn moderate(&self, owner_id: &str, booking_id: Uuid, to: BookingStatus) -> Result<Booking> {
        let booking = self.bookings.get_booking(booking_id).await?;
        if booking.owner_id != owner_id {
            return Err(Error::PermissionDenied(
                "booking belongs to another hotel".into(),
            ));
        }
        if booking.status != BookingStatus::Pending {
            return Err(Error::Conflict(format!(
                "booking already {}",
                booking.status
            )));
        }

        let notification = notification_for(&booking, to);
        // The repository re-checks the Pending guard inside its transaction;
        // the check above just gives a friendlier early answer.
        let updated = self
            .bookings
            .transition(booking_id, to, &notification)
            .await?;

        info!(booking_id = %booking_id, status = %to, "booking moderated");
        let _ = self.booking_events.send(updated.to_event());
        let _ = self.notification_events.send(notification.to_event());
        Ok(updated)
    }

    // ------------------------------------------------------------------
    // Notifications
    // ------------------------------------------------------------------

    pub async fn feed(&self, user_id: &str) -> Result<Vec<Notification>> {
        self.notifications
            .list_for_user(user_id, self.feed_limit)
            .await
    }

    pub async fn mark_read(&self, user_id: &str, notification_id: Uuid) -> Result<()> {
        self.notifications.mark_read(notification_id, user_id).await
    }

    pub fn subscribe_bookings(&self) -> broadcast::Receiver<BookingEvent> {
        self.booking_events.subscribe()
    }

    pub fn subscribe_notifications(&self) -> broadcast::Receiver<NotificationEvent> {
        self.notification_events.subscribe()
    }

    // ------------------------------------------------------------------
    // Profiles
    // ------------------------------------------------------------------

    pub async fn get_profile(&self, user_id: &str) -> Result<Option<UserProfile>> {
        self.users.get_user(user_id).await
    }

    pub async fn upsert_profile(&self, profile: &UserProfile) -> Result<()> {
        if profile.username.trim().is_empty() {
            return Err(Error::ValidationFailed("username must not be empty".into()));
        }
        self.users.upsert_user(profile).await
    }
}

fn notification_for(booking: &Booking, to: BookingStatus) -> Notification {
    let (kind, title, message) = match to {
        BookingStatus::Accepted => (
            NotificationKind::BookingAccepted,
            "Booking Accepted".to_string(),
            format!(
                "Your booking is accepted by {} for {} from {} to {}.",
                booking.hotel_name, booking.room_type, booking.check_in, booking.check_out
            ),
        ),
        _ => (
            NotificationKind::BookingRejected,
            "Booking Rejected".to_string(),
            format!(
                "Your booking has been rejected by {} for {} from {} to {}.",
                booking.hotel_name, booking.room_type, booking.check_in, booking.check_out
            ),
        ),
    };

    Notification {
        id: Uuid::new_v4(),
        user_id: booking.traveler_id.clone(),
        kind,
        title,
        message,
        stay: StaySummary {
            hotel_name: booking.hotel_name.clone(),
            room_type: booking.room_type.clone(),
            check_in: booking.check_in,
            check_out: booking.check_out,
        },
        booking_id: booking.id,
        read: false,
        created_at: Utc::now(),
    }
}
