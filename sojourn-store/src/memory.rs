use async_trait::async_trait;
use sojourn_booking::models::{Booking, BookingStatus, Notification};
use sojourn_booking::repository::{
    BookingRepository, NotificationRepository, UserProfile, UserRepository,
};
use sojourn_catalog::hotel::Hotel;
use sojourn_catalog::repository::HotelRepository;
use sojourn_core::{Error, Result};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-process store backing tests and `database.url = "memory"` runs. One
/// write lock spans every multi-document write, which gives the same
/// all-or-nothing behavior the Postgres transactions provide.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    hotels: HashMap<Uuid, Hotel>,
    bookings: HashMap<Uuid, Booking>,
    notifications: Vec<Notification>,
    users: HashMap<String, UserProfile>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HotelRepository for MemoryStore {
    async fn create_hotel(&self, hotel: &Hotel) -> Result<()> {
        self.inner
            .write()
            .await
            .hotels
            .insert(hotel.id, hotel.clone());
        Ok(())
    }

    async fn get_hotel(&self, id: Uuid) -> Result<Hotel> {
        self.inner
            .read()
            .await
            .hotels
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("hotel {id}")))
    }

    async fn list_hotels(&self) -> Result<Vec<Hotel>> {
        let mut hotels: Vec<Hotel> = self.inner.read().await.hotels.values().cloned().collect();
        hotels.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(hotels)
    }
}

#[async_trait]
impl BookingRepository for MemoryStore {
    async fn create_pending(&self, booking: &Booking) -> Result<()> {
        let mut inner = self.inner.write().await;

        let hotel = inner
            .hotels
            .get_mut(&booking.hotel_id)
            .ok_or_else(|| Error::NotFound(format!("hotel {}", booking.hotel_id)))?;
        let room = hotel
            .room_types
            .iter_mut()
            .find(|r| r.name == booking.room_type)
            .ok_or_else(|| Error::NotFound(format!("room type {:?}", booking.room_type)))?;

        if room.quantity == 0 {
            return Err(Error::Conflict(format!(
                "room {} is sold out",
                booking.room_type
            )));
        }
        room.quantity -= 1;

        inner.bookings.insert(booking.id, booking.clone());
        Ok(())
    }

    async fn get_booking(&self, id: Uuid) -> Result<Booking> {
        self.inner
            .read()
            .await
            .bookings
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("booking {id}")))
    }

    async fn list_for_traveler(&self, traveler_id: &str) -> Result<Vec<Booking>> {
        let mut out: Vec<Booking> = self
            .inner
            .read()
            .await
            .bookings
            .values()
            .filter(|b| b.traveler_id == traveler_id)
            .cloned()
            .collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(out)
    }

    async fn list_for_owner(&self, owner_id: &str, status: BookingStatus) -> Result<Vec<Booking>> {
        let mut out: Vec<Booking> = self
            .inner
            .read()
            .await
            .bookings
            .values()
            .filter(|b| b.owner_id == owner_id && b.status == status)
            .cloned()
            .collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(out)
    }

    async fn transition(
        &self,
        id: Uuid,
        to: BookingStatus,
        notification: &Notification,
    ) -> Result<Booking> {
        let mut inner = self.inner.write().await;

        let booking = inner
            .bookings
            .get_mut(&id)
            .ok_or_else(|| Error::NotFound(format!("booking {id}")))?;
        if booking.status != BookingStatus::Pending {
            return Err(Error::Conflict(format!("booking already {}", booking.status)));
        }
        booking.status = to;
        let updated = booking.clone();

        inner.notifications.push(notification.clone());
        Ok(updated)
    }
}

#[async_trait]
impl NotificationRepository for MemoryStore {
    async fn list_for_user(&self, user_id: &str, limit: usize) -> Result<Vec<Notification>> {
        let mut out: Vec<Notification> = self
            .inner
            .read()
            .await
            .notifications
            .iter()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        out.truncate(limit);
        Ok(out)
    }

    async fn mark_read(&self, id: Uuid, user_id: &str) -> Result<()> {
        let mut inner = self.inner.write().await;
        let notification = inner
            .notifications
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| Error::NotFound(format!("notification {id}")))?;
        if notification.user_id != user_id {
            return Err(Error::PermissionDenied(
                "notification belongs to another user".into(),
            ));
        }
        notification.read = true;
        Ok(())
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn get_user(&self, id: &str) -> Result<Option<UserProfile>> {
        Ok(self.inner.read().await.users.get(id).cloned())
    }

    async fn upsert_user(&self, profile: &UserProfile) -> Result<()> {
        self.inner
            .write()
            .await
            .users
            .insert(profile.id.clone(), profile.clone());
        Ok(())
    }
}
