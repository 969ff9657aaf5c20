use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sojourn_core::Result;
use uuid::Uuid;

use crate::models::{Booking, BookingStatus, Notification};

/// Data access for the bookings collection. The two multi-document writes of
/// the workflow are single repository calls so implementations can make them
/// atomic: submission pairs the insert with the inventory decrement, and a
/// moderation transition pairs the status update with the notification
/// insert.
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Persists a Pending booking and decrements the booked room type's
    /// quantity, all or nothing. Fails with Conflict when the quantity is
    /// already zero, leaving no partial state behind.
    async fn create_pending(&self, booking: &Booking) -> Result<()>;

    async fn get_booking(&self, id: Uuid) -> Result<Booking>;

    /// Newest first.
    async fn list_for_traveler(&self, traveler_id: &str) -> Result<Vec<Booking>>;

    /// Newest first, one owner, one status.
    async fn list_for_owner(&self, owner_id: &str, status: BookingStatus) -> Result<Vec<Booking>>;

    /// Applies a terminal transition guarded on `status == Pending` and
    /// writes the notification in the same unit. Conflict when the booking
    /// already left Pending; NotFound when it does not exist.
    async fn transition(
        &self,
        id: Uuid,
        to: BookingStatus,
        notification: &Notification,
    ) -> Result<Booking>;
}

#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Booking notifications for one user, newest first, bounded by `limit`.
    async fn list_for_user(&self, user_id: &str, limit: usize) -> Result<Vec<Notification>>;

    /// Sets `read = true` and nothing else. PermissionDenied when the
    /// notification belongs to someone else.
    async fn mark_read(&self, id: Uuid, user_id: &str) -> Result<()>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub username: String,
    pub contact: Option<String>,
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Ok(None) when the profile was never written; the console treats that
    /// as missing contact data, not an error.
    async fn get_user(&self, id: &str) -> Result<Option<UserProfile>>;

    async fn upsert_user(&self, profile: &UserProfile) -> Result<()>;
}
