use async_trait::async_trait;
use sojourn_core::Result;
use uuid::Uuid;

use crate::hotel::Hotel;

/// Data access for the hotels collection. Room quantity decrements are NOT
/// here: they only happen inside the booking submission transaction, so the
/// booking repository owns them.
#[async_trait]
pub trait HotelRepository: Send + Sync {
    async fn create_hotel(&self, hotel: &Hotel) -> Result<()>;

    /// NotFound when the id does not exist.
    async fn get_hotel(&self, id: Uuid) -> Result<Hotel>;

    async fn list_hotels(&self) -> Result<Vec<Hotel>>;
}
