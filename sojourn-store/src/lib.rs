pub mod app_config;
pub mod booking_repo;
pub mod database;
pub mod events;
pub mod hotel_repo;
pub mod memory;
pub mod notification_repo;
pub mod redis_repo;
pub mod user_repo;

pub use booking_repo::PgBookingRepository;
pub use database::DbClient;
pub use events::EventProducer;
pub use hotel_repo::PgHotelRepository;
pub use memory::MemoryStore;
pub use notification_repo::PgNotificationRepository;
pub use redis_repo::RedisClient;
pub use user_repo::PgUserRepository;

use sojourn_core::Error;

/// Collapses driver errors into the shared taxonomy. Connection-level
/// failures are retryable (Unavailable); everything else is a bug or schema
/// drift and stays Internal.
pub(crate) fn db_err(e: sqlx::Error) -> Error {
    match e {
        sqlx::Error::RowNotFound => Error::NotFound("row not found".into()),
        sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
            Error::Unavailable(e.to_string())
        }
        other => Error::Internal(other.to_string()),
    }
}
