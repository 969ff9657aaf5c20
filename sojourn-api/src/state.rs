use std::sync::Arc;

use sojourn_booking::service::BookingService;
use sojourn_store::{EventProducer, RedisClient};

#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
    pub expiration: u64,
}

/// Everything the handlers need, constructed once in `main` and injected.
/// Redis and Kafka are optional: without them the availability gauge and the
/// event topics are skipped, nothing else changes.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<BookingService>,
    pub redis: Option<Arc<RedisClient>>,
    pub kafka: Option<Arc<EventProducer>>,
    pub auth: AuthConfig,
    pub rate_limit_per_minute: i64,
}
