use std::net::SocketAddr;
use std::sync::Arc;

use sojourn_api::{app, state::AuthConfig, AppState};
use sojourn_booking::repository::{BookingRepository, NotificationRepository, UserRepository};
use sojourn_booking::service::BookingService;
use sojourn_catalog::repository::HotelRepository;
use sojourn_shared::events::{BookingEvent, NotificationEvent};
use sojourn_store::{
    DbClient, EventProducer, MemoryStore, PgBookingRepository, PgHotelRepository,
    PgNotificationRepository, PgUserRepository, RedisClient,
};
use tokio::sync::broadcast;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sojourn_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = sojourn_store::app_config::Config::load().expect("Failed to load config");
    tracing::info!("Starting Sojourn API on port {}", config.server.port);

    // Repositories: Postgres in normal runs, the in-process store when
    // database.url is the literal "memory".
    let hotels: Arc<dyn HotelRepository>;
    let bookings: Arc<dyn BookingRepository>;
    let notifications: Arc<dyn NotificationRepository>;
    let users: Arc<dyn UserRepository>;

    if config.database.url == "memory" {
        tracing::warn!("Running against the in-memory store; nothing will be persisted");
        let store = Arc::new(MemoryStore::new());
        hotels = store.clone();
        bookings = store.clone();
        notifications = store.clone();
        users = store;
    } else {
        let db = DbClient::new(&config.database.url)
            .await
            .expect("Failed to connect to Postgres");
        db.migrate().await.expect("Failed to run migrations");
        hotels = Arc::new(PgHotelRepository::new(db.pool.clone()));
        bookings = Arc::new(PgBookingRepository::new(db.pool.clone()));
        notifications = Arc::new(PgNotificationRepository::new(db.pool.clone()));
        users = Arc::new(PgUserRepository::new(db.pool.clone()));
    }

    // Redis and Kafka are optional collaborators: the gauge and the event
    // topics degrade away cleanly when they are absent.
    let redis = match RedisClient::new(&config.redis.url).await {
        Ok(client) => Some(Arc::new(client)),
        Err(e) => {
            tracing::warn!("Redis unavailable, availability gauge disabled: {}", e);
            None
        }
    };
    let kafka = match EventProducer::new(&config.kafka.brokers) {
        Ok(producer) => Some(Arc::new(producer)),
        Err(e) => {
            tracing::warn!("Kafka unavailable, event publishing disabled: {}", e);
            None
        }
    };

    let (booking_tx, _) = broadcast::channel::<BookingEvent>(config.business_rules.broadcast_capacity);
    let (notification_tx, _) =
        broadcast::channel::<NotificationEvent>(config.business_rules.broadcast_capacity);

    let service = Arc::new(BookingService::new(
        hotels,
        bookings,
        notifications,
        users,
        booking_tx,
        notification_tx,
        config.business_rules.feed_limit,
    ));

    if let Some(redis) = &redis {
        tokio::spawn(sojourn_api::worker::start_availability_worker(
            config.kafka.brokers.clone(),
            config.kafka.group_id.clone(),
            redis.clone(),
        ));
    }

    let app_state = AppState {
        service,
        redis,
        kafka,
        auth: AuthConfig {
            secret: config.auth.jwt_secret.clone(),
            expiration: config.auth.jwt_expiration_seconds,
        },
        rate_limit_per_minute: config.business_rules.rate_limit_per_minute,
    };

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .unwrap();
}
