use std::sync::Arc;

use rdkafka::config::ClientConfig;
use rdkafka::consumer::{Consumer, StreamConsumer};
use rdkafka::message::Message;
use sojourn_shared::events::BookingEvent;
use sojourn_store::events::TOPIC_BOOKING_CREATED;
use sojourn_store::RedisClient;
use tracing::{error, info};

/// Applies `booking.created` events to the Redis availability gauges. The
/// gauge is display-only; a miss just means the next hotel read re-seeds it
/// from Postgres.
pub async fn start_availability_worker(brokers: String, group_id: String, redis: Arc<RedisClient>) {
    let consumer: StreamConsumer = ClientConfig::new()
        .set("bootstrap.servers", &brokers)
        .set("group.id", &group_id)
        .set("enable.auto.commit", "true")
        .set("auto.offset.reset", "earliest")
        .create()
        .expect("Consumer creation failed");

    consumer
        .subscribe(&[TOPIC_BOOKING_CREATED])
        .expect("Can't subscribe");

    info!("Availability worker started, listening to bookings...");

    loop {
        match consumer.recv().await {
            Err(e) => error!("Kafka error: {}", e),
            Ok(m) => {
                let Some(Ok(payload)) = m.payload_view::<str>() else {
                    error!("Skipping booking event with unreadable payload");
                    continue;
                };
                match serde_json::from_str::<BookingEvent>(payload) {
                    Ok(event) => {
                        match redis
                            .decr_room_availability(event.hotel_id, &event.room_type)
                            .await
                        {
                            Ok(Some(remaining)) => {
                                info!(
                                    hotel_id = %event.hotel_id,
                                    room = %event.room_type,
                                    remaining,
                                    "availability gauge decremented"
                                );
                            }
                            Ok(None) => {
                                info!(
                                    hotel_id = %event.hotel_id,
                                    room = %event.room_type,
                                    "gauge cache miss, will re-seed on next read"
                                );
                            }
                            Err(e) => error!("Failed to decrement availability gauge: {}", e),
                        }
                    }
                    Err(e) => error!("Malformed booking event: {}", e),
                }
            }
        }
    }
}
