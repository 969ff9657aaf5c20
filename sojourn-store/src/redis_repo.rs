use redis::{AsyncCommands, RedisResult};
use uuid::Uuid;

#[derive(Clone)]
pub struct RedisClient {
    client: redis::Client,
}

fn availability_key(hotel_id: Uuid, room_type: &str) -> String {
    format!("room:{}:{}:availability", hotel_id, room_type)
}

impl RedisClient {
    pub async fn new(connection_string: &str) -> Result<Self, redis::RedisError> {
        let client = redis::Client::open(connection_string)?;
        Ok(Self { client })
    }

    /// Seeds the display gauge for one room type. Called when a hotel is
    /// created; Postgres remains the authority.
    pub async fn set_room_availability(
        &self,
        hotel_id: Uuid,
        room_type: &str,
        count: i64,
    ) -> RedisResult<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.set(availability_key(hotel_id, room_type), count).await
    }

    pub async fn get_room_availability(
        &self,
        hotel_id: Uuid,
        room_type: &str,
    ) -> RedisResult<Option<i64>> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.get(availability_key(hotel_id, room_type)).await
    }

    /// Decrements the gauge only when the key exists; a cache miss returns
    /// None and the next hotel read re-seeds it. Never seeds a negative
    /// value on a cold cache.
    pub async fn decr_room_availability(
        &self,
        hotel_id: Uuid,
        room_type: &str,
    ) -> RedisResult<Option<i64>> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let script = redis::Script::new(
            r#"
            if redis.call("EXISTS", KEYS[1]) == 1 then
                return redis.call("DECR", KEYS[1])
            else
                return nil
            end
        "#,
        );

        script
            .key(availability_key(hotel_id, room_type))
            .invoke_async(&mut conn)
            .await
    }

    /// Fixed-window counter; callers fail open on Redis errors.
    pub async fn check_rate_limit(
        &self,
        key: &str,
        limit: i64,
        window_seconds: i64,
    ) -> RedisResult<bool> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;

        let (count,): (i64,) = redis::pipe()
            .atomic()
            .incr(key, 1)
            .expire(key, window_seconds)
            .query_async(&mut conn)
            .await?;

        Ok(count <= limit)
    }
}
