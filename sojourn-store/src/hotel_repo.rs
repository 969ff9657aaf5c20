use async_trait::async_trait;
use chrono::{DateTime, NaiveTime, Utc};
use sojourn_catalog::hotel::Hotel;
use sojourn_catalog::repository::HotelRepository;
use sojourn_catalog::rooms::RoomType;
use sojourn_core::{Error, Result};
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

use crate::db_err;

pub struct PgHotelRepository {
    pool: PgPool,
}

impl PgHotelRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct HotelRow {
    id: Uuid,
    name: String,
    description: Option<String>,
    location: Option<String>,
    amenities: Vec<String>,
    open_time: Option<NaiveTime>,
    close_time: Option<NaiveTime>,
    owner_id: String,
    created_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct RoomRow {
    hotel_id: Uuid,
    name: String,
    capacity: i32,
    price_per_night_cents: i64,
    quantity: i32,
}

impl RoomRow {
    fn into_room(self) -> RoomType {
        RoomType {
            name: self.name,
            capacity: self.capacity.max(0) as u32,
            price_per_night_cents: self.price_per_night_cents,
            quantity: self.quantity.max(0) as u32,
        }
    }
}

fn assemble(row: HotelRow, room_types: Vec<RoomType>) -> Hotel {
    Hotel {
        id: row.id,
        name: row.name,
        description: row.description,
        location: row.location,
        room_types,
        amenities: row.amenities.into_iter().collect(),
        open_time: row.open_time,
        close_time: row.close_time,
        owner_id: row.owner_id,
        created_at: row.created_at,
    }
}

#[async_trait]
impl HotelRepository for PgHotelRepository {
    async fn create_hotel(&self, hotel: &Hotel) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        sqlx::query(
            r#"
            INSERT INTO hotels (id, name, description, location, amenities, open_time, close_time, owner_id, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(hotel.id)
        .bind(&hotel.name)
        .bind(&hotel.description)
        .bind(&hotel.location)
        .bind(hotel.amenities.iter().cloned().collect::<Vec<String>>())
        .bind(hotel.open_time)
        .bind(hotel.close_time)
        .bind(&hotel.owner_id)
        .bind(hotel.created_at)
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;

        for (position, room) in hotel.room_types.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO room_types (hotel_id, position, name, capacity, price_per_night_cents, quantity)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(hotel.id)
            .bind(position as i32)
            .bind(&room.name)
            .bind(room.capacity as i32)
            .bind(room.price_per_night_cents)
            .bind(room.quantity as i32)
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;
        }

        tx.commit().await.map_err(db_err)
    }

    async fn get_hotel(&self, id: Uuid) -> Result<Hotel> {
        let row = sqlx::query_as::<_, HotelRow>("SELECT * FROM hotels WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?
            .ok_or_else(|| Error::NotFound(format!("hotel {id}")))?;

        let rooms = sqlx::query_as::<_, RoomRow>(
            "SELECT hotel_id, name, capacity, price_per_night_cents, quantity
             FROM room_types WHERE hotel_id = $1 ORDER BY position",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(assemble(
            row,
            rooms.into_iter().map(RoomRow::into_room).collect(),
        ))
    }

    async fn list_hotels(&self) -> Result<Vec<Hotel>> {
        let rows = sqlx::query_as::<_, HotelRow>("SELECT * FROM hotels ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;

        let rooms = sqlx::query_as::<_, RoomRow>(
            "SELECT hotel_id, name, capacity, price_per_night_cents, quantity
             FROM room_types ORDER BY hotel_id, position",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        let mut by_hotel: HashMap<Uuid, Vec<RoomType>> = HashMap::new();
        for room in rooms {
            by_hotel
                .entry(room.hotel_id)
                .or_default()
                .push(room.into_room());
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let rooms = by_hotel.remove(&row.id).unwrap_or_default();
                assemble(row, rooms)
            })
            .collect())
    }
}
