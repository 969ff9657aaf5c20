use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sojourn_booking::models::{Booking, BookingStatus, Notification};
use sojourn_booking::repository::BookingRepository;
use sojourn_core::{Error, Result};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::db_err;

pub struct PgBookingRepository {
    pool: PgPool,
}

impl PgBookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct BookingRow {
    id: Uuid,
    traveler_id: String,
    hotel_id: Uuid,
    hotel_name: String,
    room_type: String,
    check_in: NaiveDate,
    check_out: NaiveDate,
    guests: i32,
    nights: i32,
    price_per_night_cents: i64,
    total_cents: i64,
    status: String,
    owner_id: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<BookingRow> for Booking {
    type Error = Error;

    fn try_from(row: BookingRow) -> Result<Self> {
        let status = row
            .status
            .parse::<BookingStatus>()
            .map_err(Error::Internal)?;
        Ok(Booking {
            id: row.id,
            traveler_id: row.traveler_id,
            hotel_id: row.hotel_id,
            hotel_name: row.hotel_name,
            room_type: row.room_type,
            check_in: row.check_in,
            check_out: row.check_out,
            guests: row.guests.max(0) as u32,
            nights: row.nights.max(0) as u32,
            price_per_night_cents: row.price_per_night_cents,
            total_cents: row.total_cents,
            status,
            owner_id: row.owner_id,
            created_at: row.created_at,
        })
    }
}

async fn insert_notification(
    tx: &mut Transaction<'_, Postgres>,
    n: &Notification,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO notifications (id, user_id, kind, title, message, hotel_name, room_type,
                                   check_in, check_out, booking_id, is_read, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        "#,
    )
    .bind(n.id)
    .bind(&n.user_id)
    .bind(n.kind.as_str())
    .bind(&n.title)
    .bind(&n.message)
    .bind(&n.stay.hotel_name)
    .bind(&n.stay.room_type)
    .bind(n.stay.check_in)
    .bind(n.stay.check_out)
    .bind(n.booking_id)
    .bind(n.read)
    .bind(n.created_at)
    .execute(&mut **tx)
    .await
    .map_err(db_err)?;
    Ok(())
}

#[async_trait]
impl BookingRepository for PgBookingRepository {
    async fn create_pending(&self, booking: &Booking) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        // Decrement-if-positive: the row lock taken here serializes
        // concurrent submissions against the same room type, and the guard
        // keeps quantity from ever going negative.
        let decremented = sqlx::query(
            r#"
            UPDATE room_types
            SET quantity = quantity - 1
            WHERE hotel_id = $1 AND name = $2 AND quantity > 0
            "#,
        )
        .bind(booking.hotel_id)
        .bind(&booking.room_type)
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;

        if decremented.rows_affected() == 0 {
            return Err(Error::Conflict(format!(
                "room {} is sold out",
                booking.room_type
            )));
        }

        sqlx::query(
            r#"
            INSERT INTO bookings (id, traveler_id, hotel_id, hotel_name, room_type, check_in,
                                  check_out, guests, nights, price_per_night_cents, total_cents,
                                  status, owner_id, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(booking.id)
        .bind(&booking.traveler_id)
        .bind(booking.hotel_id)
        .bind(&booking.hotel_name)
        .bind(&booking.room_type)
        .bind(booking.check_in)
        .bind(booking.check_out)
        .bind(booking.guests as i32)
        .bind(booking.nights as i32)
        .bind(booking.price_per_night_cents)
        .bind(booking.total_cents)
        .bind(booking.status.as_str())
        .bind(&booking.owner_id)
        .bind(booking.created_at)
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;

        tx.commit().await.map_err(db_err)
    }

    async fn get_booking(&self, id: Uuid) -> Result<Booking> {
        let row = sqlx::query_as::<_, BookingRow>("SELECT * FROM bookings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?
            .ok_or_else(|| Error::NotFound(format!("booking {id}")))?;
        row.try_into()
    }

    async fn list_for_traveler(&self, traveler_id: &str) -> Result<Vec<Booking>> {
        let rows = sqlx::query_as::<_, BookingRow>(
            "SELECT * FROM bookings WHERE traveler_id = $1 ORDER BY created_at DESC",
        )
        .bind(traveler_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        rows.into_iter().map(Booking::try_from).collect()
    }

    async fn list_for_owner(&self, owner_id: &str, status: BookingStatus) -> Result<Vec<Booking>> {
        let rows = sqlx::query_as::<_, BookingRow>(
            "SELECT * FROM bookings WHERE owner_id = $1 AND status = $2 ORDER BY created_at DESC",
        )
        .bind(owner_id)
        .bind(status.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        rows.into_iter().map(Booking::try_from).collect()
    }

    async fn transition(
        &self,
        id: Uuid,
        to: BookingStatus,
        notification: &Notification,
    ) -> Result<Booking> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        let updated = sqlx::query(
            "UPDATE bookings SET status = $1 WHERE id = $2 AND status = 'PENDING'",
        )
        .bind(to.as_str())
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;

        if updated.rows_affected() == 0 {
            // Lost the race or the id is bogus; look once to tell which.
            let existing =
                sqlx::query_as::<_, BookingRow>("SELECT * FROM bookings WHERE id = $1")
                    .bind(id)
                    .fetch_optional(&self.pool)
                    .await
                    .map_err(db_err)?;
            return Err(match existing {
                None => Error::NotFound(format!("booking {id}")),
                Some(row) => Error::Conflict(format!("booking already {}", row.status)),
            });
        }

        insert_notification(&mut tx, notification).await?;

        let row = sqlx::query_as::<_, BookingRow>("SELECT * FROM bookings WHERE id = $1")
            .bind(id)
            .fetch_one(&mut *tx)
            .await
            .map_err(db_err)?;

        tx.commit().await.map_err(db_err)?;
        row.try_into()
    }
}
