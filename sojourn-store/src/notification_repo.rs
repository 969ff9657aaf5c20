use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sojourn_booking::models::{Notification, NotificationKind, StaySummary};
use sojourn_booking::repository::NotificationRepository;
use sojourn_core::{Error, Result};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db_err;

pub struct PgNotificationRepository {
    pool: PgPool,
}

impl PgNotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct NotificationRow {
    id: Uuid,
    user_id: String,
    kind: String,
    title: String,
    message: String,
    hotel_name: String,
    room_type: String,
    check_in: NaiveDate,
    check_out: NaiveDate,
    booking_id: Uuid,
    is_read: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<NotificationRow> for Notification {
    type Error = Error;

    fn try_from(row: NotificationRow) -> Result<Self> {
        let kind = row
            .kind
            .parse::<NotificationKind>()
            .map_err(Error::Internal)?;
        Ok(Notification {
            id: row.id,
            user_id: row.user_id,
            kind,
            title: row.title,
            message: row.message,
            stay: StaySummary {
                hotel_name: row.hotel_name,
                room_type: row.room_type,
                check_in: row.check_in,
                check_out: row.check_out,
            },
            booking_id: row.booking_id,
            read: row.is_read,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl NotificationRepository for PgNotificationRepository {
    async fn list_for_user(&self, user_id: &str, limit: usize) -> Result<Vec<Notification>> {
        let rows = sqlx::query_as::<_, NotificationRow>(
            r#"
            SELECT * FROM notifications
            WHERE user_id = $1 AND kind IN ('booking_accepted', 'booking_rejected')
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        rows.into_iter().map(Notification::try_from).collect()
    }

    async fn mark_read(&self, id: Uuid, user_id: &str) -> Result<()> {
        let updated = sqlx::query(
            "UPDATE notifications SET is_read = TRUE WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        if updated.rows_affected() == 0 {
            let exists = sqlx::query("SELECT 1 FROM notifications WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(db_err)?;
            return Err(match exists {
                None => Error::NotFound(format!("notification {id}")),
                Some(_) => Error::PermissionDenied("notification belongs to another user".into()),
            });
        }
        Ok(())
    }
}
