use async_trait::async_trait;
use sojourn_booking::repository::{UserProfile, UserRepository};
use sojourn_core::Result;
use sqlx::PgPool;

use crate::db_err;

pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: String,
    username: String,
    contact: Option<String>,
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn get_user(&self, id: &str) -> Result<Option<UserProfile>> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, username, contact FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(row.map(|r| UserProfile {
            id: r.id,
            username: r.username,
            contact: r.contact,
        }))
    }

    async fn upsert_user(&self, profile: &UserProfile) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, username, contact)
            VALUES ($1, $2, $3)
            ON CONFLICT (id) DO UPDATE SET username = EXCLUDED.username, contact = EXCLUDED.contact
            "#,
        )
        .bind(&profile.id)
        .bind(&profile.username)
        .bind(&profile.contact)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }
}
