use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::domain::entities::UserProfile;
use crate::domain::repositories::{SyncError, UserRepository};

/// SQLite implementation of UserRepository
pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_user(row: &sqlx::sqlite::SqliteRow) -> UserProfile {
        use sqlx::Row;

        UserProfile {
            id: row.get("id"),
            email: row.get("email"),
            display_name: row.get("display_name"),
            last_login: row.get("last_login"),
            blocked: row.get::<i64, _>("blocked") != 0,
        }
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<UserProfile>, SyncError> {
        let row = sqlx::query("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| SyncError::Store(e.to_string()))?;

        Ok(row.as_ref().map(Self::row_to_user))
    }

    async fn record_sign_in(&self, profile: &UserProfile) -> Result<UserProfile, SyncError> {
        let now = chrono::Utc::now().timestamp_millis();

        let row = sqlx::query(
            r#"
            INSERT INTO users (id, email, display_name, last_login, blocked, created_at)
            VALUES (?, ?, ?, ?, 0, ?)
            ON CONFLICT(id) DO UPDATE SET
                email = excluded.email,
                display_name = excluded.display_name,
                last_login = excluded.last_login
            RETURNING *
            "#,
        )
        .bind(&profile.id)
        .bind(&profile.email)
        .bind(&profile.display_name)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| SyncError::Store(e.to_string()))?;

        Ok(Self::row_to_user(&row))
    }
}
