use std::sync::Arc;

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::domain::entities::RememberedPlayerName;
use crate::domain::repositories::{PlayerNameRepository, SyncError};
use crate::infrastructure::sync::{ChangeFeed, StoreChange};

/// SQLite implementation of PlayerNameRepository
pub struct SqlitePlayerNameRepository {
    pool: SqlitePool,
    feed: Arc<ChangeFeed>,
}

impl SqlitePlayerNameRepository {
    pub fn new(pool: SqlitePool, feed: Arc<ChangeFeed>) -> Self {
        Self { pool, feed }
    }

    fn row_to_name(row: &sqlx::sqlite::SqliteRow) -> RememberedPlayerName {
        use sqlx::Row;

        RememberedPlayerName {
            normalized_name: row.get("normalized_name"),
            display_name: row.get("display_name"),
            usage_count: row.get::<i64, _>("usage_count") as u32,
            last_used_at: row.get("last_used"),
        }
    }
}

#[async_trait]
impl PlayerNameRepository for SqlitePlayerNameRepository {
    async fn record_usage(&self, user_id: &str, names: &[(String, String)]) -> Result<(), SyncError> {
        if names.is_empty() {
            return Ok(());
        }

        let now = chrono::Utc::now().timestamp_millis();
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| SyncError::Store(e.to_string()))?;

        for (normalized, display) in names {
            sqlx::query(
                r#"
                INSERT INTO player_names (user_id, normalized_name, display_name, usage_count, last_used)
                VALUES (?, ?, ?, 1, ?)
                ON CONFLICT(user_id, normalized_name) DO UPDATE SET
                    display_name = excluded.display_name,
                    usage_count = usage_count + 1,
                    last_used = excluded.last_used
                "#,
            )
            .bind(user_id)
            .bind(normalized)
            .bind(display)
            .bind(now)
            .execute(&mut *tx)
            .await
            .map_err(|e| SyncError::Store(e.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|e| SyncError::Store(e.to_string()))?;

        self.feed.publish(StoreChange::PlayerNamesUpdated {
            user_id: user_id.to_string(),
        });
        Ok(())
    }

    async fn find_top(&self, user_id: &str, limit: u32) -> Result<Vec<RememberedPlayerName>, SyncError> {
        let rows = sqlx::query(
            r#"
            SELECT * FROM player_names
            WHERE user_id = ?
            ORDER BY usage_count DESC, last_used DESC, normalized_name ASC
            LIMIT ?
            "#,
        )
        .bind(user_id)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| SyncError::Store(e.to_string()))?;

        Ok(rows.iter().map(Self::row_to_name).collect())
    }
}
