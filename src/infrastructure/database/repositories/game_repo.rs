use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::domain::entities::{Game, GameStatus, NewRoll, Player, Roll};
use crate::domain::repositories::{GameRepository, SyncError, TurnPrecondition};
use crate::infrastructure::sync::{ChangeFeed, StoreChange};

/// SQLite implementation of GameRepository
pub struct SqliteGameRepository {
    pool: SqlitePool,
    feed: Arc<ChangeFeed>,
}

impl SqliteGameRepository {
    pub fn new(pool: SqlitePool, feed: Arc<ChangeFeed>) -> Self {
        Self { pool, feed }
    }

    fn row_to_game(row: &sqlx::sqlite::SqliteRow) -> Result<Game, SyncError> {
        use sqlx::Row;

        let id: String = row.get("id");
        let status_str: String = row.get("status");
        let players_json: String = row.get("players_json");

        let players: Vec<Player> = serde_json::from_str(&players_json)
            .map_err(|e| SyncError::Store(format!("Corrupt roster for game {}: {}", id, e)))?;
        let status = GameStatus::from_str(&status_str)
            .ok_or_else(|| SyncError::Store(format!("Unknown status '{}' for game {}", status_str, id)))?;

        Ok(Game {
            id,
            players,
            current_player_index: row.get::<i64, _>("current_player_index") as usize,
            status,
            created_at: row.get("created_at"),
            owner_id: row.get("owner_id"),
        })
    }

    fn row_to_roll(row: &sqlx::sqlite::SqliteRow) -> Roll {
        use sqlx::Row;

        Roll {
            id: row.get("id"),
            game_id: row.get("game_id"),
            player_index: row.get::<i64, _>("player_index") as usize,
            die1: row.get::<i64, _>("die1") as u8,
            die2: row.get::<i64, _>("die2") as u8,
            sum: row.get::<i64, _>("sum") as u8,
            sequence: row.get::<i64, _>("sequence") as u64,
            timestamp: row.get("timestamp"),
        }
    }
}

#[async_trait]
impl GameRepository for SqliteGameRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<Game>, SyncError> {
        let row = sqlx::query("SELECT * FROM games WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| SyncError::Store(e.to_string()))?;

        row.as_ref().map(Self::row_to_game).transpose()
    }

    async fn find_by_owner(&self, owner_id: &str) -> Result<Vec<Game>, SyncError> {
        let rows = sqlx::query(
            "SELECT * FROM games WHERE owner_id = ? ORDER BY created_at DESC, rowid DESC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| SyncError::Store(e.to_string()))?;

        rows.iter().map(Self::row_to_game).collect()
    }

    async fn create(&self, game: &Game) -> Result<(), SyncError> {
        let players_json = serde_json::to_string(&game.players)
            .map_err(|e| SyncError::Store(e.to_string()))?;
        let now = chrono::Utc::now().timestamp_millis();

        sqlx::query(
            r#"
            INSERT INTO games (id, owner_id, players_json, current_player_index, status, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&game.id)
        .bind(&game.owner_id)
        .bind(&players_json)
        .bind(game.current_player_index as i64)
        .bind(game.status.as_str())
        .bind(game.created_at)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| SyncError::Store(e.to_string()))?;

        self.feed.publish(StoreChange::GameCreated {
            game_id: game.id.clone(),
            owner_id: game.owner_id.clone(),
        });
        Ok(())
    }

    async fn complete(&self, id: &str) -> Result<bool, SyncError> {
        let now = chrono::Utc::now().timestamp_millis();

        let owner_id: Option<String> = sqlx::query_scalar(
            r#"
            UPDATE games SET status = 'completed', updated_at = ?
            WHERE id = ? AND status = 'active'
            RETURNING owner_id
            "#,
        )
        .bind(now)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| SyncError::Store(e.to_string()))?;

        match owner_id {
            Some(owner_id) => {
                self.feed.publish(StoreChange::GameUpdated {
                    game_id: id.to_string(),
                    owner_id,
                });
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn get_rolls(&self, game_id: &str) -> Result<Vec<Roll>, SyncError> {
        let rows = sqlx::query("SELECT * FROM rolls WHERE game_id = ? ORDER BY sequence ASC")
            .bind(game_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| SyncError::Store(e.to_string()))?;

        Ok(rows.iter().map(Self::row_to_roll).collect())
    }

    async fn count_rolls_by_owner(&self, owner_id: &str) -> Result<HashMap<String, u32>, SyncError> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            r#"
            SELECT r.game_id, COUNT(*)
            FROM rolls r
            JOIN games g ON g.id = r.game_id
            WHERE g.owner_id = ?
            GROUP BY r.game_id
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| SyncError::Store(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(|(game_id, count)| (game_id, count as u32))
            .collect())
    }

    async fn append_roll_and_advance(
        &self,
        game_id: &str,
        precondition: TurnPrecondition,
        roll: NewRoll,
    ) -> Result<Option<Roll>, SyncError> {
        let now = chrono::Utc::now().timestamp_millis();

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| SyncError::Store(e.to_string()))?;

        // Conditional update first: it holds the write lock before the
        // sequence is read.
        let owner_id: Option<String> = sqlx::query_scalar(
            r#"
            UPDATE games SET current_player_index = ?, updated_at = ?
            WHERE id = ? AND status = 'active' AND current_player_index = ?
            RETURNING owner_id
            "#,
        )
        .bind(precondition.next_player_index as i64)
        .bind(now)
        .bind(game_id)
        .bind(precondition.current_player_index as i64)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| SyncError::Store(e.to_string()))?;

        let Some(owner_id) = owner_id else {
            tx.rollback()
                .await
                .map_err(|e| SyncError::Store(e.to_string()))?;
            return Ok(None);
        };

        let sequence: i64 =
            sqlx::query_scalar("SELECT COALESCE(MAX(sequence), 0) + 1 FROM rolls WHERE game_id = ?")
                .bind(game_id)
                .fetch_one(&mut *tx)
                .await
                .map_err(|e| SyncError::Store(e.to_string()))?;

        let roll = roll.into_roll(
            uuid::Uuid::new_v4().to_string(),
            game_id.to_string(),
            sequence as u64,
            now,
        );

        sqlx::query(
            r#"
            INSERT INTO rolls (id, game_id, sequence, player_index, die1, die2, sum, timestamp)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&roll.id)
        .bind(&roll.game_id)
        .bind(sequence)
        .bind(roll.player_index as i64)
        .bind(i64::from(roll.die1))
        .bind(i64::from(roll.die2))
        .bind(i64::from(roll.sum))
        .bind(roll.timestamp)
        .execute(&mut *tx)
        .await
        .map_err(|e| SyncError::Store(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| SyncError::Store(e.to_string()))?;

        self.feed.publish(StoreChange::RollAppended {
            game_id: game_id.to_string(),
            owner_id,
        });

        Ok(Some(roll))
    }
}
