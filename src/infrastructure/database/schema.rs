use sqlx::SqlitePool;

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id TEXT PRIMARY KEY,
        email TEXT,
        display_name TEXT NOT NULL,
        last_login INTEGER,
        blocked INTEGER NOT NULL DEFAULT 0,
        created_at INTEGER NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS games (
        id TEXT PRIMARY KEY,
        owner_id TEXT NOT NULL,
        players_json TEXT NOT NULL,
        current_player_index INTEGER NOT NULL DEFAULT 0,
        status TEXT NOT NULL DEFAULT 'active',
        created_at INTEGER NOT NULL,
        updated_at INTEGER NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_games_owner_created ON games (owner_id, created_at DESC)",
    r#"
    CREATE TABLE IF NOT EXISTS rolls (
        id TEXT PRIMARY KEY,
        game_id TEXT NOT NULL REFERENCES games(id) ON DELETE CASCADE,
        sequence INTEGER NOT NULL,
        player_index INTEGER NOT NULL,
        die1 INTEGER NOT NULL CHECK (die1 BETWEEN 1 AND 6),
        die2 INTEGER NOT NULL CHECK (die2 BETWEEN 1 AND 6),
        sum INTEGER NOT NULL,
        timestamp INTEGER NOT NULL,
        UNIQUE (game_id, sequence)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS player_names (
        user_id TEXT NOT NULL,
        normalized_name TEXT NOT NULL,
        display_name TEXT NOT NULL,
        usage_count INTEGER NOT NULL DEFAULT 1,
        last_used INTEGER NOT NULL,
        PRIMARY KEY (user_id, normalized_name)
    )
    "#,
];

/// Create every table and index that does not exist yet
pub async fn initialize_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    tracing::debug!("Database schema ready");
    Ok(())
}
