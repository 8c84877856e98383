use std::str::FromStr;

use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};

use crate::config::Config;

const CREATE_USERS: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT UNIQUE NOT NULL,
    password_hash TEXT NOT NULL,
    phone TEXT,
    address TEXT,
    role TEXT NOT NULL DEFAULT 'user'
)"#;

const CREATE_MESSAGES: &str = r#"
CREATE TABLE IF NOT EXISTS messages (
    id INTEGER PRIMARY KEY,
    username TEXT NOT NULL,
    message TEXT NOT NULL,
    timestamp DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
)"#;

pub async fn connect(config: &Config) -> sqlx::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(&config.database_url)?.create_if_missing(true);
    let db_pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(options)
        .await?;
    init_schema(&db_pool).await?;
    Ok(db_pool)
}

pub async fn init_schema(db_pool: &SqlitePool) -> sqlx::Result<()> {
    sqlx::query(CREATE_USERS).execute(db_pool).await?;
    sqlx::query(CREATE_MESSAGES).execute(db_pool).await?;
    Ok(())
}

/// Single-connection in-memory database with the schema applied.
///
/// Every SQLite `:memory:` connection is its own database, so the pool is
/// pinned to one connection that never expires.
pub async fn memory_pool() -> sqlx::Result<SqlitePool> {
    let db_pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await?;
    init_schema(&db_pool).await?;
    Ok(db_pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn schema_is_idempotent() {
        let db_pool = memory_pool().await.unwrap();
        init_schema(&db_pool).await.unwrap();

        sqlx::query("INSERT INTO users (username,password_hash) VALUES ('a','x')")
            .execute(&db_pool)
            .await
            .unwrap();
        let (role,): (String,) = sqlx::query_as("SELECT role FROM users WHERE username='a'")
            .fetch_one(&db_pool)
            .await
            .unwrap();
        assert_eq!(role, "user");
    }
}
