//! Append-only message log.

use sqlx::{FromRow, SqlitePool};
use time::{PrimitiveDateTime, format_description::BorrowedFormatItem, macros::format_description};

const TIMESTAMP_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

#[derive(Debug, Clone, FromRow)]
pub struct ChatMessage {
    pub id: i64,
    pub username: String,
    #[sqlx(rename = "message")]
    pub text: String,
    pub timestamp: PrimitiveDateTime,
}

impl ChatMessage {
    pub fn timestamp_display(&self) -> String {
        self.timestamp
            .format(TIMESTAMP_FORMAT)
            .unwrap_or_else(|_| self.timestamp.to_string())
    }
}

/// Stores a message; the database stamps the time.
pub async fn append(db_pool: &SqlitePool, username: &str, text: &str) -> sqlx::Result<i64> {
    let result = sqlx::query("INSERT INTO messages (username,message) VALUES (?,?)")
        .bind(username)
        .bind(text)
        .execute(db_pool)
        .await?;
    let id = result.last_insert_rowid();
    tracing::debug!(%username, id, "appended chat message");
    Ok(id)
}

/// All messages, oldest first. Messages stamped within the same second keep
/// their insertion order.
pub async fn list(db_pool: &SqlitePool) -> sqlx::Result<Vec<ChatMessage>> {
    sqlx::query_as::<_, ChatMessage>(
        "SELECT id,username,message,timestamp FROM messages ORDER BY timestamp ASC, id ASC",
    )
    .fetch_all(db_pool)
    .await
}
