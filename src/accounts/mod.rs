//! Credential store: user accounts keyed by username.
//!
//! Every function borrows one pooled connection for a single statement; the
//! connection goes back to the pool when the query future completes or fails.

pub mod password;

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use thiserror::Error;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    User,
    Doctor,
}

impl Role {
    pub const ALL: [Role; 2] = [Role::User, Role::Doctor];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Doctor => "doctor",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown role {0:?}")]
pub struct UnknownRole(String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "doctor" => Ok(Role::Doctor),
            other => Err(UnknownRole(other.to_owned())),
        }
    }
}

impl TryFrom<String> for Role {
    type Error = UnknownRole;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct UserAccount {
    pub id: i64,
    pub username: String,
    password_hash: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    #[sqlx(try_from = "String")]
    pub role: Role,
}

/// Outcome of renaming an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsernameChange {
    Renamed,
    Taken,
    Missing,
}

const SELECT_ACCOUNT: &str =
    "SELECT id,username,password_hash,phone,address,role FROM users WHERE username=?";
const SELECT_ACCOUNT_BY_ID: &str =
    "SELECT id,username,password_hash,phone,address,role FROM users WHERE id=?";

/// Creates an account. Returns `false` if the username is already taken,
/// leaving the existing record untouched.
pub async fn register(
    db_pool: &SqlitePool,
    username: &str,
    password: &str,
    role: Role,
) -> anyhow::Result<bool> {
    let password_hash = password::hash_blocking(password).await?;
    let result = sqlx::query("INSERT INTO users (username,password_hash,role) VALUES (?,?,?)")
        .bind(username)
        .bind(password_hash)
        .bind(role.as_str())
        .execute(db_pool)
        .await;

    match result {
        Ok(_) => {
            tracing::info!(%username, %role, "registered account");
            Ok(true)
        }
        Err(err) if is_unique_violation(&err) => {
            tracing::debug!(%username, "username already registered");
            Ok(false)
        }
        Err(err) => Err(err.into()),
    }
}

/// Returns the account iff `username` exists and `password` matches it.
pub async fn verify(
    db_pool: &SqlitePool,
    username: &str,
    password: &str,
) -> anyhow::Result<Option<UserAccount>> {
    let Some(account) = find(db_pool, username).await? else {
        return Ok(None);
    };
    let matched = password::matches_blocking(&account.password_hash, password).await?;
    Ok(matched.then_some(account))
}

pub async fn find(db_pool: &SqlitePool, username: &str) -> sqlx::Result<Option<UserAccount>> {
    sqlx::query_as::<_, UserAccount>(SELECT_ACCOUNT)
        .bind(username)
        .fetch_optional(db_pool)
        .await
}

/// Looks an account up by its row id. Ids survive renames and are never
/// handed out twice (`AUTOINCREMENT`).
pub async fn find_by_id(db_pool: &SqlitePool, id: i64) -> sqlx::Result<Option<UserAccount>> {
    sqlx::query_as::<_, UserAccount>(SELECT_ACCOUNT_BY_ID)
        .bind(id)
        .fetch_optional(db_pool)
        .await
}

/// Returns whether an account was updated.
pub async fn reset_password(
    db_pool: &SqlitePool,
    username: &str,
    new_password: &str,
) -> anyhow::Result<bool> {
    let password_hash = password::hash_blocking(new_password).await?;
    let result = sqlx::query("UPDATE users SET password_hash=? WHERE username=?")
        .bind(password_hash)
        .bind(username)
        .execute(db_pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn update_username(
    db_pool: &SqlitePool,
    old: &str,
    new: &str,
) -> sqlx::Result<UsernameChange> {
    let result = sqlx::query("UPDATE users SET username=? WHERE username=?")
        .bind(new)
        .bind(old)
        .execute(db_pool)
        .await;

    match result {
        Ok(done) if done.rows_affected() > 0 => {
            tracing::info!(%old, %new, "renamed account");
            Ok(UsernameChange::Renamed)
        }
        Ok(_) => Ok(UsernameChange::Missing),
        Err(err) if is_unique_violation(&err) => Ok(UsernameChange::Taken),
        Err(err) => Err(err),
    }
}

/// Returns whether an account was updated.
pub async fn update_profile(
    db_pool: &SqlitePool,
    username: &str,
    phone: &str,
    address: &str,
) -> sqlx::Result<bool> {
    let result = sqlx::query("UPDATE users SET phone=?, address=? WHERE username=?")
        .bind(phone)
        .bind(address)
        .bind(username)
        .execute(db_pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Returns whether an account was deleted.
pub async fn delete(db_pool: &SqlitePool, username: &str) -> sqlx::Result<bool> {
    let result = sqlx::query("DELETE FROM users WHERE username=?")
        .bind(username)
        .execute(db_pool)
        .await?;
    if result.rows_affected() > 0 {
        tracing::info!(%username, "deleted account");
    }
    Ok(result.rows_affected() > 0)
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(|db_err| db_err.is_unique_violation())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    #[tokio::test]
    async fn register_twice_keeps_first() {
        let db_pool = db::memory_pool().await.unwrap();

        assert!(register(&db_pool, "alice", "first", Role::Doctor).await.unwrap());
        assert!(!register(&db_pool, "alice", "second", Role::User).await.unwrap());

        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE username='alice'")
            .fetch_one(&db_pool)
            .await
            .unwrap();
        assert_eq!(count, 1);

        let account = verify(&db_pool, "alice", "first").await.unwrap().unwrap();
        assert_eq!(account.role, Role::Doctor);
        assert!(verify(&db_pool, "alice", "second").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        let db_pool = db::memory_pool().await.unwrap();
        register(&db_pool, "gina", "pw", Role::User).await.unwrap();
        let first = find(&db_pool, "gina").await.unwrap().unwrap();

        delete(&db_pool, "gina").await.unwrap();
        assert!(find_by_id(&db_pool, first.id).await.unwrap().is_none());

        register(&db_pool, "gina", "pw", Role::User).await.unwrap();
        let second = find(&db_pool, "gina").await.unwrap().unwrap();
        assert_ne!(first.id, second.id);
        assert!(find_by_id(&db_pool, first.id).await.unwrap().is_none());
        assert_eq!(find_by_id(&db_pool, second.id).await.unwrap().unwrap().username, "gina");
    }

    #[tokio::test]
    async fn verify_needs_both_fields() {
        let db_pool = db::memory_pool().await.unwrap();
        register(&db_pool, "bob", "pw", Role::User).await.unwrap();

        let account = verify(&db_pool, "bob", "pw").await.unwrap().unwrap();
        assert_eq!(account.username, "bob");
        assert_eq!(account.role, Role::User);
        assert!(account.phone.is_none());

        assert!(verify(&db_pool, "bob", "PW").await.unwrap().is_none());
        assert!(verify(&db_pool, "Bob", "pw").await.unwrap().is_none());
        assert!(verify(&db_pool, "nobody", "pw").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn reset_password_swaps_credentials() {
        let db_pool = db::memory_pool().await.unwrap();
        register(&db_pool, "carol", "old", Role::User).await.unwrap();

        assert!(reset_password(&db_pool, "carol", "new").await.unwrap());
        assert!(verify(&db_pool, "carol", "old").await.unwrap().is_none());
        assert!(verify(&db_pool, "carol", "new").await.unwrap().is_some());

        assert!(!reset_password(&db_pool, "ghost", "new").await.unwrap());
    }

    #[tokio::test]
    async fn rename_and_profile() {
        let db_pool = db::memory_pool().await.unwrap();
        register(&db_pool, "dave", "pw", Role::User).await.unwrap();
        register(&db_pool, "erin", "pw", Role::User).await.unwrap();

        assert_eq!(update_username(&db_pool, "dave", "erin").await.unwrap(), UsernameChange::Taken);
        assert_eq!(update_username(&db_pool, "ghost", "x").await.unwrap(), UsernameChange::Missing);
        assert_eq!(update_username(&db_pool, "dave", "david").await.unwrap(), UsernameChange::Renamed);
        assert!(find(&db_pool, "dave").await.unwrap().is_none());

        assert!(update_profile(&db_pool, "david", "+60 12-345 6789", "1 Jalan Ampang").await.unwrap());
        let account = find(&db_pool, "david").await.unwrap().unwrap();
        assert_eq!(account.phone.as_deref(), Some("+60 12-345 6789"));
        assert_eq!(account.address.as_deref(), Some("1 Jalan Ampang"));

        assert!(!update_profile(&db_pool, "ghost", "1234567", "x").await.unwrap());
    }

    #[tokio::test]
    async fn delete_removes_credentials() {
        let db_pool = db::memory_pool().await.unwrap();
        register(&db_pool, "frank", "pw", Role::User).await.unwrap();

        assert!(delete(&db_pool, "frank").await.unwrap());
        assert!(verify(&db_pool, "frank", "pw").await.unwrap().is_none());
        assert!(!delete(&db_pool, "frank").await.unwrap());
    }

    #[test]
    fn role_parses() {
        assert_eq!("doctor".parse::<Role>().unwrap(), Role::Doctor);
        assert_eq!(Role::default(), Role::User);
        assert!("admin".parse::<Role>().is_err());
    }
}
