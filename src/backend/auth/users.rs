/**
 * User Model and Database Operations
 *
 * Rows of the `users` table. Passwords are stored as bcrypt hashes and
 * never serialized. New users receive the default `ROLE_USER` authority
 * in the same transaction as the insert.
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::backend::server::config::DbPool;

/// Authority granted to every new user
pub const DEFAULT_AUTHORITY_ID: i64 = -1;

/// User struct representing a row in `users`
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub enabled: bool,
    /// bcrypt hash
    #[serde(skip_serializing, default)]
    pub password: String,
    pub created: DateTime<Utc>,
}

/// Hash a plaintext password with the given bcrypt cost
pub fn hash_password(password: &str, cost: u32) -> Result<String, bcrypt::BcryptError> {
    bcrypt::hash(password, cost)
}

/// Create a new user with the default authority
pub async fn create_user(
    pool: &DbPool,
    username: &str,
    password_hash: &str,
    enabled: bool,
) -> Result<User, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (username, enabled, password, created)
        VALUES (?, ?, ?, ?)
        RETURNING id, username, enabled, password, created
        "#,
    )
    .bind(username)
    .bind(enabled)
    .bind(password_hash)
    .bind(Utc::now())
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query("INSERT INTO user_authorities (user_id, authority_id) VALUES (?, ?)")
        .bind(user.id)
        .bind(DEFAULT_AUTHORITY_ID)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(user)
}

/// Create a user with a fixed id holding a single authority
///
/// Used for the bootstrap account. The user and the grant are written in
/// one transaction.
pub async fn create_user_with_id(
    pool: &DbPool,
    id: i64,
    username: &str,
    password_hash: &str,
    authority_id: i64,
) -> Result<User, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (id, username, enabled, password, created)
        VALUES (?, ?, TRUE, ?, ?)
        RETURNING id, username, enabled, password, created
        "#,
    )
    .bind(id)
    .bind(username)
    .bind(password_hash)
    .bind(Utc::now())
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query("INSERT INTO user_authorities (user_id, authority_id) VALUES (?, ?)")
        .bind(user.id)
        .bind(authority_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(user)
}

/// List all users ordered by id
pub async fn list_users(pool: &DbPool) -> Result<Vec<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, enabled, password, created
        FROM users
        ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await
}

/// Get user by ID
pub async fn get_user_by_id(pool: &DbPool, id: i64) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, enabled, password, created
        FROM users
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Get user by username
pub async fn get_user_by_username(
    pool: &DbPool,
    username: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, enabled, password, created
        FROM users
        WHERE username = ?
        "#,
    )
    .bind(username)
    .fetch_optional(pool)
    .await
}

/// Fields that may change on an existing user
#[derive(Debug, Default, Clone)]
pub struct UserChanges {
    pub username: Option<String>,
    pub enabled: Option<bool>,
    /// Already hashed
    pub password_hash: Option<String>,
}

/// Apply changes to a user
///
/// # Returns
/// The updated user, or `None` if no user has this id
pub async fn update_user(
    pool: &DbPool,
    id: i64,
    changes: UserChanges,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        UPDATE users
        SET username = COALESCE(?, username),
            enabled = COALESCE(?, enabled),
            password = COALESCE(?, password)
        WHERE id = ?
        RETURNING id, username, enabled, password, created
        "#,
    )
    .bind(changes.username)
    .bind(changes.enabled)
    .bind(changes.password_hash)
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Delete a user; memberships and authority grants cascade
///
/// # Returns
/// `true` if a row was deleted
pub async fn delete_user(pool: &DbPool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
