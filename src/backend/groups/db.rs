/**
 * Group Database Operations
 *
 * Groups bundle users so authorities can be granted to many users at
 * once. Membership rows cascade when either side is deleted.
 */

use serde::{Deserialize, Serialize};

use crate::backend::server::config::DbPool;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Group {
    pub id: i64,
    pub name: String,
}

pub async fn create_group(pool: &DbPool, name: &str) -> Result<Group, sqlx::Error> {
    sqlx::query_as::<_, Group>("INSERT INTO groups (name) VALUES (?) RETURNING id, name")
        .bind(name)
        .fetch_one(pool)
        .await
}

pub async fn list_groups(pool: &DbPool) -> Result<Vec<Group>, sqlx::Error> {
    sqlx::query_as::<_, Group>("SELECT id, name FROM groups ORDER BY id")
        .fetch_all(pool)
        .await
}

pub async fn get_group(pool: &DbPool, id: i64) -> Result<Option<Group>, sqlx::Error> {
    sqlx::query_as::<_, Group>("SELECT id, name FROM groups WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn rename_group(pool: &DbPool, id: i64, name: &str) -> Result<Option<Group>, sqlx::Error> {
    sqlx::query_as::<_, Group>("UPDATE groups SET name = ? WHERE id = ? RETURNING id, name")
        .bind(name)
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn delete_group(pool: &DbPool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM groups WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Member user ids of a group, sorted
pub async fn list_members(pool: &DbPool, group_id: i64) -> Result<Vec<i64>, sqlx::Error> {
    let rows: Vec<(i64,)> =
        sqlx::query_as("SELECT user_id FROM group_members WHERE group_id = ? ORDER BY user_id")
            .bind(group_id)
            .fetch_all(pool)
            .await?;
    Ok(rows.into_iter().map(|(id,)| id).collect())
}

/// Add a user to a group
///
/// # Returns
/// `false` if the user already was a member
pub async fn add_member(pool: &DbPool, group_id: i64, user_id: i64) -> Result<bool, sqlx::Error> {
    let result =
        sqlx::query("INSERT OR IGNORE INTO group_members (user_id, group_id) VALUES (?, ?)")
            .bind(user_id)
            .bind(group_id)
            .execute(pool)
            .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn remove_member(pool: &DbPool, group_id: i64, user_id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM group_members WHERE user_id = ? AND group_id = ?")
        .bind(user_id)
        .bind(group_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
