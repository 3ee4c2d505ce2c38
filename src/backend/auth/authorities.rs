/**
 * Authorities
 *
 * An authority is a named permission (`ROLE_ADMIN`, `ROLE_USER`). Users
 * hold authorities directly through `user_authorities` and indirectly
 * through the groups they belong to (`group_members` joined with
 * `group_authorities`). The effective set is the union of both.
 */

use serde::{Deserialize, Serialize};

use crate::backend::server::config::DbPool;

pub const ADMIN_AUTHORITY_ID: i64 = 0;

/// Row of the `authorities` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Authority {
    pub id: i64,
    pub authority: String,
}

/// List all authorities
pub async fn list_authorities(pool: &DbPool) -> Result<Vec<Authority>, sqlx::Error> {
    sqlx::query_as::<_, Authority>("SELECT id, authority FROM authorities ORDER BY id")
        .fetch_all(pool)
        .await
}

/// Effective authority names for a user, sorted and de-duplicated
pub async fn authorities_for_user(pool: &DbPool, user_id: i64) -> Result<Vec<String>, sqlx::Error> {
    let rows: Vec<(String,)> = sqlx::query_as(
        r#"
        SELECT a.authority
        FROM authorities a
        JOIN user_authorities ua ON ua.authority_id = a.id
        WHERE ua.user_id = ?
        UNION
        SELECT a.authority
        FROM authorities a
        JOIN group_authorities ga ON ga.authority_id = a.id
        JOIN group_members gm ON gm.group_id = ga.group_id
        WHERE gm.user_id = ?
        ORDER BY 1
        "#,
    )
    .bind(user_id)
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(|(authority,)| authority).collect())
}

/// Grant an authority directly to a user (no-op if already granted)
pub async fn grant_user_authority(
    pool: &DbPool,
    user_id: i64,
    authority_id: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT OR IGNORE INTO user_authorities (user_id, authority_id) VALUES (?, ?)")
        .bind(user_id)
        .bind(authority_id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Revoke a direct user grant; returns whether anything was removed
pub async fn revoke_user_authority(
    pool: &DbPool,
    user_id: i64,
    authority_id: i64,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM user_authorities WHERE user_id = ? AND authority_id = ?")
        .bind(user_id)
        .bind(authority_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Grant an authority to every member of a group
pub async fn grant_group_authority(
    pool: &DbPool,
    group_id: i64,
    authority_id: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT OR IGNORE INTO group_authorities (group_id, authority_id) VALUES (?, ?)")
        .bind(group_id)
        .bind(authority_id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn revoke_group_authority(
    pool: &DbPool,
    group_id: i64,
    authority_id: i64,
) -> Result<bool, sqlx::Error> {
    let result =
        sqlx::query("DELETE FROM group_authorities WHERE group_id = ? AND authority_id = ?")
            .bind(group_id)
            .bind(authority_id)
            .execute(pool)
            .await?;
    Ok(result.rows_affected() > 0)
}
