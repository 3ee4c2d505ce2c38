/**
 * Instance Database Operations
 *
 * Stored connection settings for voice instances. Whether an instance is
 * currently running is not persisted; that lives in the daemon service.
 */

use serde::{Deserialize, Serialize};

use crate::backend::server::config::DbPool;
use crate::shared::error::validate_name;
use crate::shared::SharedError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Instance {
    pub id: i64,
    pub name: String,
    pub host: String,
    pub port: u16,
    pub identity: Option<String>,
    /// Channel to join after connecting
    pub cid: Option<i32>,
    #[serde(skip_serializing, default)]
    pub password: Option<String>,
    pub autostart: bool,
}

/// Create and update payload
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InstanceRequest {
    pub name: String,
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub identity: Option<String>,
    #[serde(default)]
    pub cid: Option<i32>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub autostart: bool,
}

impl InstanceRequest {
    pub fn validate(&self) -> Result<(), SharedError> {
        validate_name("name", &self.name)?;
        validate_name("host", &self.host)?;
        if self.port == 0 {
            return Err(SharedError::validation("port", "Port must be between 1 and 65535"));
        }
        Ok(())
    }
}

const COLUMNS: &str = "id, name, host, port, identity, cid, password, autostart";

pub async fn create_instance(pool: &DbPool, request: &InstanceRequest) -> Result<Instance, sqlx::Error> {
    sqlx::query_as::<_, Instance>(&format!(
        r#"
        INSERT INTO instances (name, host, port, identity, cid, password, autostart)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        RETURNING {COLUMNS}
        "#
    ))
    .bind(&request.name)
    .bind(&request.host)
    .bind(request.port)
    .bind(&request.identity)
    .bind(request.cid)
    .bind(&request.password)
    .bind(request.autostart)
    .fetch_one(pool)
    .await
}

pub async fn list_instances(pool: &DbPool) -> Result<Vec<Instance>, sqlx::Error> {
    sqlx::query_as::<_, Instance>(&format!("SELECT {COLUMNS} FROM instances ORDER BY id"))
        .fetch_all(pool)
        .await
}

pub async fn list_autostart_instances(pool: &DbPool) -> Result<Vec<Instance>, sqlx::Error> {
    sqlx::query_as::<_, Instance>(&format!(
        "SELECT {COLUMNS} FROM instances WHERE autostart = TRUE ORDER BY id"
    ))
    .fetch_all(pool)
    .await
}

pub async fn get_instance(pool: &DbPool, id: i64) -> Result<Option<Instance>, sqlx::Error> {
    sqlx::query_as::<_, Instance>(&format!("SELECT {COLUMNS} FROM instances WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Replace all settings of an instance
///
/// A `None` password keeps the stored one.
pub async fn update_instance(
    pool: &DbPool,
    id: i64,
    request: &InstanceRequest,
) -> Result<Option<Instance>, sqlx::Error> {
    sqlx::query_as::<_, Instance>(&format!(
        r#"
        UPDATE instances
        SET name = ?, host = ?, port = ?, identity = ?, cid = ?,
            password = COALESCE(?, password), autostart = ?
        WHERE id = ?
        RETURNING {COLUMNS}
        "#
    ))
    .bind(&request.name)
    .bind(&request.host)
    .bind(request.port)
    .bind(&request.identity)
    .bind(request.cid)
    .bind(&request.password)
    .bind(request.autostart)
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn delete_instance(pool: &DbPool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM instances WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
