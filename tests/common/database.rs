//! Database test fixtures
//!
//! Every fixture gets its own migrated in-memory database, so tests never
//! share state and need no cleanup.

use yamba_management::backend::server::config::{connect_in_memory, DbPool};

/// Test database fixture
pub struct TestDatabase {
    pool: DbPool,
}

impl TestDatabase {
    pub async fn new() -> Self {
        let pool = connect_in_memory()
            .await
            .expect("Failed to create in-memory test database");
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    /// Count rows of a table
    pub async fn count(&self, table: &str) -> i64 {
        let row: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&self.pool)
            .await
            .expect("Failed to count rows");
        row.0
    }
}
