//! Common test infrastructure for database integration tests.

use roster_config::DatabaseConfig;
use roster_repository::{create_pool, DatabasePool};
use std::sync::Arc;
use tempfile::TempDir;

/// Test database wrapper.
///
/// Provides a pool over a SQLite file in a temporary directory. A file is
/// used rather than `sqlite::memory:` because every pooled connection to
/// an in-memory database would see its own separate database.
pub struct TestDatabase {
    _dir: TempDir,
    pool: Arc<DatabasePool>,
}

impl TestDatabase {
    /// Creates a new test database backed by a fresh temporary file.
    pub async fn new() -> Self {
        Self::with_max_connections(5).await
    }

    /// Creates a test database with a specific pool capacity.
    pub async fn with_max_connections(max_connections: u32) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let db_path = dir.path().join("roster_test.db");

        let config = DatabaseConfig {
            url: format!("sqlite://{}", db_path.display()),
            min_connections: 1,
            max_connections,
            connect_timeout_secs: 5,
            idle_timeout_secs: 600,
            busy_timeout_ms: 5000,
            log_queries: true,
        };

        let pool = create_pool(&config)
            .await
            .expect("Failed to create database pool");

        Self { _dir: dir, pool }
    }

    /// Returns a reference to the database pool.
    pub fn pool(&self) -> Arc<DatabasePool> {
        Arc::clone(&self.pool)
    }
}
