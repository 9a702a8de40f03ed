//! SQLite user repository implementation.

use crate::{traits::UserRepository, DatabasePoolInterface};
use async_trait::async_trait;
use roster_core::{NewUser, RosterError, RosterResult, User, UserId};
use shaku::Component;
use sqlx::pool::PoolConnection;
use sqlx::{FromRow, Sqlite};
use std::sync::Arc;
use tracing::{debug, error};

/// SQLite user repository implementation.
///
/// Every operation borrows one pooled connection, runs a single
/// parameterized statement on it, and releases the connection when the
/// handle drops. Statements auto-commit; there are no cross-operation
/// transactions.
#[derive(Component, Clone)]
#[shaku(interface = UserRepository)]
pub struct SqliteUserRepository {
    #[shaku(inject)]
    pool: Arc<dyn DatabasePoolInterface>,
}

impl SqliteUserRepository {
    /// Creates a new SQLite user repository.
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self { pool }
    }

    /// Borrows a connection from the pool for one operation.
    ///
    /// The handle returns the connection to the pool when dropped, on
    /// every exit path, so a failed statement can never leak it.
    async fn acquire(&self) -> RosterResult<PoolConnection<Sqlite>> {
        self.pool.inner().acquire().await.map_err(|e| {
            error!("Failed to acquire connection from pool: {}", e);
            RosterError::Connectivity(e.to_string())
        })
    }
}

/// Database row representation of a user.
///
/// Columns are always read in the order `(id, username, email)`.
#[derive(Debug, FromRow)]
struct UserRow {
    id: i64,
    username: String,
    email: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: UserId::from_i64(row.id),
            username: row.username,
            email: row.email,
        }
    }
}

fn statement_error(context: &str, err: sqlx::Error) -> RosterError {
    error!("Statement failed while {}: {}", context, err);
    RosterError::from(err)
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn ensure_table(&self) -> RosterResult<()> {
        debug!("Ensuring users table exists");

        let mut conn = self.acquire().await?;

        let existing: Option<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name = 'users'",
        )
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| statement_error("checking for users table", e))?;

        if existing.is_some() {
            debug!("Users table already exists");
            return Ok(());
        }

        // AUTOINCREMENT keeps deleted ids from ever being reassigned; the
        // length checks enforce the column bounds in the store itself.
        sqlx::query(
            r#"
            CREATE TABLE users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL CHECK (length(username) <= 50),
                email TEXT NOT NULL CHECK (length(email) <= 100)
            )
            "#,
        )
        .execute(&mut *conn)
        .await
        .map_err(|e| statement_error("creating users table", e))?;

        debug!("Users table created");
        Ok(())
    }

    async fn create(&self, new_user: &NewUser) -> RosterResult<User> {
        debug!("Creating user: {}", new_user.username);

        let mut conn = self.acquire().await?;

        // SQLite supports RETURNING, so the insert and the read of the
        // store-assigned id are one statement.
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (username, email)
            VALUES (?, ?)
            RETURNING id, username, email
            "#,
        )
        .bind(&new_user.username)
        .bind(&new_user.email)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| statement_error("inserting user", e))?;

        Ok(User::from(row))
    }

    async fn find_by_id(&self, id: UserId) -> RosterResult<Option<User>> {
        debug!("Finding user by id: {}", id);

        let mut conn = self.acquire().await?;

        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, username, email FROM users WHERE id = ?",
        )
        .bind(id.into_inner())
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| statement_error("selecting user", e))?;

        Ok(row.map(User::from))
    }

    async fn find_all(&self) -> RosterResult<Vec<User>> {
        debug!("Listing all users");

        let mut conn = self.acquire().await?;

        let rows = sqlx::query_as::<_, UserRow>("SELECT id, username, email FROM users")
            .fetch_all(&mut *conn)
            .await
            .map_err(|e| statement_error("selecting users", e))?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn update(&self, id: UserId, changes: &NewUser) -> RosterResult<bool> {
        debug!("Updating user: {}", id);

        let mut conn = self.acquire().await?;

        let result = sqlx::query("UPDATE users SET username = ?, email = ? WHERE id = ?")
            .bind(&changes.username)
            .bind(&changes.email)
            .bind(id.into_inner())
            .execute(&mut *conn)
            .await
            .map_err(|e| statement_error("updating user", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: UserId) -> RosterResult<bool> {
        debug!("Deleting user: {}", id);

        let mut conn = self.acquire().await?;

        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id.into_inner())
            .execute(&mut *conn)
            .await
            .map_err(|e| statement_error("deleting user", e))?;

        Ok(result.rows_affected() > 0)
    }
}

impl std::fmt::Debug for SqliteUserRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteUserRepository").finish_non_exhaustive()
    }
}
