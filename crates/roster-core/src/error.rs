//! Unified error types for all layers of the application.

use thiserror::Error;

/// Unified error type for all layers of Roster.
///
/// The variants separate "the store could not be reached" from "the store
/// was reached and refused the statement", because only the former is worth
/// retrying. Absence of a row is never an error by itself; operations
/// report it through `Option` or affected-row booleans.
#[derive(Error, Debug)]
pub enum RosterError {
    // ============ Domain Errors ============
    /// Resource not found
    #[error("Resource not found: {resource_type} with id {id}")]
    NotFound {
        resource_type: &'static str,
        id: String,
    },

    /// Conflict error (e.g., duplicate entry)
    #[error("Conflict: {0}")]
    Conflict(String),

    // ============ Infrastructure Errors ============
    /// Pool or backing store unreachable
    #[error("Connectivity error: {0}")]
    Connectivity(String),

    /// A statement was rejected or failed to execute
    #[error("Statement error: {0}")]
    Statement(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    // ============ Internal Errors ============
    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Generic error wrapper
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RosterError {
    /// Creates a not found error for a resource.
    #[must_use]
    pub fn not_found<T: ToString>(resource_type: &'static str, id: T) -> Self {
        Self::NotFound {
            resource_type,
            id: id.to_string(),
        }
    }

    /// Creates a conflict error.
    #[must_use]
    pub fn conflict<T: Into<String>>(message: T) -> Self {
        Self::Conflict(message.into())
    }

    /// Creates a connectivity error.
    #[must_use]
    pub fn connectivity<T: Into<String>>(message: T) -> Self {
        Self::Connectivity(message.into())
    }

    /// Creates a statement error.
    #[must_use]
    pub fn statement<T: Into<String>>(message: T) -> Self {
        Self::Statement(message.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal<T: Into<String>>(message: T) -> Self {
        Self::Internal(message.into())
    }

    /// Checks if this error is retriable.
    ///
    /// Only connectivity failures are transient; a rejected statement will
    /// be rejected again.
    #[must_use]
    pub const fn is_retriable(&self) -> bool {
        matches!(self, Self::Connectivity(_))
    }
}

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for RosterError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => Self::NotFound {
                resource_type: "database_row",
                id: "unknown".to_string(),
            },
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                Self::Connectivity(err.to_string())
            }
            sqlx::Error::Database(db_err) => {
                // Check for unique constraint violation
                if let Some(code) = db_err.code() {
                    if code == "2067" || code == "1555" {
                        // SQLite unique / primary key violation
                        return Self::Conflict(db_err.message().to_string());
                    }
                }
                Self::Statement(err.to_string())
            }
            _ => Self::Statement(err.to_string()),
        }
    }
}
