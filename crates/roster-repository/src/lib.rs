//! # Roster Repository
//!
//! Data access for the user directory, backed by SQLite through SQLx:
//!
//! ```text
//! Service
//!   ↓  Arc<dyn UserRepository>         (domain interface)
//! SqliteUserRepository                 (repository impl - SQLx statements)
//!   ↓  Arc<dyn DatabasePoolInterface>  (pool interface)
//! DatabasePool                         (SQLite connection pool)
//! ```
//!
//! The pool is handed to the repository at construction time, never
//! reached through a global, so callers can substitute either seam with
//! a test double.

pub mod pool;
pub mod sqlite;
pub mod traits;

pub use pool::*;
pub use sqlite::*;
pub use traits::*;
