//! Repository trait definitions.

use async_trait::async_trait;
use roster_core::{Interface, NewUser, RosterResult, User, UserId};

/// User repository trait.
///
/// Absence is never an error: lookups return `Option`, and update/delete
/// report through their boolean whether the id matched a row. An `Err`
/// always means the operation itself failed.
#[async_trait]
pub trait UserRepository: Interface + Send + Sync {
    /// Creates the backing table if it does not exist yet.
    ///
    /// Idempotent; safe to call at every startup.
    async fn ensure_table(&self) -> RosterResult<()>;

    /// Inserts a new user and returns it with its store-assigned id.
    async fn create(&self, new_user: &NewUser) -> RosterResult<User>;

    /// Finds a user by ID.
    async fn find_by_id(&self, id: UserId) -> RosterResult<Option<User>>;

    /// Lists all users in storage order.
    async fn find_all(&self) -> RosterResult<Vec<User>>;

    /// Replaces the username and email of the user with the given id.
    ///
    /// Returns `true` if a row was changed.
    async fn update(&self, id: UserId, changes: &NewUser) -> RosterResult<bool>;

    /// Deletes a user by ID.
    ///
    /// Returns `true` if a row was removed.
    async fn delete(&self, id: UserId) -> RosterResult<bool>;
}
