//! User entity.

use crate::UserId;
use serde::{Deserialize, Serialize};

/// User entity representing one row of the user directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier, assigned by the store on insert.
    pub id: UserId,

    /// Login name, at most 50 characters.
    pub username: String,

    /// Email address, at most 100 characters.
    pub email: String,
}

impl User {
    /// Creates a user from its persisted parts.
    #[must_use]
    pub fn new(id: UserId, username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            email: email.into(),
        }
    }
}

/// A user that has not been persisted yet.
///
/// Carries only the writable columns; the store assigns the id when the
/// row is inserted. The same shape is used as the replacement value for
/// updates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    /// Login name, at most 50 characters.
    pub username: String,

    /// Email address, at most 100 characters.
    pub email: String,
}

impl NewUser {
    /// Creates a new draft user.
    #[must_use]
    pub fn new(username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
        }
    }
}

impl From<User> for NewUser {
    /// Drops the store-assigned id, keeping the writable columns.
    fn from(user: User) -> Self {
        Self {
            username: user.username,
            email: user.email,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_user(username: &str) -> User {
        User::new(
            UserId::from_i64(1),
            username,
            format!("{}@example.com", username),
        )
    }

    #[test]
    fn test_user_creation() {
        let user = User::new(UserId::from_i64(3), "alice", "alice@example.com");
        assert_eq!(user.id, UserId::from_i64(3));
        assert_eq!(user.username, "alice");
        assert_eq!(user.email, "alice@example.com");
    }

    #[test]
    fn test_new_user_from_user_drops_id() {
        let user = create_user("bob");
        let draft = NewUser::from(user.clone());
        assert_eq!(draft.username, user.username);
        assert_eq!(draft.email, user.email);
    }

    #[test]
    fn test_user_serialization() {
        let user = create_user("carol");
        let json = serde_json::to_string(&user).unwrap();
        assert!(json.contains("\"id\":1"));
        assert!(json.contains("\"username\":\"carol\""));

        let back: User = serde_json::from_str(&json).unwrap();
        assert_eq!(back, user);
    }

    #[test]
    fn test_new_user_equality() {
        let a = NewUser::new("dave", "dave@example.com");
        let b = NewUser::new("dave", "dave@example.com");
        assert_eq!(a, b);
    }
}
