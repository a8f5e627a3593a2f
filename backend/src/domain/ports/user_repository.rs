//! Port abstraction for account persistence adapters and their errors.

use async_trait::async_trait;

use crate::domain::{User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Another account already uses the username.
        DuplicateUsername { username: String } => "username already taken: {username}",
    }
}

/// Account row together with its password hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredAccount {
    pub user: User,
    pub password_hash: String,
}

/// Account storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new account. Usernames are unique.
    async fn insert(&self, user: &User, password_hash: &str) -> Result<(), UserPersistenceError>;

    /// Fetch an account by exact username.
    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<StoredAccount>, UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;
}
