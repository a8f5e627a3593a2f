//! Port abstraction for profile persistence adapters and their errors.

use async_trait::async_trait;

use crate::domain::{Profile, UserId, Username};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by profile repository adapters.
    pub enum ProfileRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "profile repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "profile repository query failed: {message}",
        /// No account exists for the profile owner.
        UnknownUser { user_id: String } => "user {user_id} does not exist",
    }
}

/// Profile storage keyed by owner.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Create the owner's profile with `bio` unless one exists.
    ///
    /// Returns `true` when a profile was created. Calling it again for the
    /// same owner leaves the stored profile untouched.
    async fn create_if_absent(
        &self,
        owner: &UserId,
        bio: &str,
    ) -> Result<bool, ProfileRepositoryError>;

    /// Fetch the profile of the account called `username`.
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<Profile>, ProfileRepositoryError>;

    /// All profiles ordered by username.
    async fn list(&self) -> Result<Vec<Profile>, ProfileRepositoryError>;

    /// Replace the bio and return the updated profile.
    async fn update_bio(
        &self,
        owner: &UserId,
        bio: &str,
    ) -> Result<Option<Profile>, ProfileRepositoryError>;
}
