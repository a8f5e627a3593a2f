//! Port for like relation storage.
//!
//! A like relation is a `(user, target)` pair. Adapters must make
//! [`LikeRepository::create_if_absent`] atomic with respect to that pair:
//! concurrent callers racing on the same pair see exactly one `true`.

use async_trait::async_trait;

use crate::domain::{LikeTarget, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by like repository adapters.
    pub enum LikeRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "like repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "like repository query failed: {message}",
        /// The uniqueness constraint on the pair rejected the insert.
        Conflict => "like relation already exists",
        /// The liked post or comment does not exist.
        MissingTarget => "like target does not exist",
    }
}

/// Storage operations needed by the like toggle.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LikeRepository: Send + Sync {
    /// Insert the relation unless it exists.
    ///
    /// Returns `true` when a row was created and `false` when the pair was
    /// already present. Adapters may instead report the pre-existing row as
    /// [`LikeRepositoryError::Conflict`]; callers treat both the same way.
    async fn create_if_absent(
        &self,
        user_id: &UserId,
        target: LikeTarget,
    ) -> Result<bool, LikeRepositoryError>;

    /// Remove the relation. Returns `true` when a row was deleted.
    async fn delete(&self, user_id: &UserId, target: LikeTarget)
    -> Result<bool, LikeRepositoryError>;

    /// Number of relations pointing at `target`.
    async fn count(&self, target: LikeTarget) -> Result<u64, LikeRepositoryError>;
}
