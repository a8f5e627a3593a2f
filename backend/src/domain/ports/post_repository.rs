//! Port abstraction for post persistence adapters and their errors.

use async_trait::async_trait;

use crate::domain::{Post, PostChanges, PostDraft, PostId, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by post repository adapters.
    pub enum PostRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "post repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "post repository query failed: {message}",
        /// The post names a category, tag or author that does not exist.
        UnknownReference { message: String } => "post references unknown record: {message}",
    }
}

/// Post storage. Every returned [`Post`] carries its current like count.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Persist a new post owned by `author`.
    async fn create(&self, author: &UserId, draft: &PostDraft)
    -> Result<Post, PostRepositoryError>;

    /// Fetch a post by identifier.
    async fn find(&self, id: PostId) -> Result<Option<Post>, PostRepositoryError>;

    /// All posts, newest first.
    async fn list(&self) -> Result<Vec<Post>, PostRepositoryError>;

    /// Apply `changes` and return the updated post, or `None` if it vanished.
    async fn update(
        &self,
        id: PostId,
        changes: &PostChanges,
    ) -> Result<Option<Post>, PostRepositoryError>;

    /// Remove a post together with its comments and likes.
    async fn delete(&self, id: PostId) -> Result<bool, PostRepositoryError>;
}
