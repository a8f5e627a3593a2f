//! Port abstraction for comment persistence adapters and their errors.

use async_trait::async_trait;

use crate::domain::{Comment, CommentChanges, CommentDraft, CommentId, PostId, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by comment repository adapters.
    pub enum CommentRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "comment repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "comment repository query failed: {message}",
        /// The parent post no longer exists.
        UnknownPost { post: i64 } => "post {post} does not exist",
    }
}

/// Comment storage. Every returned [`Comment`] carries its current like count.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Persist a new comment owned by `author`.
    async fn create(
        &self,
        author: &UserId,
        draft: &CommentDraft,
    ) -> Result<Comment, CommentRepositoryError>;

    /// Fetch a comment by identifier.
    async fn find(&self, id: CommentId) -> Result<Option<Comment>, CommentRepositoryError>;

    /// All comments, newest first.
    async fn list(&self) -> Result<Vec<Comment>, CommentRepositoryError>;

    /// Comments on one post, newest first.
    async fn list_for_post(&self, post: PostId) -> Result<Vec<Comment>, CommentRepositoryError>;

    /// Apply `changes` and return the updated comment.
    async fn update(
        &self,
        id: CommentId,
        changes: &CommentChanges,
    ) -> Result<Option<Comment>, CommentRepositoryError>;

    /// Remove a comment and its likes.
    async fn delete(&self, id: CommentId) -> Result<bool, CommentRepositoryError>;
}
