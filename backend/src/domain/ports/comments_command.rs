//! Driving port for writing comments.

use async_trait::async_trait;

use crate::domain::ownership::Action;
use crate::domain::{Comment, CommentChanges, CommentDraft, CommentId, Error, UserId};

/// Comment writes on behalf of a principal.
#[async_trait]
pub trait CommentsCommand: Send + Sync {
    /// Create a comment owned by `author`. An unknown post is an invalid request.
    async fn create_comment(&self, author: &UserId, draft: CommentDraft)
    -> Result<Comment, Error>;

    /// Owner-only update of the comment body.
    async fn update_comment(
        &self,
        principal: &UserId,
        id: CommentId,
        changes: CommentChanges,
        action: Action,
    ) -> Result<Comment, Error>;

    /// Owner-only delete.
    async fn delete_comment(&self, principal: &UserId, id: CommentId) -> Result<(), Error>;
}
