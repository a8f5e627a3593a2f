//! Driving port for reading comments.

use async_trait::async_trait;

use crate::domain::{Comment, CommentId, Error, PostId};

/// Comment reads.
#[async_trait]
pub trait CommentsQuery: Send + Sync {
    /// All comments, newest first.
    async fn list_comments(&self) -> Result<Vec<Comment>, Error>;

    /// Comments on one post, newest first. Unknown posts are `not_found`.
    async fn list_post_comments(&self, post: PostId) -> Result<Vec<Comment>, Error>;

    /// A single comment, or `not_found`.
    async fn get_comment(&self, id: CommentId) -> Result<Comment, Error>;
}
