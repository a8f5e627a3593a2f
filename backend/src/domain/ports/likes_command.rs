//! Driving port for toggling likes.

use async_trait::async_trait;

use crate::domain::{CommentId, Error, LikeToggle, PostId, UserId};

/// Like toggles for posts and comments.
///
/// Each call flips the `(principal, target)` relation and reports the new
/// state with the count read after the change. Missing targets are
/// `not_found`.
#[async_trait]
pub trait LikesCommand: Send + Sync {
    async fn toggle_post_like(&self, principal: &UserId, post: PostId)
    -> Result<LikeToggle, Error>;

    async fn toggle_comment_like(
        &self,
        principal: &UserId,
        comment: CommentId,
    ) -> Result<LikeToggle, Error>;
}
