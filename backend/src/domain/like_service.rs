//! Like use-cases: resolve the target, then hand over to the toggle engine.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::comment_service::{comment_not_found, map_comment_error};
use crate::domain::ports::{CommentRepository, LikeRepository, LikesCommand, PostRepository};
use crate::domain::post_service::{map_post_error, post_not_found};
use crate::domain::{CommentId, Error, LikeTarget, LikeToggle, LikeToggleEngine, PostId, UserId};

/// Like service implementing [`LikesCommand`].
#[derive(Clone)]
pub struct LikeService<L, P, C> {
    engine: LikeToggleEngine<L>,
    posts: Arc<P>,
    comments: Arc<C>,
}

impl<L, P, C> LikeService<L, P, C> {
    /// Toggle likes in `likes` after resolving targets in `posts` or `comments`.
    pub fn new(likes: Arc<L>, posts: Arc<P>, comments: Arc<C>) -> Self {
        Self {
            engine: LikeToggleEngine::new(likes),
            posts,
            comments,
        }
    }
}

#[async_trait]
impl<L, P, C> LikesCommand for LikeService<L, P, C>
where
    L: LikeRepository,
    P: PostRepository,
    C: CommentRepository,
{
    async fn toggle_post_like(
        &self,
        principal: &UserId,
        post: PostId,
    ) -> Result<LikeToggle, Error> {
        self.posts
            .find(post)
            .await
            .map_err(map_post_error)?
            .ok_or_else(|| post_not_found(post))?;
        self.engine
            .toggle_like(principal, LikeTarget::Post(post))
            .await
    }

    async fn toggle_comment_like(
        &self,
        principal: &UserId,
        comment: CommentId,
    ) -> Result<LikeToggle, Error> {
        self.comments
            .find(comment)
            .await
            .map_err(map_comment_error)?
            .ok_or_else(|| comment_not_found(comment))?;
        self.engine
            .toggle_like(principal, LikeTarget::Comment(comment))
            .await
    }
}
