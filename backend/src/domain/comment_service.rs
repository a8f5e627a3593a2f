//! Comment use-cases.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use crate::domain::ownership::{Action, ensure_permitted};
use crate::domain::ports::{
    CommentRepository, CommentRepositoryError, CommentsCommand, CommentsQuery, PostRepository,
};
use crate::domain::post_service::{map_post_error, post_not_found};
use crate::domain::{
    Comment, CommentChanges, CommentDraft, CommentId, Error, PostId, UserId,
};

pub(crate) fn map_comment_error(error: CommentRepositoryError) -> Error {
    match error {
        CommentRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("comment repository unavailable: {message}"))
        }
        CommentRepositoryError::Query { message } => {
            Error::internal(format!("comment repository error: {message}"))
        }
        CommentRepositoryError::UnknownPost { post } => unknown_post(PostId::new(post)),
    }
}

pub(crate) fn comment_not_found(id: CommentId) -> Error {
    Error::not_found(format!("comment {id} not found"))
}

fn unknown_post(post: PostId) -> Error {
    Error::invalid_request(format!("unknown post {post}"))
        .with_details(json!({ "field": "post", "id": post }))
}

/// Comment service implementing the comment driving ports.
#[derive(Clone)]
pub struct CommentService<C, P> {
    comments: Arc<C>,
    posts: Arc<P>,
}

impl<C, P> CommentService<C, P> {
    /// Store comments in `comments`, checking parent posts in `posts`.
    pub fn new(comments: Arc<C>, posts: Arc<P>) -> Self {
        Self { comments, posts }
    }
}

impl<C, P> CommentService<C, P>
where
    C: CommentRepository,
    P: PostRepository,
{
    async fn resolve(&self, id: CommentId) -> Result<Comment, Error> {
        self.comments
            .find(id)
            .await
            .map_err(map_comment_error)?
            .ok_or_else(|| comment_not_found(id))
    }

    async fn post_exists(&self, id: PostId) -> Result<bool, Error> {
        Ok(self
            .posts
            .find(id)
            .await
            .map_err(map_post_error)?
            .is_some())
    }
}

#[async_trait]
impl<C, P> CommentsQuery for CommentService<C, P>
where
    C: CommentRepository,
    P: PostRepository,
{
    async fn list_comments(&self) -> Result<Vec<Comment>, Error> {
        self.comments.list().await.map_err(map_comment_error)
    }

    async fn list_post_comments(&self, post: PostId) -> Result<Vec<Comment>, Error> {
        if !self.post_exists(post).await? {
            return Err(post_not_found(post));
        }
        self.comments
            .list_for_post(post)
            .await
            .map_err(map_comment_error)
    }

    async fn get_comment(&self, id: CommentId) -> Result<Comment, Error> {
        self.resolve(id).await
    }
}

#[async_trait]
impl<C, P> CommentsCommand for CommentService<C, P>
where
    C: CommentRepository,
    P: PostRepository,
{
    async fn create_comment(
        &self,
        author: &UserId,
        draft: CommentDraft,
    ) -> Result<Comment, Error> {
        if !self.post_exists(draft.post).await? {
            return Err(unknown_post(draft.post));
        }
        let comment = self
            .comments
            .create(author, &draft)
            .await
            .map_err(map_comment_error)?;
        info!(comment_id = %comment.id, post_id = %comment.post, "comment created");
        Ok(comment)
    }

    async fn update_comment(
        &self,
        principal: &UserId,
        id: CommentId,
        changes: CommentChanges,
        action: Action,
    ) -> Result<Comment, Error> {
        let comment = self.resolve(id).await?;
        ensure_permitted(Some(principal), &comment, action, "comment")?;
        if changes.content.is_none() {
            return Ok(comment);
        }
        self.comments
            .update(id, &changes)
            .await
            .map_err(map_comment_error)?
            .ok_or_else(|| comment_not_found(id))
    }

    async fn delete_comment(&self, principal: &UserId, id: CommentId) -> Result<(), Error> {
        let comment = self.resolve(id).await?;
        ensure_permitted(Some(principal), &comment, Action::Delete, "comment")?;
        if !self
            .comments
            .delete(id)
            .await
            .map_err(map_comment_error)?
        {
            return Err(comment_not_found(id));
        }
        info!(comment_id = %id, "comment deleted");
        Ok(())
    }
}
