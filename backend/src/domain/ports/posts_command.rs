//! Driving port for writing posts.
//!
//! Mutations other than creation are owner-only; implementations resolve the
//! post first and consult the ownership guard before touching storage.

use async_trait::async_trait;

use crate::domain::ownership::Action;
use crate::domain::{Error, Post, PostChanges, PostDraft, PostId, UserId};

/// Post writes on behalf of a principal.
#[async_trait]
pub trait PostsCommand: Send + Sync {
    /// Create a post owned by `author`.
    async fn create_post(&self, author: &UserId, draft: PostDraft) -> Result<Post, Error>;

    /// Apply a full (`Action::Update`) or partial (`Action::PartialUpdate`)
    /// update on behalf of `principal`.
    async fn update_post(
        &self,
        principal: &UserId,
        id: PostId,
        changes: PostChanges,
        action: Action,
    ) -> Result<Post, Error>;

    /// Delete a post with its comments and likes.
    async fn delete_post(&self, principal: &UserId, id: PostId) -> Result<(), Error>;
}
