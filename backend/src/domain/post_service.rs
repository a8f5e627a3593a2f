//! Post use-cases: listing, creation and owner-only edits.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use crate::domain::ownership::{Action, ensure_permitted};
use crate::domain::ports::{
    PostRepository, PostRepositoryError, PostsCommand, PostsQuery, TaxonomyRepository,
};
use crate::domain::taxonomy_service::map_taxonomy_error;
use crate::domain::{CategoryId, Error, Post, PostChanges, PostDraft, PostId, TagId, UserId};

pub(crate) fn map_post_error(error: PostRepositoryError) -> Error {
    match error {
        PostRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("post repository unavailable: {message}"))
        }
        PostRepositoryError::Query { message } => {
            Error::internal(format!("post repository error: {message}"))
        }
        PostRepositoryError::UnknownReference { message } => Error::invalid_request(message),
    }
}

pub(crate) fn post_not_found(id: PostId) -> Error {
    Error::not_found(format!("post {id} not found"))
}

/// Post service implementing the post driving ports.
#[derive(Clone)]
pub struct PostService<P, T> {
    posts: Arc<P>,
    taxonomy: Arc<T>,
}

impl<P, T> PostService<P, T> {
    /// Store posts in `posts`, checking category and tag ids against `taxonomy`.
    pub fn new(posts: Arc<P>, taxonomy: Arc<T>) -> Self {
        Self { posts, taxonomy }
    }
}

impl<P, T> PostService<P, T>
where
    P: PostRepository,
    T: TaxonomyRepository,
{
    async fn resolve(&self, id: PostId) -> Result<Post, Error> {
        self.posts
            .find(id)
            .await
            .map_err(map_post_error)?
            .ok_or_else(|| post_not_found(id))
    }

    async fn check_references(
        &self,
        category: Option<CategoryId>,
        tags: &[TagId],
    ) -> Result<(), Error> {
        if let Some(id) = category {
            let found = self
                .taxonomy
                .find_category(id)
                .await
                .map_err(map_taxonomy_error)?;
            if found.is_none() {
                return Err(Error::invalid_request(format!("unknown category {id}"))
                    .with_details(json!({ "field": "category", "id": id })));
            }
        }
        for id in tags {
            let found = self
                .taxonomy
                .find_tag(*id)
                .await
                .map_err(map_taxonomy_error)?;
            if found.is_none() {
                return Err(Error::invalid_request(format!("unknown tag {id}"))
                    .with_details(json!({ "field": "tags", "id": id })));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl<P, T> PostsQuery for PostService<P, T>
where
    P: PostRepository,
    T: TaxonomyRepository,
{
    async fn list_posts(&self) -> Result<Vec<Post>, Error> {
        self.posts.list().await.map_err(map_post_error)
    }

    async fn get_post(&self, id: PostId) -> Result<Post, Error> {
        self.resolve(id).await
    }
}

#[async_trait]
impl<P, T> PostsCommand for PostService<P, T>
where
    P: PostRepository,
    T: TaxonomyRepository,
{
    async fn create_post(&self, author: &UserId, draft: PostDraft) -> Result<Post, Error> {
        self.check_references(draft.category, &draft.tags).await?;
        let post = self
            .posts
            .create(author, &draft)
            .await
            .map_err(map_post_error)?;
        info!(post_id = %post.id, author = %author, "post created");
        Ok(post)
    }

    async fn update_post(
        &self,
        principal: &UserId,
        id: PostId,
        changes: PostChanges,
        action: Action,
    ) -> Result<Post, Error> {
        let post = self.resolve(id).await?;
        ensure_permitted(Some(principal), &post, action, "post")?;
        if changes.is_empty() {
            return Ok(post);
        }
        let category = changes.category.flatten();
        let tags = changes.tags.as_deref().unwrap_or_default();
        self.check_references(category, tags).await?;
        self.posts
            .update(id, &changes)
            .await
            .map_err(map_post_error)?
            .ok_or_else(|| post_not_found(id))
    }

    async fn delete_post(&self, principal: &UserId, id: PostId) -> Result<(), Error> {
        let post = self.resolve(id).await?;
        ensure_permitted(Some(principal), &post, Action::Delete, "post")?;
        if !self.posts.delete(id).await.map_err(map_post_error)? {
            return Err(post_not_found(id));
        }
        info!(post_id = %id, "post deleted");
        Ok(())
    }
}

#[cfg(test)]
#[path = "post_service_tests.rs"]
mod tests;
