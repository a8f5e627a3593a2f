//! Driving port for reading posts.

use async_trait::async_trait;

use crate::domain::{Error, Post, PostId};

/// Post reads.
#[async_trait]
pub trait PostsQuery: Send + Sync {
    /// All posts, newest first.
    async fn list_posts(&self) -> Result<Vec<Post>, Error>;

    /// A single post, or `not_found`.
    async fn get_post(&self, id: PostId) -> Result<Post, Error>;
}
