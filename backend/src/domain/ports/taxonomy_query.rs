//! Driving port for category and tag lookups.

use async_trait::async_trait;

use crate::domain::{Category, CategoryId, Error, Tag, TagId};

/// Category and tag reads.
#[async_trait]
pub trait TaxonomyQuery: Send + Sync {
    async fn list_categories(&self) -> Result<Vec<Category>, Error>;

    async fn get_category(&self, id: CategoryId) -> Result<Category, Error>;

    async fn list_tags(&self) -> Result<Vec<Tag>, Error>;

    async fn get_tag(&self, id: TagId) -> Result<Tag, Error>;
}
