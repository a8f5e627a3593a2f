//! Read-only port for categories and tags.

use async_trait::async_trait;

use crate::domain::{Category, CategoryId, Tag, TagId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by taxonomy repository adapters.
    pub enum TaxonomyRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "taxonomy repository connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } => "taxonomy repository query failed: {message}",
    }
}

/// Category and tag lookup. Lists are ordered by name.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaxonomyRepository: Send + Sync {
    async fn list_categories(&self) -> Result<Vec<Category>, TaxonomyRepositoryError>;

    async fn find_category(
        &self,
        id: CategoryId,
    ) -> Result<Option<Category>, TaxonomyRepositoryError>;

    async fn list_tags(&self) -> Result<Vec<Tag>, TaxonomyRepositoryError>;

    async fn find_tag(&self, id: TagId) -> Result<Option<Tag>, TaxonomyRepositoryError>;
}
