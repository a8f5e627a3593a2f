//! Category and tag lookups.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{TaxonomyQuery, TaxonomyRepository, TaxonomyRepositoryError};
use crate::domain::{Category, CategoryId, Error, Tag, TagId};

pub(crate) fn map_taxonomy_error(error: TaxonomyRepositoryError) -> Error {
    match error {
        TaxonomyRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("taxonomy repository unavailable: {message}"))
        }
        TaxonomyRepositoryError::Query { message } => {
            Error::internal(format!("taxonomy repository error: {message}"))
        }
    }
}

/// Taxonomy service implementing [`TaxonomyQuery`].
#[derive(Clone)]
pub struct TaxonomyService<R> {
    repo: Arc<R>,
}

impl<R> TaxonomyService<R> {
    /// Read categories and tags from `repo`.
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl<R> TaxonomyQuery for TaxonomyService<R>
where
    R: TaxonomyRepository,
{
    async fn list_categories(&self) -> Result<Vec<Category>, Error> {
        self.repo.list_categories().await.map_err(map_taxonomy_error)
    }

    async fn get_category(&self, id: CategoryId) -> Result<Category, Error> {
        self.repo
            .find_category(id)
            .await
            .map_err(map_taxonomy_error)?
            .ok_or_else(|| Error::not_found(format!("category {id} not found")))
    }

    async fn list_tags(&self) -> Result<Vec<Tag>, Error> {
        self.repo.list_tags().await.map_err(map_taxonomy_error)
    }

    async fn get_tag(&self, id: TagId) -> Result<Tag, Error> {
        self.repo
            .find_tag(id)
            .await
            .map_err(map_taxonomy_error)?
            .ok_or_else(|| Error::not_found(format!("tag {id} not found")))
    }
}
