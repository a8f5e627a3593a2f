//! PostgreSQL-backed [`TaxonomyRepository`] over the `categories` and `tags`
//! lookup tables.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{TaxonomyRepository, TaxonomyRepositoryError};
use crate::domain::{Category, CategoryId, Tag, TagId};

use super::error_mapping::{DieselFailure, classify, pool_message};
use super::models::{CategoryRow, TagRow};
use super::pool::DbPool;
use super::schema::{categories, tags};

/// Diesel adapter for categories and tags.
#[derive(Clone)]
pub struct DieselTaxonomyRepository {
    pool: DbPool,
}

impl DieselTaxonomyRepository {
    /// Create a repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> TaxonomyRepositoryError {
    match classify(error) {
        DieselFailure::Connection(message) => TaxonomyRepositoryError::connection(message),
        DieselFailure::Query(message) => TaxonomyRepositoryError::query(message),
        DieselFailure::UniqueViolation | DieselFailure::ForeignKeyViolation { .. } => {
            TaxonomyRepositoryError::query("database error")
        }
    }
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: CategoryId::new(row.id),
            name: row.name,
            slug: row.slug,
        }
    }
}

impl From<TagRow> for Tag {
    fn from(row: TagRow) -> Self {
        Self {
            id: TagId::new(row.id),
            name: row.name,
            slug: row.slug,
        }
    }
}

#[async_trait]
impl TaxonomyRepository for DieselTaxonomyRepository {
    async fn list_categories(&self) -> Result<Vec<Category>, TaxonomyRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| TaxonomyRepositoryError::connection(pool_message(err)))?;
        let rows = categories::table
            .order(categories::name.asc())
            .select(CategoryRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Category::from).collect())
    }

    async fn find_category(
        &self,
        id: CategoryId,
    ) -> Result<Option<Category>, TaxonomyRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| TaxonomyRepositoryError::connection(pool_message(err)))?;
        let row = categories::table
            .find(id.get())
            .select(CategoryRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Category::from))
    }

    async fn list_tags(&self) -> Result<Vec<Tag>, TaxonomyRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| TaxonomyRepositoryError::connection(pool_message(err)))?;
        let rows = tags::table
            .order(tags::name.asc())
            .select(TagRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Tag::from).collect())
    }

    async fn find_tag(&self, id: TagId) -> Result<Option<Tag>, TaxonomyRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| TaxonomyRepositoryError::connection(pool_message(err)))?;
        let row = tags::table
            .find(id.get())
            .select(TagRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Tag::from))
    }
}
