//! PostgreSQL-backed [`ProfileRepository`].
//!
//! Profiles are joined to `users` on read so the domain profile always carries
//! the owner's current username.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ProfileRepository, ProfileRepositoryError};
use crate::domain::{Profile, UserId, Username};

use super::diesel_user_repository::row_to_user;
use super::error_mapping::{DieselFailure, classify, pool_message};
use super::models::{NewProfileRow, ProfileRow};
use super::pool::DbPool;
use super::schema::{profiles, users};

/// Diesel adapter for profile storage.
#[derive(Clone)]
pub struct DieselProfileRepository {
    pool: DbPool,
}

impl DieselProfileRepository {
    /// Create a repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> ProfileRepositoryError {
    match classify(error) {
        DieselFailure::Connection(message) => ProfileRepositoryError::connection(message),
        DieselFailure::Query(message) => ProfileRepositoryError::query(message),
        DieselFailure::UniqueViolation | DieselFailure::ForeignKeyViolation { .. } => {
            ProfileRepositoryError::query("database error")
        }
    }
}

fn map_write_error(error: diesel::result::Error, owner: &UserId) -> ProfileRepositoryError {
    match classify(error) {
        DieselFailure::ForeignKeyViolation { .. } => {
            ProfileRepositoryError::unknown_user(owner.to_string())
        }
        DieselFailure::Connection(message) => ProfileRepositoryError::connection(message),
        DieselFailure::Query(message) => ProfileRepositoryError::query(message),
        DieselFailure::UniqueViolation => ProfileRepositoryError::query("database error"),
    }
}

fn to_profile((row, username): (ProfileRow, String)) -> Result<Profile, ProfileRepositoryError> {
    let owner = row_to_user(row.user_id, &username).map_err(ProfileRepositoryError::query)?;
    Ok(Profile {
        owner,
        bio: row.bio,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

#[async_trait]
impl ProfileRepository for DieselProfileRepository {
    async fn create_if_absent(
        &self,
        owner: &UserId,
        bio: &str,
    ) -> Result<bool, ProfileRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| ProfileRepositoryError::connection(pool_message(err)))?;
        let inserted = diesel::insert_into(profiles::table)
            .values(&NewProfileRow {
                user_id: *owner.as_uuid(),
                bio,
            })
            .on_conflict(profiles::user_id)
            .do_nothing()
            .execute(&mut conn)
            .await
            .map_err(|err| map_write_error(err, owner))?;
        Ok(inserted == 1)
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<Profile>, ProfileRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| ProfileRepositoryError::connection(pool_message(err)))?;
        let row = profiles::table
            .inner_join(users::table)
            .filter(users::username.eq(username.as_ref()))
            .select((ProfileRow::as_select(), users::username))
            .first::<(ProfileRow, String)>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(to_profile).transpose()
    }

    async fn list(&self) -> Result<Vec<Profile>, ProfileRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| ProfileRepositoryError::connection(pool_message(err)))?;
        let rows = profiles::table
            .inner_join(users::table)
            .order(users::username.asc())
            .select((ProfileRow::as_select(), users::username))
            .load::<(ProfileRow, String)>(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(to_profile).collect()
    }

    async fn update_bio(
        &self,
        owner: &UserId,
        bio: &str,
    ) -> Result<Option<Profile>, ProfileRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| ProfileRepositoryError::connection(pool_message(err)))?;
        let updated = diesel::update(profiles::table.find(*owner.as_uuid()))
            .set((
                profiles::bio.eq(bio),
                profiles::updated_at.eq(diesel::dsl::now),
            ))
            .execute(&mut conn)
            .await
            .map_err(|err| map_write_error(err, owner))?;
        if updated == 0 {
            return Ok(None);
        }

        let row = profiles::table
            .inner_join(users::table)
            .filter(profiles::user_id.eq(*owner.as_uuid()))
            .select((ProfileRow::as_select(), users::username))
            .first::<(ProfileRow, String)>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(to_profile).transpose()
    }
}
