//! PostgreSQL-backed [`UserRepository`].

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{StoredAccount, UserPersistenceError, UserRepository};
use crate::domain::{User, UserId, Username};

use super::error_mapping::{DieselFailure, classify, pool_message};
use super::models::{NewUserRow, UserRow};
use super::pool::DbPool;
use super::schema::users;

/// Diesel adapter for account storage.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_diesel_error(error: diesel::result::Error, username: &str) -> UserPersistenceError {
    match classify(error) {
        DieselFailure::Connection(message) => UserPersistenceError::connection(message),
        DieselFailure::UniqueViolation => UserPersistenceError::duplicate_username(username),
        DieselFailure::Query(message) => UserPersistenceError::query(message),
        DieselFailure::ForeignKeyViolation { .. } => UserPersistenceError::query("database error"),
    }
}

fn map_read_error(error: diesel::result::Error) -> UserPersistenceError {
    map_diesel_error(error, "")
}

pub(crate) fn row_to_user(id: uuid::Uuid, username: &str) -> Result<User, String> {
    let username = Username::new(username).map_err(|err| format!("stored username: {err}"))?;
    Ok(User::new(UserId::from_uuid(id), username))
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, user: &User, password_hash: &str) -> Result<(), UserPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| UserPersistenceError::connection(pool_message(err)))?;
        let row = NewUserRow {
            id: *user.id().as_uuid(),
            username: user.username().as_ref(),
            password_hash,
        };
        diesel::insert_into(users::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, user.username().as_ref()))?;
        Ok(())
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<StoredAccount>, UserPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| UserPersistenceError::connection(pool_message(err)))?;
        let row = users::table
            .filter(users::username.eq(username))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_read_error)?;

        row.map(|row| {
            let user = row_to_user(row.id, &row.username).map_err(UserPersistenceError::query)?;
            Ok(StoredAccount {
                user,
                password_hash: row.password_hash,
            })
        })
        .transpose()
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| UserPersistenceError::connection(pool_message(err)))?;
        let row = users::table
            .find(*id.as_uuid())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_read_error)?;

        row.map(|row| row_to_user(row.id, &row.username).map_err(UserPersistenceError::query))
            .transpose()
    }
}
