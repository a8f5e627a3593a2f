//! PostgreSQL-backed [`LikeRepository`].
//!
//! The composite primary keys on `post_likes` and `comment_likes` carry the
//! one-like-per-pair guarantee. Inserts use `ON CONFLICT DO NOTHING`, so a
//! concurrent duplicate shows up as zero affected rows rather than an error.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{LikeRepository, LikeRepositoryError};
use crate::domain::{LikeTarget, UserId};

use super::error_mapping::{DieselFailure, classify, pool_message, to_count};
use super::models::{NewCommentLikeRow, NewPostLikeRow};
use super::pool::DbPool;
use super::schema::{comment_likes, post_likes};

/// Diesel adapter for like relations.
#[derive(Clone)]
pub struct DieselLikeRepository {
    pool: DbPool,
}

impl DieselLikeRepository {
    /// Create a repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> LikeRepositoryError {
    match classify(error) {
        DieselFailure::Connection(message) => LikeRepositoryError::connection(message),
        DieselFailure::Query(message) => LikeRepositoryError::query(message),
        DieselFailure::UniqueViolation => LikeRepositoryError::conflict(),
        DieselFailure::ForeignKeyViolation { .. } => LikeRepositoryError::missing_target(),
    }
}

#[async_trait]
impl LikeRepository for DieselLikeRepository {
    async fn create_if_absent(
        &self,
        user_id: &UserId,
        target: LikeTarget,
    ) -> Result<bool, LikeRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| LikeRepositoryError::connection(pool_message(err)))?;
        let user = *user_id.as_uuid();
        let inserted = match target {
            LikeTarget::Post(post) => {
                diesel::insert_into(post_likes::table)
                    .values(&NewPostLikeRow {
                        user_id: user,
                        post_id: post.get(),
                    })
                    .on_conflict_do_nothing()
                    .execute(&mut conn)
                    .await
            }
            LikeTarget::Comment(comment) => {
                diesel::insert_into(comment_likes::table)
                    .values(&NewCommentLikeRow {
                        user_id: user,
                        comment_id: comment.get(),
                    })
                    .on_conflict_do_nothing()
                    .execute(&mut conn)
                    .await
            }
        }
        .map_err(map_diesel_error)?;
        Ok(inserted == 1)
    }

    async fn delete(
        &self,
        user_id: &UserId,
        target: LikeTarget,
    ) -> Result<bool, LikeRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| LikeRepositoryError::connection(pool_message(err)))?;
        let user = *user_id.as_uuid();
        let deleted = match target {
            LikeTarget::Post(post) => {
                diesel::delete(post_likes::table.find((user, post.get())))
                    .execute(&mut conn)
                    .await
            }
            LikeTarget::Comment(comment) => {
                diesel::delete(comment_likes::table.find((user, comment.get())))
                    .execute(&mut conn)
                    .await
            }
        }
        .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }

    async fn count(&self, target: LikeTarget) -> Result<u64, LikeRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| LikeRepositoryError::connection(pool_message(err)))?;
        let raw: i64 = match target {
            LikeTarget::Post(post) => {
                post_likes::table
                    .filter(post_likes::post_id.eq(post.get()))
                    .count()
                    .get_result(&mut conn)
                    .await
            }
            LikeTarget::Comment(comment) => {
                comment_likes::table
                    .filter(comment_likes::comment_id.eq(comment.get()))
                    .count()
                    .get_result(&mut conn)
                    .await
            }
        }
        .map_err(map_diesel_error)?;
        Ok(to_count(raw))
    }
}
