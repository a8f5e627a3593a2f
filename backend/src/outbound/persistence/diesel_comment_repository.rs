//! PostgreSQL-backed [`CommentRepository`].

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::domain::ports::{CommentRepository, CommentRepositoryError};
use crate::domain::{Comment, CommentChanges, CommentDraft, CommentId, PostId, UserId};

use super::diesel_user_repository::row_to_user;
use super::error_mapping::{DieselFailure, classify, pool_message, to_count};
use super::models::{CommentRow, NewCommentRow};
use super::pool::DbPool;
use super::schema::{comment_likes, comments, users};

/// Diesel adapter for comments.
#[derive(Clone)]
pub struct DieselCommentRepository {
    pool: DbPool,
}

impl DieselCommentRepository {
    /// Create a repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> CommentRepositoryError {
    match classify(error) {
        DieselFailure::Connection(message) => CommentRepositoryError::connection(message),
        DieselFailure::Query(message) => CommentRepositoryError::query(message),
        DieselFailure::UniqueViolation | DieselFailure::ForeignKeyViolation { .. } => {
            CommentRepositoryError::query("database error")
        }
    }
}

fn map_insert_error(error: diesel::result::Error, post: PostId) -> CommentRepositoryError {
    match classify(error) {
        DieselFailure::ForeignKeyViolation { constraint }
            if constraint.as_deref() != Some("comments_author_id_fkey") =>
        {
            CommentRepositoryError::unknown_post(post.get())
        }
        DieselFailure::Connection(message) => CommentRepositoryError::connection(message),
        DieselFailure::Query(message) => CommentRepositoryError::query(message),
        DieselFailure::UniqueViolation | DieselFailure::ForeignKeyViolation { .. } => {
            CommentRepositoryError::query("database error")
        }
    }
}

type CommentWithAuthor = (CommentRow, String);

async fn hydrate(
    conn: &mut AsyncPgConnection,
    rows: Vec<CommentWithAuthor>,
) -> Result<Vec<Comment>, CommentRepositoryError> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<i64> = rows.iter().map(|(row, _)| row.id).collect();
    let likes: HashMap<i64, u64> = comment_likes::table
        .filter(comment_likes::comment_id.eq_any(&ids))
        .group_by(comment_likes::comment_id)
        .select((comment_likes::comment_id, count_star()))
        .load::<(i64, i64)>(conn)
        .await
        .map_err(map_diesel_error)?
        .into_iter()
        .map(|(comment_id, count)| (comment_id, to_count(count)))
        .collect();

    rows.into_iter()
        .map(|(row, username)| {
            let author =
                row_to_user(row.author_id, &username).map_err(CommentRepositoryError::query)?;
            Ok(Comment {
                id: CommentId::new(row.id),
                post: PostId::new(row.post_id),
                author,
                content: row.content,
                created_at: row.created_at,
                updated_at: row.updated_at,
                likes_count: likes.get(&row.id).copied().unwrap_or_default(),
            })
        })
        .collect()
}

async fn load_one(
    conn: &mut AsyncPgConnection,
    id: CommentId,
) -> Result<Option<Comment>, CommentRepositoryError> {
    let rows: Vec<CommentWithAuthor> = comments::table
        .inner_join(users::table)
        .filter(comments::id.eq(id.get()))
        .select((CommentRow::as_select(), users::username))
        .load(conn)
        .await
        .map_err(map_diesel_error)?;
    Ok(hydrate(conn, rows).await?.into_iter().next())
}

async fn load_many(
    conn: &mut AsyncPgConnection,
    post: Option<PostId>,
) -> Result<Vec<Comment>, CommentRepositoryError> {
    let mut query = comments::table
        .inner_join(users::table)
        .order((comments::created_at.desc(), comments::id.desc()))
        .select((CommentRow::as_select(), users::username))
        .into_boxed();
    if let Some(post) = post {
        query = query.filter(comments::post_id.eq(post.get()));
    }
    let rows: Vec<CommentWithAuthor> = query.load(conn).await.map_err(map_diesel_error)?;
    hydrate(conn, rows).await
}

#[async_trait]
impl CommentRepository for DieselCommentRepository {
    async fn create(
        &self,
        author: &UserId,
        draft: &CommentDraft,
    ) -> Result<Comment, CommentRepositoryError> {
        let mut pooled = self
            .pool
            .get()
            .await
            .map_err(|err| CommentRepositoryError::connection(pool_message(err)))?;
        let conn: &mut AsyncPgConnection = &mut pooled;
        let comment_id: i64 = diesel::insert_into(comments::table)
            .values(&NewCommentRow {
                post_id: draft.post.get(),
                author_id: *author.as_uuid(),
                content: draft.content.as_str(),
            })
            .returning(comments::id)
            .get_result(conn)
            .await
            .map_err(|err| map_insert_error(err, draft.post))?;

        load_one(conn, CommentId::new(comment_id))
            .await?
            .ok_or_else(|| CommentRepositoryError::query("inserted comment vanished"))
    }

    async fn find(&self, id: CommentId) -> Result<Option<Comment>, CommentRepositoryError> {
        let mut pooled = self
            .pool
            .get()
            .await
            .map_err(|err| CommentRepositoryError::connection(pool_message(err)))?;
        load_one(&mut pooled, id).await
    }

    async fn list(&self) -> Result<Vec<Comment>, CommentRepositoryError> {
        let mut pooled = self
            .pool
            .get()
            .await
            .map_err(|err| CommentRepositoryError::connection(pool_message(err)))?;
        load_many(&mut pooled, None).await
    }

    async fn list_for_post(&self, post: PostId) -> Result<Vec<Comment>, CommentRepositoryError> {
        let mut pooled = self
            .pool
            .get()
            .await
            .map_err(|err| CommentRepositoryError::connection(pool_message(err)))?;
        load_many(&mut pooled, Some(post)).await
    }

    async fn update(
        &self,
        id: CommentId,
        changes: &CommentChanges,
    ) -> Result<Option<Comment>, CommentRepositoryError> {
        let mut pooled = self
            .pool
            .get()
            .await
            .map_err(|err| CommentRepositoryError::connection(pool_message(err)))?;
        let conn: &mut AsyncPgConnection = &mut pooled;
        let target = comments::table.find(id.get());
        let updated = match &changes.content {
            Some(content) => diesel::update(target)
                .set((
                    comments::content.eq(content.as_str()),
                    comments::updated_at.eq(diesel::dsl::now),
                ))
                .execute(conn)
                .await,
            None => diesel::update(target)
                .set(comments::updated_at.eq(diesel::dsl::now))
                .execute(conn)
                .await,
        }
        .map_err(map_diesel_error)?;

        if updated == 0 {
            return Ok(None);
        }
        load_one(conn, id).await
    }

    async fn delete(&self, id: CommentId) -> Result<bool, CommentRepositoryError> {
        let mut pooled = self
            .pool
            .get()
            .await
            .map_err(|err| CommentRepositoryError::connection(pool_message(err)))?;
        let deleted = diesel::delete(comments::table.find(id.get()))
            .execute(&mut pooled)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}
