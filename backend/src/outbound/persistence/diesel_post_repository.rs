//! PostgreSQL-backed [`PostRepository`].
//!
//! A post spans three tables: the `posts` row, its `post_tags` links and the
//! `post_likes` it has collected. Writes touching more than one table run in a
//! transaction; reads hydrate a page of rows with one query per side table.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};

use crate::domain::ports::{PostRepository, PostRepositoryError};
use crate::domain::{CategoryId, Post, PostChanges, PostDraft, PostId, TagId, UserId};

use super::diesel_user_repository::row_to_user;
use super::error_mapping::{DieselFailure, classify, pool_message, to_count};
use super::models::{NewPostRow, NewPostTagRow, PostRow, PostUpdate};
use super::pool::DbPool;
use super::schema::{post_likes, post_tags, posts, users};

/// Diesel adapter for blog posts.
#[derive(Clone)]
pub struct DieselPostRepository {
    pool: DbPool,
}

impl DieselPostRepository {
    /// Create a repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> PostRepositoryError {
    match classify(error) {
        DieselFailure::Connection(message) => PostRepositoryError::connection(message),
        DieselFailure::ForeignKeyViolation { constraint } => PostRepositoryError::unknown_reference(
            constraint.unwrap_or_else(|| "referenced record".to_owned()),
        ),
        DieselFailure::Query(message) => PostRepositoryError::query(message),
        DieselFailure::UniqueViolation => PostRepositoryError::query("database error"),
    }
}

type PostWithAuthor = (PostRow, String);

async fn replace_tags(
    conn: &mut AsyncPgConnection,
    post_id: i64,
    tags: &[TagId],
) -> QueryResult<()> {
    diesel::delete(post_tags::table.filter(post_tags::post_id.eq(post_id)))
        .execute(conn)
        .await?;
    if tags.is_empty() {
        return Ok(());
    }
    let rows: Vec<NewPostTagRow> = tags
        .iter()
        .map(|tag| NewPostTagRow {
            post_id,
            tag_id: tag.get(),
        })
        .collect();
    diesel::insert_into(post_tags::table)
        .values(&rows)
        .on_conflict_do_nothing()
        .execute(conn)
        .await?;
    Ok(())
}

async fn hydrate(
    conn: &mut AsyncPgConnection,
    rows: Vec<PostWithAuthor>,
) -> Result<Vec<Post>, PostRepositoryError> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<i64> = rows.iter().map(|(row, _)| row.id).collect();

    let tag_links: Vec<(i64, i64)> = post_tags::table
        .filter(post_tags::post_id.eq_any(&ids))
        .order((post_tags::post_id.asc(), post_tags::tag_id.asc()))
        .select((post_tags::post_id, post_tags::tag_id))
        .load(conn)
        .await
        .map_err(map_diesel_error)?;
    let like_counts: Vec<(i64, i64)> = post_likes::table
        .filter(post_likes::post_id.eq_any(&ids))
        .group_by(post_likes::post_id)
        .select((post_likes::post_id, count_star()))
        .load(conn)
        .await
        .map_err(map_diesel_error)?;

    let mut tags: HashMap<i64, Vec<TagId>> = HashMap::new();
    for (post_id, tag_id) in tag_links {
        tags.entry(post_id).or_default().push(TagId::new(tag_id));
    }
    let likes: HashMap<i64, u64> = like_counts
        .into_iter()
        .map(|(post_id, count)| (post_id, to_count(count)))
        .collect();

    rows.into_iter()
        .map(|(row, username)| {
            let author =
                row_to_user(row.author_id, &username).map_err(PostRepositoryError::query)?;
            Ok(Post {
                id: PostId::new(row.id),
                author,
                title: row.title,
                content: row.content,
                category: row.category_id.map(CategoryId::new),
                tags: tags.remove(&row.id).unwrap_or_default(),
                created_at: row.created_at,
                updated_at: row.updated_at,
                likes_count: likes.get(&row.id).copied().unwrap_or_default(),
            })
        })
        .collect()
}

async fn load_one(
    conn: &mut AsyncPgConnection,
    id: PostId,
) -> Result<Option<Post>, PostRepositoryError> {
    let rows: Vec<PostWithAuthor> = posts::table
        .inner_join(users::table)
        .filter(posts::id.eq(id.get()))
        .select((PostRow::as_select(), users::username))
        .load(conn)
        .await
        .map_err(map_diesel_error)?;
    Ok(hydrate(conn, rows).await?.into_iter().next())
}

#[async_trait]
impl PostRepository for DieselPostRepository {
    async fn create(
        &self,
        author: &UserId,
        draft: &PostDraft,
    ) -> Result<Post, PostRepositoryError> {
        let mut pooled = self
            .pool
            .get()
            .await
            .map_err(|err| PostRepositoryError::connection(pool_message(err)))?;
        let conn: &mut AsyncPgConnection = &mut pooled;
        let row = NewPostRow {
            author_id: *author.as_uuid(),
            title: draft.title.as_str(),
            content: draft.content.as_str(),
            category_id: draft.category.map(CategoryId::get),
        };

        let post_id = conn
            .transaction::<_, diesel::result::Error, _>(|conn| {
                async move {
                    let post_id: i64 = diesel::insert_into(posts::table)
                        .values(&row)
                        .returning(posts::id)
                        .get_result(conn)
                        .await?;
                    replace_tags(conn, post_id, &draft.tags).await?;
                    Ok(post_id)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        load_one(conn, PostId::new(post_id))
            .await?
            .ok_or_else(|| PostRepositoryError::query("inserted post vanished"))
    }

    async fn find(&self, id: PostId) -> Result<Option<Post>, PostRepositoryError> {
        let mut pooled = self
            .pool
            .get()
            .await
            .map_err(|err| PostRepositoryError::connection(pool_message(err)))?;
        load_one(&mut pooled, id).await
    }

    async fn list(&self) -> Result<Vec<Post>, PostRepositoryError> {
        let mut pooled = self
            .pool
            .get()
            .await
            .map_err(|err| PostRepositoryError::connection(pool_message(err)))?;
        let conn: &mut AsyncPgConnection = &mut pooled;
        let rows: Vec<PostWithAuthor> = posts::table
            .inner_join(users::table)
            .order((posts::created_at.desc(), posts::id.desc()))
            .select((PostRow::as_select(), users::username))
            .load(conn)
            .await
            .map_err(map_diesel_error)?;
        hydrate(conn, rows).await
    }

    async fn update(
        &self,
        id: PostId,
        changes: &PostChanges,
    ) -> Result<Option<Post>, PostRepositoryError> {
        let mut pooled = self
            .pool
            .get()
            .await
            .map_err(|err| PostRepositoryError::connection(pool_message(err)))?;
        let conn: &mut AsyncPgConnection = &mut pooled;
        let changeset = PostUpdate {
            title: changes.title.as_ref().map(|title| title.as_str()),
            content: changes.content.as_ref().map(|content| content.as_str()),
            category_id: changes
                .category
                .map(|category| category.map(CategoryId::get)),
        };

        let found = conn
            .transaction::<_, diesel::result::Error, _>(|conn| {
                async move {
                    let updated = diesel::update(posts::table.find(id.get()))
                        .set((&changeset, posts::updated_at.eq(diesel::dsl::now)))
                        .execute(conn)
                        .await?;
                    if updated == 0 {
                        return Ok(false);
                    }
                    if let Some(tags) = &changes.tags {
                        replace_tags(conn, id.get(), tags).await?;
                    }
                    Ok(true)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        if !found {
            return Ok(None);
        }
        load_one(conn, id).await
    }

    async fn delete(&self, id: PostId) -> Result<bool, PostRepositoryError> {
        let mut pooled = self
            .pool
            .get()
            .await
            .map_err(|err| PostRepositoryError::connection(pool_message(err)))?;
        let deleted = diesel::delete(posts::table.find(id.get()))
            .execute(&mut pooled)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}
