//! Post handlers, including the post like toggle and nested comments.
//!
//! ```text
//! GET    /api/v1/posts
//! POST   /api/v1/posts                {"title":"Hello","content":"...","category":1,"tags":[2]}
//! GET    /api/v1/posts/{id}
//! PUT    /api/v1/posts/{id}           {"title":"Hello","content":"..."}
//! PATCH  /api/v1/posts/{id}           {"category":null}
//! DELETE /api/v1/posts/{id}
//! POST   /api/v1/posts/{id}/like
//! GET    /api/v1/posts/{id}/comments
//! POST   /api/v1/posts/{id}/comments  {"content":"Nice"}
//! ```

use actix_web::{HttpResponse, delete, get, patch, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::ownership::Action;
use crate::domain::{
    Body, CategoryId, CommentDraft, LikeStatus, Post, PostChanges, PostDraft, PostId, PostTitle,
    TagId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::comments::{CommentResponse, ContentPayload};
use crate::inbound::http::session::Principal;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{double_option, map_content_error, missing_field_error};

/// Post as rendered to clients. `author` is the owner's username.
#[derive(Debug, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: i64,
    pub author: String,
    pub title: String,
    pub content: String,
    pub category: Option<i64>,
    pub tags: Vec<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub likes_count: u64,
}

impl From<Post> for PostResponse {
    fn from(post: Post) -> Self {
        Self {
            id: post.id.get(),
            author: post.author.username().to_string(),
            title: post.title,
            content: post.content,
            category: post.category.map(CategoryId::get),
            tags: post.tags.into_iter().map(TagId::get).collect(),
            created_at: post.created_at,
            updated_at: post.updated_at,
            likes_count: post.likes_count,
        }
    }
}

/// Body for `POST /posts`.
#[derive(Deserialize, Serialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub category: Option<i64>,
    #[serde(default)]
    pub tags: Vec<i64>,
}

impl TryFrom<CreatePostRequest> for PostDraft {
    type Error = crate::domain::Error;

    fn try_from(value: CreatePostRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            title: PostTitle::new(&value.title).map_err(map_content_error)?,
            content: Body::new(value.content).map_err(map_content_error)?,
            category: value.category.map(CategoryId::new),
            tags: value.tags.into_iter().map(TagId::new).collect(),
        })
    }
}

/// Body for `PUT` and `PATCH`. `category: null` clears the category.
#[derive(Default, Deserialize, Serialize)]
pub struct UpdatePostRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub category: Option<Option<i64>>,
    #[serde(default)]
    pub tags: Option<Vec<i64>>,
}

impl UpdatePostRequest {
    fn into_changes(self) -> ApiResult<PostChanges> {
        Ok(PostChanges {
            title: self
                .title
                .map(PostTitle::new)
                .transpose()
                .map_err(map_content_error)?,
            content: self
                .content
                .map(Body::new)
                .transpose()
                .map_err(map_content_error)?,
            category: self.category.map(|category| category.map(CategoryId::new)),
            tags: self
                .tags
                .map(|tags| tags.into_iter().map(TagId::new).collect()),
        })
    }
}

#[get("/posts")]
pub async fn list_posts(
    state: web::Data<HttpState>,
    _principal: Principal,
) -> ApiResult<web::Json<Vec<PostResponse>>> {
    let posts = state.posts_query.list_posts().await?;
    Ok(web::Json(posts.into_iter().map(PostResponse::from).collect()))
}

#[post("/posts")]
pub async fn create_post(
    state: web::Data<HttpState>,
    principal: Principal,
    payload: web::Json<CreatePostRequest>,
) -> ApiResult<HttpResponse> {
    let draft = PostDraft::try_from(payload.into_inner())?;
    let post = state.posts.create_post(principal.id(), draft).await?;
    Ok(HttpResponse::Created().json(PostResponse::from(post)))
}

#[get("/posts/{id}")]
pub async fn get_post(
    state: web::Data<HttpState>,
    _principal: Principal,
    path: web::Path<i64>,
) -> ApiResult<web::Json<PostResponse>> {
    let post = state.posts_query.get_post(PostId::new(path.into_inner())).await?;
    Ok(web::Json(PostResponse::from(post)))
}

/// Full update: `title` and `content` are required.
#[put("/posts/{id}")]
pub async fn replace_post(
    state: web::Data<HttpState>,
    principal: Principal,
    path: web::Path<i64>,
    payload: web::Json<UpdatePostRequest>,
) -> ApiResult<web::Json<PostResponse>> {
    let payload = payload.into_inner();
    if payload.title.is_none() {
        return Err(missing_field_error("title"));
    }
    if payload.content.is_none() {
        return Err(missing_field_error("content"));
    }
    let changes = payload.into_changes()?;
    let post = state
        .posts
        .update_post(
            principal.id(),
            PostId::new(path.into_inner()),
            changes,
            Action::Update,
        )
        .await?;
    Ok(web::Json(PostResponse::from(post)))
}

#[patch("/posts/{id}")]
pub async fn update_post(
    state: web::Data<HttpState>,
    principal: Principal,
    path: web::Path<i64>,
    payload: web::Json<UpdatePostRequest>,
) -> ApiResult<web::Json<PostResponse>> {
    let changes = payload.into_inner().into_changes()?;
    let post = state
        .posts
        .update_post(
            principal.id(),
            PostId::new(path.into_inner()),
            changes,
            Action::PartialUpdate,
        )
        .await?;
    Ok(web::Json(PostResponse::from(post)))
}

#[delete("/posts/{id}")]
pub async fn delete_post(
    state: web::Data<HttpState>,
    principal: Principal,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    state
        .posts
        .delete_post(principal.id(), PostId::new(path.into_inner()))
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Toggle the caller's like. A new like answers `201`, an unlike `200`.
#[post("/posts/{id}/like")]
pub async fn like_post(
    state: web::Data<HttpState>,
    principal: Principal,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let toggle = state
        .likes
        .toggle_post_like(principal.id(), PostId::new(path.into_inner()))
        .await?;
    let mut response = match toggle.status {
        LikeStatus::Liked => HttpResponse::Created(),
        LikeStatus::Unliked => HttpResponse::Ok(),
    };
    Ok(response.json(toggle))
}

#[get("/posts/{id}/comments")]
pub async fn list_post_comments(
    state: web::Data<HttpState>,
    _principal: Principal,
    path: web::Path<i64>,
) -> ApiResult<web::Json<Vec<CommentResponse>>> {
    let comments = state
        .comments_query
        .list_post_comments(PostId::new(path.into_inner()))
        .await?;
    Ok(web::Json(
        comments.into_iter().map(CommentResponse::from).collect(),
    ))
}

#[post("/posts/{id}/comments")]
pub async fn create_post_comment(
    state: web::Data<HttpState>,
    principal: Principal,
    path: web::Path<i64>,
    payload: web::Json<ContentPayload>,
) -> ApiResult<HttpResponse> {
    let post = state.posts_query.get_post(PostId::new(path.into_inner())).await?;
    let content = payload
        .into_inner()
        .content
        .ok_or_else(|| missing_field_error("content"))?;
    let draft = CommentDraft {
        post: post.id,
        content: Body::new(content).map_err(map_content_error)?,
    };
    let comment = state.comments.create_comment(principal.id(), draft).await?;
    Ok(HttpResponse::Created().json(CommentResponse::from(comment)))
}
