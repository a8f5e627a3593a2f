//! Comment handlers and the comment like toggle.
//!
//! ```text
//! GET    /api/v1/comments
//! POST   /api/v1/comments          {"post":1,"content":"Nice"}
//! GET    /api/v1/comments/{id}
//! PUT    /api/v1/comments/{id}     {"content":"Edited"}
//! PATCH  /api/v1/comments/{id}     {"content":"Edited"}
//! DELETE /api/v1/comments/{id}
//! POST   /api/v1/comments/{id}/like
//! ```

use actix_web::{HttpResponse, delete, get, patch, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::ownership::Action;
use crate::domain::{Body, Comment, CommentChanges, CommentDraft, CommentId, LikeToggle, PostId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::Principal;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{map_content_error, missing_field_error};

/// Comment as rendered to clients. `author` is the owner's id.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommentResponse {
    pub id: i64,
    pub post: i64,
    pub author: String,
    pub author_username: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub likes_count: u64,
}

impl From<Comment> for CommentResponse {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id.get(),
            post: comment.post.get(),
            author: comment.author.id().to_string(),
            author_username: comment.author.username().to_string(),
            content: comment.content,
            created_at: comment.created_at,
            updated_at: comment.updated_at,
            likes_count: comment.likes_count,
        }
    }
}

/// Body carrying only comment text.
#[derive(Default, Deserialize, Serialize)]
pub struct ContentPayload {
    #[serde(default)]
    pub content: Option<String>,
}

/// Body for `POST /comments`.
#[derive(Deserialize, Serialize)]
pub struct CreateCommentRequest {
    #[serde(default)]
    pub post: Option<i64>,
    #[serde(default)]
    pub content: Option<String>,
}

impl TryFrom<CreateCommentRequest> for CommentDraft {
    type Error = crate::domain::Error;

    fn try_from(value: CreateCommentRequest) -> Result<Self, Self::Error> {
        let post = value.post.ok_or_else(|| missing_field_error("post"))?;
        let content = value.content.ok_or_else(|| missing_field_error("content"))?;
        Ok(Self {
            post: PostId::new(post),
            content: Body::new(content).map_err(map_content_error)?,
        })
    }
}

fn changes_from(payload: ContentPayload, require_content: bool) -> ApiResult<CommentChanges> {
    if require_content && payload.content.is_none() {
        return Err(missing_field_error("content"));
    }
    let content = payload
        .content
        .map(Body::new)
        .transpose()
        .map_err(map_content_error)?;
    Ok(CommentChanges { content })
}

#[get("/comments")]
pub async fn list_comments(
    state: web::Data<HttpState>,
    _principal: Principal,
) -> ApiResult<web::Json<Vec<CommentResponse>>> {
    let comments = state.comments_query.list_comments().await?;
    Ok(web::Json(
        comments.into_iter().map(CommentResponse::from).collect(),
    ))
}

/// Create a comment. An unknown post is a `400`, not a `404`.
#[post("/comments")]
pub async fn create_comment(
    state: web::Data<HttpState>,
    principal: Principal,
    payload: web::Json<CreateCommentRequest>,
) -> ApiResult<HttpResponse> {
    let draft = CommentDraft::try_from(payload.into_inner())?;
    let comment = state.comments.create_comment(principal.id(), draft).await?;
    Ok(HttpResponse::Created().json(CommentResponse::from(comment)))
}

#[get("/comments/{id}")]
pub async fn get_comment(
    state: web::Data<HttpState>,
    _principal: Principal,
    path: web::Path<i64>,
) -> ApiResult<web::Json<CommentResponse>> {
    let comment = state
        .comments_query
        .get_comment(CommentId::new(path.into_inner()))
        .await?;
    Ok(web::Json(CommentResponse::from(comment)))
}

#[put("/comments/{id}")]
pub async fn replace_comment(
    state: web::Data<HttpState>,
    principal: Principal,
    path: web::Path<i64>,
    payload: web::Json<ContentPayload>,
) -> ApiResult<web::Json<CommentResponse>> {
    let changes = changes_from(payload.into_inner(), true)?;
    let comment = state
        .comments
        .update_comment(
            principal.id(),
            CommentId::new(path.into_inner()),
            changes,
            Action::Update,
        )
        .await?;
    Ok(web::Json(CommentResponse::from(comment)))
}

#[patch("/comments/{id}")]
pub async fn update_comment(
    state: web::Data<HttpState>,
    principal: Principal,
    path: web::Path<i64>,
    payload: web::Json<ContentPayload>,
) -> ApiResult<web::Json<CommentResponse>> {
    let changes = changes_from(payload.into_inner(), false)?;
    let comment = state
        .comments
        .update_comment(
            principal.id(),
            CommentId::new(path.into_inner()),
            changes,
            Action::PartialUpdate,
        )
        .await?;
    Ok(web::Json(CommentResponse::from(comment)))
}

#[delete("/comments/{id}")]
pub async fn delete_comment(
    state: web::Data<HttpState>,
    principal: Principal,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    state
        .comments
        .delete_comment(principal.id(), CommentId::new(path.into_inner()))
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Toggle the caller's like. Always `200`, whichever way it flips.
#[post("/comments/{id}/like")]
pub async fn like_comment(
    state: web::Data<HttpState>,
    principal: Principal,
    path: web::Path<i64>,
) -> ApiResult<web::Json<LikeToggle>> {
    let toggle = state
        .likes
        .toggle_comment_like(principal.id(), CommentId::new(path.into_inner()))
        .await?;
    Ok(web::Json(toggle))
}
