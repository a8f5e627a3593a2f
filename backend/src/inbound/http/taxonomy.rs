//! Read-only category and tag handlers.
//!
//! ```text
//! GET /api/v1/categories
//! GET /api/v1/categories/{id}
//! GET /api/v1/tags
//! GET /api/v1/tags/{id}
//! ```

use actix_web::{get, web};

use crate::domain::{Category, CategoryId, Tag, TagId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::Principal;
use crate::inbound::http::state::HttpState;

#[get("/categories")]
pub async fn list_categories(
    state: web::Data<HttpState>,
    _principal: Principal,
) -> ApiResult<web::Json<Vec<Category>>> {
    Ok(web::Json(state.taxonomy.list_categories().await?))
}

#[get("/categories/{id}")]
pub async fn get_category(
    state: web::Data<HttpState>,
    _principal: Principal,
    path: web::Path<i64>,
) -> ApiResult<web::Json<Category>> {
    let category = state
        .taxonomy
        .get_category(CategoryId::new(path.into_inner()))
        .await?;
    Ok(web::Json(category))
}

#[get("/tags")]
pub async fn list_tags(
    state: web::Data<HttpState>,
    _principal: Principal,
) -> ApiResult<web::Json<Vec<Tag>>> {
    Ok(web::Json(state.taxonomy.list_tags().await?))
}

#[get("/tags/{id}")]
pub async fn get_tag(
    state: web::Data<HttpState>,
    _principal: Principal,
    path: web::Path<i64>,
) -> ApiResult<web::Json<Tag>> {
    let tag = state.taxonomy.get_tag(TagId::new(path.into_inner())).await?;
    Ok(web::Json(tag))
}
