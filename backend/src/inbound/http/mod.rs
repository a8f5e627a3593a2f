//! HTTP inbound adapter exposing the REST endpoints under `/api/v1`.

pub mod accounts;
pub mod comments;
pub mod error;
pub mod health;
pub mod posts;
pub mod profiles;
pub mod session;
pub mod session_config;
pub mod state;
pub mod taxonomy;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

pub use error::ApiResult;

use actix_web::web;

/// Register every `/api/v1` handler on `cfg`.
///
/// The caller mounts this inside a scope wrapped with the session middleware.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use backend::inbound::http::configure_api;
///
/// let app = App::new().service(web::scope("/api/v1").configure(configure_api));
/// ```
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(accounts::register)
        .service(accounts::login)
        .service(accounts::logout)
        .service(accounts::current_user)
        .service(posts::list_posts)
        .service(posts::create_post)
        .service(posts::get_post)
        .service(posts::replace_post)
        .service(posts::update_post)
        .service(posts::delete_post)
        .service(posts::like_post)
        .service(posts::list_post_comments)
        .service(posts::create_post_comment)
        .service(comments::list_comments)
        .service(comments::create_comment)
        .service(comments::get_comment)
        .service(comments::replace_comment)
        .service(comments::update_comment)
        .service(comments::delete_comment)
        .service(comments::like_comment)
        .service(profiles::list_profiles)
        .service(profiles::get_profile)
        .service(profiles::replace_profile)
        .service(profiles::update_profile)
        .service(taxonomy::list_categories)
        .service(taxonomy::get_category)
        .service(taxonomy::list_tags)
        .service(taxonomy::get_tag);
}
