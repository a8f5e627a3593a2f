//! Profile handlers.
//!
//! ```text
//! GET   /api/v1/profiles
//! GET   /api/v1/profiles/{username}
//! PUT   /api/v1/profiles/{username}  {"bio":"Rustacean"}
//! PATCH /api/v1/profiles/{username}  {"bio":"Rustacean"}
//! ```

use actix_web::{get, patch, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::ownership::Action;
use crate::domain::{Error, Profile, ProfileChanges, Username};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::Principal;
use crate::inbound::http::state::HttpState;

#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub username: String,
    pub bio: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Profile> for ProfileResponse {
    fn from(profile: Profile) -> Self {
        Self {
            username: profile.owner.username().to_string(),
            bio: profile.bio,
            created_at: profile.created_at,
            updated_at: profile.updated_at,
        }
    }
}

/// Body for profile edits. Both verbs treat every field as optional.
#[derive(Default, Deserialize, Serialize)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub bio: Option<String>,
}

/// A name that fails validation cannot belong to any account.
fn parse_username(raw: &str) -> ApiResult<Username> {
    Username::new(raw).map_err(|_| Error::not_found(format!("profile {raw} not found")))
}

async fn apply_update(
    state: &HttpState,
    principal: &Principal,
    raw: &str,
    payload: UpdateProfileRequest,
    action: Action,
) -> ApiResult<web::Json<ProfileResponse>> {
    let username = parse_username(raw)?;
    let changes = ProfileChanges { bio: payload.bio };
    let profile = state
        .profiles
        .update_profile(principal.id(), &username, changes, action)
        .await?;
    Ok(web::Json(ProfileResponse::from(profile)))
}

#[get("/profiles")]
pub async fn list_profiles(
    state: web::Data<HttpState>,
    _principal: Principal,
) -> ApiResult<web::Json<Vec<ProfileResponse>>> {
    let profiles = state.profiles_query.list_profiles().await?;
    Ok(web::Json(
        profiles.into_iter().map(ProfileResponse::from).collect(),
    ))
}

#[get("/profiles/{username}")]
pub async fn get_profile(
    state: web::Data<HttpState>,
    _principal: Principal,
    path: web::Path<String>,
) -> ApiResult<web::Json<ProfileResponse>> {
    let username = parse_username(&path)?;
    let profile = state.profiles_query.get_profile(&username).await?;
    Ok(web::Json(ProfileResponse::from(profile)))
}

#[put("/profiles/{username}")]
pub async fn replace_profile(
    state: web::Data<HttpState>,
    principal: Principal,
    path: web::Path<String>,
    payload: web::Json<UpdateProfileRequest>,
) -> ApiResult<web::Json<ProfileResponse>> {
    apply_update(&state, &principal, &path, payload.into_inner(), Action::Update).await
}

#[patch("/profiles/{username}")]
pub async fn update_profile(
    state: web::Data<HttpState>,
    principal: Principal,
    path: web::Path<String>,
    payload: web::Json<UpdateProfileRequest>,
) -> ApiResult<web::Json<ProfileResponse>> {
    apply_update(
        &state,
        &principal,
        &path,
        payload.into_inner(),
        Action::PartialUpdate,
    )
    .await
}
