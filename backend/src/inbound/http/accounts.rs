//! Account handlers.
//!
//! ```text
//! POST /api/v1/auth/register {"username":"alice","password":"correct horse"}
//! POST /api/v1/auth/login    {"username":"alice","password":"correct horse"}
//! POST /api/v1/auth/logout
//! GET  /api/v1/auth/me
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::{LoginCredentials, RegistrationForm, User};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::{Principal, SessionContext};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::map_credentials_error;

/// Body accepted by register and login.
#[derive(Deserialize, Serialize)]
pub struct CredentialsRequest {
    pub username: String,
    pub password: String,
}

/// Public view of an account.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().to_string(),
            username: user.username().to_string(),
        }
    }
}

/// Create an account. The profile is provisioned before this returns.
#[post("/auth/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<CredentialsRequest>,
) -> ApiResult<HttpResponse> {
    let form = RegistrationForm::try_from_parts(&payload.username, &payload.password)
        .map_err(map_credentials_error)?;
    let user = state.accounts.register(&form).await?;
    Ok(HttpResponse::Created().json(UserResponse::from(&user)))
}

/// Check credentials and bind the account to the session cookie.
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CredentialsRequest>,
) -> ApiResult<web::Json<UserResponse>> {
    let credentials = LoginCredentials::try_from_parts(&payload.username, &payload.password)
        .map_err(map_credentials_error)?;
    let user = state.accounts.authenticate(&credentials).await?;
    session.persist_user(user.id())?;
    Ok(web::Json(UserResponse::from(&user)))
}

#[post("/auth/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.clear();
    HttpResponse::NoContent().finish()
}

/// The account bound to the current session.
#[get("/auth/me")]
pub async fn current_user(principal: Principal) -> web::Json<UserResponse> {
    web::Json(UserResponse::from(principal.user()))
}
