//! Session wrapper so handlers deal in [`UserId`]s rather than raw cookies.
//!
//! [`SessionContext`] reads and writes the cookie. [`Principal`] is the
//! extractor protected handlers take: it resolves the stored id against the
//! account store, so a cookie whose account is gone reads as unauthenticated.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{Error, ErrorCode, User, UserId};
use crate::inbound::http::state::HttpState;

pub(crate) const USER_ID_KEY: &str = "user_id";

/// Handler-facing view of the cookie session.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Wrap an extracted actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Store the authenticated principal, rotating the session id.
    pub fn persist_user(&self, user_id: &UserId) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(USER_ID_KEY, user_id.to_string())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Forget the principal and drop the cookie.
    pub fn clear(&self) {
        self.0.purge();
    }

    /// Principal stored in the session, if any. A tampered id reads as absent.
    pub fn user_id(&self) -> Result<Option<UserId>, Error> {
        let raw = self
            .0
            .get::<String>(USER_ID_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;
        let Some(raw) = raw else {
            return Ok(None);
        };
        match UserId::new(&raw) {
            Ok(id) => Ok(Some(id)),
            Err(error) => {
                warn!(%error, "invalid user id in session cookie");
                Ok(None)
            }
        }
    }

    /// The principal, or `401 Unauthorized`.
    pub fn require_user_id(&self) -> Result<UserId, Error> {
        self.user_id()?
            .ok_or_else(|| Error::unauthorized("authentication credentials were not provided"))
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}

/// Authenticated account resolved for the current request.
///
/// Extraction fails with `401 Unauthorized` when the session carries no
/// user or the user no longer exists. A stale id also purges the cookie.
#[derive(Debug, Clone)]
pub struct Principal(User);

impl Principal {
    /// Stable identifier of the account.
    pub fn id(&self) -> &UserId {
        self.0.id()
    }

    /// The resolved account.
    pub fn user(&self) -> &User {
        &self.0
    }
}

async fn resolve_principal(
    session: SessionContext,
    state: Option<web::Data<HttpState>>,
) -> Result<Principal, Error> {
    let state = state.ok_or_else(|| Error::internal("HTTP state is not configured"))?;
    let id = session.require_user_id()?;
    match state.accounts.principal(&id).await {
        Ok(user) => Ok(Principal(user)),
        Err(error) => {
            if error.code() == ErrorCode::Unauthorized {
                warn!(user_id = %id, "session refers to a missing account");
                session.clear();
            }
            Err(error)
        }
    }
}

impl FromRequest for Principal {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let session = Session::from_request(req, payload);
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        Box::pin(async move {
            let session = SessionContext::new(session.await?);
            Ok(resolve_principal(session, state).await?)
        })
    }
}
