//! Driving port for account sign-up, login and principal lookup.
//!
//! Inbound adapters call this port to authenticate credentials without
//! knowing the backing persistence or hashing infrastructure.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, RegistrationForm, User, UserId};

/// Account use-cases consumed by the auth handlers.
#[async_trait]
pub trait AccountsCommand: Send + Sync {
    /// Create an account and run the post-creation hooks.
    ///
    /// # Errors
    ///
    /// Returns a conflict when the username is taken and surfaces any hook
    /// failure unchanged.
    async fn register(&self, form: &RegistrationForm) -> Result<User, Error>;

    /// Validate credentials and return the authenticated principal.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<User, Error>;

    /// Resolve the principal stored in a session.
    async fn principal(&self, id: &UserId) -> Result<User, Error>;
}
