//! Account registration and authentication.
//!
//! Implements [`AccountsCommand`] over a [`UserRepository`] and a
//! [`PasswordHasher`]. Registered [`UserCreatedHook`]s run synchronously
//! after the account row exists; their failure fails the request.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{
    AccountsCommand, PasswordHasher, PasswordHasherError, UserCreatedHook, UserPersistenceError,
    UserRepository,
};
use crate::domain::{Error, LoginCredentials, RegistrationForm, User, UserId};

/// Account service implementing the auth driving port.
#[derive(Clone)]
pub struct AccountService<U, H> {
    users: Arc<U>,
    hasher: Arc<H>,
    hooks: Vec<Arc<dyn UserCreatedHook>>,
}

impl<U, H> AccountService<U, H> {
    /// Create a service without hooks.
    pub fn new(users: Arc<U>, hasher: Arc<H>) -> Self {
        Self {
            users,
            hasher,
            hooks: Vec::new(),
        }
    }

    /// Register a hook run after sign-up and after each login.
    pub fn with_hook(mut self, hook: Arc<dyn UserCreatedHook>) -> Self {
        self.hooks.push(hook);
        self
    }
}

impl<U, H> AccountService<U, H>
where
    U: UserRepository,
    H: PasswordHasher,
{
    fn map_user_error(error: UserPersistenceError) -> Error {
        match error {
            UserPersistenceError::Connection { message } => {
                Error::service_unavailable(format!("user repository unavailable: {message}"))
            }
            UserPersistenceError::Query { message } => {
                Error::internal(format!("user repository error: {message}"))
            }
            UserPersistenceError::DuplicateUsername { username } => {
                Error::conflict(format!("username {username} is already taken"))
            }
        }
    }

    fn map_hasher_error(error: PasswordHasherError) -> Error {
        Error::internal(error.to_string())
    }

    fn invalid_credentials() -> Error {
        Error::unauthorized("invalid credentials")
    }

    async fn run_hooks(&self, user: &User) -> Result<(), Error> {
        for hook in &self.hooks {
            hook.on_user_created(user).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl<U, H> AccountsCommand for AccountService<U, H>
where
    U: UserRepository,
    H: PasswordHasher,
{
    async fn register(&self, form: &RegistrationForm) -> Result<User, Error> {
        let hash = self
            .hasher
            .hash(form.password())
            .await
            .map_err(Self::map_hasher_error)?;
        let user = User::new(UserId::random(), form.username().clone());
        self.users
            .insert(&user, &hash)
            .await
            .map_err(Self::map_user_error)?;
        self.run_hooks(&user).await?;
        info!(user_id = %user.id(), username = %user.username(), "account registered");
        Ok(user)
    }

    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<User, Error> {
        let account = self
            .users
            .find_by_username(credentials.username())
            .await
            .map_err(Self::map_user_error)?
            .ok_or_else(Self::invalid_credentials)?;
        let matches = self
            .hasher
            .verify(credentials.password(), &account.password_hash)
            .await
            .map_err(Self::map_hasher_error)?;
        if !matches {
            return Err(Self::invalid_credentials());
        }
        self.run_hooks(&account.user).await?;
        Ok(account.user)
    }

    async fn principal(&self, id: &UserId) -> Result<User, Error> {
        self.users
            .find_by_id(id)
            .await
            .map_err(Self::map_user_error)?
            .ok_or_else(|| Error::unauthorized("session user no longer exists"))
    }
}
