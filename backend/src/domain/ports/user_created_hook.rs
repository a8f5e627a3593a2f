//! Extension point run after an account is created.
//!
//! Registration calls every hook synchronously once the user row exists and
//! fails the request if a hook fails. Login re-runs the hooks, so
//! implementations must be idempotent.

use async_trait::async_trait;

use crate::domain::{Error, User};

/// Runs after an account is created and again on login.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserCreatedHook: Send + Sync {
    /// React to a newly created (or newly authenticated) account.
    async fn on_user_created(&self, user: &User) -> Result<(), Error>;
}
