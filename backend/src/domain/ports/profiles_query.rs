//! Driving port for reading profiles.

use async_trait::async_trait;

use crate::domain::{Error, Profile, Username};

/// Profile reads.
#[async_trait]
pub trait ProfilesQuery: Send + Sync {
    /// All profiles ordered by username.
    async fn list_profiles(&self) -> Result<Vec<Profile>, Error>;

    /// Profile of the account called `username`, or `not_found`.
    async fn get_profile(&self, username: &Username) -> Result<Profile, Error>;
}
