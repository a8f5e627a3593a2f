//! Driving port for editing profiles.

use async_trait::async_trait;

use crate::domain::ownership::Action;
use crate::domain::{Error, Profile, ProfileChanges, UserId, Username};

/// Owner-only profile updates.
#[async_trait]
pub trait ProfilesCommand: Send + Sync {
    /// Owner-only update of the profile belonging to `username`.
    async fn update_profile(
        &self,
        principal: &UserId,
        username: &Username,
        changes: ProfileChanges,
        action: Action,
    ) -> Result<Profile, Error>;
}
