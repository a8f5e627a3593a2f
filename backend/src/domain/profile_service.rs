//! Profile reads, owner-only edits and automatic provisioning.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::ownership::{Action, ensure_permitted};
use crate::domain::ports::{
    ProfileRepository, ProfileRepositoryError, ProfilesCommand, ProfilesQuery, UserCreatedHook,
};
use crate::domain::{Error, Profile, ProfileChanges, User, UserId, Username, default_bio};

fn map_profile_error(error: ProfileRepositoryError) -> Error {
    match error {
        ProfileRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("profile repository unavailable: {message}"))
        }
        ProfileRepositoryError::Query { message } => {
            Error::internal(format!("profile repository error: {message}"))
        }
        ProfileRepositoryError::UnknownUser { user_id } => {
            Error::internal(format!("profile owner {user_id} does not exist"))
        }
    }
}

/// Profile service implementing the profile driving ports.
#[derive(Clone)]
pub struct ProfileService<R> {
    repo: Arc<R>,
}

impl<R> ProfileService<R> {
    /// Serve profiles stored in `repo`.
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }
}

impl<R> ProfileService<R>
where
    R: ProfileRepository,
{
    async fn resolve(&self, username: &Username) -> Result<Profile, Error> {
        self.repo
            .find_by_username(username)
            .await
            .map_err(map_profile_error)?
            .ok_or_else(|| Error::not_found(format!("profile {username} not found")))
    }
}

#[async_trait]
impl<R> ProfilesQuery for ProfileService<R>
where
    R: ProfileRepository,
{
    async fn list_profiles(&self) -> Result<Vec<Profile>, Error> {
        self.repo.list().await.map_err(map_profile_error)
    }

    async fn get_profile(&self, username: &Username) -> Result<Profile, Error> {
        self.resolve(username).await
    }
}

#[async_trait]
impl<R> ProfilesCommand for ProfileService<R>
where
    R: ProfileRepository,
{
    async fn update_profile(
        &self,
        principal: &UserId,
        username: &Username,
        changes: ProfileChanges,
        action: Action,
    ) -> Result<Profile, Error> {
        let profile = self.resolve(username).await?;
        ensure_permitted(Some(principal), &profile, action, "profile")?;
        let Some(bio) = changes.bio else {
            return Ok(profile);
        };
        self.repo
            .update_bio(principal, &bio)
            .await
            .map_err(map_profile_error)?
            .ok_or_else(|| Error::not_found(format!("profile {username} not found")))
    }
}

/// Creates a default profile for every new account.
///
/// Idempotent: an existing profile is left unchanged, so the hook is safe
/// to re-run on login for accounts that predate it.
#[derive(Clone)]
pub struct ProfileProvisioningHook<R> {
    repo: Arc<R>,
}

impl<R> ProfileProvisioningHook<R> {
    /// Provision profiles into `repo`.
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl<R> UserCreatedHook for ProfileProvisioningHook<R>
where
    R: ProfileRepository,
{
    async fn on_user_created(&self, user: &User) -> Result<(), Error> {
        let created = self
            .repo
            .create_if_absent(user.id(), &default_bio(user.username()))
            .await
            .map_err(map_profile_error)?;
        if created {
            info!(user_id = %user.id(), "profile provisioned");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for profile reads, edits and provisioning.
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::MockProfileRepository;
    use chrono::Utc;
    use mockall::predicate::eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn alice() -> User {
        User::new(UserId::random(), Username::new("alice").expect("valid"))
    }

    fn profile_of(owner: &User, bio: &str) -> Profile {
        let now = Utc::now();
        Profile {
            owner: owner.clone(),
            bio: bio.to_owned(),
            created_at: now,
            updated_at: now,
        }
    }

    #[rstest]
    #[tokio::test]
    async fn provisioning_writes_default_bio(alice: User) {
        let mut repo = MockProfileRepository::new();
        repo.expect_create_if_absent()
            .with(eq(*alice.id()), eq("This is alice's profile."))
            .times(1)
            .return_once(|_, _| Ok(true));
        ProfileProvisioningHook::new(Arc::new(repo))
            .on_user_created(&alice)
            .await
            .expect("provisioned");
    }

    #[rstest]
    #[tokio::test]
    async fn provisioning_failure_is_surfaced(alice: User) {
        let mut repo = MockProfileRepository::new();
        repo.expect_create_if_absent()
            .return_once(|_, _| Err(ProfileRepositoryError::connection("down")));
        let err = ProfileProvisioningHook::new(Arc::new(repo))
            .on_user_created(&alice)
            .await
            .expect_err("failure surfaces");
        assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
    }

    #[rstest]
    #[tokio::test]
    async fn owner_updates_bio(alice: User) {
        let existing = profile_of(&alice, "old");
        let updated = profile_of(&alice, "new");
        let mut repo = MockProfileRepository::new();
        repo.expect_find_by_username()
            .return_once(move |_| Ok(Some(existing)));
        repo.expect_update_bio()
            .with(eq(*alice.id()), eq("new"))
            .times(1)
            .return_once(move |_, _| Ok(Some(updated)));

        let profile = ProfileService::new(Arc::new(repo))
            .update_profile(
                alice.id(),
                alice.username(),
                ProfileChanges {
                    bio: Some("new".to_owned()),
                },
                Action::PartialUpdate,
            )
            .await
            .expect("updated");
        assert_eq!(profile.bio, "new");
    }

    #[rstest]
    #[tokio::test]
    async fn stranger_cannot_update_bio(alice: User) {
        let existing = profile_of(&alice, "old");
        let mut repo = MockProfileRepository::new();
        repo.expect_find_by_username()
            .return_once(move |_| Ok(Some(existing)));
        repo.expect_update_bio().never();

        let err = ProfileService::new(Arc::new(repo))
            .update_profile(
                &UserId::random(),
                alice.username(),
                ProfileChanges {
                    bio: Some("hijacked".to_owned()),
                },
                Action::Update,
            )
            .await
            .expect_err("forbidden");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_username_is_not_found() {
        let mut repo = MockProfileRepository::new();
        repo.expect_find_by_username().return_once(|_| Ok(None));
        let err = ProfileService::new(Arc::new(repo))
            .get_profile(&Username::new("ghost").expect("valid"))
            .await
            .expect_err("missing");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
