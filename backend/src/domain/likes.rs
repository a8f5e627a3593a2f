//! Like toggling for posts and comments.
//!
//! A like is a `(principal, target)` relation that exists or does not. Each
//! toggle flips it: the engine first tries an atomic create and, if the pair
//! is already present, deletes it instead. There is no read-then-write step,
//! so two racing toggles on the same pair resolve to one create and one
//! delete rather than two creates.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::ports::{LikeRepository, LikeRepositoryError};
use super::{CommentId, Error, PostId, UserId};

/// Entity that can be liked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LikeTarget {
    /// A post, by id.
    Post(PostId),
    /// A comment, by id.
    Comment(CommentId),
}

impl LikeTarget {
    fn noun(self) -> &'static str {
        match self {
            Self::Post(_) => "post",
            Self::Comment(_) => "comment",
        }
    }
}

impl std::fmt::Display for LikeTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Post(id) => write!(f, "post {id}"),
            Self::Comment(id) => write!(f, "comment {id}"),
        }
    }
}

/// State of the relation after a toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LikeStatus {
    /// The relation now exists.
    Liked,
    /// The relation was removed.
    Unliked,
}

/// Result of a toggle: the new state and the count read after the change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeToggle {
    /// Relation state after the toggle.
    pub status: LikeStatus,
    /// Likes on the target once the toggle applied.
    pub likes_count: u64,
}

/// Flips like relations through a [`LikeRepository`].
pub struct LikeToggleEngine<R> {
    repo: Arc<R>,
}

impl<R> Clone for LikeToggleEngine<R> {
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
        }
    }
}

impl<R> LikeToggleEngine<R> {
    /// Toggle relations stored in `repo`.
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }
}

impl<R> LikeToggleEngine<R>
where
    R: LikeRepository,
{
    fn map_error(target: LikeTarget, error: LikeRepositoryError) -> Error {
        match error {
            LikeRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("like repository unavailable: {message}"))
            }
            LikeRepositoryError::Query { message } => {
                Error::internal(format!("like repository error: {message}"))
            }
            LikeRepositoryError::MissingTarget => {
                Error::not_found(format!("{} not found", target.noun()))
            }
            LikeRepositoryError::Conflict => {
                Error::internal("like relation conflict outside of create")
            }
        }
    }

    /// Flip the relation between `principal` and `target`.
    ///
    /// The target must already be resolved by the caller. A uniqueness
    /// conflict on create is the "already liked" signal; every other storage
    /// failure is returned unchanged in category.
    pub async fn toggle_like(
        &self,
        principal: &UserId,
        target: LikeTarget,
    ) -> Result<LikeToggle, Error> {
        let created = match self.repo.create_if_absent(principal, target).await {
            Ok(created) => created,
            Err(LikeRepositoryError::Conflict) => false,
            Err(err) => return Err(Self::map_error(target, err)),
        };

        let status = if created {
            LikeStatus::Liked
        } else {
            self.repo
                .delete(principal, target)
                .await
                .map_err(|err| Self::map_error(target, err))?;
            LikeStatus::Unliked
        };

        let likes_count = self
            .repo
            .count(target)
            .await
            .map_err(|err| Self::map_error(target, err))?;
        debug!(%principal, %target, ?status, likes_count, "like toggled");
        Ok(LikeToggle {
            status,
            likes_count,
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for the toggle engine.
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::MockLikeRepository;
    use mockall::predicate::eq;
    use rstest::rstest;

    const TARGET: LikeTarget = LikeTarget::Post(PostId::new(42));

    fn engine(repo: MockLikeRepository) -> LikeToggleEngine<MockLikeRepository> {
        LikeToggleEngine::new(Arc::new(repo))
    }

    #[tokio::test]
    async fn creates_relation_when_absent() {
        let user = UserId::random();
        let mut repo = MockLikeRepository::new();
        repo.expect_create_if_absent()
            .with(eq(user), eq(TARGET))
            .times(1)
            .return_once(|_, _| Ok(true));
        repo.expect_delete().never();
        repo.expect_count()
            .with(eq(TARGET))
            .times(1)
            .return_once(|_| Ok(1));

        let toggle = engine(repo)
            .toggle_like(&user, TARGET)
            .await
            .expect("toggle succeeds");
        assert_eq!(
            toggle,
            LikeToggle {
                status: LikeStatus::Liked,
                likes_count: 1
            }
        );
    }

    #[rstest]
    #[case::reported_not_created(Ok(false))]
    #[case::unique_violation(Err(LikeRepositoryError::Conflict))]
    #[tokio::test]
    async fn existing_relation_is_deleted(#[case] outcome: Result<bool, LikeRepositoryError>) {
        let user = UserId::random();
        let mut repo = MockLikeRepository::new();
        repo.expect_create_if_absent()
            .times(1)
            .return_once(move |_, _| outcome);
        repo.expect_delete()
            .with(eq(user), eq(TARGET))
            .times(1)
            .return_once(|_, _| Ok(true));
        repo.expect_count().times(1).return_once(|_| Ok(0));

        let toggle = engine(repo)
            .toggle_like(&user, TARGET)
            .await
            .expect("toggle succeeds");
        assert_eq!(toggle.status, LikeStatus::Unliked);
        assert_eq!(toggle.likes_count, 0);
    }

    #[rstest]
    #[case(LikeRepositoryError::connection("refused"), ErrorCode::ServiceUnavailable)]
    #[case(LikeRepositoryError::query("syntax"), ErrorCode::InternalError)]
    #[case(LikeRepositoryError::missing_target(), ErrorCode::NotFound)]
    #[tokio::test]
    async fn other_create_failures_propagate(
        #[case] failure: LikeRepositoryError,
        #[case] expected: ErrorCode,
    ) {
        let mut repo = MockLikeRepository::new();
        repo.expect_create_if_absent()
            .times(1)
            .return_once(move |_, _| Err(failure));
        repo.expect_delete().never();
        repo.expect_count().never();

        let err = engine(repo)
            .toggle_like(&UserId::random(), TARGET)
            .await
            .expect_err("failure propagates");
        assert_eq!(err.code(), expected);
    }

    #[tokio::test]
    async fn delete_failure_propagates() {
        let mut repo = MockLikeRepository::new();
        repo.expect_create_if_absent()
            .times(1)
            .return_once(|_, _| Ok(false));
        repo.expect_delete()
            .times(1)
            .return_once(|_, _| Err(LikeRepositoryError::connection("reset")));
        repo.expect_count().never();

        let err = engine(repo)
            .toggle_like(&UserId::random(), TARGET)
            .await
            .expect_err("failure propagates");
        assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
    }

    #[tokio::test]
    async fn count_is_read_after_mutation() {
        let mut seq = mockall::Sequence::new();
        let mut repo = MockLikeRepository::new();
        repo.expect_create_if_absent()
            .times(1)
            .in_sequence(&mut seq)
            .return_once(|_, _| Ok(true));
        repo.expect_count()
            .times(1)
            .in_sequence(&mut seq)
            .return_once(|_| Ok(5));

        let toggle = engine(repo)
            .toggle_like(&UserId::random(), LikeTarget::Comment(CommentId::new(3)))
            .await
            .expect("toggle succeeds");
        assert_eq!(toggle.likes_count, 5);
    }

    #[rstest]
    fn toggle_serialises_lowercase_status() {
        let value = serde_json::to_value(LikeToggle {
            status: LikeStatus::Unliked,
            likes_count: 0,
        })
        .expect("serialise");
        assert_eq!(
            value,
            serde_json::json!({ "status": "unliked", "likes_count": 0 })
        );
    }
}
