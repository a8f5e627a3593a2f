//! `DieselLikeRepository` and the toggle engine against embedded PostgreSQL.
//!
//! Each test gets its own cluster and a freshly migrated database seeded with
//! one user and one post.

use std::sync::Arc;

use backend::domain::ports::{LikeRepository, LikeRepositoryError};
use backend::domain::{LikeStatus, LikeTarget, LikeToggleEngine, PostId, UserId};
use backend::outbound::persistence::{DbPool, DieselLikeRepository, PoolConfig};
use pg_embedded_setup_unpriv::TestCluster;
use postgres::{Client, NoTls};
use rstest::{fixture, rstest};
use tokio::runtime::Runtime;

#[path = "support/cluster_skip.rs"]
mod cluster_skip;
#[path = "support/embedded_postgres.rs"]
mod embedded_postgres;
#[path = "support/pg_embed.rs"]
mod pg_embed;

use cluster_skip::handle_cluster_setup_failure;
use embedded_postgres::{format_postgres_error, migrate_schema, reset_database};
use pg_embed::test_cluster;

const TEST_DB: &str = "diesel_like_repo_test";

struct TestContext {
    runtime: Runtime,
    _cluster: TestCluster,
    repository: DieselLikeRepository,
    database_url: String,
    user_id: UserId,
    post: LikeTarget,
}

fn seed_user_and_post(url: &str, user_id: &UserId) -> Result<PostId, String> {
    let mut client = Client::connect(url, NoTls).map_err(|err| format_postgres_error(&err))?;
    let user_uuid = *user_id.as_uuid();
    client
        .execute(
            "INSERT INTO users (id, username, password_hash) VALUES ($1, $2, $3)",
            &[&user_uuid, &"liker", &"not-a-real-hash"],
        )
        .map_err(|err| format_postgres_error(&err))?;
    let row = client
        .query_one(
            "INSERT INTO posts (author_id, title, content) VALUES ($1, $2, $3) RETURNING id",
            &[&user_uuid, &"Seeded", &"Seeded body"],
        )
        .map_err(|err| format_postgres_error(&err))?;
    let id: i64 = row.try_get(0).map_err(|err| format_postgres_error(&err))?;
    Ok(PostId::new(id))
}

fn setup_context() -> Result<TestContext, String> {
    let runtime = Runtime::new().map_err(|err| err.to_string())?;
    let cluster = test_cluster()?;
    reset_database(&cluster, TEST_DB)?;
    let database_url = cluster.connection().database_url(TEST_DB);
    migrate_schema(&runtime, &database_url)?;

    let user_id = UserId::random();
    let post_id = seed_user_and_post(&database_url, &user_id)?;

    let config = PoolConfig::new(&database_url)
        .with_max_size(2)
        .with_min_idle(Some(1));
    let pool = runtime
        .block_on(DbPool::new(config))
        .map_err(|err| err.to_string())?;

    Ok(TestContext {
        runtime,
        _cluster: cluster,
        repository: DieselLikeRepository::new(pool),
        database_url,
        user_id,
        post: LikeTarget::Post(post_id),
    })
}

#[fixture]
fn repo_context() -> Option<TestContext> {
    match setup_context() {
        Ok(context) => Some(context),
        Err(reason) => handle_cluster_setup_failure(reason),
    }
}

#[rstest]
fn second_create_reports_an_existing_relation(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: second_create_reports_an_existing_relation skipped");
        return;
    };
    let repo = &context.repository;

    context.runtime.block_on(async {
        let first = repo
            .create_if_absent(&context.user_id, context.post)
            .await
            .expect("first create");
        let second = repo
            .create_if_absent(&context.user_id, context.post)
            .await
            .expect("second create");

        assert!(first, "first create inserts the row");
        assert!(!second, "second create leaves the row alone");
        assert_eq!(repo.count(context.post).await.expect("count"), 1);
    });
}

#[rstest]
fn delete_removes_only_an_existing_relation(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: delete_removes_only_an_existing_relation skipped");
        return;
    };
    let repo = &context.repository;

    context.runtime.block_on(async {
        assert!(
            !repo
                .delete(&context.user_id, context.post)
                .await
                .expect("delete on empty"),
            "nothing to delete yet"
        );
        repo.create_if_absent(&context.user_id, context.post)
            .await
            .expect("create");
        assert!(
            repo.delete(&context.user_id, context.post)
                .await
                .expect("delete"),
            "existing row is deleted"
        );
        assert_eq!(repo.count(context.post).await.expect("count"), 0);
    });
}

#[rstest]
fn count_tracks_distinct_users(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: count_tracks_distinct_users skipped");
        return;
    };
    let repo = &context.repository;
    let second_user = UserId::random();
    let second_uuid = *second_user.as_uuid();
    let mut client = Client::connect(&context.database_url, NoTls).expect("connect for seeding");
    client
        .execute(
            "INSERT INTO users (id, username, password_hash) VALUES ($1, $2, $3)",
            &[&second_uuid, &"second", &"not-a-real-hash"],
        )
        .expect("seed second user");

    context.runtime.block_on(async {
        assert_eq!(repo.count(context.post).await.expect("empty count"), 0);
        for user in [&context.user_id, &second_user] {
            repo.create_if_absent(user, context.post)
                .await
                .expect("create");
        }
        assert_eq!(repo.count(context.post).await.expect("count"), 2);
        assert_eq!(
            repo.count(LikeTarget::Post(PostId::new(i64::MAX)))
                .await
                .expect("count for unknown post"),
            0
        );
    });
}

#[rstest]
fn like_on_a_missing_post_is_rejected(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: like_on_a_missing_post_is_rejected skipped");
        return;
    };

    let result = context.runtime.block_on(
        context
            .repository
            .create_if_absent(&context.user_id, LikeTarget::Post(PostId::new(i64::MAX))),
    );

    assert!(
        matches!(result, Err(LikeRepositoryError::MissingTarget)),
        "expected MissingTarget, got {result:?}"
    );
}

#[rstest]
fn racing_toggles_from_one_user_cancel_out(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: racing_toggles_from_one_user_cancel_out skipped");
        return;
    };
    let engine = LikeToggleEngine::new(Arc::new(context.repository.clone()));

    context.runtime.block_on(async {
        let (left, right) = tokio::join!(
            engine.toggle_like(&context.user_id, context.post),
            engine.toggle_like(&context.user_id, context.post),
        );
        let statuses = [
            left.expect("first toggle").status,
            right.expect("second toggle").status,
        ];

        let liked = statuses
            .iter()
            .filter(|status| **status == LikeStatus::Liked)
            .count();
        assert_eq!(liked, 1, "exactly one toggle creates: {statuses:?}");
        assert_eq!(
            context.repository.count(context.post).await.expect("count"),
            0
        );
    });
}
