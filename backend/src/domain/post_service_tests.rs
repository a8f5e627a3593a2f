//! Tests for the post service.

use std::sync::Arc;

use chrono::Utc;
use mockall::predicate::eq;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{MockPostRepository, MockTaxonomyRepository};
use crate::domain::{Body, Category, ErrorCode, PostTitle, User, Username};

type Service = PostService<MockPostRepository, MockTaxonomyRepository>;

fn service(posts: MockPostRepository, taxonomy: MockTaxonomyRepository) -> Service {
    PostService::new(Arc::new(posts), Arc::new(taxonomy))
}

#[fixture]
fn alice() -> User {
    User::new(UserId::random(), Username::new("alice").expect("valid"))
}

fn post_by(author: &User, id: i64) -> Post {
    let now = Utc::now();
    Post {
        id: PostId::new(id),
        author: author.clone(),
        title: "Hello".to_owned(),
        content: "World".to_owned(),
        category: None,
        tags: Vec::new(),
        created_at: now,
        updated_at: now,
        likes_count: 0,
    }
}

fn draft(category: Option<i64>) -> PostDraft {
    PostDraft {
        title: PostTitle::new("Hello").expect("valid"),
        content: Body::new("World").expect("valid"),
        category: category.map(CategoryId::new),
        tags: Vec::new(),
    }
}

#[rstest]
#[tokio::test]
async fn create_checks_category_then_persists(alice: User) {
    let created = post_by(&alice, 1);
    let mut taxonomy = MockTaxonomyRepository::new();
    taxonomy
        .expect_find_category()
        .with(eq(CategoryId::new(3)))
        .times(1)
        .return_once(|id| {
            Ok(Some(Category {
                id,
                name: "Rust".to_owned(),
                slug: "rust".to_owned(),
            }))
        });
    let mut posts = MockPostRepository::new();
    posts
        .expect_create()
        .times(1)
        .return_once(move |_, _| Ok(created));

    let post = service(posts, taxonomy)
        .create_post(alice.id(), draft(Some(3)))
        .await
        .expect("created");
    assert_eq!(post.id, PostId::new(1));
}

#[rstest]
#[tokio::test]
async fn create_rejects_unknown_category(alice: User) {
    let mut taxonomy = MockTaxonomyRepository::new();
    taxonomy.expect_find_category().return_once(|_| Ok(None));
    let mut posts = MockPostRepository::new();
    posts.expect_create().never();

    let err = service(posts, taxonomy)
        .create_post(alice.id(), draft(Some(99)))
        .await
        .expect_err("unknown category");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(err.details().map(|d| d["field"].clone()), Some("category".into()));
}

#[rstest]
#[tokio::test]
async fn stranger_delete_is_forbidden_and_leaves_post(alice: User) {
    let existing = post_by(&alice, 42);
    let mut posts = MockPostRepository::new();
    posts
        .expect_find()
        .with(eq(PostId::new(42)))
        .return_once(move |_| Ok(Some(existing)));
    posts.expect_delete().never();

    let bob = UserId::random();
    let err = service(posts, MockTaxonomyRepository::new())
        .delete_post(&bob, PostId::new(42))
        .await
        .expect_err("forbidden");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn owner_delete_succeeds(alice: User) {
    let existing = post_by(&alice, 42);
    let mut posts = MockPostRepository::new();
    posts
        .expect_find()
        .return_once(move |_| Ok(Some(existing)));
    posts
        .expect_delete()
        .with(eq(PostId::new(42)))
        .times(1)
        .return_once(|_| Ok(true));

    service(posts, MockTaxonomyRepository::new())
        .delete_post(alice.id(), PostId::new(42))
        .await
        .expect("deleted");
}

#[rstest]
#[tokio::test]
async fn missing_post_is_not_found_before_guard(alice: User) {
    let mut posts = MockPostRepository::new();
    posts.expect_find().return_once(|_| Ok(None));
    let err = service(posts, MockTaxonomyRepository::new())
        .update_post(
            alice.id(),
            PostId::new(7),
            PostChanges::default(),
            Action::PartialUpdate,
        )
        .await
        .expect_err("missing");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[case(Action::Update)]
#[case(Action::PartialUpdate)]
#[tokio::test]
async fn stranger_update_is_forbidden(alice: User, #[case] action: Action) {
    let existing = post_by(&alice, 5);
    let mut posts = MockPostRepository::new();
    posts
        .expect_find()
        .return_once(move |_| Ok(Some(existing)));
    posts.expect_update().never();

    let changes = PostChanges {
        title: Some(PostTitle::new("Mine now").expect("valid")),
        ..PostChanges::default()
    };
    let err = service(posts, MockTaxonomyRepository::new())
        .update_post(&UserId::random(), PostId::new(5), changes, action)
        .await
        .expect_err("forbidden");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn empty_patch_returns_post_without_writing(alice: User) {
    let existing = post_by(&alice, 5);
    let expected = existing.clone();
    let mut posts = MockPostRepository::new();
    posts
        .expect_find()
        .return_once(move |_| Ok(Some(existing)));
    posts.expect_update().never();

    let post = service(posts, MockTaxonomyRepository::new())
        .update_post(
            alice.id(),
            PostId::new(5),
            PostChanges::default(),
            Action::PartialUpdate,
        )
        .await
        .expect("no-op");
    assert_eq!(post, expected);
}

#[rstest]
#[tokio::test]
async fn unknown_reference_from_storage_is_invalid_request(alice: User) {
    let mut posts = MockPostRepository::new();
    posts
        .expect_create()
        .return_once(|_, _| Err(PostRepositoryError::unknown_reference("tag 4")));
    let err = service(posts, MockTaxonomyRepository::new())
        .create_post(alice.id(), draft(None))
        .await
        .expect_err("invalid");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}
