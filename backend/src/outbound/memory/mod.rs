//! In-process adapters backing every repository port.
//!
//! [`InMemoryBlogStore`] keeps all tables behind one mutex so each port call
//! is atomic, mirroring the row-level guarantees the PostgreSQL adapters get
//! from constraints. It is used when no database URL is configured and by
//! the HTTP tests.

mod repositories;

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use mockable::{Clock, DefaultClock};

use crate::domain::{
    Category, CategoryId, Comment, CommentId, Post, PostId, Profile, Tag, TagId, User, UserId,
    Username,
};

pub(crate) struct AccountRow {
    username: Username,
    password_hash: String,
}

pub(crate) struct ProfileRow {
    bio: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

pub(crate) struct PostRow {
    author: UserId,
    title: String,
    content: String,
    category: Option<CategoryId>,
    tags: Vec<TagId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

pub(crate) struct CommentRow {
    post: PostId,
    author: UserId,
    content: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Default)]
pub(crate) struct State {
    users: HashMap<UserId, AccountRow>,
    profiles: HashMap<UserId, ProfileRow>,
    categories: BTreeMap<CategoryId, Category>,
    tags: BTreeMap<TagId, Tag>,
    posts: BTreeMap<PostId, PostRow>,
    comments: BTreeMap<CommentId, CommentRow>,
    post_likes: HashSet<(UserId, PostId)>,
    comment_likes: HashSet<(UserId, CommentId)>,
    last_id: i64,
}

impl State {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    fn user(&self, id: &UserId) -> Option<User> {
        self.users
            .get(id)
            .map(|row| User::new(*id, row.username.clone()))
    }

    fn post(&self, id: PostId) -> Option<Post> {
        let row = self.posts.get(&id)?;
        let author = self.user(&row.author)?;
        let likes_count = self
            .post_likes
            .iter()
            .filter(|(_, post)| *post == id)
            .count() as u64;
        Some(Post {
            id,
            author,
            title: row.title.clone(),
            content: row.content.clone(),
            category: row.category,
            tags: row.tags.clone(),
            created_at: row.created_at,
            updated_at: row.updated_at,
            likes_count,
        })
    }

    fn comment(&self, id: CommentId) -> Option<Comment> {
        let row = self.comments.get(&id)?;
        let author = self.user(&row.author)?;
        let likes_count = self
            .comment_likes
            .iter()
            .filter(|(_, comment)| *comment == id)
            .count() as u64;
        Some(Comment {
            id,
            post: row.post,
            author,
            content: row.content.clone(),
            created_at: row.created_at,
            updated_at: row.updated_at,
            likes_count,
        })
    }

    fn profile(&self, owner: &UserId) -> Option<Profile> {
        let row = self.profiles.get(owner)?;
        Some(Profile {
            owner: self.user(owner)?,
            bio: row.bio.clone(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }

    fn unknown_category(&self, category: Option<CategoryId>) -> Option<CategoryId> {
        category.filter(|id| !self.categories.contains_key(id))
    }

    fn unknown_tags(&self, tags: &[TagId]) -> Option<TagId> {
        tags.iter().copied().find(|id| !self.tags.contains_key(id))
    }

    fn remove_comment(&mut self, id: CommentId) -> bool {
        self.comment_likes.retain(|(_, comment)| *comment != id);
        self.comments.remove(&id).is_some()
    }
}

/// Newest first, ties broken by the higher id.
fn newest_first<K: Ord, T>(items: &mut [(K, DateTime<Utc>, T)]) {
    items.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| b.0.cmp(&a.0)));
}

/// Shared in-memory store implementing all repository ports.
///
/// # Examples
/// ```
/// use backend::outbound::memory::InMemoryBlogStore;
///
/// let store = InMemoryBlogStore::default();
/// let category = store.seed_category("Rust", "rust");
/// assert_eq!(category.slug, "rust");
/// ```
pub struct InMemoryBlogStore {
    state: Mutex<State>,
    clock: Arc<dyn Clock>,
}

impl Default for InMemoryBlogStore {
    fn default() -> Self {
        Self::new(Arc::new(DefaultClock))
    }
}

impl InMemoryBlogStore {
    /// Create an empty store stamping rows with `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Mutex::new(State::default()),
            clock,
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn now(&self) -> DateTime<Utc> {
        self.clock.utc()
    }

    /// Insert a category. Categories are not editable through the API.
    pub fn seed_category(&self, name: &str, slug: &str) -> Category {
        let mut state = self.lock();
        let category = Category {
            id: CategoryId::new(state.next_id()),
            name: name.to_owned(),
            slug: slug.to_owned(),
        };
        state.categories.insert(category.id, category.clone());
        category
    }

    /// Insert a tag. Tags are not editable through the API.
    pub fn seed_tag(&self, name: &str, slug: &str) -> Tag {
        let mut state = self.lock();
        let tag = Tag {
            id: TagId::new(state.next_id()),
            name: name.to_owned(),
            slug: slug.to_owned(),
        };
        state.tags.insert(tag.id, tag.clone());
        tag
    }
}
