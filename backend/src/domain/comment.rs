//! Comments attached to posts.

use chrono::{DateTime, Utc};

use super::ownership::Owned;
use super::post::Body;
use super::{CommentId, PostId, User, UserId};

/// Stored comment as returned to callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: CommentId,
    pub post: PostId,
    pub author: User,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Number of likes at read time.
    pub likes_count: u64,
}

impl Owned for Comment {
    fn owner_id(&self) -> &UserId {
        self.author.id()
    }
}

/// Input for creating a comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentDraft {
    pub post: PostId,
    pub content: Body,
}

/// Changes applied to an existing comment. `None` leaves the body untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentChanges {
    pub content: Option<Body>,
}
