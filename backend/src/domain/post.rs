//! Blog posts and the validated inputs used to create and change them.

use std::fmt;

use chrono::{DateTime, Utc};

use super::ownership::Owned;
use super::{CategoryId, PostId, TagId, User, UserId};

/// Maximum number of characters in a post title.
pub const TITLE_MAX: usize = 200;

/// Validation failures for post and comment inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentValidationError {
    EmptyTitle,
    TitleTooLong { max: usize },
    EmptyContent,
}

impl fmt::Display for ContentValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title must not be empty"),
            Self::TitleTooLong { max } => write!(f, "title must be at most {max} characters"),
            Self::EmptyContent => write!(f, "content must not be empty"),
        }
    }
}

impl std::error::Error for ContentValidationError {}

impl ContentValidationError {
    /// Name of the payload field the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyTitle | Self::TitleTooLong { .. } => "title",
            Self::EmptyContent => "content",
        }
    }
}

/// Trimmed post title of 1 to [`TITLE_MAX`] characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostTitle(String);

impl PostTitle {
    /// Trim and validate a title.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, ContentValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ContentValidationError::EmptyTitle);
        }
        if trimmed.chars().count() > TITLE_MAX {
            return Err(ContentValidationError::TitleTooLong { max: TITLE_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// The trimmed title.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Body text of a post or comment. Must contain something besides whitespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Body(String);

impl Body {
    /// Validate body text, keeping it as written.
    pub fn new(raw: impl Into<String>) -> Result<Self, ContentValidationError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(ContentValidationError::EmptyContent);
        }
        Ok(Self(raw))
    }

    /// The text as submitted.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Stored post as returned to callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: PostId,
    pub author: User,
    pub title: String,
    pub content: String,
    pub category: Option<CategoryId>,
    pub tags: Vec<TagId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Number of likes at read time.
    pub likes_count: u64,
}

impl Owned for Post {
    fn owner_id(&self) -> &UserId {
        self.author.id()
    }
}

/// Input for creating a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDraft {
    pub title: PostTitle,
    pub content: Body,
    pub category: Option<CategoryId>,
    pub tags: Vec<TagId>,
}

/// Field changes applied to an existing post. `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostChanges {
    pub title: Option<PostTitle>,
    pub content: Option<Body>,
    /// `Some(None)` clears the category.
    pub category: Option<Option<CategoryId>>,
    pub tags: Option<Vec<TagId>>,
}

impl PostChanges {
    /// True when no field would change.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.content.is_none()
            && self.category.is_none()
            && self.tags.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", ContentValidationError::EmptyTitle)]
    #[case("   ", ContentValidationError::EmptyTitle)]
    fn rejects_blank_titles(#[case] raw: &str, #[case] expected: ContentValidationError) {
        assert_eq!(PostTitle::new(raw).expect_err("blank"), expected);
    }

    #[rstest]
    fn enforces_title_length() {
        assert!(PostTitle::new("t".repeat(TITLE_MAX)).is_ok());
        assert_eq!(
            PostTitle::new("t".repeat(TITLE_MAX + 1)).expect_err("too long"),
            ContentValidationError::TitleTooLong { max: TITLE_MAX }
        );
    }

    #[rstest]
    fn trims_titles() {
        assert_eq!(PostTitle::new("  Hello  ").expect("valid").as_str(), "Hello");
    }

    #[rstest]
    fn rejects_blank_body_but_keeps_whitespace_otherwise() {
        assert_eq!(
            Body::new(" \n").expect_err("blank"),
            ContentValidationError::EmptyContent
        );
        assert_eq!(Body::new(" text ").expect("valid").as_str(), " text ");
    }

    #[rstest]
    fn empty_changes_are_detected() {
        assert!(PostChanges::default().is_empty());
        let changes = PostChanges {
            category: Some(None),
            ..PostChanges::default()
        };
        assert!(!changes.is_empty());
    }
}
