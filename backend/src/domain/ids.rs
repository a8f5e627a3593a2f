//! Numeric identifiers for blog content.
//!
//! Content rows use database-assigned 64-bit keys. Each entity gets its own
//! newtype so a comment id can never be passed where a post id is expected.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! define_content_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wrap a raw key.
            pub const fn new(raw: i64) -> Self {
                Self(raw)
            }

            /// Raw key value.
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(raw: i64) -> Self {
                Self(raw)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_content_id!(
    /// Identifier of a blog post.
    PostId
);
define_content_id!(
    /// Identifier of a comment.
    CommentId
);
define_content_id!(
    /// Identifier of a category.
    CategoryId
);
define_content_id!(
    /// Identifier of a tag.
    TagId
);
