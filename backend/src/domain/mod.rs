//! Domain types, services and ports.
//!
//! Purpose: define strongly typed blog entities and the use-cases over them,
//! independent of HTTP and storage. Adapters live under `inbound` and
//! `outbound` and talk to this module only through [`ports`].
//!
//! The load-bearing pieces are [`ownership`] (owner-only writes) and
//! [`likes`] (the like toggle).

pub mod accounts_service;
pub mod auth;
pub mod comment;
pub mod comment_service;
pub mod error;
pub mod ids;
pub mod like_service;
pub mod likes;
pub mod ownership;
pub mod ports;
pub mod post;
pub mod post_service;
pub mod profile;
pub mod profile_service;
pub mod taxonomy;
pub mod taxonomy_service;
pub mod trace_id;
pub mod user;

pub use self::accounts_service::AccountService;
pub use self::auth::{
    CredentialsValidationError, LoginCredentials, PASSWORD_MIN, RegistrationForm,
};
pub use self::comment::{Comment, CommentChanges, CommentDraft};
pub use self::comment_service::CommentService;
pub use self::error::{Error, ErrorCode};
pub use self::ids::{CategoryId, CommentId, PostId, TagId};
pub use self::like_service::LikeService;
pub use self::likes::{LikeStatus, LikeTarget, LikeToggle, LikeToggleEngine};
pub use self::post::{
    Body, ContentValidationError, Post, PostChanges, PostDraft, PostTitle, TITLE_MAX,
};
pub use self::post_service::PostService;
pub use self::profile::{Profile, ProfileChanges, default_bio};
pub use self::profile_service::{ProfileProvisioningHook, ProfileService};
pub use self::taxonomy::{Category, Tag};
pub use self::taxonomy_service::TaxonomyService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{USERNAME_MAX, User, UserId, UserValidationError, Username};
