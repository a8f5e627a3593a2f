//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`PasswordHasher`], [`UserCreatedHook`]) are
//! implemented by outbound adapters. Driving ports (`*Command`, `*Query`) are
//! implemented by domain services and called by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod accounts_command;
mod comment_repository;
mod comments_command;
mod comments_query;
mod like_repository;
mod likes_command;
mod password_hasher;
mod post_repository;
mod posts_command;
mod posts_query;
mod profile_repository;
mod profiles_command;
mod profiles_query;
mod taxonomy_query;
mod taxonomy_repository;
mod user_created_hook;
mod user_repository;

pub use accounts_command::AccountsCommand;
#[cfg(test)]
pub use comment_repository::MockCommentRepository;
pub use comment_repository::{CommentRepository, CommentRepositoryError};
pub use comments_command::CommentsCommand;
pub use comments_query::CommentsQuery;
#[cfg(test)]
pub use like_repository::MockLikeRepository;
pub use like_repository::{LikeRepository, LikeRepositoryError};
pub use likes_command::LikesCommand;
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHasher, PasswordHasherError};
#[cfg(test)]
pub use post_repository::MockPostRepository;
pub use post_repository::{PostRepository, PostRepositoryError};
pub use posts_command::PostsCommand;
pub use posts_query::PostsQuery;
#[cfg(test)]
pub use profile_repository::MockProfileRepository;
pub use profile_repository::{ProfileRepository, ProfileRepositoryError};
pub use profiles_command::ProfilesCommand;
pub use profiles_query::ProfilesQuery;
pub use taxonomy_query::TaxonomyQuery;
#[cfg(test)]
pub use taxonomy_repository::MockTaxonomyRepository;
pub use taxonomy_repository::{TaxonomyRepository, TaxonomyRepositoryError};
#[cfg(test)]
pub use user_created_hook::MockUserCreatedHook;
pub use user_created_hook::UserCreatedHook;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{StoredAccount, UserPersistenceError, UserRepository};
