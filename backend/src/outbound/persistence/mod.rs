//! PostgreSQL persistence adapters built on Diesel.
//!
//! Each repository implements one driven port from [`crate::domain::ports`].
//! Row structs and the table definitions stay private to this module; the
//! adapters translate rows into domain types and Diesel errors into port
//! errors.
//!
//! ```ignore
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/blog")).await?;
//! let likes = DieselLikeRepository::new(pool.clone());
//! ```

mod diesel_comment_repository;
mod diesel_like_repository;
mod diesel_post_repository;
mod diesel_profile_repository;
mod diesel_taxonomy_repository;
mod diesel_user_repository;
mod error_mapping;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_comment_repository::DieselCommentRepository;
pub use diesel_like_repository::DieselLikeRepository;
pub use diesel_post_repository::DieselPostRepository;
pub use diesel_profile_repository::DieselProfileRepository;
pub use diesel_taxonomy_repository::DieselTaxonomyRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
