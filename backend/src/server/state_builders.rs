//! Builds the handler state from whichever storage backend is configured.

use std::sync::Arc;

use backend::inbound::http::state::{HttpState, Repositories};
use backend::outbound::memory::InMemoryBlogStore;
use backend::outbound::password::BcryptPasswordHasher;
use backend::outbound::persistence::{
    DbPool, DieselCommentRepository, DieselLikeRepository, DieselPostRepository,
    DieselProfileRepository, DieselTaxonomyRepository, DieselUserRepository,
};
use tracing::{info, warn};

fn diesel_state(pool: &DbPool, hasher: Arc<BcryptPasswordHasher>) -> HttpState {
    HttpState::from_repositories(
        Repositories {
            users: Arc::new(DieselUserRepository::new(pool.clone())),
            profiles: Arc::new(DieselProfileRepository::new(pool.clone())),
            posts: Arc::new(DieselPostRepository::new(pool.clone())),
            comments: Arc::new(DieselCommentRepository::new(pool.clone())),
            likes: Arc::new(DieselLikeRepository::new(pool.clone())),
            taxonomy: Arc::new(DieselTaxonomyRepository::new(pool.clone())),
        },
        hasher,
    )
}

fn memory_state(hasher: Arc<BcryptPasswordHasher>) -> HttpState {
    let store = Arc::new(InMemoryBlogStore::default());
    HttpState::from_repositories(
        Repositories {
            users: store.clone(),
            profiles: store.clone(),
            posts: store.clone(),
            comments: store.clone(),
            likes: store.clone(),
            taxonomy: store,
        },
        hasher,
    )
}

/// PostgreSQL adapters when a pool is configured, otherwise one in-memory
/// store shared by every port.
pub(super) fn build_http_state(pool: Option<&DbPool>) -> HttpState {
    let hasher = Arc::new(BcryptPasswordHasher::default());
    match pool {
        Some(pool) => {
            info!("using PostgreSQL repositories");
            diesel_state(pool, hasher)
        }
        None => {
            warn!("no database configured; data lives in memory and is lost on restart");
            memory_state(hasher)
        }
    }
}
