//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and only ever see driving
//! ports, so they stay testable against in-memory adapters.

use std::sync::Arc;

use crate::domain::ports::{
    AccountsCommand, CommentRepository, CommentsCommand, CommentsQuery, LikeRepository,
    LikesCommand, PasswordHasher, PostRepository, PostsCommand, PostsQuery, ProfileRepository,
    ProfilesCommand, ProfilesQuery, TaxonomyQuery, TaxonomyRepository, UserRepository,
};
use crate::domain::{
    AccountService, CommentService, LikeService, PostService, ProfileProvisioningHook,
    ProfileService, TaxonomyService,
};

/// Driving ports used by the HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn AccountsCommand>,
    pub posts: Arc<dyn PostsCommand>,
    pub posts_query: Arc<dyn PostsQuery>,
    pub comments: Arc<dyn CommentsCommand>,
    pub comments_query: Arc<dyn CommentsQuery>,
    pub likes: Arc<dyn LikesCommand>,
    pub profiles: Arc<dyn ProfilesCommand>,
    pub profiles_query: Arc<dyn ProfilesQuery>,
    pub taxonomy: Arc<dyn TaxonomyQuery>,
}

/// Repository adapters the domain services are assembled from.
///
/// One adapter type may back several ports; the in-memory store fills every
/// slot with clones of the same `Arc`.
pub struct Repositories<U, Pr, Po, C, L, T> {
    pub users: Arc<U>,
    pub profiles: Arc<Pr>,
    pub posts: Arc<Po>,
    pub comments: Arc<C>,
    pub likes: Arc<L>,
    pub taxonomy: Arc<T>,
}

impl HttpState {
    /// Wire the domain services over `repos`.
    ///
    /// Registration and login run the profile provisioning hook.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use backend::inbound::http::state::{HttpState, Repositories};
    /// use backend::outbound::memory::InMemoryBlogStore;
    /// use backend::outbound::password::BcryptPasswordHasher;
    ///
    /// let store = Arc::new(InMemoryBlogStore::default());
    /// let state = HttpState::from_repositories(
    ///     Repositories {
    ///         users: store.clone(),
    ///         profiles: store.clone(),
    ///         posts: store.clone(),
    ///         comments: store.clone(),
    ///         likes: store.clone(),
    ///         taxonomy: store,
    ///     },
    ///     Arc::new(BcryptPasswordHasher::default()),
    /// );
    /// let _accounts = state.accounts.clone();
    /// ```
    pub fn from_repositories<U, Pr, Po, C, L, T, H>(
        repos: Repositories<U, Pr, Po, C, L, T>,
        hasher: Arc<H>,
    ) -> Self
    where
        U: UserRepository + 'static,
        Pr: ProfileRepository + 'static,
        Po: PostRepository + 'static,
        C: CommentRepository + 'static,
        L: LikeRepository + 'static,
        T: TaxonomyRepository + 'static,
        H: PasswordHasher + 'static,
    {
        let Repositories {
            users,
            profiles,
            posts,
            comments,
            likes,
            taxonomy,
        } = repos;

        let provisioning = Arc::new(ProfileProvisioningHook::new(profiles.clone()));
        let accounts = Arc::new(AccountService::new(users, hasher).with_hook(provisioning));
        let post_service = Arc::new(PostService::new(posts.clone(), taxonomy.clone()));
        let comment_service = Arc::new(CommentService::new(comments.clone(), posts.clone()));
        let like_service = Arc::new(LikeService::new(likes, posts, comments));
        let profile_service = Arc::new(ProfileService::new(profiles));
        let taxonomy_service = Arc::new(TaxonomyService::new(taxonomy));

        Self {
            accounts,
            posts: post_service.clone(),
            posts_query: post_service,
            comments: comment_service.clone(),
            comments_query: comment_service,
            likes: like_service,
            profiles: profile_service.clone(),
            profiles_query: profile_service,
            taxonomy: taxonomy_service,
        }
    }
}
