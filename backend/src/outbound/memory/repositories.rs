//! Port implementations for [`InMemoryBlogStore`].

use async_trait::async_trait;

use super::{
    AccountRow, CommentRow, InMemoryBlogStore, PostRow, ProfileRow, newest_first,
};
use crate::domain::ports::{
    CommentRepository, CommentRepositoryError, LikeRepository, LikeRepositoryError,
    PostRepository, PostRepositoryError, ProfileRepository, ProfileRepositoryError,
    StoredAccount, TaxonomyRepository, TaxonomyRepositoryError, UserPersistenceError,
    UserRepository,
};
use crate::domain::{
    Category, CategoryId, Comment, CommentChanges, CommentDraft, CommentId, LikeTarget, Post,
    PostChanges, PostDraft, PostId, Profile, Tag, TagId, User, UserId, Username,
};

#[async_trait]
impl UserRepository for InMemoryBlogStore {
    async fn insert(&self, user: &User, password_hash: &str) -> Result<(), UserPersistenceError> {
        let mut state = self.lock();
        if state
            .users
            .values()
            .any(|row| row.username == *user.username())
        {
            return Err(UserPersistenceError::duplicate_username(
                user.username().as_ref(),
            ));
        }
        state.users.insert(
            *user.id(),
            AccountRow {
                username: user.username().clone(),
                password_hash: password_hash.to_owned(),
            },
        );
        Ok(())
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<StoredAccount>, UserPersistenceError> {
        let state = self.lock();
        Ok(state
            .users
            .iter()
            .find(|(_, row)| row.username.as_ref() == username)
            .map(|(id, row)| StoredAccount {
                user: User::new(*id, row.username.clone()),
                password_hash: row.password_hash.clone(),
            }))
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.lock().user(id))
    }
}

#[async_trait]
impl ProfileRepository for InMemoryBlogStore {
    async fn create_if_absent(
        &self,
        owner: &UserId,
        bio: &str,
    ) -> Result<bool, ProfileRepositoryError> {
        let now = self.now();
        let mut state = self.lock();
        if !state.users.contains_key(owner) {
            return Err(ProfileRepositoryError::unknown_user(owner.to_string()));
        }
        if state.profiles.contains_key(owner) {
            return Ok(false);
        }
        state.profiles.insert(
            *owner,
            ProfileRow {
                bio: bio.to_owned(),
                created_at: now,
                updated_at: now,
            },
        );
        Ok(true)
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<Profile>, ProfileRepositoryError> {
        let state = self.lock();
        Ok(state
            .users
            .iter()
            .find(|(_, row)| row.username == *username)
            .and_then(|(id, _)| state.profile(id)))
    }

    async fn list(&self) -> Result<Vec<Profile>, ProfileRepositoryError> {
        let state = self.lock();
        let mut profiles: Vec<Profile> = state
            .profiles
            .keys()
            .filter_map(|owner| state.profile(owner))
            .collect();
        profiles.sort_by(|a, b| a.owner.username().as_ref().cmp(b.owner.username().as_ref()));
        Ok(profiles)
    }

    async fn update_bio(
        &self,
        owner: &UserId,
        bio: &str,
    ) -> Result<Option<Profile>, ProfileRepositoryError> {
        let now = self.now();
        let mut state = self.lock();
        let Some(row) = state.profiles.get_mut(owner) else {
            return Ok(None);
        };
        row.bio = bio.to_owned();
        row.updated_at = now;
        Ok(state.profile(owner))
    }
}

#[async_trait]
impl TaxonomyRepository for InMemoryBlogStore {
    async fn list_categories(&self) -> Result<Vec<Category>, TaxonomyRepositoryError> {
        let mut categories: Vec<Category> = self.lock().categories.values().cloned().collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn find_category(
        &self,
        id: CategoryId,
    ) -> Result<Option<Category>, TaxonomyRepositoryError> {
        Ok(self.lock().categories.get(&id).cloned())
    }

    async fn list_tags(&self) -> Result<Vec<Tag>, TaxonomyRepositoryError> {
        let mut tags: Vec<Tag> = self.lock().tags.values().cloned().collect();
        tags.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(tags)
    }

    async fn find_tag(&self, id: TagId) -> Result<Option<Tag>, TaxonomyRepositoryError> {
        Ok(self.lock().tags.get(&id).cloned())
    }
}

fn dedup_tags(tags: &[TagId]) -> Vec<TagId> {
    let mut unique = Vec::with_capacity(tags.len());
    for tag in tags {
        if !unique.contains(tag) {
            unique.push(*tag);
        }
    }
    unique
}

#[async_trait]
impl PostRepository for InMemoryBlogStore {
    async fn create(
        &self,
        author: &UserId,
        draft: &PostDraft,
    ) -> Result<Post, PostRepositoryError> {
        let now = self.now();
        let mut state = self.lock();
        if !state.users.contains_key(author) {
            return Err(PostRepositoryError::unknown_reference(format!(
                "author {author}"
            )));
        }
        if let Some(category) = state.unknown_category(draft.category) {
            return Err(PostRepositoryError::unknown_reference(format!(
                "category {category}"
            )));
        }
        if let Some(tag) = state.unknown_tags(&draft.tags) {
            return Err(PostRepositoryError::unknown_reference(format!("tag {tag}")));
        }
        let id = PostId::new(state.next_id());
        state.posts.insert(
            id,
            PostRow {
                author: *author,
                title: draft.title.as_str().to_owned(),
                content: draft.content.as_str().to_owned(),
                category: draft.category,
                tags: dedup_tags(&draft.tags),
                created_at: now,
                updated_at: now,
            },
        );
        state
            .post(id)
            .ok_or_else(|| PostRepositoryError::query("inserted post vanished"))
    }

    async fn find(&self, id: PostId) -> Result<Option<Post>, PostRepositoryError> {
        Ok(self.lock().post(id))
    }

    async fn list(&self) -> Result<Vec<Post>, PostRepositoryError> {
        let state = self.lock();
        let mut keyed: Vec<_> = state
            .posts
            .keys()
            .filter_map(|id| state.post(*id))
            .map(|post| (post.id, post.created_at, post))
            .collect();
        newest_first(&mut keyed);
        Ok(keyed.into_iter().map(|(_, _, post)| post).collect())
    }

    async fn update(
        &self,
        id: PostId,
        changes: &PostChanges,
    ) -> Result<Option<Post>, PostRepositoryError> {
        let now = self.now();
        let mut state = self.lock();
        if let Some(category) = state.unknown_category(changes.category.flatten()) {
            return Err(PostRepositoryError::unknown_reference(format!(
                "category {category}"
            )));
        }
        if let Some(tag) = state.unknown_tags(changes.tags.as_deref().unwrap_or_default()) {
            return Err(PostRepositoryError::unknown_reference(format!("tag {tag}")));
        }
        let Some(row) = state.posts.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(title) = &changes.title {
            row.title = title.as_str().to_owned();
        }
        if let Some(content) = &changes.content {
            row.content = content.as_str().to_owned();
        }
        if let Some(category) = changes.category {
            row.category = category;
        }
        if let Some(tags) = &changes.tags {
            row.tags = dedup_tags(tags);
        }
        row.updated_at = now;
        Ok(state.post(id))
    }

    async fn delete(&self, id: PostId) -> Result<bool, PostRepositoryError> {
        let mut state = self.lock();
        let comment_ids: Vec<CommentId> = state
            .comments
            .iter()
            .filter(|(_, row)| row.post == id)
            .map(|(comment_id, _)| *comment_id)
            .collect();
        for comment_id in comment_ids {
            state.remove_comment(comment_id);
        }
        state.post_likes.retain(|(_, post)| *post != id);
        Ok(state.posts.remove(&id).is_some())
    }
}

#[async_trait]
impl CommentRepository for InMemoryBlogStore {
    async fn create(
        &self,
        author: &UserId,
        draft: &CommentDraft,
    ) -> Result<Comment, CommentRepositoryError> {
        let now = self.now();
        let mut state = self.lock();
        if !state.posts.contains_key(&draft.post) {
            return Err(CommentRepositoryError::unknown_post(draft.post.get()));
        }
        if !state.users.contains_key(author) {
            return Err(CommentRepositoryError::query(format!(
                "comment author {author} does not exist"
            )));
        }
        let id = CommentId::new(state.next_id());
        state.comments.insert(
            id,
            CommentRow {
                post: draft.post,
                author: *author,
                content: draft.content.as_str().to_owned(),
                created_at: now,
                updated_at: now,
            },
        );
        state
            .comment(id)
            .ok_or_else(|| CommentRepositoryError::query("inserted comment vanished"))
    }

    async fn find(&self, id: CommentId) -> Result<Option<Comment>, CommentRepositoryError> {
        Ok(self.lock().comment(id))
    }

    async fn list(&self) -> Result<Vec<Comment>, CommentRepositoryError> {
        Ok(self.sorted_comments(None))
    }

    async fn list_for_post(&self, post: PostId) -> Result<Vec<Comment>, CommentRepositoryError> {
        Ok(self.sorted_comments(Some(post)))
    }

    async fn update(
        &self,
        id: CommentId,
        changes: &CommentChanges,
    ) -> Result<Option<Comment>, CommentRepositoryError> {
        let now = self.now();
        let mut state = self.lock();
        let Some(row) = state.comments.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(content) = &changes.content {
            row.content = content.as_str().to_owned();
        }
        row.updated_at = now;
        Ok(state.comment(id))
    }

    async fn delete(&self, id: CommentId) -> Result<bool, CommentRepositoryError> {
        Ok(self.lock().remove_comment(id))
    }
}

impl InMemoryBlogStore {
    fn sorted_comments(&self, post: Option<PostId>) -> Vec<Comment> {
        let state = self.lock();
        let mut keyed: Vec<_> = state
            .comments
            .iter()
            .filter(|(_, row)| post.is_none_or(|post| row.post == post))
            .filter_map(|(id, _)| state.comment(*id))
            .map(|comment| (comment.id, comment.created_at, comment))
            .collect();
        newest_first(&mut keyed);
        keyed.into_iter().map(|(_, _, comment)| comment).collect()
    }
}

#[async_trait]
impl LikeRepository for InMemoryBlogStore {
    async fn create_if_absent(
        &self,
        user_id: &UserId,
        target: LikeTarget,
    ) -> Result<bool, LikeRepositoryError> {
        let mut state = self.lock();
        match target {
            LikeTarget::Post(post) => {
                if !state.posts.contains_key(&post) {
                    return Err(LikeRepositoryError::missing_target());
                }
                Ok(state.post_likes.insert((*user_id, post)))
            }
            LikeTarget::Comment(comment) => {
                if !state.comments.contains_key(&comment) {
                    return Err(LikeRepositoryError::missing_target());
                }
                Ok(state.comment_likes.insert((*user_id, comment)))
            }
        }
    }

    async fn delete(
        &self,
        user_id: &UserId,
        target: LikeTarget,
    ) -> Result<bool, LikeRepositoryError> {
        let mut state = self.lock();
        Ok(match target {
            LikeTarget::Post(post) => state.post_likes.remove(&(*user_id, post)),
            LikeTarget::Comment(comment) => state.comment_likes.remove(&(*user_id, comment)),
        })
    }

    async fn count(&self, target: LikeTarget) -> Result<u64, LikeRepositoryError> {
        let state = self.lock();
        let count = match target {
            LikeTarget::Post(id) => state.post_likes.iter().filter(|(_, p)| *p == id).count(),
            LikeTarget::Comment(id) => state
                .comment_likes
                .iter()
                .filter(|(_, c)| *c == id)
                .count(),
        };
        Ok(count as u64)
    }
}
