//! Process-wide in-memory store implementing every repository port.
//!
//! Used when no database URL is configured and by the HTTP integration
//! tests. All collections live behind one mutex so cross-entity checks
//! (author exists, cascade on delete) see a consistent snapshot. Records are
//! kept in insertion order and numeric identifiers come from monotonic
//! counters, so an id is never handed out twice even after deletion.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use mockable::Clock;

use crate::domain::ports::{
    PostRepository, PostRepositoryError, ProfileRepository, ProfileRepositoryError,
    TagRepository, TagRepositoryError, UserRepository, UserRepositoryError,
};
use crate::domain::{
    INITIAL_VERSION, NewPost, NewProfile, NewTag, NewUser, Post, PostChanges, PostId, Profile,
    ProfileId, Tag, TagId, User, UserChanges, UserId,
};

#[derive(Debug)]
struct StoreState {
    users: Vec<User>,
    profiles: Vec<Profile>,
    posts: Vec<Post>,
    tags: Vec<Tag>,
    next_additional_id: i64,
    next_profile_id: i64,
    next_post_id: i64,
    next_tag_id: i64,
}

impl Default for StoreState {
    fn default() -> Self {
        Self {
            users: Vec::new(),
            profiles: Vec::new(),
            posts: Vec::new(),
            tags: Vec::new(),
            next_additional_id: 1,
            next_profile_id: 1,
            next_post_id: 1,
            next_tag_id: 1,
        }
    }
}

fn take_next(counter: &mut i64) -> i64 {
    let id = *counter;
    *counter += 1;
    id
}

/// Mutex-guarded collections of users, profiles, posts and tags.
pub struct InMemoryStore {
    state: Mutex<StoreState>,
    clock: Arc<dyn Clock>,
}

impl InMemoryStore {
    /// Create an empty store stamping records with `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Mutex::new(StoreState::default()),
            clock,
        }
    }

    fn state(&self) -> MutexGuard<'_, StoreState> {
        // Mutations finish before the guard drops; poisoning leaves state intact.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create(&self, user: NewUser) -> Result<User, UserRepositoryError> {
        let now = self.clock.utc();
        let mut state = self.state();
        let mut id = UserId::random();
        while state.users.iter().any(|existing| existing.id == id) {
            id = UserId::random();
        }
        let stored = User {
            id,
            additional_id: take_next(&mut state.next_additional_id),
            nickname: user.nickname,
            email: user.email,
            password_hash: user.password_hash,
            created_at: now,
            updated_at: now,
            version: INITIAL_VERSION,
        };
        state.users.push(stored.clone());
        Ok(stored)
    }

    async fn find_all(&self) -> Result<Vec<User>, UserRepositoryError> {
        Ok(self.state().users.clone())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        Ok(self.state().users.iter().find(|user| user.id == *id).cloned())
    }

    async fn update(
        &self,
        id: &UserId,
        changes: UserChanges,
        expected_version: u32,
    ) -> Result<User, UserRepositoryError> {
        let now = self.clock.utc();
        let mut state = self.state();
        let user = state
            .users
            .iter_mut()
            .find(|user| user.id == *id)
            .ok_or_else(|| UserRepositoryError::not_found(*id))?;
        if user.version != expected_version {
            return Err(UserRepositoryError::version_conflict(
                expected_version,
                user.version,
            ));
        }
        let next_version = user
            .version
            .checked_add(1)
            .ok_or_else(|| UserRepositoryError::query("user version overflow"))?;

        let UserChanges { nickname, email } = changes;
        if let Some(nickname) = nickname {
            user.nickname = nickname;
        }
        if let Some(email) = email {
            user.email = email;
        }
        user.version = next_version;
        user.updated_at = now;
        Ok(user.clone())
    }

    async fn delete(&self, id: &UserId) -> Result<(), UserRepositoryError> {
        let mut state = self.state();
        let before = state.users.len();
        state.users.retain(|user| user.id != *id);
        if state.users.len() == before {
            return Err(UserRepositoryError::not_found(*id));
        }
        state.profiles.retain(|profile| profile.user_id != *id);
        state.posts.retain(|post| post.author_id != *id);
        Ok(())
    }
}

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn create(&self, post: NewPost) -> Result<Post, PostRepositoryError> {
        let now = self.clock.utc();
        let mut state = self.state();
        if !state.users.iter().any(|user| user.id == post.author_id) {
            return Err(PostRepositoryError::author_not_found(post.author_id));
        }
        let id = PostId::new(take_next(&mut state.next_post_id))
            .map_err(|err| PostRepositoryError::query(err.to_string()))?;
        let stored = Post {
            id,
            author_id: post.author_id,
            title: post.title,
            content: post.content,
            like_count: post.like_count,
            comment_count: post.comment_count,
            created_at: now,
            updated_at: now,
            version: INITIAL_VERSION,
        };
        state.posts.push(stored.clone());
        Ok(stored)
    }

    async fn find_all(&self) -> Result<Vec<Post>, PostRepositoryError> {
        Ok(self.state().posts.clone())
    }

    async fn find_by_id(&self, id: &PostId) -> Result<Option<Post>, PostRepositoryError> {
        Ok(self.state().posts.iter().find(|post| post.id == *id).cloned())
    }

    async fn update(
        &self,
        id: &PostId,
        changes: PostChanges,
        expected_version: u32,
    ) -> Result<Post, PostRepositoryError> {
        let now = self.clock.utc();
        let mut state = self.state();
        let post = state
            .posts
            .iter_mut()
            .find(|post| post.id == *id)
            .ok_or_else(|| PostRepositoryError::not_found(*id))?;
        if post.version != expected_version {
            return Err(PostRepositoryError::version_conflict(
                expected_version,
                post.version,
            ));
        }
        let next_version = post
            .version
            .checked_add(1)
            .ok_or_else(|| PostRepositoryError::query("post version overflow"))?;

        let PostChanges {
            title,
            content,
            like_count,
            comment_count,
        } = changes;
        if let Some(title) = title {
            post.title = title;
        }
        if let Some(content) = content {
            post.content = content;
        }
        if let Some(like_count) = like_count {
            post.like_count = like_count;
        }
        if let Some(comment_count) = comment_count {
            post.comment_count = comment_count;
        }
        post.version = next_version;
        post.updated_at = now;
        Ok(post.clone())
    }

    async fn delete(&self, id: &PostId) -> Result<(), PostRepositoryError> {
        let mut state = self.state();
        let before = state.posts.len();
        state.posts.retain(|post| post.id != *id);
        if state.posts.len() == before {
            return Err(PostRepositoryError::not_found(*id));
        }
        Ok(())
    }
}

#[async_trait]
impl ProfileRepository for InMemoryStore {
    async fn create(&self, profile: NewProfile) -> Result<Profile, ProfileRepositoryError> {
        let now = self.clock.utc();
        let mut state = self.state();
        if !state.users.iter().any(|user| user.id == profile.user_id) {
            return Err(ProfileRepositoryError::user_not_found(profile.user_id));
        }
        if state
            .profiles
            .iter()
            .any(|existing| existing.user_id == profile.user_id)
        {
            return Err(ProfileRepositoryError::already_exists(profile.user_id));
        }
        let stored = Profile {
            id: ProfileId(take_next(&mut state.next_profile_id)),
            user_id: profile.user_id,
            profile_image: profile.profile_image,
            created_at: now,
        };
        state.profiles.push(stored.clone());
        Ok(stored)
    }

    async fn find_by_user_id(
        &self,
        user_id: &UserId,
    ) -> Result<Option<Profile>, ProfileRepositoryError> {
        Ok(self
            .state()
            .profiles
            .iter()
            .find(|profile| profile.user_id == *user_id)
            .cloned())
    }
}

#[async_trait]
impl TagRepository for InMemoryStore {
    async fn create(&self, tag: NewTag) -> Result<Tag, TagRepositoryError> {
        let now = self.clock.utc();
        let mut state = self.state();
        if state.tags.iter().any(|existing| existing.name == tag.name) {
            return Err(TagRepositoryError::duplicate_name(tag.name.to_string()));
        }
        let stored = Tag {
            id: TagId(take_next(&mut state.next_tag_id)),
            name: tag.name,
            created_at: now,
        };
        state.tags.push(stored.clone());
        Ok(stored)
    }

    async fn find_all(&self) -> Result<Vec<Tag>, TagRepositoryError> {
        Ok(self.state().tags.clone())
    }
}
