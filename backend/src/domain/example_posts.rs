//! Example post seeding.
//!
//! Populates an empty store with two author accounts and the two tutorial
//! posts so a fresh server answers `GET /posts` with ids 1 and 2.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::domain::ports::{PostRepository, PostRepositoryError, UserRepository, UserRepositoryError};
use crate::domain::{
    NewPost, NewUser, PasswordHashingError, PostContent, PostTitle, PostValidationError,
    UserRegistration, UserValidationError,
};

/// Tutorial post as seeded: author nickname, title, content.
const EXAMPLE_POSTS: [(&str, &str, &str); 2] = [
    ("author1", "title1", "content1"),
    ("author2", "title2", "content2"),
];
const EXAMPLE_LIKE_COUNT: u32 = 100_000;
const EXAMPLE_COMMENT_COUNT: u32 = 100;

/// Result of attempting to seed example posts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExamplePostsOutcome {
    /// Authors and posts were inserted.
    Seeded { users: usize, posts: usize },
    /// The store already held posts; nothing was written.
    Skipped { existing_posts: usize },
}

/// Errors raised while seeding example posts.
#[derive(Debug, Error)]
pub enum ExamplePostsError {
    /// A built-in author failed validation.
    #[error("example author failed validation: {0}")]
    InvalidAuthor(#[from] UserValidationError),
    /// A built-in post failed validation.
    #[error("example post failed validation: {0}")]
    InvalidPost(#[from] PostValidationError),
    /// Hashing an author's generated password failed.
    #[error("example author password could not be hashed: {0}")]
    Hashing(#[from] PasswordHashingError),
    /// Persisting an author failed.
    #[error("example author persistence error: {0}")]
    Users(#[from] UserRepositoryError),
    /// Persisting a post failed.
    #[error("example post persistence error: {0}")]
    Posts(#[from] PostRepositoryError),
}

/// Seeds the tutorial posts into an empty store.
#[derive(Clone)]
pub struct ExamplePostsSeeder<U, P> {
    users: Arc<U>,
    posts: Arc<P>,
}

impl<U, P> ExamplePostsSeeder<U, P> {
    /// Create a seeder writing through the given repositories.
    pub fn new(users: Arc<U>, posts: Arc<P>) -> Self {
        Self { users, posts }
    }
}

impl<U, P> ExamplePostsSeeder<U, P>
where
    U: UserRepository,
    P: PostRepository,
{
    /// Insert the example authors and posts unless posts already exist.
    ///
    /// # Errors
    ///
    /// Returns [`ExamplePostsError`] when validation or persistence fails.
    pub async fn seed(&self) -> Result<ExamplePostsOutcome, ExamplePostsError> {
        let existing_posts = self.posts.find_all().await?.len();
        if existing_posts > 0 {
            info!(existing_posts, "posts present; skipping example seeding");
            return Ok(ExamplePostsOutcome::Skipped { existing_posts });
        }

        for (nickname, title, content) in EXAMPLE_POSTS {
            let email = format!("{nickname}@example.com");
            let password = hex::encode(rand::random::<[u8; 16]>());
            let registration = UserRegistration::try_from_parts(nickname, &email, &password)?;
            let author = self
                .users
                .create(NewUser::from_registration(registration)?)
                .await?;

            self.posts
                .create(NewPost {
                    author_id: author.id,
                    title: PostTitle::new(title)?,
                    content: PostContent::new(content)?,
                    like_count: EXAMPLE_LIKE_COUNT,
                    comment_count: EXAMPLE_COMMENT_COUNT,
                })
                .await?;
        }

        info!(posts = EXAMPLE_POSTS.len(), "example posts seeded");
        Ok(ExamplePostsOutcome::Seeded {
            users: EXAMPLE_POSTS.len(),
            posts: EXAMPLE_POSTS.len(),
        })
    }
}
