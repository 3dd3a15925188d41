//! Port abstraction for post persistence adapters.

use async_trait::async_trait;

use crate::domain::{NewPost, Post, PostChanges, PostId, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by post repository adapters.
    pub enum PostRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "post repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "post repository query failed: {message}",
        /// Stored values violated a column constraint.
        Validation { message: String } => "post record rejected: {message}",
        /// The referenced author does not exist.
        AuthorNotFound { author_id: UserId } => "author {author_id} not found",
        /// No post exists with the requested identifier.
        NotFound { id: PostId } => "post {id} not found",
        /// Optimistic concurrency check failed.
        VersionConflict { expected: u32, actual: u32 } =>
            "post version mismatch: expected {expected}, found {actual}",
    }
}

/// Storage for [`Post`] records.
///
/// Every post references an existing author; adapters reject inserts whose
/// `author_id` does not resolve with [`PostRepositoryError::AuthorNotFound`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Persist a new post, assigning identity, timestamps and version.
    async fn create(&self, post: NewPost) -> Result<Post, PostRepositoryError>;

    /// Every stored post in insertion order.
    async fn find_all(&self) -> Result<Vec<Post>, PostRepositoryError>;

    /// Fetch a post by identifier; a missing id yields `Ok(None)`.
    async fn find_by_id(&self, id: &PostId) -> Result<Option<Post>, PostRepositoryError>;

    /// Apply `changes` when the stored version equals `expected_version`.
    async fn update(
        &self,
        id: &PostId,
        changes: PostChanges,
        expected_version: u32,
    ) -> Result<Post, PostRepositoryError>;

    /// Remove a post. Its identifier is never handed out again.
    async fn delete(&self, id: &PostId) -> Result<(), PostRepositoryError>;
}
