//! Posts domain service.
//!
//! Implements [`PostsQuery`] on top of a [`PostRepository`], turning
//! repository failures into API-facing [`Error`] values.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use crate::domain::ports::{PostRepository, PostRepositoryError, PostsQuery};
use crate::domain::{Error, Post, PostId};

/// Posts service implementing the read-side driving port.
#[derive(Clone)]
pub struct PostsService<R> {
    repository: Arc<R>,
}

impl<R> PostsService<R> {
    /// Create a new service backed by `repository`.
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }
}

/// Map a post repository failure onto the shared domain error.
pub(crate) fn map_post_error(error: PostRepositoryError) -> Error {
    match error {
        PostRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("post repository unavailable: {message}"))
        }
        PostRepositoryError::Query { message } => {
            Error::internal(format!("post repository error: {message}"))
        }
        PostRepositoryError::Validation { message } => Error::invalid_request(message),
        PostRepositoryError::AuthorNotFound { author_id } => {
            Error::invalid_request(format!("author {author_id} does not exist")).with_details(
                json!({ "field": "authorId", "code": "unknown_author" }),
            )
        }
        PostRepositoryError::NotFound { id } => Error::not_found(format!("post {id} not found")),
        PostRepositoryError::VersionConflict { expected, actual } => {
            Error::conflict("post version mismatch").with_details(json!({
                "expectedVersion": expected,
                "actualVersion": actual,
                "code": "version_mismatch",
            }))
        }
    }
}

#[async_trait]
impl<R> PostsQuery for PostsService<R>
where
    R: PostRepository,
{
    async fn list_posts(&self) -> Result<Vec<Post>, Error> {
        self.repository.find_all().await.map_err(|err| {
            debug!(error = %err, "listing posts failed");
            map_post_error(err)
        })
    }

    async fn get_post(&self, id: PostId) -> Result<Post, Error> {
        self.repository
            .find_by_id(&id)
            .await
            .map_err(map_post_error)?
            .ok_or_else(|| Error::not_found(format!("post {id} not found")))
    }
}
