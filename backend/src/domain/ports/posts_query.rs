//! Driving port for reading posts.
//!
//! HTTP handlers depend on this trait rather than the repository so the
//! mapping from persistence failures to API errors lives in one place.

use async_trait::async_trait;
use chrono::DateTime;

use crate::domain::{Error, Post, PostContent, PostId, PostTitle, UserId};

/// Domain use-case port for listing and fetching posts.
#[async_trait]
pub trait PostsQuery: Send + Sync {
    /// Every post in insertion order.
    async fn list_posts(&self) -> Result<Vec<Post>, Error>;

    /// Fetch one post, failing with `not_found` when it does not exist.
    async fn get_post(&self, id: PostId) -> Result<Post, Error>;
}

/// Deterministic posts query serving the two tutorial posts.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePostsQuery;

impl FixturePostsQuery {
    const AUTHOR_ID: &'static str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";
    const CREATED_AT_SECS: i64 = 1_704_067_200;

    fn posts() -> Result<Vec<Post>, Error> {
        let author_id = UserId::new(Self::AUTHOR_ID)
            .map_err(|err| Error::internal(format!("invalid fixture author id: {err}")))?;
        let created_at = DateTime::from_timestamp(Self::CREATED_AT_SECS, 0)
            .ok_or_else(|| Error::internal("invalid fixture timestamp"))?;

        [(1, "title1", "content1"), (2, "title2", "content2")]
            .into_iter()
            .map(|(id, title, content)| {
                Ok(Post {
                    id: PostId::new(id)
                        .map_err(|err| Error::internal(format!("invalid fixture id: {err}")))?,
                    author_id,
                    title: PostTitle::new(title)
                        .map_err(|err| Error::internal(format!("invalid fixture title: {err}")))?,
                    content: PostContent::new(content).map_err(|err| {
                        Error::internal(format!("invalid fixture content: {err}"))
                    })?,
                    like_count: 100_000,
                    comment_count: 100,
                    created_at,
                    updated_at: created_at,
                    version: 1,
                })
            })
            .collect()
    }
}

#[async_trait]
impl PostsQuery for FixturePostsQuery {
    async fn list_posts(&self) -> Result<Vec<Post>, Error> {
        Self::posts()
    }

    async fn get_post(&self, id: PostId) -> Result<Post, Error> {
        Self::posts()?
            .into_iter()
            .find(|post| post.id == id)
            .ok_or_else(|| Error::not_found(format!("post {id} not found")))
    }
}
