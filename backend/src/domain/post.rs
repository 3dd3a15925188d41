//! Post data model.
//!
//! Posts belong to exactly one [`User`](super::User) through `author_id`; the
//! repository rejects posts whose author does not exist.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use super::UserId;

/// Validation errors for post components.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PostValidationError {
    #[error("post id must be a positive integer")]
    InvalidId,
    #[error("title must not be empty")]
    EmptyTitle,
    #[error("title must be at most {max} characters")]
    TitleTooLong { max: usize },
    #[error("content must not be empty")]
    EmptyContent,
}

/// Store-generated post identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct PostId(i64);

impl PostId {
    /// Wrap a positive identifier.
    pub fn new(id: i64) -> Result<Self, PostValidationError> {
        if id < 1 {
            return Err(PostValidationError::InvalidId);
        }
        Ok(Self(id))
    }

    /// Parse a path segment such as `"42"`.
    ///
    /// # Examples
    /// ```
    /// use blog_backend::domain::PostId;
    ///
    /// assert_eq!(PostId::parse("42").map(|id| id.get()), Ok(42));
    /// assert!(PostId::parse("abc").is_err());
    /// assert!(PostId::parse("0").is_err());
    /// ```
    pub fn parse(raw: &str) -> Result<Self, PostValidationError> {
        raw.parse::<i64>()
            .map_err(|_| PostValidationError::InvalidId)
            .and_then(Self::new)
    }

    /// Raw identifier value.
    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Maximum allowed length for a post title.
pub const TITLE_MAX: usize = 200;

/// Non-empty post title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PostTitle(String);

impl PostTitle {
    /// Validate and construct a [`PostTitle`].
    pub fn new(title: impl Into<String>) -> Result<Self, PostValidationError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(PostValidationError::EmptyTitle);
        }
        if title.chars().count() > TITLE_MAX {
            return Err(PostValidationError::TitleTooLong { max: TITLE_MAX });
        }
        Ok(Self(title))
    }
}

impl AsRef<str> for PostTitle {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Non-empty post body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PostContent(String);

impl PostContent {
    /// Validate and construct a [`PostContent`].
    pub fn new(content: impl Into<String>) -> Result<Self, PostValidationError> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(PostValidationError::EmptyContent);
        }
        Ok(Self(content))
    }
}

impl AsRef<str> for PostContent {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Insert payload for the post repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub author_id: UserId,
    pub title: PostTitle,
    pub content: PostContent,
    pub like_count: u32,
    pub comment_count: u32,
}

/// Partial update applied under an optimistic version check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostChanges {
    pub title: Option<PostTitle>,
    pub content: Option<PostContent>,
    pub like_count: Option<u32>,
    pub comment_count: Option<u32>,
}

/// Blog post as stored.
///
/// Counters are unsigned, so `likeCount` and `commentCount` can never go
/// negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: PostId,
    pub author_id: UserId,
    pub title: PostTitle,
    pub content: PostContent,
    pub like_count: u32,
    pub comment_count: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub version: u32,
}
