//! Port abstraction for tag registration.

use async_trait::async_trait;

use crate::domain::{NewTag, Tag};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by tag repository adapters.
    pub enum TagRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "tag repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "tag repository query failed: {message}",
        /// A tag with the same name already exists.
        DuplicateName { name: String } => "tag {name} already exists",
    }
}

/// Storage for [`Tag`] records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TagRepository: Send + Sync {
    /// Register a tag under a unique name.
    async fn create(&self, tag: NewTag) -> Result<Tag, TagRepositoryError>;

    /// Every registered tag in insertion order.
    async fn find_all(&self) -> Result<Vec<Tag>, TagRepositoryError>;
}
