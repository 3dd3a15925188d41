//! Port abstraction for profile persistence.

use async_trait::async_trait;

use crate::domain::{NewProfile, Profile, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by profile repository adapters.
    pub enum ProfileRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "profile repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "profile repository query failed: {message}",
        /// The owning user does not exist.
        UserNotFound { user_id: UserId } => "user {user_id} not found",
        /// The user already owns a profile.
        AlreadyExists { user_id: UserId } => "user {user_id} already has a profile",
    }
}

/// Storage for the one-to-one [`Profile`] side of a user.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Attach a profile to an existing user.
    async fn create(&self, profile: NewProfile) -> Result<Profile, ProfileRepositoryError>;

    /// Fetch the profile owned by `user_id`, if any.
    async fn find_by_user_id(
        &self,
        user_id: &UserId,
    ) -> Result<Option<Profile>, ProfileRepositoryError>;
}
