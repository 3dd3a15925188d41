//! Port abstraction for user persistence adapters and their errors.
//!
//! Users carry an optimistic concurrency `version`: new records start at
//! [`INITIAL_VERSION`](crate::domain::INITIAL_VERSION) and every successful
//! [`UserRepository::update`] bumps it by exactly one.

use async_trait::async_trait;

use crate::domain::{NewUser, User, UserChanges, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Stored values violated a column constraint.
        Validation { message: String } => "user record rejected: {message}",
        /// No user exists with the requested identifier.
        NotFound { id: UserId } => "user {id} not found",
        /// Optimistic concurrency check failed.
        VersionConflict { expected: u32, actual: u32 } =>
            "user version mismatch: expected {expected}, found {actual}",
    }
}

/// Storage for [`User`] records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a new user, assigning identity, timestamps and version.
    async fn create(&self, user: NewUser) -> Result<User, UserRepositoryError>;

    /// Every stored user in insertion order.
    async fn find_all(&self) -> Result<Vec<User>, UserRepositoryError>;

    /// Fetch a user by identifier; a missing id yields `Ok(None)`.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError>;

    /// Apply `changes` when the stored version equals `expected_version`.
    ///
    /// Returns [`UserRepositoryError::VersionConflict`] when the stored
    /// version differs and [`UserRepositoryError::NotFound`] when the user
    /// does not exist.
    async fn update(
        &self,
        id: &UserId,
        changes: UserChanges,
        expected_version: u32,
    ) -> Result<User, UserRepositoryError>;

    /// Remove a user together with their profile and posts.
    async fn delete(&self, id: &UserId) -> Result<(), UserRepositoryError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn version_conflict_reports_both_versions() {
        let message = UserRepositoryError::version_conflict(2_u32, 5_u32).to_string();
        assert!(message.contains("expected 2"));
        assert!(message.contains("found 5"));
    }

    #[rstest]
    fn not_found_names_the_user() {
        let id = UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("valid id");
        assert_eq!(
            UserRepositoryError::not_found(id).to_string(),
            "user 3fa85f64-5717-4562-b3fc-2c963f66afa6 not found"
        );
    }
}
