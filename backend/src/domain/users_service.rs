//! Users domain service.
//!
//! Implements the [`UsersQuery`] and [`UsersCommand`] driving ports over a
//! [`UserRepository`]. Registration hashes the password before the record
//! reaches the repository.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, info};

use crate::domain::ports::{UserRepository, UserRepositoryError, UsersCommand, UsersQuery};
use crate::domain::{Error, NewUser, User, UserRegistration};

/// Users service implementing listing and registration.
#[derive(Clone)]
pub struct UsersService<R> {
    repository: Arc<R>,
}

impl<R> UsersService<R> {
    /// Create a new service backed by `repository`.
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }
}

/// Map a user repository failure onto the shared domain error.
pub(crate) fn map_user_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserRepositoryError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserRepositoryError::Validation { message } => Error::invalid_request(message),
        UserRepositoryError::NotFound { id } => Error::not_found(format!("user {id} not found")),
        UserRepositoryError::VersionConflict { expected, actual } => {
            Error::conflict("user version mismatch").with_details(json!({
                "expectedVersion": expected,
                "actualVersion": actual,
                "code": "version_mismatch",
            }))
        }
    }
}

#[async_trait]
impl<R> UsersQuery for UsersService<R>
where
    R: UserRepository,
{
    async fn list_users(&self) -> Result<Vec<User>, Error> {
        self.repository.find_all().await.map_err(|err| {
            debug!(error = %err, "listing users failed");
            map_user_error(err)
        })
    }
}

#[async_trait]
impl<R> UsersCommand for UsersService<R>
where
    R: UserRepository,
{
    async fn create_user(&self, registration: UserRegistration) -> Result<User, Error> {
        let new_user = NewUser::from_registration(registration)
            .map_err(|err| Error::internal(err.to_string()))?;
        let user = self.repository.create(new_user).await.map_err(|err| {
            debug!(error = %err, "creating user failed");
            map_user_error(err)
        })?;
        info!(user_id = %user.id, "user registered");
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockUserRepository;
    use crate::domain::{ErrorCode, INITIAL_VERSION, Password, PasswordHash, UserId};
    use chrono::Utc;
    use rstest::rstest;

    fn stored(new_user: NewUser) -> User {
        let now = Utc::now();
        User {
            id: UserId::random(),
            additional_id: 1,
            nickname: new_user.nickname,
            email: new_user.email,
            password_hash: new_user.password_hash,
            created_at: now,
            updated_at: now,
            version: INITIAL_VERSION,
        }
    }

    fn registration() -> UserRegistration {
        UserRegistration::try_from_parts("a", "a@example.com", "secret")
            .expect("valid registration")
    }

    #[tokio::test]
    async fn create_user_persists_hashed_password() {
        let mut repo = MockUserRepository::new();
        repo.expect_create()
            .withf(|new_user| {
                let password = Password::new("secret").expect("valid password");
                new_user.nickname.as_ref() == "a" && new_user.password_hash.verify(&password)
            })
            .times(1)
            .returning(|new_user| Ok(stored(new_user)));

        let user = UsersService::new(Arc::new(repo))
            .create_user(registration())
            .await
            .expect("user created");

        assert_eq!(user.email.as_ref(), "a@example.com");
        assert_eq!(user.version, INITIAL_VERSION);
    }

    #[tokio::test]
    async fn create_user_maps_repository_failures() {
        let mut repo = MockUserRepository::new();
        repo.expect_create()
            .return_once(|_| Err(UserRepositoryError::connection("refused")));

        let error = UsersService::new(Arc::new(repo))
            .create_user(registration())
            .await
            .expect_err("unavailable");

        assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
    }

    #[tokio::test]
    async fn list_users_returns_every_user() {
        let password = Password::new("secret").expect("valid password");
        let new_user = NewUser {
            nickname: crate::domain::Nickname::new("a").expect("valid nickname"),
            email: crate::domain::Email::new("a@example.com").expect("valid email"),
            password_hash: PasswordHash::derive(&password).expect("hash password"),
        };
        let user = stored(new_user);
        let expected = vec![user.clone()];
        let mut repo = MockUserRepository::new();
        repo.expect_find_all().return_once(move || Ok(vec![user]));

        let users = UsersService::new(Arc::new(repo))
            .list_users()
            .await
            .expect("users");

        assert_eq!(users, expected);
    }

    #[rstest]
    #[case(UserRepositoryError::query("boom"), ErrorCode::InternalError)]
    #[case(UserRepositoryError::validation("email too long"), ErrorCode::InvalidRequest)]
    #[case(UserRepositoryError::not_found(UserId::random()), ErrorCode::NotFound)]
    #[case(UserRepositoryError::version_conflict(2_u32, 3_u32), ErrorCode::Conflict)]
    fn repository_errors_map_to_error_codes(
        #[case] error: UserRepositoryError,
        #[case] expected: ErrorCode,
    ) {
        assert_eq!(map_user_error(error).code(), expected);
    }
}
