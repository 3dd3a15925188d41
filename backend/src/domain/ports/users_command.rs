//! Driving port for user registration.

use async_trait::async_trait;
use chrono::DateTime;

use crate::domain::{
    Email, Error, INITIAL_VERSION, Nickname, Password, PasswordHash, User, UserId,
    UserRegistration,
};

/// Domain use-case port for creating users.
#[async_trait]
pub trait UsersCommand: Send + Sync {
    /// Register a user from validated input, returning the stored record.
    async fn create_user(&self, registration: UserRegistration) -> Result<User, Error>;
}

/// Fixture command echoing the registration back as a stored user.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUsersCommand;

#[async_trait]
impl UsersCommand for FixtureUsersCommand {
    async fn create_user(&self, registration: UserRegistration) -> Result<User, Error> {
        let mut user = fixture_user(registration.nickname.as_ref(), registration.email.as_ref())?;
        user.password_hash = PasswordHash::derive(&registration.password)
            .map_err(|err| Error::internal(err.to_string()))?;
        Ok(user)
    }
}

pub(super) fn fixture_user(nickname: &str, email: &str) -> Result<User, Error> {
    const FIXTURE_ID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";
    const FIXTURE_PASSWORD: &str = "fixture-password";
    const CREATED_AT_SECS: i64 = 1_704_067_200;

    let id = UserId::new(FIXTURE_ID)
        .map_err(|err| Error::internal(format!("invalid fixture user id: {err}")))?;
    let nickname = Nickname::new(nickname)
        .map_err(|err| Error::internal(format!("invalid fixture nickname: {err}")))?;
    let email = Email::new(email)
        .map_err(|err| Error::internal(format!("invalid fixture email: {err}")))?;
    let password = Password::new(FIXTURE_PASSWORD)
        .map_err(|err| Error::internal(format!("invalid fixture password: {err}")))?;
    let created_at = DateTime::from_timestamp(CREATED_AT_SECS, 0)
        .ok_or_else(|| Error::internal("invalid fixture timestamp"))?;

    Ok(User {
        id,
        additional_id: 1,
        nickname,
        email,
        password_hash: PasswordHash::derive(&password)
            .map_err(|err| Error::internal(format!("invalid fixture password: {err}")))?,
        created_at,
        updated_at: created_at,
        version: INITIAL_VERSION,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn fixture_command_keeps_registration_fields() {
        let registration = UserRegistration::try_from_parts("a", "a@example.com", "secret")
            .expect("valid registration");

        let user = FixtureUsersCommand
            .create_user(registration)
            .await
            .expect("user created");

        assert_eq!(user.nickname.as_ref(), "a");
        assert_eq!(user.email.as_ref(), "a@example.com");
        assert_eq!(user.created_at, user.updated_at);
        assert!(user.password_hash.verify(&Password::new("secret").expect("valid password")));
    }
}
