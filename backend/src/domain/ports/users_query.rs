//! Driving port for user-facing queries.
//!
//! Inbound adapters (HTTP handlers) use this port to fetch user-visible data
//! without importing outbound persistence concerns.

use async_trait::async_trait;

use crate::domain::{Error, User};

use super::users_command::fixture_user;

/// Domain use-case port for listing users.
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// Every registered user in insertion order.
    async fn list_users(&self) -> Result<Vec<User>, Error>;
}

/// Fixture users query returning a single well-known user.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUsersQuery;

#[async_trait]
impl UsersQuery for FixtureUsersQuery {
    async fn list_users(&self) -> Result<Vec<User>, Error> {
        const FIXTURE_NICKNAME: &str = "ada";
        const FIXTURE_EMAIL: &str = "ada@example.com";

        Ok(vec![fixture_user(FIXTURE_NICKNAME, FIXTURE_EMAIL)?])
    }
}
