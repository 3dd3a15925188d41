//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    FixturePostsQuery, FixtureUsersCommand, FixtureUsersQuery, PostsQuery, UsersCommand,
    UsersQuery,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub posts: Arc<dyn PostsQuery>,
    pub users: Arc<dyn UsersQuery>,
    pub users_command: Arc<dyn UsersCommand>,
}

impl HttpState {
    /// Construct state from explicit port implementations.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use blog_backend::domain::ports::{
    ///     FixturePostsQuery, FixtureUsersCommand, FixtureUsersQuery,
    /// };
    /// use blog_backend::inbound::http::state::HttpState;
    ///
    /// let state = HttpState::new(
    ///     Arc::new(FixturePostsQuery),
    ///     Arc::new(FixtureUsersQuery),
    ///     Arc::new(FixtureUsersCommand),
    /// );
    /// let _ = state.posts.clone();
    /// ```
    pub fn new(
        posts: Arc<dyn PostsQuery>,
        users: Arc<dyn UsersQuery>,
        users_command: Arc<dyn UsersCommand>,
    ) -> Self {
        Self {
            posts,
            users,
            users_command,
        }
    }

    /// State wired entirely to fixture ports.
    pub fn fixtures() -> Self {
        Self::new(
            Arc::new(FixturePostsQuery),
            Arc::new(FixtureUsersQuery),
            Arc::new(FixtureUsersCommand),
        )
    }
}
