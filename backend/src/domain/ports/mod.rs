//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`) are implemented by the outbound adapters;
//! driving ports (`*Query`, `*Command`) are implemented by the domain services
//! and consumed by the HTTP handlers.

mod macros;
pub(crate) use macros::define_port_error;

mod post_repository;
mod posts_query;
mod profile_repository;
mod tag_repository;
mod user_repository;
mod users_command;
mod users_query;

#[cfg(test)]
pub use post_repository::MockPostRepository;
pub use post_repository::{PostRepository, PostRepositoryError};
pub use posts_query::{FixturePostsQuery, PostsQuery};
#[cfg(test)]
pub use profile_repository::MockProfileRepository;
pub use profile_repository::{ProfileRepository, ProfileRepositoryError};
#[cfg(test)]
pub use tag_repository::MockTagRepository;
pub use tag_repository::{TagRepository, TagRepositoryError};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserRepository, UserRepositoryError};
pub use users_command::{FixtureUsersCommand, UsersCommand};
pub use users_query::{FixtureUsersQuery, UsersQuery};
