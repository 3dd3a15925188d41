//! Domain primitives, ports and services.
//!
//! Purpose: define the strongly typed entities shared by the HTTP and
//! persistence layers, the ports adapters implement, and the services that
//! drive a single use case each. Serialisation contracts (serde) and
//! invariants are documented on each type.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic error payload.
//! - User, Profile, Post, Tag: stored entities with their insert payloads.
//! - PostsService / UsersService: driving-port implementations.
//! - entity_map: explicit field-to-column mapping for every entity.

pub mod entity_map;
pub mod er_diagram;
pub mod error;
pub mod example_posts;
pub mod password;
pub mod ports;
pub mod post;
pub mod posts_service;
pub mod profile;
pub mod tag;
pub mod trace_id;
pub mod user;
pub mod users_service;

pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::example_posts::{ExamplePostsError, ExamplePostsOutcome, ExamplePostsSeeder};
pub use self::password::{
    Password, PasswordHash, PasswordHashParseError, PasswordHashingError, PasswordValidationError,
};
pub use self::post::{
    NewPost, Post, PostChanges, PostContent, PostId, PostTitle, PostValidationError,
};
pub use self::posts_service::PostsService;
pub use self::profile::{NewProfile, Profile, ProfileId};
pub use self::tag::{NewTag, Tag, TagId, TagName, TagValidationError};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    Email, INITIAL_VERSION, NewUser, Nickname, User, UserChanges, UserId, UserRegistration,
    UserValidationError,
};
pub use self::users_service::UsersService;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use blog_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::not_found("post 3 not found"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
