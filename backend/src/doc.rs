//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint of the inbound layer (posts,
//! users, health) together with the schema wrappers ([`ErrorSchema`],
//! [`ErrorCodeSchema`], [`PostSchema`], [`UserSchema`]) that describe domain
//! types without coupling them to utoipa.
//!
//! The generated document backs Swagger UI (debug builds) and is exported via
//! `cargo run --bin openapi-dump` for external tooling.

use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema, PostSchema, UserSchema};
use crate::inbound::http::users::CreateUserRequest;
use utoipa::OpenApi;

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Blog backend API",
        description = "Posts and users over JSON, plus health probes.",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0.html"
        )
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::posts::list_posts,
        crate::inbound::http::posts::get_post,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::create_user,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        PostSchema,
        UserSchema,
        ErrorSchema,
        ErrorCodeSchema,
        CreateUserRequest
    )),
    tags(
        (name = "posts", description = "Reading blog posts"),
        (name = "users", description = "Listing and registering users"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
