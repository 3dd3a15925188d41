//! Posts API handlers.
//!
//! ```text
//! GET /posts
//! GET /posts/{id}
//! ```

use actix_web::{get, web};
use tracing::debug;

use crate::domain::{Error, Post, PostId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, PostSchema};
use crate::inbound::http::state::HttpState;

/// List every post in insertion order.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use blog_backend::inbound::http::posts::list_posts;
///
/// let app = App::new().service(list_posts);
/// ```
#[utoipa::path(
    get,
    path = "/posts",
    responses(
        (status = 200, description = "Posts", body = [PostSchema]),
        (status = 503, description = "Store unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["posts"],
    operation_id = "listPosts"
)]
#[get("/posts")]
pub async fn list_posts(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<Post>>> {
    let posts = state.posts.list_posts().await?;
    Ok(web::Json(posts))
}

/// Fetch a single post.
///
/// Identifiers that are not positive integers cannot name a stored post, so
/// they answer 404 like any other unknown id.
#[utoipa::path(
    get,
    path = "/posts/{id}",
    params(("id" = i64, Path, description = "Post identifier")),
    responses(
        (status = 200, description = "Post", body = PostSchema),
        (status = 404, description = "Unknown post", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["posts"],
    operation_id = "getPost"
)]
#[get("/posts/{id}")]
pub async fn get_post(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Post>> {
    let raw = path.into_inner();
    let id = PostId::parse(&raw).map_err(|err| {
        debug!(id = %raw, error = %err, "rejecting unparseable post id");
        Error::not_found(format!("post {raw} not found"))
    })?;
    let post = state.posts.get_post(id).await?;
    Ok(web::Json(post))
}
