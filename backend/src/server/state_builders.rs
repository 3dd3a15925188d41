//! Builders wiring repositories into domain services for the HTTP state and
//! startup seeding.

use std::sync::Arc;

use actix_web::web;
use mockable::Clock;

use blog_backend::domain::ports::{PostRepository, UserRepository};
use blog_backend::domain::{
    ExamplePostsError, ExamplePostsOutcome, ExamplePostsSeeder, PostsService, UsersService,
};
use blog_backend::inbound::http::state::HttpState;
use blog_backend::outbound::persistence::{DieselPostRepository, DieselUserRepository};

use super::Storage;

/// Build HTTP state over one user repository and one post repository.
fn state_over<U, P>(users: Arc<U>, posts: Arc<P>) -> HttpState
where
    U: UserRepository + 'static,
    P: PostRepository + 'static,
{
    let users_service = Arc::new(UsersService::new(users));
    HttpState::new(
        Arc::new(PostsService::new(posts)),
        users_service.clone(),
        users_service,
    )
}

/// Build the handler state for the selected storage backend.
pub(crate) fn build_http_state(storage: &Storage, clock: &Arc<dyn Clock>) -> web::Data<HttpState> {
    let state = match storage {
        Storage::Memory(store) => state_over(store.clone(), store.clone()),
        Storage::Postgres(pool) => state_over(
            Arc::new(DieselUserRepository::new(pool.clone(), clock.clone())),
            Arc::new(DieselPostRepository::new(pool.clone(), clock.clone())),
        ),
    };
    web::Data::new(state)
}

/// Seed the example authors and posts into `storage` when it holds no posts.
pub async fn seed_example_posts(
    storage: &Storage,
    clock: &Arc<dyn Clock>,
) -> Result<ExamplePostsOutcome, ExamplePostsError> {
    match storage {
        Storage::Memory(store) => ExamplePostsSeeder::new(store.clone(), store.clone()).seed().await,
        Storage::Postgres(pool) => {
            ExamplePostsSeeder::new(
                Arc::new(DieselUserRepository::new(pool.clone(), clock.clone())),
                Arc::new(DieselPostRepository::new(pool.clone(), clock.clone())),
            )
            .seed()
            .await
        }
    }
}
