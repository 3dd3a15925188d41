//! Test helpers for inbound HTTP components.

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, test as actix_test, web};
use serde::de::DeserializeOwned;

use super::posts::{get_post, list_posts};
use super::state::HttpState;
use super::users::{create_user, list_users};
use super::validation::json_config;

/// Build an app exposing every resource handler over `state`.
pub fn test_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .app_data(json_config())
        .service(list_posts)
        .service(get_post)
        .service(list_users)
        .service(create_user)
}

/// Read a response body as JSON, panicking with the raw body on failure.
pub async fn read_json<T: DeserializeOwned>(response: ServiceResponse) -> T {
    let body = actix_test::read_body(response).await;
    serde_json::from_slice(&body).unwrap_or_else(|err| {
        panic!(
            "response body is not the expected JSON ({err}): {}",
            String::from_utf8_lossy(&body)
        )
    })
}
