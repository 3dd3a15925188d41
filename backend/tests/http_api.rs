//! End-to-end HTTP scenarios over the in-memory store seeded with the
//! example posts.

use std::sync::Arc;
use std::time::Duration;

use actix_web::body::{BoxBody, MessageBody};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use mockable::{Clock, DefaultClock};
use rstest::{fixture, rstest};
use serde_json::{Value, json};

use blog_backend::Trace;
use blog_backend::domain::{ExamplePostsOutcome, ExamplePostsSeeder, PostsService, UsersService};
use blog_backend::inbound::http::posts::{get_post, list_posts};
use blog_backend::inbound::http::state::HttpState;
use blog_backend::inbound::http::users::{create_user, list_users};
use blog_backend::inbound::http::validation::json_config;
use blog_backend::middleware::RequestTimeout;
use blog_backend::outbound::memory::InMemoryStore;

#[fixture]
fn store() -> Arc<InMemoryStore> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    Arc::new(InMemoryStore::new(clock))
}

async fn seeded_app(
    store: Arc<InMemoryStore>,
) -> impl Service<
    actix_http::Request,
    Response = ServiceResponse<BoxBody>,
    Error = actix_web::Error,
> {
    let outcome = ExamplePostsSeeder::new(store.clone(), store.clone())
        .seed()
        .await
        .expect("seeding succeeds");
    assert_eq!(outcome, ExamplePostsOutcome::Seeded { users: 2, posts: 2 });

    let users = Arc::new(UsersService::new(store.clone()));
    let state = HttpState::new(
        Arc::new(PostsService::new(store)),
        users.clone(),
        users,
    );

    test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .app_data(json_config())
            .wrap(RequestTimeout::new(Duration::from_secs(5)))
            .wrap(Trace)
            .service(list_posts)
            .service(get_post)
            .service(list_users)
            .service(create_user),
    )
    .await
}

async fn get_json<S, B>(app: &S, uri: &str) -> (StatusCode, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let response = test::call_service(app, test::TestRequest::get().uri(uri).to_request()).await;
    let status = response.status();
    let body = test::read_body(response).await;
    let value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).expect("JSON body")
    };
    (status, value)
}

#[rstest]
#[actix_web::test]
async fn list_then_get_returns_equal_posts(store: Arc<InMemoryStore>) {
    let app = seeded_app(store).await;

    let (status, posts) = get_json(&app, "/posts").await;
    assert_eq!(status, StatusCode::OK);
    let posts = posts.as_array().expect("array").clone();
    let titles: Vec<&str> = posts
        .iter()
        .filter_map(|post| post.get("title").and_then(Value::as_str))
        .collect();
    assert_eq!(titles, vec!["title1", "title2"]);
    assert_eq!(posts[0].get("id"), Some(&json!(1)));
    assert_eq!(posts[0].get("likeCount"), Some(&json!(100_000)));
    assert_eq!(posts[0].get("commentCount"), Some(&json!(100)));

    for listed in &posts {
        let id = listed.get("id").and_then(Value::as_i64).expect("id");
        let (status, single) = get_json(&app, &format!("/posts/{id}")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(&single, listed);
    }
}

#[rstest]
#[case("/posts/3")]
#[case("/posts/99999")]
#[actix_web::test]
async fn unknown_posts_are_not_found(store: Arc<InMemoryStore>, #[case] uri: &str) {
    let app = seeded_app(store).await;

    let (status, body) = get_json(&app, uri).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body.get("code").and_then(Value::as_str), Some("not_found"));
    assert!(body.get("traceId").is_some());
}

#[rstest]
#[actix_web::test]
async fn registered_user_is_listed_exactly_once(store: Arc<InMemoryStore>) {
    let app = seeded_app(store).await;

    let request = test::TestRequest::post()
        .uri("/users")
        .set_json(json!({"nickname": "a", "email": "a@example.com", "password": "secret"}))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert!(response.headers().contains_key("trace-id"));
    let created: Value = test::read_body_json(response).await;
    assert_eq!(created.get("version"), Some(&json!(1)));
    assert_eq!(created.get("createdAt"), created.get("updatedAt"));
    assert!(created.get("password").is_none());
    let id = created.get("id").cloned().expect("generated id");

    let (status, users) = get_json(&app, "/users").await;
    assert_eq!(status, StatusCode::OK);
    let users = users.as_array().expect("array");
    // Two seeded authors plus the new registration.
    assert_eq!(users.len(), 3);
    let matches = users
        .iter()
        .filter(|user| user.get("id") == Some(&id))
        .count();
    assert_eq!(matches, 1);
}

#[rstest]
#[actix_web::test]
async fn registration_without_email_is_rejected(store: Arc<InMemoryStore>) {
    let app = seeded_app(store).await;

    let request = test::TestRequest::post()
        .uri("/users")
        .set_json(json!({"nickname": "a", "password": "secret"}))
        .to_request();
    let response = test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(
        body.get("details"),
        Some(&json!({"field": "email", "code": "missing_field"}))
    );

    let (_, users) = get_json(&app, "/users").await;
    assert_eq!(users.as_array().map(Vec::len), Some(2));
}
