//! Tests for users API handlers.

use super::*;
use crate::domain::ErrorCode;
use crate::domain::ports::{FixturePostsQuery, FixtureUsersQuery, UsersCommand};
use crate::inbound::http::test_utils::{read_json, test_app};
use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use async_trait::async_trait;
use rstest::rstest;
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};

/// Command double recording what reached the domain.
#[derive(Default)]
struct RecordingCommand {
    seen: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl UsersCommand for RecordingCommand {
    async fn create_user(&self, registration: UserRegistration) -> Result<User, Error> {
        if let Ok(mut seen) = self.seen.lock() {
            seen.push((
                registration.nickname.to_string(),
                registration.email.to_string(),
            ));
        }
        crate::domain::ports::FixtureUsersCommand
            .create_user(registration)
            .await
    }
}

fn state_with(command: Arc<dyn UsersCommand>) -> HttpState {
    HttpState::new(
        Arc::new(FixturePostsQuery),
        Arc::new(FixtureUsersQuery),
        command,
    )
}

async fn post_users(state: HttpState, body: Value) -> actix_web::dev::ServiceResponse {
    let app = actix_test::init_service(test_app(state)).await;
    let request = actix_test::TestRequest::post()
        .uri("/users")
        .set_json(body)
        .to_request();
    actix_test::call_service(&app, request).await
}

#[actix_web::test]
async fn list_users_returns_camel_case_records_without_password() {
    let app = actix_test::init_service(test_app(HttpState::fixtures())).await;

    let response =
        actix_test::call_service(&app, actix_test::TestRequest::get().uri("/users").to_request())
            .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = read_json(response).await;
    let first = body
        .as_array()
        .and_then(|users| users.first())
        .expect("one fixture user");
    assert_eq!(first.get("nickname").and_then(Value::as_str), Some("ada"));
    assert!(first.get("createdAt").is_some());
    assert!(first.get("additionalId").is_some());
    assert!(first.get("passwordHash").is_none());
    assert!(first.get("password").is_none());
}

#[actix_web::test]
async fn create_user_returns_201_with_the_stored_record() {
    let command = Arc::new(RecordingCommand::default());

    let response = post_users(
        state_with(command.clone()),
        json!({"nickname": "a", "email": "a@example.com", "password": "secret"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = read_json(response).await;
    assert_eq!(body.get("nickname").and_then(Value::as_str), Some("a"));
    assert_eq!(body.get("version").and_then(Value::as_u64), Some(1));
    assert_eq!(body.get("createdAt"), body.get("updatedAt"));
    let seen = command.seen.lock().expect("lock").clone();
    assert_eq!(seen, vec![("a".to_owned(), "a@example.com".to_owned())]);
}

#[rstest]
#[case(json!({"email": "a@example.com", "password": "secret"}), "nickname")]
#[case(json!({"nickname": "a", "password": "secret"}), "email")]
#[case(json!({"nickname": "a", "email": "a@example.com"}), "password")]
#[case(json!({}), "nickname")]
#[actix_web::test]
async fn missing_fields_are_rejected_before_the_domain(
    #[case] body: Value,
    #[case] field: &str,
) {
    let command = Arc::new(RecordingCommand::default());

    let response = post_users(state_with(command.clone()), body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: Error = read_json(response).await;
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert_eq!(
        error.details(),
        Some(&json!({"field": field, "code": "missing_field"}))
    );
    assert!(command.seen.lock().expect("lock").is_empty());
}

#[rstest]
#[case(json!({"nickname": "  ", "email": "a@example.com", "password": "secret"}), "nickname", "empty_nickname")]
#[case(json!({"nickname": "a".repeat(21), "email": "a@example.com", "password": "secret"}), "nickname", "nickname_too_long")]
#[case(json!({"nickname": "a", "email": "", "password": "secret"}), "email", "empty_email")]
#[case(json!({"nickname": "a", "email": "not-an-email", "password": "secret"}), "email", "invalid_email")]
#[case(json!({"nickname": "a", "email": "a@example.com", "password": ""}), "password", "empty_password")]
#[case(json!({"nickname": "a", "email": "a@example.com", "password": "   "}), "password", "empty_password")]
#[case(json!({"nickname": "a", "email": "a@example.com", "password": "p".repeat(129)}), "password", "password_too_long")]
#[actix_web::test]
async fn invalid_fields_report_field_and_code(
    #[case] body: Value,
    #[case] field: &str,
    #[case] code: &str,
) {
    let response = post_users(HttpState::fixtures(), body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: Error = read_json(response).await;
    assert_eq!(error.details(), Some(&json!({"field": field, "code": code})));
}

#[actix_web::test]
async fn malformed_json_uses_the_error_schema() {
    let app = actix_test::init_service(test_app(HttpState::fixtures())).await;
    let request = actix_test::TestRequest::post()
        .uri("/users")
        .insert_header(("content-type", "application/json"))
        .set_payload("{\"nickname\":")
        .to_request();

    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: Error = read_json(response).await;
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert_eq!(error.details(), Some(&json!({"code": "malformed_body"})));
}

#[rstest]
fn id_validation_errors_carry_no_field() {
    let error = map_user_validation_error(UserValidationError::InvalidId);
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert!(error.details().is_none());
}
