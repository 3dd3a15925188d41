//! Users API handlers.
//!
//! ```text
//! GET /users
//! POST /users {"nickname":"a","email":"a@example.com","password":"secret"}
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::{
    Error, PasswordValidationError, User, UserRegistration, UserValidationError,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, UserSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, field_error, require_field};

const NICKNAME: FieldName = FieldName::new("nickname");
const EMAIL: FieldName = FieldName::new("email");
const PASSWORD: FieldName = FieldName::new("password");

/// Registration body for `POST /users`.
///
/// Fields are optional at the serde layer so an absent field is reported as
/// `missing_field` rather than a generic deserialisation failure.
///
/// Example JSON:
/// `{"nickname":"a","email":"a@example.com","password":"secret"}`
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[schema(example = "a")]
    pub nickname: Option<String>,
    #[schema(example = "a@example.com")]
    pub email: Option<String>,
    #[schema(example = "secret")]
    pub password: Option<String>,
}

impl TryFrom<CreateUserRequest> for UserRegistration {
    type Error = Error;

    fn try_from(value: CreateUserRequest) -> Result<Self, Self::Error> {
        let nickname = require_field(value.nickname, NICKNAME)?;
        let email = require_field(value.email, EMAIL)?;
        let password = require_field(value.password, PASSWORD)?;
        UserRegistration::try_from_parts(&nickname, &email, &password)
            .map_err(map_user_validation_error)
    }
}

fn map_user_validation_error(err: UserValidationError) -> Error {
    let message = err.to_string();
    let (field, code) = match err {
        UserValidationError::EmptyNickname => (NICKNAME, "empty_nickname"),
        UserValidationError::NicknameTooLong { .. } => (NICKNAME, "nickname_too_long"),
        UserValidationError::NicknameInvalidCharacters => (NICKNAME, "invalid_nickname"),
        UserValidationError::EmptyEmail => (EMAIL, "empty_email"),
        UserValidationError::EmailTooLong { .. } => (EMAIL, "email_too_long"),
        UserValidationError::InvalidEmail => (EMAIL, "invalid_email"),
        UserValidationError::Password(PasswordValidationError::Empty) => {
            (PASSWORD, "empty_password")
        }
        UserValidationError::Password(PasswordValidationError::TooLong { .. }) => {
            (PASSWORD, "password_too_long")
        }
        // Ids are store-assigned; a client body never carries one.
        UserValidationError::EmptyId | UserValidationError::InvalidId => {
            return Error::invalid_request(message);
        }
    };
    field_error(field, code, message)
}

/// List registered users.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use blog_backend::inbound::http::users::list_users;
///
/// let app = App::new().service(list_users);
/// ```
#[utoipa::path(
    get,
    path = "/users",
    responses(
        (status = 200, description = "Users", body = [UserSchema]),
        (status = 503, description = "Store unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<User>>> {
    let users = state.users.list_users().await?;
    Ok(web::Json(users))
}

/// Register a user and return the stored record.
#[utoipa::path(
    post,
    path = "/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Json<CreateUserRequest>,
) -> ApiResult<HttpResponse> {
    let registration = UserRegistration::try_from(payload.into_inner())?;
    let user = state.users_command.create_user(registration).await?;
    Ok(HttpResponse::Created().json(user))
}

#[cfg(test)]
mod tests;
