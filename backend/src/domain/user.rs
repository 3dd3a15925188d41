//! User data model.

use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Serialize;
use uuid::Uuid;

use super::password::{Password, PasswordHash, PasswordHashingError, PasswordValidationError};

/// Validation errors returned when constructing user components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyId,
    InvalidId,
    EmptyNickname,
    NicknameTooLong { max: usize },
    NicknameInvalidCharacters,
    EmptyEmail,
    EmailTooLong { max: usize },
    InvalidEmail,
    Password(PasswordValidationError),
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "user id must not be empty"),
            Self::InvalidId => write!(f, "user id must be a valid UUID"),
            Self::EmptyNickname => write!(f, "nickname must not be empty"),
            Self::NicknameTooLong { max } => {
                write!(f, "nickname must be at most {max} characters")
            }
            Self::NicknameInvalidCharacters => {
                write!(f, "nickname must not contain control characters")
            }
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::EmailTooLong { max } => write!(f, "email must be at most {max} characters"),
            Self::InvalidEmail => write!(f, "email must be a valid address"),
            Self::Password(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for UserValidationError {}

impl From<PasswordValidationError> for UserValidationError {
    fn from(value: PasswordValidationError) -> Self {
        Self::Password(value)
    }
}

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub struct UserId(Uuid);

impl UserId {
    /// Validate and construct a [`UserId`] from its string form.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let id = id.as_ref();
        if id.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(UserValidationError::InvalidId);
        }
        Uuid::parse_str(id)
            .map(Self)
            .map_err(|_| UserValidationError::InvalidId)
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an already-parsed UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0.to_string()
    }
}

/// Public nickname chosen at sign-up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Nickname(String);

/// Maximum allowed length for a nickname.
pub const NICKNAME_MAX: usize = 20;

impl Nickname {
    /// Validate and construct a [`Nickname`]. Surrounding whitespace is trimmed.
    pub fn new(nickname: impl Into<String>) -> Result<Self, UserValidationError> {
        let nickname = nickname.into();
        let trimmed = nickname.trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyNickname);
        }
        if trimmed.chars().count() > NICKNAME_MAX {
            return Err(UserValidationError::NicknameTooLong { max: NICKNAME_MAX });
        }
        if trimmed.chars().any(char::is_control) {
            return Err(UserValidationError::NicknameInvalidCharacters);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for Nickname {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Nickname {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Email address in `local@domain.tld` shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Email(String);

/// Maximum allowed length for an email address.
pub const EMAIL_MAX: usize = 254;

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s.]+(\.[^@\s.]+)+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

impl Email {
    /// Validate and construct an [`Email`]. Surrounding whitespace is trimmed.
    pub fn new(email: impl Into<String>) -> Result<Self, UserValidationError> {
        let email = email.into();
        let trimmed = email.trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if trimmed.chars().count() > EMAIL_MAX {
            return Err(UserValidationError::EmailTooLong { max: EMAIL_MAX });
        }
        if !email_regex().is_match(trimmed) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Validated sign-up input, prior to hashing.
#[derive(Debug)]
pub struct UserRegistration {
    pub nickname: Nickname,
    pub email: Email,
    pub password: Password,
}

impl UserRegistration {
    /// Validate raw sign-up fields.
    ///
    /// # Examples
    /// ```
    /// use blog_backend::domain::UserRegistration;
    ///
    /// let registration = UserRegistration::try_from_parts("a", "a@example.com", "secret")
    ///     .expect("valid registration");
    /// assert_eq!(registration.email.as_ref(), "a@example.com");
    /// ```
    pub fn try_from_parts(
        nickname: &str,
        email: &str,
        password: &str,
    ) -> Result<Self, UserValidationError> {
        Ok(Self {
            nickname: Nickname::new(nickname)?,
            email: Email::new(email)?,
            password: Password::new(password)?,
        })
    }
}

/// Insert payload for the user repository; the store assigns identity,
/// timestamps, and version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub nickname: Nickname,
    pub email: Email,
    pub password_hash: PasswordHash,
}

impl NewUser {
    /// Hash the registration password and build the insert payload.
    ///
    /// # Errors
    ///
    /// Returns [`PasswordHashingError`] when the password cannot be hashed.
    pub fn from_registration(registration: UserRegistration) -> Result<Self, PasswordHashingError> {
        let UserRegistration {
            nickname,
            email,
            password,
        } = registration;
        Ok(Self {
            nickname,
            email,
            password_hash: PasswordHash::derive(&password)?,
        })
    }
}

/// Partial update applied under an optimistic version check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChanges {
    pub nickname: Option<Nickname>,
    pub email: Option<Email>,
}

/// Application user as stored.
///
/// ## Invariants
/// - `created_at` never changes after creation.
/// - `version` starts at 1 and grows by one per successful update.
/// - The password hash is never serialised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub additional_id: i64,
    pub nickname: Nickname,
    pub email: Email,
    #[serde(skip)]
    pub password_hash: PasswordHash,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub version: u32,
}

/// Version assigned to freshly created records.
pub const INITIAL_VERSION: u32 = 1;
