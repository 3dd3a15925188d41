//! Profile data model: the owned side of the user one-to-one link.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::UserId;

/// Store-generated profile identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ProfileId(pub i64);

/// Insert payload for the profile repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProfile {
    pub user_id: UserId,
    pub profile_image: Option<String>,
}

/// A user's profile. At most one exists per user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: ProfileId,
    pub user_id: UserId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    pub created_at: DateTime<Utc>,
}
