//! User reference model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Identifier of a user
pub type UserId = i64;

/// A user that can own files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    /// Unique identifier
    pub id: UserId,
    /// Login name, unique across users
    pub login: String,
    /// First name (used as the owner display name on files)
    #[serde(default)]
    pub first_name: Option<String>,
    /// Last name
    #[serde(default)]
    pub last_name: Option<String>,
    /// Email address
    #[serde(default)]
    pub email: Option<String>,
}

impl UserDto {
    /// Label for selection lists: the first name when set, the login otherwise
    pub fn display_name(&self) -> &str {
        self.first_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.login)
    }
}
