//! Request extractors

use crate::error::AppError;
use crate::models::UserDto;
use crate::state::SharedState;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

/// Header naming the login a request acts as
pub const LOGIN_HEADER: &str = "x-user-login";

/// The user a request acts as
///
/// Taken from the `X-User-Login` header, falling back to the configured
/// default login. Unknown logins are rejected with 401.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub UserDto);

#[async_trait]
impl FromRequestParts<SharedState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        let login = parts
            .headers
            .get(LOGIN_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|login| !login.is_empty())
            .unwrap_or(&state.config.server.default_login)
            .to_string();

        let user = state
            .db
            .find_user_by_login(&login)
            .await?
            .ok_or_else(|| AppError::Unauthorized(format!("Unknown login {}", login)))?;

        Ok(CurrentUser(user))
    }
}
