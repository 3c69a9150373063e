//! User API handlers
//!
//! Read-only listing backing the owner selection of the file form.

use crate::error::AppError;
use crate::models::UserDto;
use crate::state::SharedState;
use axum::{extract::State, response::Json};

/// GET /api/users - List all users
pub async fn list_users(
    State(state): State<SharedState>,
) -> Result<Json<Vec<UserDto>>, AppError> {
    tracing::debug!("REST request to get all Users");
    Ok(Json(state.db.list_users().await?))
}
