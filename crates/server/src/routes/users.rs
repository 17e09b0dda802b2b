//! Routes for the caller's own user record.

use axum::{Router, extract::State, response::Json as ResponseJson, routing::get};
use db::models::user::User;
use utils::response::ApiResponse;

use crate::{auth::AuthUser, error::ApiError, state::AppState};

/// GET /api/users/me
/// Resolve the caller's local user record, creating it on first sight.
pub async fn me(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<ResponseJson<ApiResponse<User>>, ApiError> {
    let record = state
        .identity
        .ensure_user(&user.owner_id, user.name.as_deref())
        .await?;

    Ok(ResponseJson(ApiResponse::success(record)))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/users/me", get(me))
}
