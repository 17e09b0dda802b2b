use axum::{extract::FromRequestParts, http::header::AUTHORIZATION, http::request::Parts};
use utils::jwt;

use crate::{error::ApiError, state::AppState};

/// The authenticated caller, extracted from the bearer token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// Identity provider subject id; joins to `users.owner_id`.
    pub owner_id: String,
    pub name: Option<String>,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("missing bearer token".to_string()))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| ApiError::Unauthorized("malformed authorization header".to_string()))?;

        let claims = jwt::decode_identity(token, state.config.jwt_secret.as_bytes())
            .map_err(|e| ApiError::Unauthorized(e.to_string()))?;

        Ok(AuthUser {
            owner_id: claims.sub,
            name: claims.name,
        })
    }
}
