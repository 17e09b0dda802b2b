use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use services::services::{
    catalog::CatalogError, household::HouseholdError, identity::IdentityError,
};
use thiserror::Error;
use utils::response::ApiResponse;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Household(#[from] HouseholdError),
    #[error(transparent)]
    Identity(#[from] IdentityError),
    #[error("unauthorized: {0}")]
    Unauthorized(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Catalog(CatalogError::NotAdmin) => StatusCode::FORBIDDEN,
            ApiError::Catalog(CatalogError::PlantNotFound(_))
            | ApiError::Household(HouseholdError::PlantNotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Catalog(CatalogError::FieldTooLong { .. })
            | ApiError::Identity(IdentityError::BlankOwnerId)
            | ApiError::Catalog(CatalogError::Identity(IdentityError::BlankOwnerId))
            | ApiError::Household(HouseholdError::Identity(IdentityError::BlankOwnerId)) => {
                StatusCode::BAD_REQUEST
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("internal error: {}", self);
        }

        (status, Json(ApiResponse::<()>::error(self.to_string()))).into_response()
    }
}
