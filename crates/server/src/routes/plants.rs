//! Routes for the shared plant catalog.

use axum::{
    Router,
    extract::{Path, State},
    response::Json as ResponseJson,
    routing::get,
};
use db::models::plant::{CreatePlant, Plant, UpdatePlant};
use utils::response::ApiResponse;

use crate::{auth::AuthUser, error::ApiError, state::AppState};

/// GET /api/plants
pub async fn list_plants(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Vec<Plant>>>, ApiError> {
    let plants = state.catalog.list().await?;
    Ok(ResponseJson(ApiResponse::success(plants)))
}

/// GET /api/plants/{id}
pub async fn get_plant(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<ResponseJson<ApiResponse<Plant>>, ApiError> {
    let plant = state.catalog.get(id).await?;
    Ok(ResponseJson(ApiResponse::success(plant)))
}

/// POST /api/plants
/// Admin-only: add a plant to the shared catalog.
pub async fn create_plant(
    State(state): State<AppState>,
    user: AuthUser,
    axum::Json(payload): axum::Json<CreatePlant>,
) -> Result<ResponseJson<ApiResponse<Plant>>, ApiError> {
    let plant = state.catalog.create(&payload, &user.owner_id).await?;
    Ok(ResponseJson(ApiResponse::success(plant)))
}

/// PUT /api/plants/{id}
/// Admin-only: update a plant's descriptive fields.
pub async fn update_plant(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
    axum::Json(payload): axum::Json<UpdatePlant>,
) -> Result<ResponseJson<ApiResponse<Plant>>, ApiError> {
    let plant = state.catalog.update(id, &payload, &user.owner_id).await?;
    Ok(ResponseJson(ApiResponse::success(plant)))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/plants", get(list_plants).post(create_plant))
        .route("/plants/{id}", get(get_plant).put(update_plant))
}
