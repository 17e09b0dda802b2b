//! Routes for the caller's household and plant recommendations.

use axum::{
    Router,
    extract::{Path, State},
    response::Json as ResponseJson,
    routing::get,
};
use db::models::user_plant::{HouseholdPlant, PlantRecommendation};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utils::response::ApiResponse;

use crate::{auth::AuthUser, error::ApiError, state::AppState};

/// Response for add/remove operations: `changed` reports whether the
/// household actually gained or lost an entry.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct HouseholdChangeResponse {
    pub plant_id: i64,
    pub changed: bool,
}

/// GET /api/household
pub async fn get_household(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<ResponseJson<ApiResponse<Vec<HouseholdPlant>>>, ApiError> {
    let plants = state.household.plants_for(&user.owner_id).await?;
    Ok(ResponseJson(ApiResponse::success(plants)))
}

/// POST /api/household/{plant_id}
pub async fn add_plant(
    State(state): State<AppState>,
    user: AuthUser,
    Path(plant_id): Path<i64>,
) -> Result<ResponseJson<ApiResponse<HouseholdChangeResponse>>, ApiError> {
    let added = state
        .household
        .add_plant(&user.owner_id, user.name.as_deref(), plant_id)
        .await?;

    Ok(ResponseJson(ApiResponse::success(HouseholdChangeResponse {
        plant_id,
        changed: added,
    })))
}

/// DELETE /api/household/{plant_id}
pub async fn remove_plant(
    State(state): State<AppState>,
    user: AuthUser,
    Path(plant_id): Path<i64>,
) -> Result<ResponseJson<ApiResponse<HouseholdChangeResponse>>, ApiError> {
    let removed = state
        .household
        .remove_plant(&user.owner_id, plant_id)
        .await?;

    Ok(ResponseJson(ApiResponse::success(HouseholdChangeResponse {
        plant_id,
        changed: removed,
    })))
}

/// GET /api/household/{plant_id}
/// Whether the caller already tracks this plant.
pub async fn has_plant(
    State(state): State<AppState>,
    user: AuthUser,
    Path(plant_id): Path<i64>,
) -> Result<ResponseJson<ApiResponse<bool>>, ApiError> {
    let tracked = state.household.has_plant(&user.owner_id, plant_id).await?;
    Ok(ResponseJson(ApiResponse::success(tracked)))
}

/// GET /api/recommendations
/// Top-6 most-tracked plants, padded with random catalog picks.
pub async fn recommendations(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Vec<PlantRecommendation>>>, ApiError> {
    let top = state.household.top_plants().await?;
    Ok(ResponseJson(ApiResponse::success(top)))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/household", get(get_household))
        .route(
            "/household/{plant_id}",
            get(has_plant).post(add_plant).delete(remove_plant),
        )
        .route("/recommendations", get(recommendations))
}
