use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::auth::RequireUser;
use crate::server::AppState;
use crate::server::dto::{DeleteTripResponse, SaveTripRequest, SaveTripResponse};
use crate::server::response::{ApiError, ApiResponse, StoreOptionExt, StoreResultExt};
use crate::server::validation::validate_trip_name;

pub async fn save_trip(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Json(req): Json<SaveTripRequest>,
) -> impl IntoResponse {
    validate_trip_name(&req.name)?;

    // Trip and location inserts are one transaction in the store, so a
    // partial save can never land.
    let trip_id = state
        .store
        .create_trip(auth.0.id, req.name.trim(), &req.locations)
        .map_err(ApiError::from)?;

    Ok::<_, ApiError>((
        StatusCode::CREATED,
        Json(ApiResponse::success(SaveTripResponse { trip_id })),
    ))
}

pub async fn list_trips(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let trips = state
        .store
        .list_trips(auth.0.id)
        .api_err("Failed to list trips")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(trips)))
}

pub async fn delete_trip(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let owner = state
        .store
        .get_trip_owner(id)
        .api_err("Failed to look up trip")?
        .or_not_found("Trip not found")?;

    if owner != auth.0.id {
        return Err(ApiError::forbidden("Access denied"));
    }

    let deleted = state
        .store
        .delete_trip(id)
        .api_err("Failed to delete trip")?;
    if !deleted {
        return Err(ApiError::not_found("Trip not found"));
    }

    Ok(Json(ApiResponse::success(DeleteTripResponse {
        success: true,
        deleted_trip_id: id,
    })))
}
