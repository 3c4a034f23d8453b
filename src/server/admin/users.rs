use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};

use crate::auth::RequireAdmin;
use crate::server::AppState;
use crate::server::dto::{DeleteUserResponse, UpdateUserRequest, UserResponse};
use crate::server::response::{ApiError, ApiResponse, StoreResultExt};
use crate::server::validation::{validate_email, validate_person_name};

pub async fn list_users(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let users = state
        .store
        .list_users()
        .api_err("Failed to list users")?;

    let users: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();

    Ok::<_, ApiError>(Json(ApiResponse::success(users)))
}

pub async fn update_user(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateUserRequest>,
) -> impl IntoResponse {
    validate_email(&req.email)?;
    validate_person_name(&req.first_name, "First name")?;
    validate_person_name(&req.last_name, "Last name")?;

    // Only email and names are mutable here; role and password have no
    // admin update path.
    state
        .store
        .update_user(id, &req.email, &req.first_name, &req.last_name)
        .map_err(ApiError::from)?;

    Ok::<_, ApiError>(Json(ApiResponse::success("User updated successfully")))
}

pub async fn delete_user(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let deleted = state
        .store
        .delete_user(id)
        .api_err("Failed to delete user")?;

    if !deleted {
        return Err(ApiError::not_found("User not found"));
    }

    Ok(Json(ApiResponse::success(DeleteUserResponse {
        success: true,
        deleted_id: id,
    })))
}
