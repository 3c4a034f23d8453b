use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::{
        HeaderMap, StatusCode,
        header::{COOKIE, SET_COOKIE},
    },
    response::IntoResponse,
};

use crate::auth::{RequireUser, SESSION_COOKIE, authenticate, session_id_from_cookie_header};
use crate::server::AppState;
use crate::server::dto::{LoginRequest, RegisterRequest, UserResponse};
use crate::server::response::{ApiError, ApiResponse};
use crate::server::validation::{validate_email, validate_password, validate_person_name};
use crate::types::{NewUser, Role};

fn session_cookie(session_id: &str) -> String {
    format!("{SESSION_COOKIE}={session_id}; Path=/; HttpOnly; SameSite=Lax")
}

fn clear_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> impl IntoResponse {
    validate_email(&req.email)?;
    validate_password(&req.password)?;
    validate_person_name(&req.first_name, "First name")?;
    validate_person_name(&req.last_name, "Last name")?;

    let password_hash = state.hasher.hash(&req.password).map_err(ApiError::from)?;

    // Self-registration never grants admin
    let user = state
        .store
        .create_user(&NewUser {
            email: req.email,
            password_hash,
            first_name: req.first_name,
            last_name: req.last_name,
            role: Role::User,
        })
        .map_err(ApiError::from)?;

    Ok::<_, ApiError>((
        StatusCode::CREATED,
        Json(ApiResponse::success(UserResponse::from(user))),
    ))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> impl IntoResponse {
    let user = authenticate(
        state.store.as_ref(),
        &state.hasher,
        &req.email,
        &req.password,
    )
    .map_err(ApiError::from)?;

    let session_id = state.sessions.create(user.id);

    Ok::<_, ApiError>((
        StatusCode::OK,
        [(SET_COOKIE, session_cookie(&session_id))],
        Json(ApiResponse::success(UserResponse::from(user))),
    ))
}

pub async fn logout(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let cookie_header = headers.get(COOKIE).and_then(|h| h.to_str().ok());
    let session_id = session_id_from_cookie_header(cookie_header)
        .ok_or_else(|| ApiError::unauthorized("Authentication required"))?;

    state.sessions.destroy(&session_id);

    Ok::<_, ApiError>((
        StatusCode::NO_CONTENT,
        [(SET_COOKIE, clear_session_cookie())],
    ))
}

pub async fn profile(auth: RequireUser) -> impl IntoResponse {
    Json(ApiResponse::success(UserResponse::from(auth.0)))
}
