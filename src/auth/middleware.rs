use std::sync::Arc;

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, header::COOKIE, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;

use super::helpers::session_id_from_cookie_header;
use crate::server::AppState;
use crate::types::{Role, User};

/// Decides whether a user may use the admin surface. Held in `AppState`
/// so a different policy can be swapped in without touching handlers.
pub type AdminPolicy = Arc<dyn Fn(&User) -> bool + Send + Sync>;

/// The default policy: admin role on the account.
#[must_use]
pub fn role_based_policy() -> AdminPolicy {
    Arc::new(|user: &User| user.role == Role::Admin)
}

/// Extractor that requires a live session
pub struct RequireUser(pub User);

/// Extractor that requires a live session passing the admin policy
pub struct RequireAdmin(pub User);

#[derive(Debug)]
pub enum AuthError {
    MissingSession,
    InvalidSession,
    NotAdmin,
    InternalError,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::MissingSession => (StatusCode::UNAUTHORIZED, "Authentication required"),
            AuthError::InvalidSession => (StatusCode::UNAUTHORIZED, "Authentication required"),
            AuthError::NotAdmin => (StatusCode::FORBIDDEN, "Admin access required"),
            AuthError::InternalError => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        let body = json!({ "data": null, "error": message });

        (status, Json(body)).into_response()
    }
}

impl FromRequestParts<Arc<AppState>> for RequireUser {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let user = resolve_session_user(parts, state)?;
        Ok(RequireUser(user))
    }
}

impl FromRequestParts<Arc<AppState>> for RequireAdmin {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let user = resolve_session_user(parts, state)?;

        if !(state.admin_policy)(&user) {
            return Err(AuthError::NotAdmin);
        }

        Ok(RequireAdmin(user))
    }
}

fn resolve_session_user(parts: &mut Parts, state: &Arc<AppState>) -> Result<User, AuthError> {
    let cookie_header = parts.headers.get(COOKIE).and_then(|h| h.to_str().ok());

    let session_id =
        session_id_from_cookie_header(cookie_header).ok_or(AuthError::MissingSession)?;

    let user_id = state
        .sessions
        .get(&session_id)
        .ok_or(AuthError::InvalidSession)?;

    // The account may have been deleted while the session was live
    state
        .store
        .get_user(user_id)
        .map_err(|_| AuthError::InternalError)?
        .ok_or(AuthError::InvalidSession)
}
