mod users;

use std::sync::Arc;

use axum::{
    Router,
    routing::{delete, get, patch},
};

use crate::server::AppState;

pub fn admin_router() -> Router<Arc<AppState>> {
    Router::new()
        // User directory
        .route("/users", get(users::list_users))
        .route("/users/{id}", patch(users::update_user))
        .route("/users/{id}", delete(users::delete_user))
}
