use std::sync::Arc;
use std::time::Instant;

use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::{
    Router,
    routing::{delete, get, post},
};

use super::admin::admin_router;
use super::{account, trips, weather};
use crate::auth::{AdminPolicy, PasswordHasher, SessionStore, role_based_policy};
use crate::store::Store;
use crate::weather::OpenWeatherClient;

pub struct AppState {
    pub store: Arc<dyn Store>,
    pub sessions: SessionStore,
    pub hasher: PasswordHasher,
    /// Absent when no OpenWeather key is configured; weather routes
    /// answer 503 in that case.
    pub weather: Option<OpenWeatherClient>,
    pub admin_policy: AdminPolicy,
}

impl AppState {
    #[must_use]
    pub fn new(store: Arc<dyn Store>, weather: Option<OpenWeatherClient>) -> Self {
        Self {
            store,
            sessions: SessionStore::new(),
            hasher: PasswordHasher::new(),
            weather,
            admin_policy: role_based_policy(),
        }
    }

    /// Replaces the admin policy. Handlers are unaffected; only the
    /// predicate behind `RequireAdmin` changes.
    #[must_use]
    pub fn with_admin_policy(mut self, policy: AdminPolicy) -> Self {
        self.admin_policy = policy;
        self
    }
}

async fn health() -> &'static str {
    "OK"
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let response = next.run(request).await;

    let latency = start.elapsed();
    let status = response.status();

    tracing::info!(
        "{} {} {} {}ms",
        method,
        uri.path(),
        status.as_u16(),
        latency.as_millis()
    );

    response
}

fn api_router() -> Router<Arc<AppState>> {
    Router::new()
        // Accounts and sessions
        .route("/auth/register", post(account::register))
        .route("/auth/login", post(account::login))
        .route("/auth/logout", post(account::logout))
        .route("/profile", get(account::profile))
        // Trip planner
        .route("/trips", post(trips::save_trip))
        .route("/trips", get(trips::list_trips))
        .route("/trips/{id}", delete(trips::delete_trip))
        // Weather pass-through
        .route("/weather", get(weather::current))
        .route("/forecast", get(weather::forecast))
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api/v1/admin", admin_router())
        .nest("/api/v1", api_router())
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}
