use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};

use crate::auth::RequireUser;
use crate::server::AppState;
use crate::server::dto::{ForecastParams, WeatherParams};
use crate::server::response::{ApiError, ApiResponse};
use crate::weather::OpenWeatherClient;

const DEFAULT_CITY: &str = "Milwaukee";

fn gateway(state: &AppState) -> Result<&OpenWeatherClient, ApiError> {
    state
        .weather
        .as_ref()
        .ok_or_else(|| ApiError::service_unavailable("Weather lookups are not configured"))
}

pub async fn current(
    _auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Query(params): Query<WeatherParams>,
) -> impl IntoResponse {
    let city = params.city.as_deref().unwrap_or(DEFAULT_CITY);

    let report = gateway(&state)?
        .current(city)
        .await
        .map_err(ApiError::from)?;

    Ok::<_, ApiError>(Json(ApiResponse::success(report)))
}

pub async fn forecast(
    _auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Query(params): Query<ForecastParams>,
) -> impl IntoResponse {
    let forecast = gateway(&state)?
        .forecast(params.lat, params.lon)
        .await
        .map_err(ApiError::from)?;

    Ok::<_, ApiError>(Json(ApiResponse::success(forecast)))
}
