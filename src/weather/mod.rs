mod client;

pub use client::{DEFAULT_BASE_URL, OpenWeatherClient};

use serde::{Deserialize, Serialize};

/// Current conditions for one place, reduced to the fields the
/// application actually renders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherReport {
    pub city: String,
    pub lat: f64,
    pub lon: f64,
    pub temperature: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastPeriod {
    pub timestamp: i64,
    pub temperature: f64,
    pub description: String,
    pub icon: String,
}

/// A multi-period forecast for a coordinate pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Forecast {
    pub lat: f64,
    pub lon: f64,
    pub periods: Vec<ForecastPeriod>,
}
