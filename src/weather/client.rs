use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use super::{Forecast, ForecastPeriod, WeatherReport};
use crate::error::{Error, Result};

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

/// Pass-through gateway to the OpenWeather API. Stateless per request:
/// no caching, no retries. The base URL is injectable so tests can point
/// it at a local stub.
pub struct OpenWeatherClient {
    client: Client,
    base_url: String,
    api_key: String,
}

// Upstream response shapes, only the fields we consume.

#[derive(Debug, Deserialize)]
struct UpstreamCoord {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct UpstreamMain {
    temp: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct UpstreamCondition {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct UpstreamWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct UpstreamWeather {
    name: String,
    coord: UpstreamCoord,
    main: UpstreamMain,
    weather: Vec<UpstreamCondition>,
    wind: UpstreamWind,
}

#[derive(Debug, Deserialize)]
struct UpstreamForecastEntry {
    dt: i64,
    main: UpstreamMain,
    weather: Vec<UpstreamCondition>,
}

#[derive(Debug, Deserialize)]
struct UpstreamForecastCity {
    coord: UpstreamCoord,
}

#[derive(Debug, Deserialize)]
struct UpstreamForecast {
    list: Vec<UpstreamForecastEntry>,
    city: UpstreamForecastCity,
}

fn condition(conditions: &[UpstreamCondition]) -> (String, String) {
    conditions
        .first()
        .map(|c| (c.description.clone(), c.icon.clone()))
        .unwrap_or_default()
}

impl OpenWeatherClient {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| Error::Config(format!("failed to build http client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    /// Current conditions by place name, imperial units.
    pub async fn current(&self, city: &str) -> Result<WeatherReport> {
        let url = format!("{}/weather", self.base_url);
        let upstream: UpstreamWeather = self
            .fetch(&url, &[("q", city), ("units", "imperial")])
            .await?;

        let (description, icon) = condition(&upstream.weather);
        Ok(WeatherReport {
            city: upstream.name,
            lat: upstream.coord.lat,
            lon: upstream.coord.lon,
            temperature: upstream.main.temp,
            humidity: upstream.main.humidity,
            wind_speed: upstream.wind.speed,
            description,
            icon,
        })
    }

    /// Multi-period forecast by coordinates, imperial units.
    pub async fn forecast(&self, lat: f64, lon: f64) -> Result<Forecast> {
        let url = format!("{}/forecast", self.base_url);
        let upstream: UpstreamForecast = self
            .fetch(
                &url,
                &[
                    ("lat", lat.to_string().as_str()),
                    ("lon", lon.to_string().as_str()),
                    ("units", "imperial"),
                ],
            )
            .await?;

        let periods = upstream
            .list
            .into_iter()
            .map(|entry| {
                let (description, icon) = condition(&entry.weather);
                ForecastPeriod {
                    timestamp: entry.dt,
                    temperature: entry.main.temp,
                    description,
                    icon,
                }
            })
            .collect();

        Ok(Forecast {
            lat: upstream.city.coord.lat,
            lon: upstream.city.coord.lon,
            periods,
        })
    }

    async fn fetch<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let response = self
            .client
            .get(url)
            .query(query)
            .query(&[("appid", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| Error::WeatherFetch(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::WeatherFetch(format!(
                "upstream returned {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| Error::WeatherFetch(format!("invalid upstream payload: {e}")))
    }
}
