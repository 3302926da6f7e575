//! OpenWeatherMap One Call "timemachine" adapter

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::{info, instrument, warn};

use super::{Outcome, WeatherProvider, http};
use crate::config::WeatherConfig;
use crate::error::{ProviderError, ProviderKind};
use crate::models::{Coordinates, WeatherSnapshot};

/// Weather client for OpenWeatherMap
pub struct OpenWeatherProvider {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    units: String,
    language: String,
}

/// Timemachine response: one data point per requested timestamp
#[derive(Debug, Deserialize)]
struct TimeMachineResponse {
    #[serde(default)]
    data: Vec<DataPoint>,
}

#[derive(Debug, Deserialize)]
struct DataPoint {
    temp: f64,
    feels_like: f64,
    #[serde(default)]
    weather: Vec<Condition>,
}

#[derive(Debug, Deserialize)]
struct Condition {
    #[serde(default)]
    main: String,
    #[serde(default)]
    description: String,
}

impl From<DataPoint> for WeatherSnapshot {
    fn from(point: DataPoint) -> Self {
        let (short_description, long_description) = point
            .weather
            .into_iter()
            .next()
            .map(|c| (c.main, c.description))
            .unwrap_or_default();

        WeatherSnapshot {
            temperature: point.temp,
            feels_like: point.feels_like,
            short_description,
            long_description,
        }
    }
}

impl OpenWeatherProvider {
    pub fn new(config: &WeatherConfig) -> Result<Self> {
        Ok(Self {
            client: http::build_client(config.timeout_seconds)?,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            units: config.units.clone(),
            language: config.language.clone(),
        })
    }

    fn query_params(&self, coordinates: Coordinates, at: DateTime<Utc>) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("lat", coordinates.latitude.to_string()),
            ("lon", coordinates.longitude.to_string()),
            ("dt", at.timestamp().to_string()),
        ];
        if let Some(key) = &self.api_key {
            params.push(("appid", key.clone()));
        }
        params.push(("units", self.units.clone()));
        params.push(("lang", self.language.clone()));
        params
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    #[instrument(skip(self))]
    async fn get_weather(
        &self,
        coordinates: Coordinates,
        at: Option<DateTime<Utc>>,
    ) -> Outcome<WeatherSnapshot> {
        let at = at.unwrap_or_else(Utc::now);
        let request = self
            .client
            .get(&self.base_url)
            .header("Accept", "application/json")
            .query(&self.query_params(coordinates, at));

        let response: TimeMachineResponse = http::fetch_json(ProviderKind::Weather, request).await?;

        let Some(point) = response.data.into_iter().next() else {
            warn!("Weather API returned no data points");
            return Err(ProviderError::empty(ProviderKind::Weather));
        };

        let snapshot = WeatherSnapshot::from(point);
        info!(
            "Weather at {}: {:.1} ({})",
            at, snapshot.temperature, snapshot.long_description
        );
        Ok(snapshot)
    }
}
