//! Weather snapshot model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Coordinates;

/// Point-in-time weather at a set of coordinates
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeatherSnapshot {
    /// Temperature in the configured units (metric: Celsius)
    pub temperature: f64,
    pub feels_like: f64,
    /// Condition group, e.g. "Clouds"
    pub short_description: String,
    /// Condition detail, e.g. "scattered clouds"
    pub long_description: String,
}

/// Body of the standalone weather lookup
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeatherQuery {
    #[serde(flatten)]
    pub coordinates: Coordinates,
    /// Defaults to now when omitted
    #[serde(default)]
    pub requested_time: Option<DateTime<Utc>>,
}
