//! Aggregation request and merged result

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Coordinates, Landmark, LandmarkQuery, PlaceQuery, SortDirection};

/// Inbound aggregation request: a place plus landmark options
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedRequest {
    #[serde(flatten)]
    pub place: PlaceQuery,
    #[serde(default)]
    pub landmark_category: Option<String>,
    #[serde(default)]
    pub sort_by: Option<String>,
    #[serde(default)]
    pub sort_order: SortDirection,
    #[serde(default)]
    pub landmark_name_filter: Option<String>,
    /// Weather timestamp; now when omitted
    #[serde(default)]
    pub requested_time: Option<DateTime<Utc>>,
}

impl AggregatedRequest {
    /// Build the landmark search for the given coordinates
    #[must_use]
    pub fn landmark_query(&self, coordinates: Coordinates) -> LandmarkQuery {
        LandmarkQuery {
            coordinates,
            category: self.landmark_category.clone(),
            name_filter: self.landmark_name_filter.clone(),
            sort_by: self.sort_by.clone(),
            sort_order: self.sort_order,
        }
    }
}

/// Merged view of a place. Every field falls back to its default when its
/// source failed.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedResult {
    pub address: Option<String>,
    pub temperature: f64,
    #[serde(rename = "feelsLikeTemperature")]
    pub feels_like: f64,
    pub weather_description: Option<String>,
    pub landmarks: Vec<Landmark>,
}
