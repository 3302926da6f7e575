//! Provider contracts and their HTTP adapters
//!
//! The aggregation pipeline only talks to the three traits below. Each
//! adapter maps its API's failures onto [`ProviderError`] so callers see one
//! failure taxonomy regardless of which service answered.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::ProviderError;
use crate::models::{AddressInfo, Coordinates, Landmark, LandmarkQuery, PlaceQuery, WeatherSnapshot};

pub mod foursquare;
pub mod geoapify;
mod http;
pub mod openweather;

pub use foursquare::FoursquareLandmarkProvider;
pub use geoapify::GeoapifyLocationProvider;
pub use openweather::OpenWeatherProvider;

/// Result of a single provider call
pub type Outcome<T> = std::result::Result<T, ProviderError>;

/// Resolves a structured address into coordinates and a display address
#[async_trait]
pub trait LocationProvider: Send + Sync {
    async fn resolve(&self, place: &PlaceQuery) -> Outcome<AddressInfo>;
}

/// Point-in-time weather lookup
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// `at` defaults to the current time when `None`
    async fn get_weather(
        &self,
        coordinates: Coordinates,
        at: Option<DateTime<Utc>>,
    ) -> Outcome<WeatherSnapshot>;
}

/// Nearby points of interest.
///
/// Implementations only honour the coordinates and category of the query;
/// name filtering and sorting happen in [`crate::landmarks`].
#[async_trait]
pub trait LandmarkProvider: Send + Sync {
    async fn get_landmarks(&self, query: &LandmarkQuery) -> Outcome<Vec<Landmark>>;
}
