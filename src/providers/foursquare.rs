//! Foursquare Places "nearby" adapter

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{info, instrument, warn};

use super::{LandmarkProvider, Outcome, http};
use crate::config::LandmarkConfig;
use crate::error::{ProviderError, ProviderKind};
use crate::models::{Landmark, LandmarkQuery};

/// Substituted when a place comes back without a location block
pub const ADDRESS_UNAVAILABLE: &str = "Address Unavailable";

/// Points-of-interest client for Foursquare Places
pub struct FoursquareLandmarkProvider {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    limit: u32,
    fields: String,
}

#[derive(Debug, Deserialize)]
struct NearbyResponse {
    #[serde(default)]
    results: Vec<Place>,
}

#[derive(Debug, Deserialize)]
struct Place {
    #[serde(default)]
    name: String,
    #[serde(default)]
    categories: Vec<Category>,
    location: Option<PlaceLocation>,
}

#[derive(Debug, Deserialize)]
struct Category {
    #[serde(default)]
    short_name: String,
}

#[derive(Debug, Deserialize)]
struct PlaceLocation {
    formatted_address: Option<String>,
}

impl From<Place> for Landmark {
    fn from(place: Place) -> Self {
        let short_category = place
            .categories
            .into_iter()
            .next()
            .map(|c| c.short_name)
            .unwrap_or_default();
        let formatted_address = place
            .location
            .and_then(|l| l.formatted_address)
            .unwrap_or_else(|| ADDRESS_UNAVAILABLE.to_string());

        Landmark {
            name: place.name,
            short_category,
            formatted_address,
        }
    }
}

impl FoursquareLandmarkProvider {
    pub fn new(config: &LandmarkConfig) -> Result<Self> {
        Ok(Self {
            client: http::build_client(config.timeout_seconds)?,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            limit: config.limit,
            fields: config.fields.clone(),
        })
    }

    fn query_params(&self, query: &LandmarkQuery) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("fields", self.fields.clone()),
            ("ll", query.coordinates.to_lat_lon()),
            ("limit", self.limit.to_string()),
        ];
        if let Some(category) = query.category.as_deref().filter(|c| !c.trim().is_empty()) {
            params.push(("categories", category.to_string()));
        }
        params
    }
}

#[async_trait]
impl LandmarkProvider for FoursquareLandmarkProvider {
    #[instrument(skip(self))]
    async fn get_landmarks(&self, query: &LandmarkQuery) -> Outcome<Vec<Landmark>> {
        let mut request = self
            .client
            .get(&self.base_url)
            .header("Accept", "application/json")
            .query(&self.query_params(query));

        if let Some(api_key) = &self.api_key {
            request = request.header("Authorization", api_key);
        }

        let response: NearbyResponse = http::fetch_json(ProviderKind::Landmark, request).await?;

        if response.results.is_empty() {
            warn!("Landmark API returned no places");
            return Err(ProviderError::empty(ProviderKind::Landmark));
        }

        let landmarks: Vec<Landmark> = response.results.into_iter().map(Landmark::from).collect();
        info!("Found {} landmarks", landmarks.len());
        Ok(landmarks)
    }
}
