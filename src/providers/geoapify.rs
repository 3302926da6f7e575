//! Geoapify geocoding adapter

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{info, instrument, warn};

use super::{LocationProvider, Outcome, http};
use crate::config::LocationConfig;
use crate::error::{ProviderError, ProviderKind};
use crate::models::{AddressInfo, Coordinates, PlaceQuery};

/// Geocoding client for the Geoapify search API
pub struct GeoapifyLocationProvider {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

/// Geoapify search response
#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    properties: FeatureProperties,
}

#[derive(Debug, Deserialize)]
struct FeatureProperties {
    lat: f64,
    lon: f64,
    address_line2: Option<String>,
    formatted: Option<String>,
}

impl FeatureProperties {
    /// Prefer the locality line, then the full formatted address
    fn display_address(&self) -> String {
        [&self.address_line2, &self.formatted]
            .into_iter()
            .flatten()
            .find(|line| !line.trim().is_empty())
            .cloned()
            .unwrap_or_default()
    }
}

impl GeoapifyLocationProvider {
    pub fn new(config: &LocationConfig) -> Result<Self> {
        Ok(Self {
            client: http::build_client(config.timeout_seconds)?,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        })
    }

    fn query_params(&self, place: &PlaceQuery) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(key) = &self.api_key {
            params.push(("apiKey", key.clone()));
        }
        for (name, value) in place.fields() {
            if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
                params.push((name, value.to_string()));
            }
        }
        params
    }
}

#[async_trait]
impl LocationProvider for GeoapifyLocationProvider {
    #[instrument(skip(self))]
    async fn resolve(&self, place: &PlaceQuery) -> Outcome<AddressInfo> {
        let request = self
            .client
            .get(&self.base_url)
            .header("Accept", "application/json")
            .query(&self.query_params(place));

        let response: GeocodeResponse = http::fetch_json(ProviderKind::Location, request).await?;

        let Some(feature) = response.features.into_iter().next() else {
            warn!("Geocoding returned no features");
            return Err(ProviderError::empty(ProviderKind::Location));
        };

        let properties = feature.properties;
        let address = AddressInfo {
            formatted_address: properties.display_address(),
            coordinates: Coordinates::new(properties.lat, properties.lon),
        };

        info!(
            "Resolved '{}' at ({:.4}, {:.4})",
            address.formatted_address, address.coordinates.latitude, address.coordinates.longitude
        );
        Ok(address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn provider_for(server: &MockServer) -> GeoapifyLocationProvider {
        let config = LocationConfig {
            base_url: format!("{}/v1/geocode/search", server.uri()),
            api_key: Some("geo-key".to_string()),
            ..Default::default()
        };
        GeoapifyLocationProvider::new(&config).unwrap()
    }

    fn san_francisco() -> PlaceQuery {
        PlaceQuery {
            country: Some("USA".to_string()),
            city: Some("San Francisco".to_string()),
            street: Some("".to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_resolve_uses_first_feature() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/geocode/search"))
            .and(query_param("apiKey", "geo-key"))
            .and(query_param("city", "San Francisco"))
            .and(query_param("country", "USA"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "features": [
                    {"properties": {"lat": 37.7749, "lon": -122.4194,
                        "address_line2": "San Francisco, CA", "formatted": "San Francisco, CA, United States"}},
                    {"properties": {"lat": 1.0, "lon": 2.0, "address_line2": "Elsewhere"}}
                ]
            })))
            .mount(&server)
            .await;

        let address = provider_for(&server).await.resolve(&san_francisco()).await.unwrap();
        assert_eq!(address.formatted_address, "San Francisco, CA");
        assert_eq!(address.coordinates, Coordinates::new(37.7749, -122.4194));
    }

    #[tokio::test]
    async fn test_resolve_falls_back_to_formatted_address() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "features": [{"properties": {"lat": 47.37, "lon": 8.54, "formatted": "Zurich, Switzerland"}}]
            })))
            .mount(&server)
            .await;

        let address = provider_for(&server).await.resolve(&san_francisco()).await.unwrap();
        assert_eq!(address.formatted_address, "Zurich, Switzerland");
    }

    #[tokio::test]
    async fn test_resolve_empty_features_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"features": []})))
            .mount(&server)
            .await;

        let err = provider_for(&server).await.resolve(&san_francisco()).await.unwrap_err();
        assert_eq!(err, ProviderError::empty(ProviderKind::Location));
        assert_eq!(err.to_string(), "No Location data found");
    }

    #[tokio::test]
    async fn test_resolve_upstream_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let err = provider_for(&server).await.resolve(&san_francisco()).await.unwrap_err();
        assert_eq!(err.to_string(), "Location API error: 401");
    }

    #[tokio::test]
    async fn test_resolve_malformed_body_is_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = provider_for(&server).await.resolve(&san_francisco()).await.unwrap_err();
        assert!(matches!(err, ProviderError::Transport(_)));
        assert!(err.to_string().starts_with("An error occurred fetching location data"));
    }

    #[test]
    fn test_blank_fields_are_not_sent() {
        let config = LocationConfig::default();
        let provider = GeoapifyLocationProvider::new(&config).unwrap();
        let params = provider.query_params(&san_francisco());
        let names: Vec<&str> = params.iter().map(|(name, _)| *name).collect();
        assert_eq!(names, vec!["country", "city"]);
    }
}
