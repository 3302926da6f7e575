//! Aggregation of location, weather and landmark data
//!
//! The pipeline resolves the place first, then queries weather and landmarks
//! concurrently around the resolved coordinates. Each stage folds its outcome
//! into an [`Accumulator`]; a failing source only leaves its fields at their
//! defaults and adds a note to the final message, it never aborts the run.

use std::sync::Arc;

use anyhow::Result;
use tracing::{info, instrument, warn};

use crate::config::{LocationFallback, TravelCompanionConfig};
use crate::envelope::Envelope;
use crate::error::{ProviderError, ProviderKind};
use crate::landmarks;
use crate::models::{
    AddressInfo, AggregatedRequest, AggregatedResult, Coordinates, Landmark, LandmarkQuery,
    WeatherSnapshot,
};
use crate::providers::{
    FoursquareLandmarkProvider, GeoapifyLocationProvider, LandmarkProvider, LocationProvider,
    OpenWeatherProvider, Outcome, WeatherProvider,
};

/// Closing sentence of every aggregated message
pub const CLOSING_NOTE: &str = "Aggregated data retrieved with available results.";

/// Annotation recorded when a source could not contribute
#[must_use]
pub fn unavailable_note(provider: ProviderKind, error: &ProviderError) -> String {
    let error = error.to_string();
    format!("{provider} info unavailable: {}.", error.trim_end_matches('.'))
}

/// Partial result and status notes threaded through the pipeline stages
#[derive(Debug, Default)]
struct Accumulator {
    result: AggregatedResult,
    notes: Vec<String>,
}

impl Accumulator {
    /// Record the geocoding outcome, returning the coordinates on success
    fn record_location(&mut self, outcome: Outcome<AddressInfo>) -> Option<Coordinates> {
        match outcome {
            Ok(address) => {
                self.result.address = Some(address.formatted_address);
                Some(address.coordinates)
            }
            Err(e) => {
                warn!("Location lookup failed: {}", e);
                self.notes.push(unavailable_note(ProviderKind::Location, &e));
                None
            }
        }
    }

    fn record_weather(&mut self, outcome: Outcome<WeatherSnapshot>) {
        match outcome {
            Ok(weather) => {
                self.result.temperature = weather.temperature;
                self.result.feels_like = weather.feels_like;
                self.result.weather_description = Some(weather.long_description);
            }
            Err(e) => {
                warn!("Weather lookup failed: {}", e);
                self.notes.push(unavailable_note(ProviderKind::Weather, &e));
            }
        }
    }

    fn record_landmarks(&mut self, outcome: Outcome<Vec<Landmark>>, query: &LandmarkQuery) {
        match outcome {
            Ok(found) => {
                let processed = landmarks::process(found, query);
                self.result.landmarks = processed.landmarks;
                self.notes.extend(processed.note);
            }
            Err(e) => {
                warn!("Landmark lookup failed: {}", e);
                self.notes.push(unavailable_note(ProviderKind::Landmark, &e));
            }
        }
    }

    /// Completing the pipeline is a success even if every source failed
    fn finish(mut self) -> Envelope<AggregatedResult> {
        self.notes.push(CLOSING_NOTE.to_string());
        Envelope::success(self.result, self.notes.join(" "))
    }
}

/// Orchestrates the three providers into one [`AggregatedResult`]
pub struct AggregationService {
    location: Arc<dyn LocationProvider>,
    weather: Arc<dyn WeatherProvider>,
    landmarks: Arc<dyn LandmarkProvider>,
    location_fallback: LocationFallback,
}

impl AggregationService {
    pub fn new(
        location: Arc<dyn LocationProvider>,
        weather: Arc<dyn WeatherProvider>,
        landmarks: Arc<dyn LandmarkProvider>,
    ) -> Self {
        Self {
            location,
            weather,
            landmarks,
            location_fallback: LocationFallback::default(),
        }
    }

    #[must_use]
    pub fn with_location_fallback(mut self, fallback: LocationFallback) -> Self {
        self.location_fallback = fallback;
        self
    }

    /// Wire the HTTP-backed providers described by `config`
    pub fn from_config(config: &TravelCompanionConfig) -> Result<Self> {
        let service = Self::new(
            Arc::new(GeoapifyLocationProvider::new(&config.location)?),
            Arc::new(OpenWeatherProvider::new(&config.weather)?),
            Arc::new(FoursquareLandmarkProvider::new(&config.landmarks)?),
        );
        Ok(service.with_location_fallback(config.aggregation.location_fallback))
    }

    pub fn location_provider(&self) -> &dyn LocationProvider {
        self.location.as_ref()
    }

    pub fn weather_provider(&self) -> &dyn WeatherProvider {
        self.weather.as_ref()
    }

    pub fn landmark_provider(&self) -> &dyn LandmarkProvider {
        self.landmarks.as_ref()
    }

    /// Run the whole pipeline. Always returns a successful envelope; failed
    /// sources are reported through the message.
    #[instrument(skip_all, fields(city = ?request.place.city, country = ?request.place.country))]
    pub async fn aggregate(&self, request: &AggregatedRequest) -> Envelope<AggregatedResult> {
        let mut acc = Accumulator::default();

        let location = self.location.resolve(&request.place).await;
        match acc.record_location(location) {
            Some(coordinates) => {
                let query = request.landmark_query(coordinates);
                let (weather, found) = futures::join!(
                    self.weather.get_weather(coordinates, request.requested_time),
                    self.landmarks.get_landmarks(&query),
                );
                acc.record_weather(weather);
                acc.record_landmarks(found, &query);
            }
            None => match self.location_fallback {
                LocationFallback::DefaultCoordinates => {
                    warn!("Searching landmarks around default coordinates after failed geocoding");
                    let query = request.landmark_query(Coordinates::default());
                    let found = self.landmarks.get_landmarks(&query).await;
                    acc.record_landmarks(found, &query);
                }
                LocationFallback::Skip => {
                    info!("Skipping weather and landmark lookups after failed geocoding");
                }
            },
        }

        info!(
            "Aggregation finished with {} landmarks and {} notes",
            acc.result.landmarks.len(),
            acc.notes.len()
        );
        acc.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Barrier;

    use crate::models::{PlaceQuery, SortDirection};

    struct StubLocation(Outcome<AddressInfo>);

    #[async_trait]
    impl LocationProvider for StubLocation {
        async fn resolve(&self, _place: &PlaceQuery) -> Outcome<AddressInfo> {
            self.0.clone()
        }
    }

    struct StubWeather {
        outcome: Outcome<WeatherSnapshot>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl WeatherProvider for StubWeather {
        async fn get_weather(
            &self,
            _coordinates: Coordinates,
            _at: Option<DateTime<Utc>>,
        ) -> Outcome<WeatherSnapshot> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outcome.clone()
        }
    }

    struct StubLandmarks {
        outcome: Outcome<Vec<Landmark>>,
        queries: Mutex<Vec<LandmarkQuery>>,
    }

    #[async_trait]
    impl LandmarkProvider for StubLandmarks {
        async fn get_landmarks(&self, query: &LandmarkQuery) -> Outcome<Vec<Landmark>> {
            self.queries.lock().unwrap().push(query.clone());
            self.outcome.clone()
        }
    }

    struct Harness {
        weather: Arc<StubWeather>,
        landmarks: Arc<StubLandmarks>,
        service: AggregationService,
    }

    fn harness(
        location: Outcome<AddressInfo>,
        weather: Outcome<WeatherSnapshot>,
        landmarks: Outcome<Vec<Landmark>>,
    ) -> Harness {
        let weather = Arc::new(StubWeather {
            outcome: weather,
            calls: AtomicUsize::new(0),
        });
        let landmarks = Arc::new(StubLandmarks {
            outcome: landmarks,
            queries: Mutex::new(Vec::new()),
        });
        let service = AggregationService::new(
            Arc::new(StubLocation(location)),
            weather.clone(),
            landmarks.clone(),
        );
        Harness {
            weather,
            landmarks,
            service,
        }
    }

    fn san_francisco() -> Outcome<AddressInfo> {
        Ok(AddressInfo {
            formatted_address: "San Francisco, CA".to_string(),
            coordinates: Coordinates::new(37.7749, -122.4194),
        })
    }

    fn clear_sky() -> Outcome<WeatherSnapshot> {
        Ok(WeatherSnapshot {
            temperature: 20.5,
            feels_like: 18.5,
            short_description: "Clear".to_string(),
            long_description: "Clear sky".to_string(),
        })
    }

    fn golden_gate() -> Outcome<Vec<Landmark>> {
        Ok(vec![Landmark::new(
            "Golden Gate Bridge",
            "Bridge",
            "Golden Gate Bridge, San Francisco, CA",
        )])
    }

    fn request() -> AggregatedRequest {
        AggregatedRequest {
            place: PlaceQuery {
                country: Some("USA".to_string()),
                city: Some("San Francisco".to_string()),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn failure_count(message: &str) -> usize {
        message.matches("info unavailable").count()
    }

    #[tokio::test]
    async fn test_all_sources_succeed() {
        let h = harness(san_francisco(), clear_sky(), golden_gate());
        let envelope = h.service.aggregate(&request()).await;

        assert!(envelope.is_success());
        assert_eq!(envelope.message(), CLOSING_NOTE);
        let data = envelope.data().unwrap();
        assert_eq!(data.address.as_deref(), Some("San Francisco, CA"));
        assert_eq!(data.temperature, 20.5);
        assert_eq!(data.feels_like, 18.5);
        assert_eq!(data.weather_description.as_deref(), Some("Clear sky"));
        assert_eq!(data.landmarks, golden_gate().unwrap());

        let queries = h.landmarks.queries.lock().unwrap();
        assert_eq!(queries[0].coordinates, Coordinates::new(37.7749, -122.4194));
    }

    #[tokio::test]
    async fn test_weather_failure_keeps_other_sources() {
        let h = harness(
            san_francisco(),
            Err(ProviderError::Transport("Weather API error".to_string())),
            golden_gate(),
        );
        let envelope = h.service.aggregate(&request()).await;

        assert!(envelope.is_success());
        assert!(envelope.message().contains("Weather info unavailable: Weather API error."));
        assert_eq!(failure_count(envelope.message()), 1);
        let data = envelope.data().unwrap();
        assert_eq!(data.address.as_deref(), Some("San Francisco, CA"));
        assert_eq!(data.temperature, 0.0);
        assert_eq!(data.feels_like, 0.0);
        assert!(data.weather_description.is_none());
        assert_eq!(data.landmarks.len(), 1);
    }

    #[tokio::test]
    async fn test_landmark_failure_keeps_other_sources() {
        let h = harness(
            san_francisco(),
            clear_sky(),
            Err(ProviderError::Transport("Landmark API error".to_string())),
        );
        let envelope = h.service.aggregate(&request()).await;

        assert!(envelope.is_success());
        assert!(envelope.message().contains("Landmark info unavailable: Landmark API error."));
        assert_eq!(failure_count(envelope.message()), 1);
        let data = envelope.data().unwrap();
        assert_eq!(data.address.as_deref(), Some("San Francisco, CA"));
        assert_eq!(data.temperature, 20.5);
        assert!(data.landmarks.is_empty());
    }

    #[tokio::test]
    async fn test_location_failure_searches_default_coordinates() {
        let h = harness(
            Err(ProviderError::empty(ProviderKind::Location)),
            clear_sky(),
            golden_gate(),
        );
        let envelope = h.service.aggregate(&request()).await;

        assert!(envelope.is_success());
        assert_eq!(
            envelope.message(),
            format!("Location info unavailable: No Location data found. {CLOSING_NOTE}")
        );
        let data = envelope.data().unwrap();
        assert!(data.address.is_none());
        assert!(data.weather_description.is_none());
        assert_eq!(data.landmarks.len(), 1);

        assert_eq!(h.weather.calls.load(Ordering::SeqCst), 0);
        let queries = h.landmarks.queries.lock().unwrap();
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].coordinates, Coordinates::default());
    }

    #[tokio::test]
    async fn test_location_failure_with_skip_fallback() {
        let h = harness(
            Err(ProviderError::upstream_status(ProviderKind::Location, 500)),
            clear_sky(),
            golden_gate(),
        );
        let service = h.service.with_location_fallback(LocationFallback::Skip);
        let envelope = service.aggregate(&request()).await;

        assert!(envelope.is_success());
        assert!(envelope.message().starts_with("Location info unavailable: Location API error: 500."));
        assert_eq!(envelope.data().unwrap(), &AggregatedResult::default());
        assert_eq!(h.weather.calls.load(Ordering::SeqCst), 0);
        assert!(h.landmarks.queries.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_all_sources_fail_still_completes() {
        let h = harness(
            Err(ProviderError::transport(ProviderKind::Location, "timed out")),
            clear_sky(),
            Err(ProviderError::empty(ProviderKind::Landmark)),
        );
        let envelope = h.service.aggregate(&request()).await;

        assert!(envelope.is_success());
        assert_eq!(failure_count(envelope.message()), 2);
        assert!(envelope.message().ends_with(CLOSING_NOTE));
        assert_eq!(envelope.data().unwrap(), &AggregatedResult::default());
    }

    #[tokio::test]
    async fn test_landmarks_are_post_processed() {
        let h = harness(
            san_francisco(),
            clear_sky(),
            Ok(vec![
                Landmark::new("The Getty Center", "Museum", ""),
                Landmark::new("Hollywood Walk of Fame", "Monument", ""),
            ]),
        );
        let mut request = request();
        request.landmark_name_filter = Some("Getty".to_string());
        request.sort_by = Some("name".to_string());
        request.sort_order = SortDirection::Desc;

        let envelope = h.service.aggregate(&request).await;
        let data = envelope.data().unwrap();
        assert_eq!(data.landmarks.len(), 1);
        assert_eq!(data.landmarks[0].name, "The Getty Center");
        assert!(envelope.message().contains("Landmarks filtered by name 'Getty'."));
        assert_eq!(failure_count(envelope.message()), 0);
    }

    struct GatedWeather(Arc<Barrier>);

    #[async_trait]
    impl WeatherProvider for GatedWeather {
        async fn get_weather(
            &self,
            _coordinates: Coordinates,
            _at: Option<DateTime<Utc>>,
        ) -> Outcome<WeatherSnapshot> {
            self.0.wait().await;
            clear_sky()
        }
    }

    struct GatedLandmarks(Arc<Barrier>);

    #[async_trait]
    impl LandmarkProvider for GatedLandmarks {
        async fn get_landmarks(&self, _query: &LandmarkQuery) -> Outcome<Vec<Landmark>> {
            self.0.wait().await;
            golden_gate()
        }
    }

    #[tokio::test]
    async fn test_weather_and_landmarks_run_concurrently() {
        // Each call blocks until the other one has started as well
        let barrier = Arc::new(Barrier::new(2));
        let service = AggregationService::new(
            Arc::new(StubLocation(san_francisco())),
            Arc::new(GatedWeather(barrier.clone())),
            Arc::new(GatedLandmarks(barrier)),
        );

        let envelope = tokio::time::timeout(
            std::time::Duration::from_secs(5),
            service.aggregate(&request()),
        )
        .await
        .expect("weather and landmark calls should not wait on each other");

        let data = envelope.data().unwrap();
        assert_eq!(data.temperature, 20.5);
        assert_eq!(data.landmarks.len(), 1);
    }

    #[test]
    fn test_unavailable_note_format() {
        let note = unavailable_note(
            ProviderKind::Weather,
            &ProviderError::upstream_status(ProviderKind::Weather, 401),
        );
        assert_eq!(note, "Weather info unavailable: Weather API error: 401.");
    }

    #[test]
    fn test_unavailable_note_keeps_single_period() {
        let note = unavailable_note(
            ProviderKind::Landmark,
            &ProviderError::Transport("Connection reset by peer.".to_string()),
        );
        assert_eq!(note, "Landmark info unavailable: Connection reset by peer.");
    }
}
