//! HTTP routes for aggregation, per-provider lookups and health

use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use serde_json::{Value, json};
use tracing::{debug, info};

use crate::{
    VERSION,
    aggregation::AggregationService,
    envelope::Envelope,
    error::TravelCompanionError,
    landmarks,
    models::{
        AddressInfo, AggregatedRequest, AggregatedResult, Landmark, LandmarkQuery, PlaceQuery,
        WeatherQuery, WeatherSnapshot,
    },
};

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<AggregationService>,
}

impl AppState {
    pub fn new(service: AggregationService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/aggregated-data", post(aggregated_data))
        .route("/location", post(location))
        .route("/weather", post(weather))
        .route("/landmarks", post(landmark_search))
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "version": VERSION }))
}

async fn aggregated_data(
    State(state): State<AppState>,
    Json(request): Json<AggregatedRequest>,
) -> (StatusCode, Json<Envelope<AggregatedResult>>) {
    if request.place.is_blank() {
        let error = TravelCompanionError::validation(
            "at least one of country, state, city, postalCode or street is required",
        );
        info!("Rejected aggregation request: {}", error);
        return (
            StatusCode::BAD_REQUEST,
            Json(Envelope::failure(error.user_message())),
        );
    }

    let envelope = state.service.aggregate(&request).await;
    let status = if envelope.is_success() {
        StatusCode::OK
    } else {
        StatusCode::BAD_REQUEST
    };
    (status, Json(envelope))
}

async fn location(
    State(state): State<AppState>,
    Json(place): Json<PlaceQuery>,
) -> Json<Envelope<AddressInfo>> {
    let outcome = state.service.location_provider().resolve(&place).await;
    Json(Envelope::from_outcome(
        outcome,
        "Location data retrieved successfully.",
    ))
}

async fn weather(
    State(state): State<AppState>,
    Json(query): Json<WeatherQuery>,
) -> Json<Envelope<WeatherSnapshot>> {
    let outcome = state
        .service
        .weather_provider()
        .get_weather(query.coordinates, query.requested_time)
        .await;
    Json(Envelope::from_outcome(
        outcome,
        "Weather data retrieved successfully.",
    ))
}

async fn landmark_search(
    State(state): State<AppState>,
    Json(query): Json<LandmarkQuery>,
) -> Json<Envelope<Vec<Landmark>>> {
    let outcome = state.service.landmark_provider().get_landmarks(&query).await;
    let envelope = match outcome {
        Ok(found) => {
            let processed = landmarks::process(found, &query);
            debug!("Returning {} landmarks", processed.landmarks.len());
            let message = match processed.note {
                Some(note) => format!("Landmark data retrieved successfully. {note}"),
                None => "Landmark data retrieved successfully.".to_string(),
            };
            Envelope::success(processed.landmarks, message)
        }
        Err(e) => Envelope::failure(e.to_string()),
    };
    Json(envelope)
}
